//! Domain Registration and Bulk Sync
//!
//! Write path of the policy core: reconciling incoming domain lists
//! against stored records. Identity is the canonical domain string across
//! all owners; re-registering an existing domain under a different owner
//! reassigns ownership. Bulk sync is a scoped replace per touched owner,
//! run in three phases so visibility links are only resolved after stale
//! records have been deleted.

use serde::{Deserialize, Deserializer};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::context::Topology;
use crate::domain::hostname::Hostname;
use crate::domain::mode::DomainMode;
use crate::domain::record::{DomainRecord, OwnerId};
use crate::errors::PolicyResult;
use crate::storage::DomainStore;
use crate::visibility::VisibilityGraph;

/// Incoming fields for one domain registration
///
/// Deserializes straight from the panel's import payloads. Absent fields
/// default to empty/false; `sub_link_only` is a legacy boolean that still
/// arrives as either a JSON bool or the string `"true"`, and when set it
/// forces the mode regardless of the supplied one.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainInput {
    pub domain: String,

    #[serde(default)]
    pub mode: DomainMode,

    #[serde(default, deserialize_with = "legacy_bool")]
    pub sub_link_only: bool,

    #[serde(default)]
    pub alias: Option<String>,

    #[serde(default)]
    pub cdn_ip: Option<String>,

    #[serde(default)]
    pub grpc: bool,

    #[serde(default)]
    pub server_names: Option<String>,

    #[serde(default)]
    pub shown_domains: Vec<String>,

    #[serde(default)]
    pub child_unique_id: Option<Uuid>,
}

impl DomainInput {
    /// A minimal input: direct mode, no links, everything else empty
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            mode: DomainMode::default(),
            sub_link_only: false,
            alias: None,
            cdn_ip: None,
            grpc: false,
            server_names: None,
            shown_domains: Vec::new(),
            child_unique_id: None,
        }
    }

    pub fn with_mode(mut self, mode: DomainMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_shown_domains(mut self, shown: Vec<String>) -> Self {
        self.shown_domains = shown;
        self
    }

    /// Mode after the legacy boolean override
    pub fn effective_mode(&self) -> DomainMode {
        if self.sub_link_only {
            DomainMode::SubLinkOnly
        } else {
            self.mode
        }
    }
}

/// Accepts `true`/`false` as JSON bool or as the legacy string form
fn legacy_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Str(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Str(s) => s.trim().eq_ignore_ascii_case("true"),
    })
}

/// Upsert and replace-sync logic for domain records
///
/// Record mutations stage against the storage unit of work; commits happen
/// only at the documented points, so callers can batch writes.
///
/// Visibility edges are applied to the graph immediately, outside the
/// storage unit of work. A caller that rolls back staged record writes
/// must re-run the registrar's link pass (re-upsert the affected inputs)
/// to bring the graph back in line with storage; until then the graph may
/// reference record ids that were never committed. Dangling ids are
/// harmless to the read path, which intersects groups with the stored
/// record set.
pub struct DomainRegistrar {
    store: Arc<dyn DomainStore>,
    graph: Arc<RwLock<VisibilityGraph>>,
    topology: Arc<dyn Topology>,
}

impl DomainRegistrar {
    pub fn new(
        store: Arc<dyn DomainStore>,
        graph: Arc<RwLock<VisibilityGraph>>,
        topology: Arc<dyn Topology>,
    ) -> Self {
        Self {
            store,
            graph,
            topology,
        }
    }

    /// Find-or-create a record by domain string and apply the input
    ///
    /// The lookup ignores owners; the found or created record is then
    /// assigned to `owner`. Show-links are resolved against current
    /// storage, silently dropping names with no matching record. Commits
    /// only when `commit` is set.
    pub async fn upsert(
        &self,
        owner: OwnerId,
        input: &DomainInput,
        commit: bool,
    ) -> PolicyResult<DomainRecord> {
        let record = self.upsert_fields(owner, input).await?;
        self.apply_show_links(&record, &input.shown_domains).await?;
        if commit {
            self.store.commit().await?;
        }
        Ok(record)
    }

    /// Reconcile an incoming batch against storage, per owner
    ///
    /// Three phases:
    /// 1. upsert every input's fields, collecting touched owners
    ///    (explicit override, else resolved from the input's child id);
    /// 2. when `remove` is set and an owner was touched, delete that
    ///    owner's records whose domain is absent from the batch; commit;
    /// 3. resolve show-links for every input against the now-settled
    ///    record set; final commit.
    ///
    /// Link resolution runs after deletions so a group can never reference
    /// a record the same sync removed.
    pub async fn bulk_sync(
        &self,
        inputs: &[DomainInput],
        remove: bool,
        override_owner: Option<OwnerId>,
    ) -> PolicyResult<()> {
        let mut touched: BTreeSet<OwnerId> = BTreeSet::new();
        for input in inputs {
            let owner = match override_owner {
                Some(owner) => owner,
                None => self.topology.resolve_owner_id(input.child_unique_id).await?,
            };
            touched.insert(owner);
            self.upsert_fields(owner, input).await?;
        }

        if remove && !touched.is_empty() {
            let incoming: HashSet<String> = inputs
                .iter()
                .map(|i| i.domain.to_lowercase())
                .collect();
            let owners: Vec<OwnerId> = touched.into_iter().collect();

            for record in self.store.find_by_owner_in(&owners).await? {
                if !incoming.contains(record.domain.as_str()) {
                    if let Some(id) = record.id {
                        self.graph.write().await.remove_record(id);
                        self.store.delete(id).await?;
                    }
                }
            }
        }
        self.store.commit().await?;

        for input in inputs {
            let host = Hostname::new(input.domain.clone())?;
            if let Some(record) = self.store.find_by_domain(&host).await? {
                self.apply_show_links(&record, &input.shown_domains).await?;
            }
        }
        self.store.commit().await
    }

    async fn upsert_fields(
        &self,
        owner: OwnerId,
        input: &DomainInput,
    ) -> PolicyResult<DomainRecord> {
        let host = Hostname::new(input.domain.clone())?;
        let mut record = match self.store.find_by_domain(&host).await? {
            Some(existing) => existing,
            None => DomainRecord::new(host),
        };

        record.owner = owner;
        record.mode = input.effective_mode();
        record.alias = input.alias.clone();
        record.cdn_ip = input.cdn_ip.clone();
        record.grpc = input.grpc;
        record.server_names = input.server_names.clone();
        record.touch();

        self.store.save(record).await
    }

    async fn apply_show_links(
        &self,
        record: &DomainRecord,
        shown_domains: &[String],
    ) -> PolicyResult<()> {
        let Some(id) = record.id else {
            return Ok(());
        };

        let mut targets = Vec::new();
        for name in shown_domains {
            // Unresolvable names are dropped: matches-by-name only
            let Ok(host) = Hostname::new(name.clone()) else {
                continue;
            };
            if let Some(target) = self.store.find_by_domain(&host).await? {
                if let Some(target_id) = target.id {
                    targets.push(target_id);
                }
            }
        }

        self.graph.write().await.replace_shown(id, targets);
        Ok(())
    }
}
