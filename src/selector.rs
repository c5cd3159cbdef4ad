//! Domain Selection
//!
//! Read path of the policy core: given the instance's topology role and a
//! request context, resolve which domain records apply. Lookups never fail
//! the caller; unresolved cases degrade to documented fallbacks (transient
//! request-host record, discovered-IP record, global record set).

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::{ConfigKey, ConfigSource};
use crate::context::{DiagnosticSink, IpDiscovery, RequestContext};
use crate::domain::hostname::Hostname;
use crate::domain::mode::DomainMode;
use crate::domain::record::DomainRecord;
use crate::errors::{DomainPolicyError, PolicyResult};
use crate::storage::{DomainStore, ParentDomainStore};
use crate::visibility::VisibilityGraph;

/// Resolves the effective domain set for panel and proxy requests
///
/// Side-effect-free apart from the diagnostic warning on the
/// unregistered-hostname fallback; safe to call concurrently.
pub struct DomainSelector {
    store: Arc<dyn DomainStore>,
    parent_store: Arc<dyn ParentDomainStore>,
    graph: Arc<RwLock<VisibilityGraph>>,
    ip_discovery: Arc<dyn IpDiscovery>,
    diagnostics: Arc<dyn DiagnosticSink>,
    is_parent: bool,
    request: Option<RequestContext>,
}

impl DomainSelector {
    pub fn new(
        store: Arc<dyn DomainStore>,
        parent_store: Arc<dyn ParentDomainStore>,
        graph: Arc<RwLock<VisibilityGraph>>,
        config: &dyn ConfigSource,
        ip_discovery: Arc<dyn IpDiscovery>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            store,
            parent_store,
            graph,
            ip_discovery,
            diagnostics,
            is_parent: config.get_bool(ConfigKey::IsParent).unwrap_or(false),
            request: None,
        }
    }

    /// Attach the hostname context of the request being served
    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = Some(request);
        self
    }

    /// Domains eligible to be advertised by the panel
    ///
    /// Parent instances delegate to the parent-domain collaborator with no
    /// mode filtering. Otherwise sub-link-only domains win; when none exist
    /// (or `always_add_all_domains` is set) every mode except fake and
    /// reality qualifies. An empty result synthesizes a transient record
    /// from the request host, and finally from the discovered public IP.
    pub async fn select_panel_domains(
        &self,
        always_add_ip: bool,
        always_add_all_domains: bool,
    ) -> PolicyResult<Vec<DomainRecord>> {
        let mut domains = if self.is_parent {
            self.parent_store.find_all().await?
        } else {
            let mut domains = self.store.find_by_mode(DomainMode::SubLinkOnly).await?;
            if domains.is_empty() || always_add_all_domains {
                domains = self
                    .store
                    .find_all()
                    .await?
                    .into_iter()
                    .filter(|r| r.mode.panel_visible())
                    .collect();
            }
            domains
        };

        if domains.is_empty() {
            if let Some(request) = &self.request {
                // An unparseable request host is skipped, not an error:
                // the IP fallback below still fires
                if let Ok(host) = Hostname::new(request.host.clone()) {
                    domains.push(DomainRecord::transient(host, DomainMode::Direct));
                }
            }
        }

        if domains.is_empty() || always_add_ip {
            let ip = self.ip_discovery.public_ipv4().await?;
            let host = Hostname::new(ip)?;
            domains.push(DomainRecord::transient(host, DomainMode::Direct));
        }

        Ok(domains)
    }

    /// Domain group to disclose for a proxy request against `hostname`
    ///
    /// A registered record discloses its shows group, or the global record
    /// set when the group is empty. An unregistered hostname emits one
    /// diagnostic warning and still receives the global set, so
    /// misconfigured hosts get a usable result for diagnostics.
    pub async fn select_proxy_domains(&self, hostname: &str) -> PolicyResult<Vec<DomainRecord>> {
        // A host the validator rejects can never be registered; treat it
        // like any other unregistered hostname instead of failing the
        // caller
        let host = match Hostname::new(hostname) {
            Ok(host) => host,
            Err(_) => {
                self.diagnostics.warn_unregistered_domain(hostname);
                return self.store.find_all().await;
            }
        };

        let record = if self.is_parent {
            self.parent_store.find_by_domain(&host).await?
        } else {
            let found = self.store.find_by_domain(&host).await?;
            if found.is_none() {
                self.diagnostics.warn_unregistered_domain(host.as_str());
            }
            found
        };

        match record {
            Some(record) => self.resolve_group(&record).await,
            None => self.store.find_all().await,
        }
    }

    /// Resolve using an explicit hostname override or the request host
    pub async fn current_proxy_domains(
        &self,
        force_hostname: Option<&str>,
    ) -> PolicyResult<Vec<DomainRecord>> {
        let host = match force_hostname {
            Some(host) => host.to_string(),
            None => self
                .request
                .as_ref()
                .map(|r| r.host.clone())
                .ok_or(DomainPolicyError::NoRequestHost)?,
        };
        self.select_proxy_domains(&host).await
    }

    /// Domain strings currently stored under a mode
    pub async fn domains_by_mode(&self, mode: DomainMode) -> PolicyResult<Vec<String>> {
        Ok(self
            .store
            .find_by_mode(mode)
            .await?
            .into_iter()
            .map(|r| r.domain.as_str().to_string())
            .collect())
    }

    /// Domain strings for every mode, keyed by mode
    pub async fn mode_catalogue(&self) -> PolicyResult<HashMap<DomainMode, Vec<String>>> {
        let mut catalogue = HashMap::new();
        for mode in DomainMode::ALL {
            catalogue.insert(mode, self.domains_by_mode(mode).await?);
        }
        Ok(catalogue)
    }

    /// A record's shows group, or the global set when the group is empty
    async fn resolve_group(&self, record: &DomainRecord) -> PolicyResult<Vec<DomainRecord>> {
        let shown: BTreeSet<_> = match record.id {
            Some(id) => self.graph.read().await.shown(id),
            None => BTreeSet::new(),
        };

        if shown.is_empty() {
            return self.store.find_all().await;
        }

        Ok(self
            .store
            .find_all()
            .await?
            .into_iter()
            .filter(|r| r.id.is_some_and(|id| shown.contains(&id)))
            .collect())
    }
}
