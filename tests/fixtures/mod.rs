//! Test fixtures for panel-domains
//!
//! Deterministic collaborator implementations and wiring helpers shared by
//! the integration suites. Tests use these instead of constructing
//! collaborators inline.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use panel_domains::adapters::{MemoryDomainStore, StaticParentDomainStore};
use panel_domains::{
    ConfigKey, DiagnosticSink, DomainRegistrar, DomainSelector, Hostname, IpDiscovery, OwnerId,
    PolicyResult, StaticConfig, Topology, VisibilityGraph,
};

/// Fixed public IP used by every test
pub const TEST_IP: &str = "198.51.100.20";

/// Discovery collaborator returning a fixed address
pub struct FixedIpDiscovery;

#[async_trait]
impl IpDiscovery for FixedIpDiscovery {
    async fn public_ipv4(&self) -> PolicyResult<String> {
        Ok(TEST_IP.to_string())
    }
}

/// Topology collaborator backed by a fixed child-id map
///
/// Unknown and absent child ids resolve to the root node, as on a
/// standalone panel.
#[derive(Default)]
pub struct MapTopology {
    owners: HashMap<Uuid, OwnerId>,
}

impl MapTopology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, unique_id: Uuid, owner: OwnerId) -> Self {
        self.owners.insert(unique_id, owner);
        self
    }
}

#[async_trait]
impl Topology for MapTopology {
    async fn resolve_owner_id(&self, child_unique_id: Option<Uuid>) -> PolicyResult<OwnerId> {
        Ok(child_unique_id
            .and_then(|id| self.owners.get(&id).copied())
            .unwrap_or(OwnerId::ROOT))
    }

    async fn owner_unique_id(&self, owner: OwnerId) -> PolicyResult<Option<Uuid>> {
        Ok(self
            .owners
            .iter()
            .find(|(_, o)| **o == owner)
            .map(|(id, _)| *id))
    }
}

/// Diagnostic sink that counts warnings instead of logging them
#[derive(Default)]
pub struct CountingDiagnostics {
    warnings: AtomicUsize,
}

impl CountingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }
}

impl DiagnosticSink for CountingDiagnostics {
    fn warn_unregistered_domain(&self, _hostname: &str) {
        self.warnings.fetch_add(1, Ordering::SeqCst);
    }
}

/// Standalone-instance configuration with the standard port bases
pub fn standalone_config() -> StaticConfig {
    StaticConfig::new()
        .with_int(ConfigKey::HysteriaPort, 20000)
        .with_int(ConfigKey::TuicPort, 30000)
        .with_int(ConfigKey::RealityPort, 40000)
        .with_bool(ConfigKey::IsParent, false)
}

/// Parent-role configuration
pub fn parent_config() -> StaticConfig {
    standalone_config().with_bool(ConfigKey::IsParent, true)
}

pub fn host(s: &str) -> Hostname {
    Hostname::new(s).unwrap()
}

/// Fully wired harness around one in-memory store
pub struct Harness {
    pub store: Arc<MemoryDomainStore>,
    pub graph: Arc<RwLock<VisibilityGraph>>,
    pub diagnostics: Arc<CountingDiagnostics>,
    pub registrar: DomainRegistrar,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_topology(MapTopology::new())
    }

    pub fn with_topology(topology: MapTopology) -> Self {
        let store = Arc::new(MemoryDomainStore::new());
        let graph = Arc::new(RwLock::new(VisibilityGraph::new()));
        let diagnostics = Arc::new(CountingDiagnostics::new());
        let registrar =
            DomainRegistrar::new(store.clone(), graph.clone(), Arc::new(topology));
        Self {
            store,
            graph,
            diagnostics,
            registrar,
        }
    }

    /// Selector over this harness's store, standalone role
    pub fn selector(&self, config: &StaticConfig) -> DomainSelector {
        DomainSelector::new(
            self.store.clone(),
            Arc::new(StaticParentDomainStore::empty()),
            self.graph.clone(),
            config,
            Arc::new(FixedIpDiscovery),
            self.diagnostics.clone(),
        )
    }

    /// Selector with an explicit parent-domain collaborator
    pub fn selector_with_parents(
        &self,
        config: &StaticConfig,
        parents: StaticParentDomainStore,
    ) -> DomainSelector {
        DomainSelector::new(
            self.store.clone(),
            Arc::new(parents),
            self.graph.clone(),
            config,
            Arc::new(FixedIpDiscovery),
            self.diagnostics.clone(),
        )
    }
}
