//! Request Context and External Collaborators
//!
//! Seams for everything the policy core consumes but does not implement:
//! the incoming request's hostname, public-IP discovery, the topology
//! registry, and the diagnostic warning sink.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::record::OwnerId;
use crate::errors::PolicyResult;

/// Hostname context of the request being served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Host the client addressed, without port
    pub host: String,
}

impl RequestContext {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

/// Public IP discovery collaborator
///
/// Carries its own timeout/retry policy; the core treats a failure as a
/// hard error since it is only consulted when no other fallback exists.
#[async_trait]
pub trait IpDiscovery: Send + Sync {
    /// Discover this node's public IPv4 address
    async fn public_ipv4(&self) -> PolicyResult<String>;
}

/// Topology registry collaborator
#[async_trait]
pub trait Topology: Send + Sync {
    /// Resolve an owning node id from a child's unique id
    ///
    /// `None` resolves to the node a sync without explicit attribution
    /// belongs to (the root node on a standalone panel).
    async fn resolve_owner_id(&self, child_unique_id: Option<Uuid>) -> PolicyResult<OwnerId>;

    /// Unique id of an owning node, when the node is known
    async fn owner_unique_id(&self, owner: OwnerId) -> PolicyResult<Option<Uuid>>;
}

/// Sink for user-facing diagnostic warnings
///
/// The only read-path signal: resolution never fails on an unregistered
/// hostname, it warns and falls back.
pub trait DiagnosticSink: Send + Sync {
    /// An incoming hostname had no matching domain record
    fn warn_unregistered_domain(&self, hostname: &str);
}

/// Default sink that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn warn_unregistered_domain(&self, hostname: &str) {
        tracing::warn!(hostname, "domain not registered in the panel");
    }
}
