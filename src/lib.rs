//! Domain-record policy core for a multi-tenant proxy panel
//!
//! Decides which domain records apply to an incoming hostname or panel
//! instance, which internal ports each record's proxy endpoints occupy,
//! and how an incoming domain list reconciles against stored records.
//!
//! - [`domain`] - the mode/record data model
//! - [`ports`] - pure port derivation from mode, ordinal id, and bases
//! - [`visibility`] - the directed "shows" grouping between records
//! - [`selector`] - read path: panel and proxy domain resolution
//! - [`registrar`] - write path: upsert and scoped replace-sync
//! - [`storage`] - the injected storage unit-of-work seam

pub mod adapters;
pub mod config;
pub mod context;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod registrar;
pub mod selector;
pub mod storage;
pub mod visibility;

// Re-export commonly used types
pub use config::{ConfigKey, ConfigSource, StaticConfig};
pub use context::{DiagnosticSink, IpDiscovery, RequestContext, Topology, TracingDiagnostics};
pub use domain::{DomainExport, DomainMode, DomainRecord, Hostname, OwnerId, RecordId};
pub use errors::{DomainPolicyError, PolicyResult};
pub use ports::{PortAssignment, PortBases};
pub use registrar::{DomainInput, DomainRegistrar};
pub use selector::DomainSelector;
pub use storage::{DomainStore, ParentDomainStore};
pub use visibility::VisibilityGraph;
