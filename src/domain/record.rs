//! Domain Record Entity
//!
//! The stored entity behind every configured hostname: operating mode,
//! display alias, CDN hints, and transport flags. Records synthesized as
//! fallbacks (request host, discovered IP) use the same type with
//! `id: None`, so port derivation and export work identically on persisted
//! and transient records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::hostname::Hostname;
use super::mode::DomainMode;
use crate::ports::{PortAssignment, PortBases};

/// Stable ordinal identity of a persisted record
///
/// Assigned monotonically on first save and used as the additive port
/// offset, so distinct records never collide within a port family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Topology node that owns a record; 0 is the root node
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl OwnerId {
    /// The root panel node
    pub const ROOT: OwnerId = OwnerId(0);

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A configured hostname with its operating mode and transport metadata
///
/// # Lifecycle
/// - Created on first registration of a new hostname for an owner node
/// - Mutated by the registrar on every sync
/// - Deleted only by the registrar's scoped removal pass, never by reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// `None` while the record is transient (unsaved)
    pub id: Option<RecordId>,

    /// Owning topology node
    pub owner: OwnerId,

    /// Canonical hostname, the matching key
    pub domain: Hostname,

    /// Optional display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Operating mode
    pub mode: DomainMode,

    /// CDN edge IP hints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdn_ip: Option<String>,

    /// Whether transport negotiation uses gRPC
    pub grpc: bool,

    /// TLS SNI hints for downstream consumers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_names: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl DomainRecord {
    /// Create a new unsaved record with default (direct) mode
    pub fn new(domain: Hostname) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            owner: OwnerId::ROOT,
            domain,
            alias: None,
            mode: DomainMode::default(),
            cdn_ip: None,
            grpc: false,
            server_names: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a transient fallback record for a hostname
    ///
    /// Transient records satisfy the full read contract (port derivation,
    /// export) but are never persisted.
    pub fn transient(domain: Hostname, mode: DomainMode) -> Self {
        let mut record = Self::new(domain);
        record.mode = mode;
        record
    }

    /// Builder for fluent construction
    pub fn builder(domain: Hostname) -> DomainRecordBuilder {
        DomainRecordBuilder {
            record: Self::new(domain),
        }
    }

    /// Whether the record has been saved at least once
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Ordinal used as the port offset; 0 for transient records
    pub fn ordinal(&self) -> i64 {
        self.id.map_or(0, |id| id.0)
    }

    /// Bump the updated timestamp after a field mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Derive this record's internal port assignment
    pub fn ports(&self, bases: &PortBases) -> PortAssignment {
        PortAssignment::derive(self.mode, self.ordinal(), bases)
    }

    /// Serialize for proxy-config consumers
    ///
    /// `shown_domains` is the resolved visibility group as domain strings;
    /// `owner_unique_id` is the owning node's unique id when known.
    pub fn export(&self, owner_unique_id: Option<Uuid>, shown_domains: Vec<String>) -> DomainExport {
        DomainExport {
            domain: self.domain.as_str().to_string(),
            mode: self.mode,
            alias: self.alias.clone(),
            owner_unique_id: owner_unique_id.map(|id| id.to_string()).unwrap_or_default(),
            cdn_ip: self.cdn_ip.clone(),
            server_names: self.server_names.clone(),
            grpc: self.grpc,
            shown_domains,
            ports: None,
        }
    }

    /// Serialize for proxy-config consumers, including derived ports
    pub fn export_with_ports(
        &self,
        owner_unique_id: Option<Uuid>,
        shown_domains: Vec<String>,
        bases: &PortBases,
    ) -> DomainExport {
        let mut export = self.export(owner_unique_id, shown_domains);
        export.ports = Some(self.ports(bases));
        export
    }
}

impl fmt::Display for DomainRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.domain)
    }
}

/// Builder for DomainRecord with fluent API
pub struct DomainRecordBuilder {
    record: DomainRecord,
}

impl DomainRecordBuilder {
    pub fn owner(mut self, owner: OwnerId) -> Self {
        self.record.owner = owner;
        self
    }

    pub fn mode(mut self, mode: DomainMode) -> Self {
        self.record.mode = mode;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.record.alias = Some(alias.into());
        self
    }

    pub fn cdn_ip(mut self, cdn_ip: impl Into<String>) -> Self {
        self.record.cdn_ip = Some(cdn_ip.into());
        self
    }

    pub fn grpc(mut self, grpc: bool) -> Self {
        self.record.grpc = grpc;
        self
    }

    pub fn server_names(mut self, server_names: impl Into<String>) -> Self {
        self.record.server_names = Some(server_names.into());
        self
    }

    pub fn build(self) -> DomainRecord {
        self.record
    }
}

/// Record serialization exposed to downstream consumers
///
/// The domain is always lowercase (hostnames are canonical on
/// construction); port fields appear only when exported with ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainExport {
    pub domain: String,
    pub mode: DomainMode,
    pub alias: Option<String>,
    /// Empty string for root-owned records, matching the wire format
    pub owner_unique_id: String,
    pub cdn_ip: Option<String>,
    pub server_names: Option<String>,
    pub grpc: bool,
    pub shown_domains: Vec<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub ports: Option<PortAssignment>,
}
