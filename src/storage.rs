//! Domain Record Storage Interface
//!
//! Unit-of-work storage seam for domain records. Implementations stage
//! `save`/`delete` calls and apply them atomically on `commit`; reads
//! observe staged writes within the same unit of work (session-local
//! visibility). The core performs find-or-create then mutate without
//! internal locking, so implementations must serialize conflicting writes.

use async_trait::async_trait;

use crate::domain::hostname::Hostname;
use crate::domain::mode::DomainMode;
use crate::domain::record::{DomainRecord, OwnerId, RecordId};
use crate::errors::PolicyResult;

/// Storage collaborator for domain records
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Find a record by exact canonical hostname, across all owners
    async fn find_by_domain(&self, domain: &Hostname) -> PolicyResult<Option<DomainRecord>>;

    /// All records with the given mode
    async fn find_by_mode(&self, mode: DomainMode) -> PolicyResult<Vec<DomainRecord>>;

    /// All records, ordered by id
    async fn find_all(&self) -> PolicyResult<Vec<DomainRecord>>;

    /// All records owned by any of the given nodes
    async fn find_by_owner_in(&self, owners: &[OwnerId]) -> PolicyResult<Vec<DomainRecord>>;

    /// Stage a record write; assigns an id on first save
    ///
    /// Returns the stored copy, carrying the assigned id.
    async fn save(&self, record: DomainRecord) -> PolicyResult<DomainRecord>;

    /// Stage a record deletion
    async fn delete(&self, id: RecordId) -> PolicyResult<()>;

    /// Apply all staged writes atomically
    async fn commit(&self) -> PolicyResult<()>;
}

/// Parent-domain collaborator, consulted only in the parent topology role
///
/// Structurally parallel to the domain store's read side; implementations
/// synthesize [`DomainRecord`] values so downstream consumers see one
/// contract regardless of role.
#[async_trait]
pub trait ParentDomainStore: Send + Sync {
    /// All parent-domain records
    async fn find_all(&self) -> PolicyResult<Vec<DomainRecord>>;

    /// Parent-domain record matching the hostname
    async fn find_by_domain(&self, domain: &Hostname) -> PolicyResult<Option<DomainRecord>>;
}
