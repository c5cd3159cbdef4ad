//! In-Memory Domain Store
//!
//! Reference [`DomainStore`] implementation backing the test suites:
//! a working map staged against a committed snapshot, with monotonic id
//! assignment. Reads observe the working state, matching the
//! session-local visibility the storage contract requires.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::hostname::Hostname;
use crate::domain::mode::DomainMode;
use crate::domain::record::{DomainRecord, OwnerId, RecordId};
use crate::errors::PolicyResult;
use crate::storage::{DomainStore, ParentDomainStore};

#[derive(Debug, Default)]
struct Inner {
    working: BTreeMap<RecordId, DomainRecord>,
    committed: BTreeMap<RecordId, DomainRecord>,
    next_id: i64,
}

/// In-memory unit-of-work store for domain records
#[derive(Debug)]
pub struct MemoryDomainStore {
    inner: RwLock<Inner>,
}

impl MemoryDomainStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                working: BTreeMap::new(),
                committed: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Committed records, ordered by id
    ///
    /// Lets tests assert commit boundaries: staged writes are invisible
    /// here until `commit`.
    pub async fn committed_records(&self) -> Vec<DomainRecord> {
        self.inner.read().await.committed.values().cloned().collect()
    }

    /// Discard staged writes, restoring the committed snapshot
    pub async fn rollback(&self) {
        let mut inner = self.inner.write().await;
        inner.working = inner.committed.clone();
    }
}

impl Default for MemoryDomainStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainStore for MemoryDomainStore {
    async fn find_by_domain(&self, domain: &Hostname) -> PolicyResult<Option<DomainRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .working
            .values()
            .find(|r| &r.domain == domain)
            .cloned())
    }

    async fn find_by_mode(&self, mode: DomainMode) -> PolicyResult<Vec<DomainRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .working
            .values()
            .filter(|r| r.mode == mode)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> PolicyResult<Vec<DomainRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.working.values().cloned().collect())
    }

    async fn find_by_owner_in(&self, owners: &[OwnerId]) -> PolicyResult<Vec<DomainRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .working
            .values()
            .filter(|r| owners.contains(&r.owner))
            .cloned()
            .collect())
    }

    async fn save(&self, mut record: DomainRecord) -> PolicyResult<DomainRecord> {
        let mut inner = self.inner.write().await;
        let id = match record.id {
            Some(id) => id,
            None => {
                let id = RecordId(inner.next_id);
                inner.next_id += 1;
                record.id = Some(id);
                id
            }
        };
        inner.working.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> PolicyResult<()> {
        let mut inner = self.inner.write().await;
        inner.working.remove(&id);
        Ok(())
    }

    async fn commit(&self) -> PolicyResult<()> {
        let mut inner = self.inner.write().await;
        inner.committed = inner.working.clone();
        Ok(())
    }
}

/// Fixed parent-domain collaborator for parent-role tests
#[derive(Debug, Default)]
pub struct StaticParentDomainStore {
    records: Vec<DomainRecord>,
}

impl StaticParentDomainStore {
    pub fn new(records: Vec<DomainRecord>) -> Self {
        Self { records }
    }

    /// A collaborator with no parent domains (standalone instances)
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParentDomainStore for StaticParentDomainStore {
    async fn find_all(&self) -> PolicyResult<Vec<DomainRecord>> {
        Ok(self.records.clone())
    }

    async fn find_by_domain(&self, domain: &Hostname) -> PolicyResult<Option<DomainRecord>> {
        Ok(self.records.iter().find(|r| &r.domain == domain).cloned())
    }
}
