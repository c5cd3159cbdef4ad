//! Storage adapter implementations
//!
//! Concrete implementations of the storage traits. Production panels
//! bind these traits to their ORM session; the in-memory adapter backs
//! the test suites and embedded use.

pub mod memory;

pub use memory::{MemoryDomainStore, StaticParentDomainStore};
