//! Domain Record Data Model
//!
//! Core domain concepts for the panel's domain policy layer:
//!
//! # Value Objects
//!
//! - [`Hostname`] - lowercase-canonical hostname (IPv4 literals allowed)
//! - [`DomainMode`] - closed set of operating strategies
//!
//! # Entities
//!
//! - [`DomainRecord`] - a configured hostname with mode and transport
//!   metadata; transient fallback records share the type with `id: None`

pub mod hostname;
pub mod mode;
pub mod record;

pub use hostname::{Hostname, HostnameError};
pub use mode::DomainMode;
pub use record::{DomainExport, DomainRecord, DomainRecordBuilder, OwnerId, RecordId};
