//! Per-guild warning ledger.
//!
//! The ledger knows nothing about Discord: callers describe members as
//! [`Participant`]s and receive plain [`WarnEntry`] copies back.

/// Typed ledger failures.
pub mod error;
/// In-memory [`WarnStore`] used by tests and local runs.
pub mod memory;
/// Records, keys and entries.
pub mod model;
/// Warn policy on top of a store.
pub mod service;
/// Storage contract.
pub mod store;

pub use error::WarnError;
pub use memory::MemoryWarnStore;
pub use model::{WarnEntry, WarnKey, WarnRecord};
pub use service::{IssuedWarning, Participant, WarnService};
pub use store::{WarnSelector, WarnStore, resolve_selector};
