//! Versioned configuration store.
//!
//! # Data Flow
//! ```text
//! caller mutation (expected version)
//!     → store.rs (writer critical section)
//!     → version guard (reject stale callers)
//!     → repository.rs (keyed CRUD on a cloned snapshot)
//!     → persistence flush (atomic write of the full snapshot)
//!     → commit: publish the new snapshot at version + 1
//!
//! On flush failure:
//!     cloned snapshot dropped
//!     → committed state and version unchanged
//!     → PersistenceFailure surfaced to the caller
//! ```
//!
//! # Design Decisions
//! - One global version across all entity kinds; any committed mutation
//!   invalidates every outstanding expected version
//! - Readers load the last committed snapshot and never block on writers
//! - A mutation is only committed after its flush returns

pub mod error;
pub mod repository;
pub mod snapshot;
pub mod store;

pub use error::StoreError;
pub use repository::{Repository, RepositoryError};
pub use snapshot::ConfigSnapshot;
pub use store::ConfigStore;

/// Global revision counter for the entire configuration.
///
/// Increments by exactly 1 on every successful mutation; never decreases;
/// unaffected by reads.
pub type Version = u64;
