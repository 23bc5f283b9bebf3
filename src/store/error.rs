//! Store error taxonomy.

use thiserror::Error;

use crate::model::EntityKind;
use crate::persistence::PersistenceError;
use crate::store::Version;
use crate::validation::ValidationError;

/// Errors surfaced by [`ConfigStore`](crate::store::ConfigStore) operations.
///
/// Each variant carries enough context for call sites to branch on kind
/// without string matching.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation referenced a name absent from the repository.
    #[error("{kind} {name:?} does not exist")]
    NotFound { kind: EntityKind, name: String },

    /// A create referenced a name already present.
    #[error("{kind} {name:?} already exists")]
    AlreadyExists { kind: EntityKind, name: String },

    /// The caller's view of the configuration is stale; re-fetch and retry.
    #[error("version mismatch: expected {expected}, current {actual}")]
    VersionMismatch { expected: Version, actual: Version },

    /// The flush to the external configuration file failed. The in-memory
    /// mutation was rolled back entirely; safe to retry verbatim.
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),

    /// Entity content was rejected before the version guard ran.
    #[error("validation failure: {0}")]
    Validation(#[from] ValidationError),
}
