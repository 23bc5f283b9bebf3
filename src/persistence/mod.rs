//! Persistence collaborators for the configuration snapshot.
//!
//! The textual format is owned entirely by the implementation; the store is
//! agnostic to it and only ever hands over a full snapshot.

use thiserror::Error;

use crate::store::ConfigSnapshot;

pub mod memory;
pub mod toml_file;

pub use memory::MemoryPersistence;
pub use toml_file::TomlFilePersistence;

/// Loads and durably writes the full configuration snapshot.
///
/// `flush` must be atomic at the storage layer: after a crash the stored
/// form contains either the previous or the new snapshot, never a torn
/// write. Crash recovery is reloading the last flushed form at startup.
pub trait ConfigPersistence: Send + Sync {
    /// Read the last flushed snapshot, or a bootstrap snapshot if nothing
    /// has been flushed yet.
    fn load(&self) -> Result<ConfigSnapshot, PersistenceError>;

    /// Durably write the full snapshot. Called inside the store's writer
    /// critical section on every mutation, before the mutation commits.
    fn flush(&self, snapshot: &ConfigSnapshot) -> Result<(), PersistenceError>;
}

/// Error type for snapshot persistence.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Injected flush failure from the in-memory collaborator.
    #[error("flush rejected")]
    FlushRejected,
}
