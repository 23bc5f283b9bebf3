//! In-memory persistence for tests and ephemeral runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::persistence::{ConfigPersistence, PersistenceError};
use crate::store::ConfigSnapshot;

/// Holds the last flushed snapshot in memory; nothing survives the process.
///
/// `set_fail_flush` lets a test inject a persistence failure and observe the
/// store's rollback behavior.
#[derive(Default)]
pub struct MemoryPersistence {
    flushed: Mutex<Option<ConfigSnapshot>>,
    fail_flush: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-seeded, as if `snapshot` had already been flushed.
    pub fn with_snapshot(snapshot: ConfigSnapshot) -> Self {
        Self {
            flushed: Mutex::new(Some(snapshot)),
            fail_flush: AtomicBool::new(false),
        }
    }

    /// Make every subsequent flush fail until switched back off.
    pub fn set_fail_flush(&self, fail: bool) {
        self.fail_flush.store(fail, Ordering::SeqCst);
    }

    /// The last successfully flushed snapshot, if any.
    pub fn flushed(&self) -> Option<ConfigSnapshot> {
        self.flushed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConfigPersistence for MemoryPersistence {
    fn load(&self) -> Result<ConfigSnapshot, PersistenceError> {
        Ok(self.flushed().unwrap_or_else(ConfigSnapshot::bootstrap))
    }

    fn flush(&self, snapshot: &ConfigSnapshot) -> Result<(), PersistenceError> {
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(PersistenceError::FlushRejected);
        }
        *self
            .flushed
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}
