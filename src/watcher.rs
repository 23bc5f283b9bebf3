//! Configuration file watcher for out-of-band edits.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::store::ConfigStore;

/// Watches the managed configuration file and reloads the store when the
/// file changes underneath the daemon.
///
/// The store's own flushes fire events too; those reloads see a snapshot
/// identical to the committed one and are skipped inside the store. The
/// parent directory is watched rather than the file itself, because the
/// atomic rename on every flush would otherwise detach the watch.
pub struct ConfigWatcher {
    path: PathBuf,
    store: Arc<ConfigStore>,
}

impl ConfigWatcher {
    pub fn new(path: &Path, store: Arc<ConfigStore>) -> Self {
        Self {
            path: path.to_path_buf(),
            store,
        }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let store = self.store.clone();
        let file_name: Option<OsString> = self.path.file_name().map(OsString::from);
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == file_name.as_deref());
                    if ours && (event.kind.is_modify() || event.kind.is_create()) {
                        match store.reload() {
                            Ok(version) => {
                                tracing::debug!(version, "Configuration reloaded from disk");
                            }
                            Err(e) => tracing::error!(
                                "Failed to reload configuration: {}. Keeping current snapshot.",
                                e
                            ),
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
