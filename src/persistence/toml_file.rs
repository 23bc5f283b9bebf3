//! TOML file persistence with atomic flush.

use std::fs;
use std::path::{Path, PathBuf};

use crate::persistence::{ConfigPersistence, PersistenceError};
use crate::store::ConfigSnapshot;

/// Stores the snapshot as a single TOML document.
///
/// Flush writes to a temp file in the same directory and renames it over
/// the target, so a crash mid-write leaves the previous snapshot intact.
pub struct TomlFilePersistence {
    path: PathBuf,
}

impl TomlFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigPersistence for TomlFilePersistence {
    fn load(&self) -> Result<ConfigSnapshot, PersistenceError> {
        if !self.path.exists() {
            tracing::info!(
                path = ?self.path,
                "Configuration file not found, starting from an empty snapshot"
            );
            return Ok(ConfigSnapshot::bootstrap());
        }
        let content = fs::read_to_string(&self.path)?;
        let snapshot = toml::from_str(&content)?;
        Ok(snapshot)
    }

    fn flush(&self, snapshot: &ConfigSnapshot) -> Result<(), PersistenceError> {
        let content = toml::to_string_pretty(snapshot)?;
        let tmp = self.temp_path();
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
