//! The whole-configuration snapshot.

use serde::{Deserialize, Serialize};

use crate::model::{Farm, Frontend};
use crate::store::repository::Repository;
use crate::store::Version;

fn default_version() -> Version {
    1
}

/// Complete in-memory configuration: every entity of every kind plus the
/// committed version. The unit of atomic replacement on each mutation.
///
/// Owned exclusively by the store; callers only ever see committed copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Global revision counter, shared across all entity kinds.
    #[serde(default = "default_version")]
    pub version: Version,

    #[serde(default, skip_serializing_if = "Repository::is_empty")]
    pub frontends: Repository<Frontend>,

    #[serde(default, skip_serializing_if = "Repository::is_empty")]
    pub farms: Repository<Farm>,
}

impl ConfigSnapshot {
    /// Empty configuration at the initial version.
    pub fn bootstrap() -> Self {
        Self {
            version: default_version(),
            frontends: Repository::default(),
            farms: Repository::default(),
        }
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self::bootstrap()
    }
}
