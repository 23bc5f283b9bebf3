//! Configuration entity definitions.
//!
//! These are the records the store manages: frontends (listeners) and the
//! backend farms they route to. All types derive Serde traits so the same
//! structs travel through the API (JSON) and the persisted file (TOML).
//!
//! # Design Decisions
//! - Optional attributes are `Option<T>` and skipped when absent, so a
//!   record round-trips exactly as supplied (absent is not zero)
//! - Enumerated attributes are real enums with their wire spellings, not
//!   free-form strings
//! - Names are immutable; renaming is modeled as delete + create

use serde::{Deserialize, Serialize};

pub mod farm;
pub mod frontend;

pub use farm::{Balance, Farm};
pub use frontend::{Frontend, HttpConnectionMode};

/// Entity kinds held by the configuration store.
///
/// Each kind has its own namespace of unique names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Frontend,
    Farm,
}

impl EntityKind {
    /// Stable lowercase label used in error messages and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Frontend => "frontend",
            EntityKind::Farm => "farm",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that lives in a per-kind repository, keyed by its unique name.
pub trait NamedEntity {
    /// Kind discriminator carried in error context and metrics labels.
    const KIND: EntityKind;

    /// Unique name within the kind's namespace.
    fn name(&self) -> &str;
}

/// Listening/forwarding protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Tcp,
}

/// On/off switch serialized as `enabled`/`disabled`.
///
/// Distinct from `bool` so an absent flag stays distinguishable from an
/// explicit `disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Enabled,
    Disabled,
}
