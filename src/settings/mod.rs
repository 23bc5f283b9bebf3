//! Daemon settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → shared via Arc to the API server and startup code
//! ```
//!
//! # Design Decisions
//! - These are the daemon's OWN settings; the proxy configuration it
//!   manages lives in the store and is versioned separately
//! - All fields have defaults to allow minimal settings files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, SettingsError};
pub use schema::{ApiSettings, ObservabilitySettings, Settings, StorageSettings, TlsSettings};
