//! Settings schema definitions.
//!
//! All types derive Serde traits for deserialization from the settings file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings for the configuration daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// HTTP API settings (bind address, auth, TLS).
    pub api: ApiSettings,

    /// Managed configuration file settings.
    pub storage: StorageSettings,

    /// Observability settings.
    pub observability: ObservabilitySettings,
}

/// HTTP API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Bind address (e.g., "127.0.0.1:5555").
    pub bind_address: String,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsSettings>,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5555".to_string(),
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            tls: None,
            request_timeout_secs: 30,
        }
    }
}

/// TLS configuration for the API listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsSettings {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Managed configuration file settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Path of the managed proxy configuration file.
    pub config_file: PathBuf,

    /// Reload the store when the file changes on disk.
    pub watch: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("proxy.toml"),
            watch: true,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
