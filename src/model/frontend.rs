//! Frontend entity: a listener binding protocol, timeouts and routing
//! defaults to a backend farm.

use serde::{Deserialize, Serialize};

use crate::model::{EntityKind, NamedEntity, Protocol, Toggle};

/// How HTTP connections towards clients are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HttpConnectionMode {
    PassiveClose,
    KeepAlive,
    Tunnel,
}

/// A frontend accepts client connections and hands them to its default farm.
///
/// Timeouts are in seconds. Every optional attribute is present-or-absent;
/// edits replace the whole record, so attributes omitted from an edit are
/// dropped rather than merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontend {
    pub name: String,

    pub protocol: Protocol,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<Toggle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_ignore_null: Option<Toggle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_connection_mode: Option<HttpConnectionMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuous_statistics: Option<Toggle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_request_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_keepalive_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_inactivity_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u64>,

    /// Name of the farm traffic is routed to by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_farm: Option<String>,
}

impl NamedEntity for Frontend {
    const KIND: EntityKind = EntityKind::Frontend;

    fn name(&self) -> &str {
        &self.name
    }
}
