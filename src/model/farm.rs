//! Farm entity: a pool of backend servers that frontends route to.

use serde::{Deserialize, Serialize};

use crate::model::{EntityKind, NamedEntity, Protocol, Toggle};

/// Load-balancing algorithm applied across the farm's servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Balance {
    RoundRobin,
    LeastConn,
    Source,
}

/// A backend farm. Timeouts are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<Toggle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_inactivity_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded_for: Option<Toggle>,
}

impl NamedEntity for Farm {
    const KIND: EntityKind = EntityKind::Farm;

    fn name(&self) -> &str {
        &self.name
    }
}
