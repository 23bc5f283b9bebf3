//! Shared fixtures for the store and API suites.

use std::sync::Arc;

use proxy_configd::model::{Balance, Farm, Frontend, HttpConnectionMode, Protocol, Toggle};
use proxy_configd::persistence::MemoryPersistence;
use proxy_configd::store::{ConfigSnapshot, ConfigStore};

/// Frontend fixture matching the seeded configuration: protocol http,
/// logging enabled, routed to farm "test".
pub fn seeded_frontend(name: &str) -> Frontend {
    Frontend {
        name: name.to_string(),
        protocol: Protocol::Http,
        log: Some(Toggle::Enabled),
        log_format: Some("http".to_string()),
        log_ignore_null: Some(Toggle::Enabled),
        http_connection_mode: Some(HttpConnectionMode::PassiveClose),
        continuous_statistics: Some(Toggle::Enabled),
        http_request_timeout: Some(2),
        http_keepalive_timeout: Some(3),
        client_inactivity_timeout: Some(4),
        max_connections: Some(2000),
        default_farm: Some("test".to_string()),
    }
}

pub fn seeded_farm(name: &str) -> Farm {
    Farm {
        name: name.to_string(),
        balance: Some(Balance::RoundRobin),
        protocol: Some(Protocol::Http),
        log: Some(Toggle::Enabled),
        connect_timeout: Some(5),
        queue_timeout: None,
        server_inactivity_timeout: Some(60),
        check_timeout: Some(2),
        forwarded_for: Some(Toggle::Enabled),
    }
}

/// Snapshot with frontends "test" and "test_2" plus farm "test", at
/// version 1.
pub fn seeded_snapshot() -> ConfigSnapshot {
    let mut snapshot = ConfigSnapshot::bootstrap();
    snapshot.farms.insert(seeded_farm("test")).unwrap();
    snapshot.frontends.insert(seeded_frontend("test")).unwrap();
    snapshot
        .frontends
        .insert(seeded_frontend("test_2"))
        .unwrap();
    snapshot
}

/// Store over in-memory persistence, pre-seeded with `seeded_snapshot`.
/// The persistence handle is returned for failure injection.
pub fn seeded_store() -> (Arc<MemoryPersistence>, Arc<ConfigStore>) {
    let persistence = Arc::new(MemoryPersistence::with_snapshot(seeded_snapshot()));
    let store = ConfigStore::open(persistence.clone()).expect("store should open");
    (persistence, Arc::new(store))
}
