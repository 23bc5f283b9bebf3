//! Lifecycle of the versioned store: version accounting, conflict
//! detection, rollback, and persistence round-trips.

mod common;

use std::sync::Arc;
use std::thread;

use proxy_configd::model::{Frontend, HttpConnectionMode, Protocol};
use proxy_configd::persistence::{ConfigPersistence, TomlFilePersistence};
use proxy_configd::store::{ConfigStore, StoreError};

use common::{seeded_frontend, seeded_snapshot, seeded_store};

fn created_frontend() -> Frontend {
    Frontend {
        name: "created".to_string(),
        protocol: Protocol::Tcp,
        log: None,
        log_format: None,
        log_ignore_null: None,
        http_connection_mode: Some(HttpConnectionMode::KeepAlive),
        continuous_statistics: None,
        http_request_timeout: None,
        http_keepalive_timeout: Some(2),
        client_inactivity_timeout: None,
        max_connections: Some(3000),
        default_farm: None,
    }
}

#[test]
fn reads_return_the_seeded_set_and_version() {
    let (_, store) = seeded_store();

    let (frontends, version) = store.frontends();
    assert_eq!(version, 1);
    assert_eq!(frontends.len(), 2);
    for f in &frontends {
        assert!(f.name == "test" || f.name == "test_2");
        assert_eq!(f.protocol, Protocol::Http);
        assert_eq!(f.http_request_timeout, Some(2));
        assert_eq!(f.http_keepalive_timeout, Some(3));
        assert_eq!(f.client_inactivity_timeout, Some(4));
        assert_eq!(f.max_connections, Some(2000));
        assert_eq!(f.default_farm.as_deref(), Some("test"));
    }

    let (frontend, version) = store.frontend("test").unwrap();
    assert_eq!(version, 1);
    assert_eq!(frontend, seeded_frontend("test"));

    assert!(matches!(
        store.frontend("doesnotexist"),
        Err(StoreError::NotFound { .. })
    ));
    assert_eq!(store.version(), 1);
}

#[test]
fn delete_bumps_version_and_stale_delete_loses() {
    let (_, store) = seeded_store();

    assert_eq!(store.delete_frontend("test", 1).unwrap(), 2);
    assert_eq!(store.version(), 2);

    // The second caller still holds version 1 and must lose, even though
    // deleting "test_2" would not logically collide with the first delete.
    let err = store.delete_frontend("test_2", 1).unwrap_err();
    assert!(matches!(
        err,
        StoreError::VersionMismatch {
            expected: 1,
            actual: 2
        }
    ));
    assert_eq!(store.version(), 2);
    assert!(store.frontend("test_2").is_ok());

    assert!(matches!(
        store.frontend("test"),
        Err(StoreError::NotFound { .. })
    ));

    // A wildly out-of-range expected version is an ordinary mismatch.
    assert!(matches!(
        store.delete_frontend("test_2", 999_999),
        Err(StoreError::VersionMismatch { .. })
    ));

    assert!(matches!(
        store.delete_frontend("doesnotexist", 2),
        Err(StoreError::NotFound { .. })
    ));
    assert_eq!(store.version(), 2);
}

#[test]
fn create_get_edit_lifecycle() {
    let (_, store) = seeded_store();
    assert_eq!(store.delete_frontend("test", 1).unwrap(), 2);

    let frontend = created_frontend();
    assert_eq!(store.create_frontend(frontend.clone(), 2).unwrap(), 3);

    let (fetched, version) = store.frontend("created").unwrap();
    assert_eq!(version, 3);
    assert_eq!(fetched, frontend);

    // Same name again is a logical conflict, not a version problem.
    let err = store.create_frontend(frontend, 3).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { .. }));
    assert_eq!(store.version(), 3);

    // Edit is a full replace: attributes omitted here must be gone after.
    let mut edited = created_frontend();
    edited.max_connections = Some(4000);
    edited.http_connection_mode = Some(HttpConnectionMode::Tunnel);
    edited.http_keepalive_timeout = None;
    assert_eq!(store.edit_frontend("created", edited.clone(), 3).unwrap(), 4);

    let (fetched, version) = store.frontend("created").unwrap();
    assert_eq!(version, 4);
    assert_eq!(fetched, edited);
    assert_eq!(fetched.max_connections, Some(4000));
    assert_eq!(fetched.http_keepalive_timeout, None);
}

#[test]
fn version_counts_successful_mutations_only() {
    let (_, store) = seeded_store();
    let initial = store.version();

    store.create_frontend(created_frontend(), initial).unwrap();
    store.delete_frontend("created", initial + 1).unwrap();
    store.delete_frontend("test_2", initial + 2).unwrap();

    // Three successful mutations; failures in between must not count.
    let _ = store.delete_frontend("doesnotexist", initial + 3);
    let _ = store.create_frontend(seeded_frontend("test"), 42);
    assert_eq!(store.version(), initial + 3);
}

#[test]
fn failed_mutations_leave_the_snapshot_untouched() {
    let (_, store) = seeded_store();
    let before = store.snapshot();

    assert!(store.create_frontend(seeded_frontend("test"), 1).is_err());
    assert!(store.edit_frontend("ghost", seeded_frontend("ghost"), 1).is_err());
    assert!(store.delete_frontend("ghost", 1).is_err());
    assert!(store.delete_frontend("test", 7).is_err());

    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn flush_failure_rolls_back_and_is_retryable() {
    let (persistence, store) = seeded_store();
    let before = store.snapshot();

    persistence.set_fail_flush(true);
    let err = store.create_frontend(created_frontend(), 1).unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));

    // Nothing committed, nothing flushed, version unchanged.
    assert_eq!(*store.snapshot(), *before);
    assert_eq!(store.version(), 1);
    assert_eq!(persistence.flushed().unwrap().version, 1);
    assert!(matches!(
        store.frontend("created"),
        Err(StoreError::NotFound { .. })
    ));

    // The identical call succeeds once persistence recovers.
    persistence.set_fail_flush(false);
    assert_eq!(store.create_frontend(created_frontend(), 1).unwrap(), 2);
    assert_eq!(persistence.flushed().unwrap().version, 2);
}

#[test]
fn validation_rejects_before_the_version_guard() {
    let (_, store) = seeded_store();

    let mut bad = created_frontend();
    bad.name = "not a name".to_string();

    // Expected version is also wrong; validation must win.
    let err = store.create_frontend(bad, 99).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.version(), 1);

    let mut dangling = created_frontend();
    dangling.default_farm = Some("missing-farm".to_string());
    assert!(matches!(
        store.create_frontend(dangling, 1),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn edit_with_mismatched_body_name_is_rejected() {
    let (_, store) = seeded_store();

    let err = store
        .edit_frontend("test", seeded_frontend("test_2"), 1)
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.version(), 1);
    assert_eq!(store.frontend("test").unwrap().0, seeded_frontend("test"));
}

#[test]
fn exactly_one_concurrent_writer_wins_a_version() {
    let (_, store) = seeded_store();
    let version = store.version();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut frontend = created_frontend();
                frontend.name = format!("racer-{i}");
                store.create_frontend(frontend, version)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let losses = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::VersionMismatch { .. })))
        .count();

    assert_eq!(wins, 1);
    assert_eq!(losses, 7);
    assert_eq!(store.version(), version + 1);
    assert_eq!(store.frontends().0.len(), 3);
}

#[test]
fn farms_share_the_global_version_with_frontends() {
    let (_, store) = seeded_store();

    assert_eq!(store.create_farm(common::seeded_farm("pool-2"), 1).unwrap(), 2);

    // A frontend mutation planned against version 1 is now stale.
    assert!(matches!(
        store.delete_frontend("test", 1),
        Err(StoreError::VersionMismatch { .. })
    ));
    assert_eq!(store.delete_frontend("test", 2).unwrap(), 3);

    let (farms, version) = store.farms();
    assert_eq!(version, 3);
    assert_eq!(farms.len(), 2);
}

#[test]
fn toml_file_round_trip_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proxy.toml");

    {
        let persistence = Arc::new(TomlFilePersistence::new(path.clone()));
        persistence.flush(&seeded_snapshot()).unwrap();

        let store = ConfigStore::open(persistence).unwrap();
        assert_eq!(store.create_frontend(created_frontend(), 1).unwrap(), 2);
    }

    // A fresh store over the same file sees the committed state.
    let store = ConfigStore::open(Arc::new(TomlFilePersistence::new(path))).unwrap();
    assert_eq!(store.version(), 2);
    let (frontend, _) = store.frontend("created").unwrap();
    assert_eq!(frontend, created_frontend());
}

#[test]
fn missing_file_bootstraps_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let store = ConfigStore::open(Arc::new(TomlFilePersistence::new(path))).unwrap();
    assert_eq!(store.version(), 1);
    assert!(store.frontends().0.is_empty());
}

#[test]
fn reload_installs_external_edits_and_skips_echoes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proxy.toml");

    let persistence = Arc::new(TomlFilePersistence::new(path.clone()));
    persistence.flush(&seeded_snapshot()).unwrap();
    let store = ConfigStore::open(persistence.clone()).unwrap();

    // Reload with no external change is a no-op.
    assert_eq!(store.reload().unwrap(), 1);
    assert_eq!(store.version(), 1);

    // Simulate an out-of-band editor bumping the file.
    let mut external = seeded_snapshot();
    external.version = 9;
    external.frontends.remove("test_2").unwrap();
    persistence.flush(&external).unwrap();

    assert_eq!(store.reload().unwrap(), 9);
    assert_eq!(store.version(), 9);
    assert!(matches!(
        store.frontend("test_2"),
        Err(StoreError::NotFound { .. })
    ));
}
