//! Configuration store facade.
//!
//! Single entry point for all configuration access. Guarantees at most one
//! mutation in flight at a time and that reads never observe a partially
//! applied mutation.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::model::{EntityKind, Farm, Frontend, NamedEntity};
use crate::observability::metrics;
use crate::persistence::ConfigPersistence;
use crate::store::error::StoreError;
use crate::store::repository::{Repository, RepositoryError};
use crate::store::snapshot::ConfigSnapshot;
use crate::store::Version;
use crate::validation::{self, ValidationError};

/// Kind dispatch for the generic CRUD path.
trait Keyed: NamedEntity + Clone {
    fn repo(snapshot: &ConfigSnapshot) -> &Repository<Self>;
    fn repo_mut(snapshot: &mut ConfigSnapshot) -> &mut Repository<Self>;
    fn validate(&self, snapshot: &ConfigSnapshot) -> Result<(), ValidationError>;
}

impl Keyed for Frontend {
    fn repo(snapshot: &ConfigSnapshot) -> &Repository<Self> {
        &snapshot.frontends
    }
    fn repo_mut(snapshot: &mut ConfigSnapshot) -> &mut Repository<Self> {
        &mut snapshot.frontends
    }
    fn validate(&self, snapshot: &ConfigSnapshot) -> Result<(), ValidationError> {
        validation::validate_frontend(self, snapshot)
    }
}

impl Keyed for Farm {
    fn repo(snapshot: &ConfigSnapshot) -> &Repository<Self> {
        &snapshot.farms
    }
    fn repo_mut(snapshot: &mut ConfigSnapshot) -> &mut Repository<Self> {
        &mut snapshot.farms
    }
    fn validate(&self, snapshot: &ConfigSnapshot) -> Result<(), ValidationError> {
        validation::validate_farm(self, snapshot)
    }
}

fn repo_error(kind: EntityKind, name: String, err: RepositoryError) -> StoreError {
    match err {
        RepositoryError::Occupied => StoreError::AlreadyExists { kind, name },
        RepositoryError::Vacant => StoreError::NotFound { kind, name },
    }
}

/// The versioned configuration store.
///
/// All mutating operations run the same commit protocol: take the writer
/// lock, compare the caller's expected version against the committed one,
/// apply the change to a cloned snapshot, flush the clone, and only then
/// publish it. A failed flush drops the clone, leaving the committed state
/// and version untouched.
pub struct ConfigStore {
    /// Last committed snapshot. Readers load it lock-free; only `mutate`
    /// and `reload` ever store a replacement.
    current: ArcSwap<ConfigSnapshot>,

    /// Serializes mutating operations, flush included. Guards no data of
    /// its own: `current` only ever holds fully committed snapshots, so a
    /// poisoned lock is recovered rather than propagated.
    writer: Mutex<()>,

    persistence: Arc<dyn ConfigPersistence>,
}

impl ConfigStore {
    /// Load the last flushed snapshot and initialize the store.
    pub fn open(persistence: Arc<dyn ConfigPersistence>) -> Result<Self, StoreError> {
        let snapshot = persistence.load()?;
        tracing::info!(
            version = snapshot.version,
            frontends = snapshot.frontends.len(),
            farms = snapshot.farms.len(),
            "Configuration store loaded"
        );
        Ok(Self {
            current: ArcSwap::from_pointee(snapshot),
            writer: Mutex::new(()),
            persistence,
        })
    }

    /// The last committed snapshot.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    /// Current committed version. Never fails; unaffected by reads.
    pub fn version(&self) -> Version {
        self.current.load().version
    }

    pub fn frontends(&self) -> (Vec<Frontend>, Version) {
        self.all()
    }

    pub fn frontend(&self, name: &str) -> Result<(Frontend, Version), StoreError> {
        self.one(name)
    }

    pub fn create_frontend(
        &self,
        frontend: Frontend,
        expected: Version,
    ) -> Result<Version, StoreError> {
        self.create(frontend, expected)
    }

    pub fn edit_frontend(
        &self,
        name: &str,
        frontend: Frontend,
        expected: Version,
    ) -> Result<Version, StoreError> {
        self.edit(name, frontend, expected)
    }

    pub fn delete_frontend(&self, name: &str, expected: Version) -> Result<Version, StoreError> {
        self.delete::<Frontend>(name, expected)
    }

    pub fn farms(&self) -> (Vec<Farm>, Version) {
        self.all()
    }

    pub fn farm(&self, name: &str) -> Result<(Farm, Version), StoreError> {
        self.one(name)
    }

    pub fn create_farm(&self, farm: Farm, expected: Version) -> Result<Version, StoreError> {
        self.create(farm, expected)
    }

    pub fn edit_farm(
        &self,
        name: &str,
        farm: Farm,
        expected: Version,
    ) -> Result<Version, StoreError> {
        self.edit(name, farm, expected)
    }

    pub fn delete_farm(&self, name: &str, expected: Version) -> Result<Version, StoreError> {
        self.delete::<Farm>(name, expected)
    }

    /// Re-read the persisted form and install it as the committed snapshot.
    ///
    /// Used when the configuration file changes underneath the daemon. Runs
    /// in the writer critical section; a load identical to the committed
    /// snapshot (such as the echo of our own flush) is skipped.
    pub fn reload(&self) -> Result<Version, StoreError> {
        let _serial = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let loaded = self.persistence.load()?;
        let current = self.current.load_full();
        if *current == loaded {
            tracing::trace!(version = loaded.version, "Reload skipped, snapshot unchanged");
            return Ok(loaded.version);
        }

        tracing::info!(
            from = current.version,
            to = loaded.version,
            "Installing externally modified configuration"
        );
        let version = loaded.version;
        self.current.store(Arc::new(loaded));
        Ok(version)
    }

    fn all<T: Keyed>(&self) -> (Vec<T>, Version) {
        let snapshot = self.current.load();
        (
            T::repo(&snapshot).iter().cloned().collect(),
            snapshot.version,
        )
    }

    fn one<T: Keyed>(&self, name: &str) -> Result<(T, Version), StoreError> {
        let snapshot = self.current.load();
        let entity = T::repo(&snapshot)
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: T::KIND,
                name: name.to_owned(),
            })?;
        Ok((entity, snapshot.version))
    }

    fn create<T: Keyed>(&self, entity: T, expected: Version) -> Result<Version, StoreError> {
        entity.validate(self.current.load_full().as_ref())?;
        self.mutate(T::KIND, "create", expected, move |snapshot| {
            let name = entity.name().to_owned();
            T::repo_mut(snapshot)
                .insert(entity)
                .map_err(|e| repo_error(T::KIND, name, e))
        })
    }

    fn edit<T: Keyed>(
        &self,
        name: &str,
        entity: T,
        expected: Version,
    ) -> Result<Version, StoreError> {
        if entity.name() != name {
            return Err(ValidationError::NameMismatch {
                path: name.to_owned(),
                body: entity.name().to_owned(),
            }
            .into());
        }
        entity.validate(self.current.load_full().as_ref())?;
        self.mutate(T::KIND, "edit", expected, move |snapshot| {
            let name = entity.name().to_owned();
            T::repo_mut(snapshot)
                .replace(entity)
                .map_err(|e| repo_error(T::KIND, name, e))
        })
    }

    fn delete<T: Keyed>(&self, name: &str, expected: Version) -> Result<Version, StoreError> {
        self.mutate(T::KIND, "delete", expected, move |snapshot| {
            T::repo_mut(snapshot)
                .remove(name)
                .map(drop)
                .map_err(|e| repo_error(T::KIND, name.to_owned(), e))
        })
    }

    /// The commit protocol shared by every mutation.
    fn mutate<F>(
        &self,
        kind: EntityKind,
        op: &'static str,
        expected: Version,
        apply: F,
    ) -> Result<Version, StoreError>
    where
        F: FnOnce(&mut ConfigSnapshot) -> Result<(), StoreError>,
    {
        let _serial = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.current.load_full();
        if expected != current.version {
            metrics::record_mutation(kind, op, "version_mismatch");
            return Err(StoreError::VersionMismatch {
                expected,
                actual: current.version,
            });
        }

        let mut next = ConfigSnapshot::clone(&current);
        apply(&mut next).inspect_err(|_| metrics::record_mutation(kind, op, "conflict"))?;
        next.version = current.version + 1;

        if let Err(e) = self.persistence.flush(&next) {
            tracing::error!(%kind, op, error = %e, "Flush failed, rolling back mutation");
            metrics::record_mutation(kind, op, "persistence_failure");
            return Err(StoreError::Persistence(e));
        }

        let version = next.version;
        self.current.store(Arc::new(next));
        metrics::record_mutation(kind, op, "committed");
        tracing::debug!(%kind, op, version, "Mutation committed");
        Ok(version)
    }
}
