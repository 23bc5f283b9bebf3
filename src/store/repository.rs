//! Per-kind keyed entity repository.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::NamedEntity;

/// Keyed store for one entity kind, enforcing name uniqueness.
///
/// Serialized as a plain sequence of records (arrays of tables in TOML);
/// the name index is rebuilt on load. Enumeration order is therefore not
/// preserved across a flush/reload cycle and callers must treat it as
/// display-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository<T> {
    entries: BTreeMap<String, T>,
}

/// Keyed-store failure; the store facade maps these onto its error taxonomy
/// with entity kind and name context attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryError {
    /// Insert hit an existing name.
    Occupied,
    /// Replace or remove referenced an absent name.
    Vacant,
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: NamedEntity> Repository<T> {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Add a new record; fails if the name is taken.
    pub fn insert(&mut self, entity: T) -> Result<(), RepositoryError> {
        if self.entries.contains_key(entity.name()) {
            return Err(RepositoryError::Occupied);
        }
        self.entries.insert(entity.name().to_owned(), entity);
        Ok(())
    }

    /// Replace the record stored under the entity's name in full; fails if
    /// the name is absent.
    pub fn replace(&mut self, entity: T) -> Result<(), RepositoryError> {
        if !self.entries.contains_key(entity.name()) {
            return Err(RepositoryError::Vacant);
        }
        self.entries.insert(entity.name().to_owned(), entity);
        Ok(())
    }

    /// Remove and return the record; fails if the name is absent.
    pub fn remove(&mut self, name: &str) -> Result<T, RepositoryError> {
        self.entries.remove(name).ok_or(RepositoryError::Vacant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> Serialize for Repository<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de, T: Deserialize<'de> + NamedEntity> Deserialize<'de> for Repository<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        let mut entries = BTreeMap::new();
        for item in items {
            let name = item.name().to_owned();
            if entries.insert(name.clone(), item).is_some() {
                return Err(D::Error::custom(format!(
                    "duplicate entity name {name:?}"
                )));
            }
        }
        Ok(Self { entries })
    }
}
