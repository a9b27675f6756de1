//! Custom level persistence under the `level/` prefix.

use std::sync::Arc;

use tracing::debug;

use crate::store::{KeyValueStore, Namespace, StoreError};

/// A player-authored level as it sits in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredLevel {
    pub name: String,
    pub raw: String,
}

#[derive(Clone)]
pub struct LevelStore {
    store: Arc<dyn KeyValueStore>,
}

impl LevelStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        LevelStore { store }
    }

    /// Upsert. Names are taken as-is; an existing level is overwritten.
    pub fn save(&self, name: &str, raw: &str) -> Result<(), StoreError> {
        debug!(name, "saving custom level");
        self.store.set(&Namespace::LEVEL.key(name), raw)
    }

    /// Delete if present.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        debug!(name, "removing custom level");
        self.store.remove(&Namespace::LEVEL.key(name))
    }

    pub fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        self.store.get(&Namespace::LEVEL.key(name))
    }

    /// Every custom level, in store enumeration order.
    pub fn list_all(&self) -> Result<Vec<StoredLevel>, StoreError> {
        let levels: Vec<StoredLevel> = Namespace::LEVEL
            .scan(self.store.as_ref())?
            .into_iter()
            .map(|(name, raw)| StoredLevel { name, raw })
            .collect();
        debug!(count = levels.len(), "listed custom levels");
        Ok(levels)
    }
}
