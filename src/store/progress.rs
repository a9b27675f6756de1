//! Game-progress persistence: two sub-namespaces sharing one store.
//!
//! Records are written as JSON and listed back raw; this adapter never
//! interprets what it stores. Overwrite-by-name is the only mutation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::store::{KeyValueStore, Namespace, StoreError};

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("save {name:?}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SaveKind {
    Sequential, // save/
    Custom,     // custom_save/
}

impl SaveKind {
    pub fn namespace(self) -> Namespace {
        match self {
            SaveKind::Sequential => Namespace::SAVE,
            SaveKind::Custom => Namespace::CUSTOM_SAVE,
        }
    }
}

/// A save shape and the sub-namespace it lives in.
pub trait SaveRecord: Serialize + DeserializeOwned {
    const KIND: SaveKind;
}

/// A save exactly as stored: name plus serialized JSON.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredSave {
    pub name: String,
    pub data: String,
}

impl StoredSave {
    pub fn parse<R: SaveRecord>(&self) -> Result<R, ProgressError> {
        serde_json::from_str(&self.data).map_err(|source| ProgressError::Json {
            name: self.name.clone(),
            source,
        })
    }
}

#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        ProgressStore { store }
    }

    /// Serialize and upsert under the record's namespace.
    pub fn save<R: SaveRecord>(&self, name: &str, record: &R) -> Result<(), ProgressError> {
        let data = serde_json::to_string(record).map_err(|source| ProgressError::Json {
            name: name.to_string(),
            source,
        })?;
        debug!(name, kind = ?R::KIND, "saving progress");
        self.store.set(&R::KIND.namespace().key(name), &data)?;
        Ok(())
    }

    /// Raw records of one kind, in store enumeration order.
    pub fn list_all(&self, kind: SaveKind) -> Result<Vec<StoredSave>, ProgressError> {
        let saves = kind
            .namespace()
            .scan(self.store.as_ref())?
            .into_iter()
            .map(|(name, data)| StoredSave { name, data })
            .collect();
        Ok(saves)
    }

    /// Fetch and parse a single record.
    pub fn load<R: SaveRecord>(&self, name: &str) -> Result<Option<R>, ProgressError> {
        match self.store.get(&R::KIND.namespace().key(name))? {
            Some(data) => StoredSave { name: name.to_string(), data }.parse().map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Position;
    use crate::sim::save::{CustomSave, SaveCore, SequentialSave};
    use crate::store::MemoryStore;

    fn core(x: usize) -> SaveCore {
        SaveCore { worker: Position::new(x, 0), ..SaveCore::default() }
    }

    #[test]
    fn kinds_are_listed_separately() {
        let progress = ProgressStore::new(Arc::new(MemoryStore::new()));
        progress
            .save("slot", &SequentialSave { current_level: 2, core: core(1), score: 10 })
            .unwrap();
        progress
            .save("slot", &CustomSave { level_name: "maze".into(), core: core(4) })
            .unwrap();

        let seq = progress.list_all(SaveKind::Sequential).unwrap();
        let custom = progress.list_all(SaveKind::Custom).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(custom.len(), 1);

        let seq: SequentialSave = seq[0].parse().unwrap();
        assert_eq!(seq.current_level, 2);
        let custom: CustomSave = custom[0].parse().unwrap();
        assert_eq!(custom.level_name, "maze");
    }

    #[test]
    fn save_overwrites_and_lists_raw_json() {
        let progress = ProgressStore::new(Arc::new(MemoryStore::new()));
        progress
            .save("a", &SequentialSave { current_level: 0, core: core(0), score: 0 })
            .unwrap();
        progress
            .save("a", &SequentialSave { current_level: 5, core: core(0), score: 99 })
            .unwrap();

        let all = progress.list_all(SaveKind::Sequential).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].data.contains("\"currentLevel\":5"));
        let loaded: Option<SequentialSave> = progress.load("a").unwrap();
        assert_eq!(loaded.map(|s| s.score), Some(99));
    }

    #[test]
    fn unparseable_record_is_still_listed() {
        let store = Arc::new(MemoryStore::new());
        store.set("custom_save/bad", "not json").unwrap();
        let progress = ProgressStore::new(store);

        let all = progress.list_all(SaveKind::Custom).unwrap();
        assert_eq!(all[0].data, "not json");
        let parsed = all[0].parse::<CustomSave>();
        assert!(matches!(parsed, Err(ProgressError::Json { .. })));
        let missing: Option<CustomSave> = progress.load("nothing").unwrap();
        assert!(missing.is_none());
    }
}
