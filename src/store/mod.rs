//! Persistent key/value store and the namespaced adapters built on it.
//!
//! One flat, string-keyed namespace holds everything the game persists.
//! Adapters claim a key prefix each and never look outside it:
//!
//!   `level/<name>`        custom level raw string   (`levels::LevelStore`)
//!   `save/<name>`         sequential-mode save JSON (`progress::ProgressStore`)
//!   `custom_save/<name>`  custom-mode save JSON     (`progress::ProgressStore`)
//!
//! None of the prefixes is a prefix of another, so a prefix scan for
//! one namespace never returns keys from the others.

pub mod file;
pub mod levels;
pub mod progress;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("store lock poisoned")]
    Poisoned,
}

/// Flat string-keyed storage. Each call is a single atomic read,
/// write, delete or scan from the caller's point of view.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// All keys, in the store's own enumeration order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
    /// Every `(key, value)` pair whose key starts with `prefix`, read in
    /// one step.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError>;
}

pub(crate) fn entries_with_prefix(
    entries: &BTreeMap<String, String>,
    prefix: &str,
) -> Vec<(String, String)> {
    entries
        .range(prefix.to_string()..)
        .take_while(|(k, _)| k.starts_with(prefix))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// A key prefix owned by one adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Namespace(&'static str);

impl Namespace {
    pub const LEVEL: Namespace = Namespace("level/");
    pub const SAVE: Namespace = Namespace("save/");
    pub const CUSTOM_SAVE: Namespace = Namespace("custom_save/");

    pub fn prefix(self) -> &'static str {
        self.0
    }

    pub fn key(self, name: &str) -> String {
        format!("{}{}", self.0, name)
    }

    /// Recover the name from a full key, or `None` if the key is foreign.
    pub fn strip<'k>(self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.0)
    }

    /// Every `(name, value)` pair under this prefix.
    pub fn scan(self, store: &dyn KeyValueStore) -> Result<Vec<(String, String)>, StoreError> {
        Ok(store
            .scan_prefix(self.0)?
            .into_iter()
            .filter_map(|(key, value)| Some((self.strip(&key)?.to_string(), value)))
            .collect())
    }
}

/// In-process store. Contents vanish with the process; used by tests
/// and as a scratch store when no storage directory is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries_with_prefix(&entries, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_do_not_overlap() {
        let all = [Namespace::LEVEL, Namespace::SAVE, Namespace::CUSTOM_SAVE];
        for a in all {
            for b in all {
                if a != b {
                    assert!(
                        !a.prefix().starts_with(b.prefix()),
                        "{} shadows {}",
                        b.prefix(),
                        a.prefix()
                    );
                }
            }
        }
    }

    #[test]
    fn scan_strips_prefix_and_skips_foreign_keys() {
        let store = MemoryStore::new();
        store.set("level/a", "x").unwrap();
        store.set("save/a", "y").unwrap();
        store.set("custom_save/a", "z").unwrap();
        store.set("unrelated", "w").unwrap();

        let levels = Namespace::LEVEL.scan(&store).unwrap();
        assert_eq!(levels, vec![("a".to_string(), "x".to_string())]);
        let saves = Namespace::SAVE.scan(&store).unwrap();
        assert_eq!(saves, vec![("a".to_string(), "y".to_string())]);
    }

    #[test]
    fn prefix_scan_stops_at_neighbouring_keys() {
        let store = MemoryStore::new();
        store.set("lev", "0").unwrap();
        store.set("level/a", "1").unwrap();
        store.set("level/b", "2").unwrap();
        store.set("levels", "3").unwrap();
        store.set("save/a", "4").unwrap();

        let found = store.scan_prefix("level/").unwrap();
        assert_eq!(
            found,
            vec![
                ("level/a".to_string(), "1".to_string()),
                ("level/b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let store = MemoryStore::new();
        store.remove("level/nothing").unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
