//! # dashkit Store
//!
//! Durable single-value slots for dashkit widgets.
//!
//! ## Overview
//!
//! Each widget that remembers state between sessions owns exactly one slot:
//! a fixed key mapped to one JSON document in the data directory. Slots have
//! no history and no expiry.
//!
//! - `save` serializes and overwrites unconditionally (write-then-rename)
//! - `load` returns `None` when the slot is missing **or** corrupt, so a
//!   damaged file never blocks startup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dashkit_store::{Slot, SlotStore};
//!
//! fn main() -> Result<(), dashkit_store::StoreError> {
//!     let store = SlotStore::open("/tmp/dashkit")?;
//!     let slot: Slot<Vec<String>> = Slot::new(store, "todo-items");
//!
//!     slot.save(&vec![String::from("Buy milk")])?;
//!     assert_eq!(slot.load(), Some(vec![String::from("Buy milk")]));
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! | Key | File |
//! |-----|------|
//! | `last-stock-quote` | `<root>/last-stock-quote.json` |
//! | `todo-items` | `<root>/todo-items.json` |

use std::fmt;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

const MAX_KEY_LEN: usize = 64;

/// Errors that can occur while writing or clearing a slot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The value could not be encoded as JSON.
    #[error("slot '{key}' could not be serialized: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Slot keys are limited to ASCII letters, digits, `-` and `_`.
    #[error("invalid slot key '{key}'")]
    InvalidKey { key: String },
}

/// Directory-backed collection of named slots.
#[derive(Debug, Clone)]
pub struct SlotStore {
    root: PathBuf,
}

impl SlotStore {
    /// Opens (and creates if needed) the slot directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serializes `value` and overwrites the slot.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.slot_path(key)?;
        let payload = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
            key: key.to_owned(),
            source,
        })?;

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, payload)?;
        fs::rename(&staging, &path)?;

        debug!(slot = key, path = %path.display(), "slot written");
        Ok(())
    }

    /// Reads the slot. Missing, unreadable and malformed payloads all yield `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = match self.slot_path(key) {
            Ok(path) => path,
            Err(error) => {
                warn!(slot = key, %error, "refusing to read slot");
                return None;
            }
        };

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return None,
            Err(error) => {
                warn!(slot = key, %error, "slot unreadable; treating as absent");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(slot = key, %error, "slot payload is corrupt; treating as absent");
                None
            }
        }
    }

    /// Removes the slot. Clearing a missing slot is not an error.
    pub fn clear(&self, key: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StoreError::Io(error)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slot_path(key).map(|path| path.is_file()).unwrap_or(false)
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key.len() <= MAX_KEY_LEN
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(StoreError::InvalidKey {
                key: key.to_owned(),
            });
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

/// A typed handle to one fixed key.
pub struct Slot<T> {
    store: SlotStore,
    key: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: SlotStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            _value: PhantomData,
        }
    }

    pub const fn key(&self) -> &'static str {
        self.key
    }

    pub fn save(&self, value: &T) -> Result<(), StoreError> {
        self.store.save(self.key, value)
    }

    pub fn load(&self) -> Option<T> {
        self.store.load(self.key)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.clear(self.key)
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            _value: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("root", &self.store.root)
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Reading {
        symbol: String,
        price: f64,
    }

    #[test]
    fn save_then_load_restores_value() {
        let dir = tempdir().expect("tempdir");
        let store = SlotStore::open(dir.path()).expect("store opens");
        let reading = Reading {
            symbol: String::from("AAPL"),
            price: 174.12,
        };

        store.save("last-stock-quote", &reading).expect("save");
        let loaded: Option<Reading> = store.load("last-stock-quote");

        assert_eq!(loaded, Some(reading));
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempdir().expect("tempdir");
        let store = SlotStore::open(dir.path()).expect("store opens");

        store.save("slot", &1_u32).expect("first save");
        store.save("slot", &2_u32).expect("second save");

        assert_eq!(store.load::<u32>("slot"), Some(2));
        assert!(!dir.path().join("slot.json.tmp").exists());
    }

    #[test]
    fn missing_slot_is_absent() {
        let dir = tempdir().expect("tempdir");
        let store = SlotStore::open(dir.path()).expect("store opens");

        assert_eq!(store.load::<Reading>("nothing-here"), None);
        assert!(!store.contains("nothing-here"));
    }

    #[test]
    fn corrupt_slot_is_absent() {
        let dir = tempdir().expect("tempdir");
        let store = SlotStore::open(dir.path()).expect("store opens");
        fs::write(dir.path().join("todo-items.json"), b"{ not json").expect("write junk");

        assert_eq!(store.load::<Vec<String>>("todo-items"), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempdir().expect("tempdir");
        let store = SlotStore::open(dir.path()).expect("store opens");

        let err = store.save("../escape", &1_u32).expect_err("must fail");
        assert!(matches!(err, StoreError::InvalidKey { .. }));
        assert_eq!(store.load::<u32>("../escape"), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempdir().expect("tempdir");
        let store = SlotStore::open(dir.path()).expect("store opens");
        let slot: Slot<u32> = Slot::new(store, "counter");

        slot.save(&7).expect("save");
        slot.clear().expect("first clear");
        slot.clear().expect("second clear");

        assert_eq!(slot.load(), None);
    }
}
