//! In-memory store for tests and demos.
//!
//! # Responsibility
//! - Mirror the file handle semantics (snapshot on open, persist on flush)
//!   without touching the filesystem.
//!
//! # Invariants
//! - A handle works on a snapshot; other handles see its writes only after
//!   `flush`.

use super::{StoreHandle, StoreProvider, StoreResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

type SharedStores = Arc<Mutex<HashMap<String, BTreeMap<String, String>>>>;

/// Provider keeping every store in process memory, keyed by store identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreProvider {
    stores: SharedStores,
}

impl MemoryStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloads `store_id` with entries, replacing any existing content.
    pub fn seed<I, K, V>(&self, store_id: &str, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        lock_stores(&self.stores).insert(store_id.to_string(), entries);
    }

    /// Returns a copy of the flushed entries for `store_id`.
    pub fn entries(&self, store_id: &str) -> BTreeMap<String, String> {
        lock_stores(&self.stores)
            .get(store_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl StoreProvider for MemoryStoreProvider {
    type Handle = MemoryStore;

    fn open(&self, store_id: &str) -> StoreResult<MemoryStore> {
        let entries = lock_stores(&self.stores)
            .get(store_id)
            .cloned()
            .unwrap_or_default();
        Ok(MemoryStore {
            store_id: store_id.to_string(),
            entries,
            shared: Arc::clone(&self.stores),
        })
    }
}

/// Handle over one in-memory store snapshot.
pub struct MemoryStore {
    store_id: String,
    entries: BTreeMap<String, String>,
    shared: SharedStores,
}

impl StoreHandle for MemoryStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn flush(&mut self) -> StoreResult<()> {
        lock_stores(&self.shared).insert(self.store_id.clone(), self.entries.clone());
        Ok(())
    }
}

fn lock_stores(
    stores: &SharedStores,
) -> std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, String>>> {
    // A poisoned lock only means another test thread panicked mid-write;
    // the map itself stays usable.
    stores.lock().unwrap_or_else(|err| err.into_inner())
}
