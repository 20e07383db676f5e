//! # Registry Partitions
//!
//! A [`Partition`] is one reader/writer-locked map from logical id to live handle. The world
//! directory holds one partition per entity kind, so a burst of army registrations never
//! blocks a tile lookup.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// A shared, cloneable id → handle map.
#[derive(Debug)]
pub struct Partition<K, V> {
    entries: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Partition<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for Partition<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Partition<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the handle for `key`. Last writer wins.
    pub fn put(&self, key: K, value: V) {
        self.entries.write().insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().remove(key)
    }

    /// Removes the entry only if `matches` accepts the currently stored handle.
    pub fn remove_if(&self, key: &K, matches: impl FnOnce(&V) -> bool) -> bool {
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(matches) {
            entries.remove(key);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn keys(&self) -> Vec<K> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<V> {
        self.entries.read().values().cloned().collect()
    }
}
