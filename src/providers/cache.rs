//! Explicit memoization cache for provider calls.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

/// A keyed cache handed to provider wrappers.
///
/// Deliberately an owned object rather than module-level state: the caller
/// decides whether it lives for one scheduling run or the whole process.
#[derive(Debug)]
pub struct ProviderCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> ProviderCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) {
        self.entries.write().insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for ProviderCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
