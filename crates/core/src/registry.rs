//! Keyed registry of shared immutable values (flyweight).
//!
//! One registry instance owns the values; callers receive `Arc` handles. There
//! is no global instance: pass the registry to whatever needs it.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct Registry<K, V> {
    entries: Mutex<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a shared value without creating it.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    /// Return the shared value for `key`, creating it with `make` on first use.
    pub fn get_or_create(&self, key: K, make: impl FnOnce() -> V) -> Arc<V> {
        // Entries are insert-only, so a poisoned map is still consistent.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.entry(key).or_insert_with(|| Arc::new(make())).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
