//! Record Store
//!
//! The plain key-to-value mapping a bounded cache owns. It has no ordering
//! semantics of its own and never evicts; capacity is enforced by
//! [`BoundedCache`](crate::BoundedCache) on top of it.
//!
//! A `RecordStore` is also usable on its own as an unbounded basic cache:
//! [`put_nullable`](RecordStore::put_nullable) and
//! [`get_nullable`](RecordStore::get_nullable) follow the same rules as the
//! bounded cache for absent keys and values.
//!
//! ```
//! use policy_cache::RecordStore;
//!
//! let mut store = RecordStore::new();
//! store.put_nullable(Some("A"), Some("Hello"));
//! store.put_nullable(None, Some("ignored"));
//! store.put_nullable(Some("B"), None::<&str>);
//!
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.get_nullable(Some(&"A")), Some(&"Hello"));
//! assert_eq!(store.get_nullable::<&str>(None), None);
//! ```

extern crate alloc;

use crate::{DefaultHashBuilder, HashMap};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

/// Unique-key mapping from key to value.
pub struct RecordStore<K, V, S = DefaultHashBuilder> {
    map: HashMap<K, V, S>,
}

impl<K: Hash + Eq, V> RecordStore<K, V> {
    /// Creates an empty store with the default hasher.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V> Default for RecordStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> RecordStore<K, V, S> {
    /// Creates an empty store using `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        RecordStore {
            map: HashMap::with_hasher(hash_builder),
        }
    }

    /// Creates an empty store with room for `capacity` records.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        RecordStore {
            map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Number of stored records.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the store holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if `key` is stored.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Returns the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_mut(key)
    }

    /// Stores `value` under `key`, returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// Removes `key`, returning its value if it was stored.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key)
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    /// Stores the pair unless either side is absent. Absent input is a no-op.
    pub fn put_nullable(&mut self, key: Option<K>, value: Option<V>) {
        if let (Some(key), Some(value)) = (key, value) {
            self.map.insert(key, value);
        }
    }

    /// Looks up `key`; an absent key is simply a miss.
    pub fn get_nullable<Q>(&self, key: Option<&Q>) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        key.and_then(|key| self.map.get(key))
    }
}

impl<K, V, S> fmt::Debug for RecordStore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("len", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    #[test]
    fn test_insert_get_overwrite() {
        let mut store = RecordStore::new();
        assert_eq!(store.insert("a", 1), None);
        assert_eq!(store.insert("a", 2), Some(1));
        assert_eq!(store.get(&"a"), Some(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = RecordStore::new();
        store.insert("a", 1);
        store.insert("b", 2);
        assert_eq!(store.remove(&"a"), Some(1));
        assert_eq!(store.remove(&"a"), None);
        assert!(!store.contains_key(&"a"));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_nullable_ignores_absent_input() {
        let mut store: RecordStore<String, i32> = RecordStore::new();
        store.put_nullable(None, Some(1));
        store.put_nullable(Some(String::from("k")), None);
        store.put_nullable(None, None);
        assert!(store.is_empty());

        store.put_nullable(Some(String::from("k")), Some(7));
        assert_eq!(store.get_nullable(Some("k")), Some(&7));
        assert_eq!(store.get_nullable::<str>(None), None);
    }

    #[test]
    fn test_basic_store_never_evicts() {
        let mut store = RecordStore::new();
        for i in 0..100 {
            store.insert(i, i * 2);
        }
        assert_eq!(store.len(), 100);
        assert_eq!(store.get(&0), Some(&0));
    }

    #[test]
    fn test_get_mut() {
        let mut store = RecordStore::new();
        store.insert("counter", 0);
        if let Some(v) = store.get_mut(&"counter") {
            *v += 5;
        }
        assert_eq!(store.get(&"counter"), Some(&5));
    }

    #[test]
    fn test_keys_lists_every_record() {
        let mut store = RecordStore::new();
        for k in ["c", "a", "b"] {
            store.insert(k, k.len());
        }
        store.remove(&"b");
        let mut keys: alloc::vec::Vec<&&str> = store.keys().collect();
        keys.sort();
        assert_eq!(keys, [&"a", &"c"]);
    }
}
