//! Keyed Eviction Order
//!
//! [`KeyOrder`] is the ordering structure every eviction policy works on: a
//! doubly linked sequence of resident keys plus a hash index from key to list
//! node. The index makes every positional operation O(1):
//!
//! | Operation        | Cost |
//! |------------------|------|
//! | `push_front`     | O(1) |
//! | `push_back`      | O(1) |
//! | `remove`         | O(1) |
//! | `move_to_front`  | O(1) |
//! | `move_to_back`   | O(1) |
//! | `pop_front`      | O(1) |
//! | `pop_back`       | O(1) |
//! | `front` / `back` | O(1) |
//!
//! ```text
//!   front                                  back
//!     │                                      │
//!     ▼                                      ▼
//!   ┌───┐    ┌───┐    ┌───┐    ┌───┐
//!   │ A │◀──▶│ B │◀──▶│ C │◀──▶│ D │
//!   └───┘    └───┘    └───┘    └───┘
//!     ▲        ▲        ▲        ▲
//!     └────────┴────────┴────────┴──── index: HashMap<K, *mut Entry<K>>
//! ```
//!
//! The order carries no eviction semantics of its own; policies decide which
//! end new keys join, which operations reorder, and which end gets sacrificed.

extern crate alloc;

use crate::list::{self, Entry, List};
use crate::{DefaultHashBuilder, HashMap};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

/// An ordered set of keys with O(1) positional updates.
///
/// # Safety
///
/// The index holds raw pointers into `list`. Every pointer stays valid while
/// its key is in the index: nodes are only freed through [`List::remove`],
/// and each removal drops the matching index entry first.
pub struct KeyOrder<K, S = DefaultHashBuilder> {
    list: List<K>,
    index: HashMap<K, *mut Entry<K>, S>,
}

// SAFETY: KeyOrder owns every node its raw pointers reference; moving it to
// another thread moves that ownership along with it.
unsafe impl<K: Send, S: Send> Send for KeyOrder<K, S> {}

// SAFETY: All mutation requires &mut self; shared references only read.
unsafe impl<K: Sync, S: Sync> Sync for KeyOrder<K, S> {}

impl<K: Hash + Eq> KeyOrder<K> {
    /// Creates an empty order with the default hasher.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq> Default for KeyOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, S: BuildHasher> KeyOrder<K, S> {
    /// Creates an empty order using `hash_builder` for the key index.
    pub fn with_hasher(hash_builder: S) -> Self {
        KeyOrder {
            list: List::new(),
            index: HashMap::with_hasher(hash_builder),
        }
    }

    /// Creates an empty order with room for `capacity` keys.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        KeyOrder {
            list: List::new(),
            index: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Number of keys in the order.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if no keys are present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// The key at the front of the order.
    pub fn front(&self) -> Option<&K> {
        self.list.front()
    }

    /// The key at the back of the order.
    pub fn back(&self) -> Option<&K> {
        self.list.back()
    }

    /// Inserts `key` at the front. A key that is already present is moved
    /// there instead, so each key appears at most once.
    pub fn push_front(&mut self, key: K)
    where
        K: Clone,
    {
        if let Some(&node) = self.index.get(&key) {
            // SAFETY: node comes from our index
            unsafe { self.list.move_to_front(node) };
            return;
        }
        let node = self.list.push_front(key.clone());
        self.index.insert(key, node);
    }

    /// Inserts `key` at the back. A key that is already present is moved
    /// there instead, so each key appears at most once.
    pub fn push_back(&mut self, key: K)
    where
        K: Clone,
    {
        if let Some(&node) = self.index.get(&key) {
            // SAFETY: node comes from our index
            unsafe { self.list.move_to_back(node) };
            return;
        }
        let node = self.list.push_back(key.clone());
        self.index.insert(key, node);
    }

    /// Moves `key` to the front. Returns `false` if the key is absent.
    pub fn move_to_front<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.index.get(key) {
            Some(&node) => {
                // SAFETY: node comes from our index
                unsafe { self.list.move_to_front(node) };
                true
            }
            None => false,
        }
    }

    /// Moves `key` to the back. Returns `false` if the key is absent.
    pub fn move_to_back<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.index.get(key) {
            Some(&node) => {
                // SAFETY: node comes from our index
                unsafe { self.list.move_to_back(node) };
                true
            }
            None => false,
        }
    }

    /// Removes `key` from the order. Returns `false` if the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.index.remove(key) {
            Some(node) => {
                // SAFETY: node came from our index and was just unindexed
                drop(unsafe { self.list.remove(node) });
                true
            }
            None => false,
        }
    }

    /// Removes and returns the front key.
    pub fn pop_front(&mut self) -> Option<K> {
        let key = self.list.pop_front()?;
        self.index.remove(&key);
        Some(key)
    }

    /// Removes and returns the back key.
    pub fn pop_back(&mut self) -> Option<K> {
        let key = self.list.pop_back()?;
        self.index.remove(&key);
        Some(key)
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Iterates keys from front to back.
    pub fn iter(&self) -> list::Iter<'_, K> {
        self.list.iter()
    }
}

impl<K: fmt::Debug, S> fmt::Debug for KeyOrder<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.list.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    fn keys(order: &KeyOrder<&'static str>) -> Vec<&'static str> {
        order.iter().copied().collect()
    }

    #[test]
    fn test_push_and_peek() {
        let mut order = KeyOrder::new();
        order.push_back("b");
        order.push_back("c");
        order.push_front("a");

        assert_eq!(keys(&order), ["a", "b", "c"]);
        assert_eq!(order.front(), Some(&"a"));
        assert_eq!(order.back(), Some(&"c"));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_push_existing_moves_instead_of_duplicating() {
        let mut order = KeyOrder::new();
        order.push_back("a");
        order.push_back("b");
        order.push_back("a");
        assert_eq!(keys(&order), ["b", "a"]);

        order.push_front("a");
        assert_eq!(keys(&order), ["a", "b"]);
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn test_moves() {
        let mut order = KeyOrder::new();
        for k in ["a", "b", "c", "d"] {
            order.push_back(k);
        }

        assert!(order.move_to_front(&"c"));
        assert_eq!(keys(&order), ["c", "a", "b", "d"]);

        assert!(order.move_to_back(&"a"));
        assert_eq!(keys(&order), ["c", "b", "d", "a"]);

        assert!(!order.move_to_front(&"z"));
        assert!(!order.move_to_back(&"z"));
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_remove_by_key() {
        let mut order = KeyOrder::new();
        for k in ["a", "b", "c"] {
            order.push_back(k);
        }
        assert!(order.remove(&"b"));
        assert!(!order.remove(&"b"));
        assert!(!order.contains(&"b"));
        assert_eq!(keys(&order), ["a", "c"]);
    }

    #[test]
    fn test_pops_keep_index_in_sync() {
        let mut order = KeyOrder::new();
        for k in ["a", "b", "c"] {
            order.push_back(k);
        }
        assert_eq!(order.pop_front(), Some("a"));
        assert_eq!(order.pop_back(), Some("c"));
        assert!(!order.contains(&"a"));
        assert!(!order.contains(&"c"));
        assert!(order.contains(&"b"));
        assert_eq!(order.pop_back(), Some("b"));
        assert_eq!(order.pop_front(), None);
        assert!(order.is_empty());
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut order: KeyOrder<String> = KeyOrder::new();
        order.push_back(String::from("alpha"));
        order.push_back(String::from("beta"));
        assert!(order.contains("alpha"));
        assert!(order.move_to_back("alpha"));
        assert_eq!(order.back().map(String::as_str), Some("alpha"));
        assert!(order.remove("beta"));
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut order = KeyOrder::new();
        order.push_back("a");
        order.push_back("b");
        order.clear();
        assert!(order.is_empty());
        assert!(!order.contains(&"a"));
        order.push_back("a");
        assert_eq!(keys(&order), ["a"]);
    }
}
