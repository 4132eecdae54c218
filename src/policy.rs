//! Eviction Policies
//!
//! An eviction policy decides two things for a [`BoundedCache`](crate::BoundedCache):
//! how reads and writes reorder the resident keys, and which key is sacrificed
//! when a new key arrives at a full cache. Policies own no keys themselves;
//! they manipulate the cache's [`KeyOrder`].
//!
//! # Variants
//!
//! | Policy  | `put` new key   | `put` existing key | `get` hit     | Victim |
//! |---------|-----------------|--------------------|---------------|--------|
//! | [`Fifo`]| append to back  | no reorder         | no reorder    | front  |
//! | [`Lifo`]| append to back  | move to back       | no reorder    | back   |
//! | [`Mru`] | insert at front | move to front      | move to front | front  |
//! | [`Lru`] | append to back  | move to back       | move to back  | front  |
//!
//! FIFO and LIFO only react to admission order, so `get` never touches their
//! ordering. MRU and LRU react to access recency, reads and writes alike.
//!
//! # Adding a Policy
//!
//! Implement [`EvictionPolicy`] on a new type. The cache orchestration is
//! shared, so nothing else has to change.
//!
//! ```
//! use core::borrow::Borrow;
//! use core::hash::{BuildHasher, Hash};
//! use policy_cache::order::KeyOrder;
//! use policy_cache::policy::EvictionPolicy;
//!
//! /// Evicts the newest key, and treats reads as refreshes too.
//! #[derive(Debug, Default)]
//! struct Stack;
//!
//! impl EvictionPolicy for Stack {
//!     fn name(&self) -> &'static str {
//!         "STACK"
//!     }
//!     fn on_insert<K: Hash + Eq + Clone, S: BuildHasher>(&mut self, order: &mut KeyOrder<K, S>, key: K) {
//!         order.push_back(key);
//!     }
//!     fn on_update<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
//!     where
//!         K: Hash + Eq + Borrow<Q>,
//!         Q: ?Sized + Hash + Eq,
//!         S: BuildHasher,
//!     {
//!         order.move_to_back(key);
//!     }
//!     fn on_access<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
//!     where
//!         K: Hash + Eq + Borrow<Q>,
//!         Q: ?Sized + Hash + Eq,
//!         S: BuildHasher,
//!     {
//!         order.move_to_back(key);
//!     }
//!     fn evict_victim<K: Hash + Eq, S: BuildHasher>(&mut self, order: &mut KeyOrder<K, S>) -> Option<K> {
//!         order.pop_back()
//!     }
//! }
//!
//! let mut cache = policy_cache::BoundedCache::new(core::num::NonZeroUsize::new(2).unwrap(), Stack);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! assert_eq!(cache.put("c", 3), Some(("a", 1)));
//! ```

extern crate alloc;

use crate::order::KeyOrder;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::str::FromStr;

/// The capability set a bounded cache needs from an eviction policy.
///
/// The cache calls exactly one of `on_insert` / `on_update` per successful
/// `put`, `on_access` per `get` hit, and `evict_victim` at most once per `put`
/// of a new key into a full cache. `evict_victim` must remove the key it
/// returns from `order`.
pub trait EvictionPolicy: fmt::Debug {
    /// Short identifier used in logs and metrics (e.g. `"LRU"`).
    fn name(&self) -> &'static str;

    /// A brand-new key was admitted.
    fn on_insert<K, S>(&mut self, order: &mut KeyOrder<K, S>, key: K)
    where
        K: Hash + Eq + Clone,
        S: BuildHasher;

    /// The value of a resident key was replaced.
    fn on_update<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher;

    /// A resident key was read.
    fn on_access<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher;

    /// Removes and returns the key to evict, or `None` if `order` is empty.
    fn evict_victim<K, S>(&mut self, order: &mut KeyOrder<K, S>) -> Option<K>
    where
        K: Hash + Eq,
        S: BuildHasher;
}

/// First-in, first-out: evicts the oldest admitted key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fifo;

impl EvictionPolicy for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn on_insert<K, S>(&mut self, order: &mut KeyOrder<K, S>, key: K)
    where
        K: Hash + Eq + Clone,
        S: BuildHasher,
    {
        order.push_back(key);
    }

    fn on_update<K, Q, S>(&mut self, _order: &mut KeyOrder<K, S>, _key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
    }

    fn on_access<K, Q, S>(&mut self, _order: &mut KeyOrder<K, S>, _key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
    }

    fn evict_victim<K, S>(&mut self, order: &mut KeyOrder<K, S>) -> Option<K>
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        order.pop_front()
    }
}

/// Last-in, first-out: evicts the most recently admitted or updated key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifo;

impl EvictionPolicy for Lifo {
    fn name(&self) -> &'static str {
        "LIFO"
    }

    fn on_insert<K, S>(&mut self, order: &mut KeyOrder<K, S>, key: K)
    where
        K: Hash + Eq + Clone,
        S: BuildHasher,
    {
        order.push_back(key);
    }

    // An update counts as a fresh admission.
    fn on_update<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        order.move_to_back(key);
    }

    fn on_access<K, Q, S>(&mut self, _order: &mut KeyOrder<K, S>, _key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
    }

    fn evict_victim<K, S>(&mut self, order: &mut KeyOrder<K, S>) -> Option<K>
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        order.pop_back()
    }
}

/// Most recently used: evicts the key read or written last.
///
/// The front of the order is the most recent key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mru;

impl EvictionPolicy for Mru {
    fn name(&self) -> &'static str {
        "MRU"
    }

    fn on_insert<K, S>(&mut self, order: &mut KeyOrder<K, S>, key: K)
    where
        K: Hash + Eq + Clone,
        S: BuildHasher,
    {
        order.push_front(key);
    }

    fn on_update<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        order.move_to_front(key);
    }

    fn on_access<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        order.move_to_front(key);
    }

    fn evict_victim<K, S>(&mut self, order: &mut KeyOrder<K, S>) -> Option<K>
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        order.pop_front()
    }
}

/// Least recently used: evicts the key that went longest without a read or
/// write.
///
/// The back of the order is the most recent key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lru;

impl EvictionPolicy for Lru {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn on_insert<K, S>(&mut self, order: &mut KeyOrder<K, S>, key: K)
    where
        K: Hash + Eq + Clone,
        S: BuildHasher,
    {
        order.push_back(key);
    }

    fn on_update<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        order.move_to_back(key);
    }

    fn on_access<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        order.move_to_back(key);
    }

    fn evict_victim<K, S>(&mut self, order: &mut KeyOrder<K, S>) -> Option<K>
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        order.pop_front()
    }
}

/// A policy chosen at runtime, e.g. from a command line flag.
///
/// ```
/// use policy_cache::policy::PolicyKind;
///
/// let kind: PolicyKind = "mru".parse().unwrap();
/// assert_eq!(kind, PolicyKind::Mru);
/// assert_eq!(kind.to_string(), "MRU");
/// assert!("clock".parse::<PolicyKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// See [`Fifo`].
    Fifo,
    /// See [`Lifo`].
    Lifo,
    /// See [`Mru`].
    Mru,
    /// See [`Lru`].
    Lru,
}

impl PolicyKind {
    /// Every built-in policy, in a stable order.
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Fifo,
        PolicyKind::Lifo,
        PolicyKind::Mru,
        PolicyKind::Lru,
    ];
}

impl EvictionPolicy for PolicyKind {
    fn name(&self) -> &'static str {
        match self {
            PolicyKind::Fifo => Fifo.name(),
            PolicyKind::Lifo => Lifo.name(),
            PolicyKind::Mru => Mru.name(),
            PolicyKind::Lru => Lru.name(),
        }
    }

    fn on_insert<K, S>(&mut self, order: &mut KeyOrder<K, S>, key: K)
    where
        K: Hash + Eq + Clone,
        S: BuildHasher,
    {
        match self {
            PolicyKind::Fifo => Fifo.on_insert(order, key),
            PolicyKind::Lifo => Lifo.on_insert(order, key),
            PolicyKind::Mru => Mru.on_insert(order, key),
            PolicyKind::Lru => Lru.on_insert(order, key),
        }
    }

    fn on_update<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        match self {
            PolicyKind::Fifo => Fifo.on_update(order, key),
            PolicyKind::Lifo => Lifo.on_update(order, key),
            PolicyKind::Mru => Mru.on_update(order, key),
            PolicyKind::Lru => Lru.on_update(order, key),
        }
    }

    fn on_access<K, Q, S>(&mut self, order: &mut KeyOrder<K, S>, key: &Q)
    where
        K: Hash + Eq + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        match self {
            PolicyKind::Fifo => Fifo.on_access(order, key),
            PolicyKind::Lifo => Lifo.on_access(order, key),
            PolicyKind::Mru => Mru.on_access(order, key),
            PolicyKind::Lru => Lru.on_access(order, key),
        }
    }

    fn evict_victim<K, S>(&mut self, order: &mut KeyOrder<K, S>) -> Option<K>
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        match self {
            PolicyKind::Fifo => Fifo.evict_victim(order),
            PolicyKind::Lifo => Lifo.evict_victim(order),
            PolicyKind::Mru => Mru.evict_victim(order),
            PolicyKind::Lru => Lru.evict_victim(order),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown eviction policy `{0}` (expected one of: fifo, lifo, mru, lru)")]
pub struct ParsePolicyError(pub String);

impl FromStr for PolicyKind {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParsePolicyError(String::from(s)))
    }
}
