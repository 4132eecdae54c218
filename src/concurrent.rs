//! Concurrent Bounded Cache
//!
//! [`ConcurrentBoundedCache`] is the thread-safe counterpart to
//! [`BoundedCache`]. One `parking_lot::Mutex` guards the whole cache, store
//! and key order together, for the full duration of every operation.
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │          ConcurrentBoundedCache           │
//! │                                           │
//! │  ┌─────────────────────────────────────┐  │
//! │  │                Mutex                │  │
//! │  │  ┌───────────────────────────────┐  │  │
//! │  │  │ BoundedCache (store + order)  │  │  │
//! │  │  └───────────────────────────────┘  │  │
//! │  └─────────────────────────────────────┘  │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Why One Lock?
//!
//! Every policy defines a single global order over all resident keys, and
//! every `get` may rewrite that order (MRU, LRU). Partitioning keys across
//! independently locked segments would turn one global order into several
//! local ones and change which key is evicted. A single lock keeps the
//! eviction decision and its discard notification atomic with the `put`
//! that triggered it.
//!
//! `Mutex` rather than `RwLock`: reads mutate the order too.
//!
//! # Zero-Copy Access
//!
//! [`get`](ConcurrentBoundedCache::get) returns a clone. Use
//! [`get_with`](ConcurrentBoundedCache::get_with) to inspect a value while the
//! lock is held:
//!
//! ```rust
//! use policy_cache::concurrent::ConcurrentBoundedCache;
//! use policy_cache::policy::Lru;
//! use core::num::NonZeroUsize;
//!
//! let cache = ConcurrentBoundedCache::new(NonZeroUsize::new(8).unwrap(), Lru);
//! cache.put("greeting".to_string(), "hello world".to_string());
//! assert_eq!(cache.get_with("greeting", |v| v.len()), Some(11));
//! ```

extern crate alloc;

use crate::cache::BoundedCache;
use crate::config::BoundedCacheConfig;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::policy::EvictionPolicy;
use crate::DefaultHashBuilder;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

/// A thread-safe [`BoundedCache`] behind a single lock.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Debug`.
/// - `V`: Value type. `get` additionally requires `Clone`.
/// - `P`: Eviction policy.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```rust
/// use policy_cache::concurrent::ConcurrentBoundedCache;
/// use policy_cache::policy::Fifo;
/// use core::num::NonZeroUsize;
/// use std::sync::Arc;
/// use std::thread;
///
/// let cache = Arc::new(ConcurrentBoundedCache::new(NonZeroUsize::new(100).unwrap(), Fifo));
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let cache = Arc::clone(&cache);
///         thread::spawn(move || {
///             for i in 0..50 {
///                 cache.put(format!("key-{}-{}", t, i), i);
///             }
///         })
///     })
///     .collect();
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(cache.len(), 100);
/// ```
pub struct ConcurrentBoundedCache<K, V, P, S = DefaultHashBuilder> {
    inner: Mutex<BoundedCache<K, V, P, S>>,
}

impl<K: Hash + Eq, V, P: EvictionPolicy> ConcurrentBoundedCache<K, V, P> {
    /// Creates a cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize, policy: P) -> Self {
        Self::from(BoundedCache::new(cap, policy))
    }

    /// Creates a cache from a configuration with an optional hasher.
    pub fn init(config: BoundedCacheConfig, policy: P, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::from(BoundedCache::init(config, policy, hasher))
    }
}

impl<K, V, P, S> From<BoundedCache<K, V, P, S>> for ConcurrentBoundedCache<K, V, P, S> {
    fn from(cache: BoundedCache<K, V, P, S>) -> Self {
        ConcurrentBoundedCache {
            inner: Mutex::new(cache),
        }
    }
}

impl<K, V, P, S> ConcurrentBoundedCache<K, V, P, S>
where
    K: Hash + Eq + Clone + fmt::Debug,
    P: EvictionPolicy,
    S: BuildHasher,
{
    /// Creates a cache hashing keys with `hash_builder`.
    pub fn with_hasher(cap: NonZeroUsize, policy: P, hash_builder: S) -> Self
    where
        S: Clone,
    {
        Self::from(BoundedCache::with_hasher(cap, policy, hash_builder))
    }

    pub fn cap(&self) -> NonZeroUsize {
        self.inner.lock().cap()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Retrieves a clone of the value for `key`, letting the policy record the
    /// access.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Applies `f` to the value for `key` while holding the lock.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    /// Applies `f` to a mutable reference to the value for `key` while holding
    /// the lock. Counts as an access.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.inner.lock().get_mut(key).map(f)
    }

    pub fn get_nullable<Q>(&self, key: Option<&Q>) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().get_nullable(key).cloned()
    }

    /// Stores `value` under `key`; see [`BoundedCache::put`].
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().put(key, value)
    }

    pub fn put_nullable(&self, key: Option<K>, value: Option<V>) -> Option<(K, V)> {
        self.inner.lock().put_nullable(key, value)
    }

    /// Existence check. Does not touch the eviction order.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().contains_key(key)
    }

    /// Explicit removal; not an eviction.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().remove(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Snapshot of the resident keys in eviction order, front to back.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys().cloned().collect()
    }

    /// Installs a discard listener. It runs while the lock is held and must
    /// not call back into this cache.
    pub fn set_discard_listener<F>(&self, listener: F)
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        self.inner.lock().set_discard_listener(listener);
    }

    /// Snapshot of the core counters.
    pub fn core_metrics(&self) -> CoreCacheMetrics {
        self.inner.lock().core_metrics().clone()
    }

    /// Consumes the wrapper and returns the underlying cache.
    pub fn into_inner(self) -> BoundedCache<K, V, P, S> {
        self.inner.into_inner()
    }
}

impl<K, V, P, S> CacheMetrics for ConcurrentBoundedCache<K, V, P, S>
where
    K: Hash + Eq,
    P: EvictionPolicy,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.inner.lock().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.inner.lock().algorithm_name()
    }
}

impl<K, V, P: fmt::Debug, S> fmt::Debug for ConcurrentBoundedCache<K, V, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentBoundedCache")
            .field("inner", &*self.inner.lock())
            .finish()
    }
}
