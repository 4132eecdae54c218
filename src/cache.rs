//! Bounded Cache
//!
//! [`BoundedCache`] is a fixed-capacity key-value cache whose eviction rule is
//! supplied by an [`EvictionPolicy`]. All orchestration (capacity checks,
//! victim removal, discard notification, metrics) lives here once and is shared
//! by every policy.
//!
//! # Algorithm
//!
//! ```text
//!   put(k, v)
//!     │
//!     ├── k resident? ──yes──▶ replace value, policy.on_update ──▶ done
//!     │
//!     no
//!     │
//!     ├── len == capacity? ──yes──▶ victim = policy.evict_victim
//!     │                             remove victim from store
//!     │                             DISCARD notification
//!     │
//!     └── insert (k, v), policy.on_insert ──▶ done
//! ```
//!
//! The victim is chosen before the new key joins the order, so a policy can
//! never pick the key that is being admitted, and the entry count never
//! exceeds the capacity, not even transiently.
//!
//! # Discard Notifications
//!
//! Each eviction is reported exactly once, in three ways:
//!
//! - the evicted `(key, value)` pair is returned from [`put`](BoundedCache::put)
//! - an `info` event with target `policy_cache::discard` is emitted through `tracing`
//! - an installed [discard listener](BoundedCache::set_discard_listener) is called
//!
//! # Performance Characteristics
//!
//! - Get: O(1)
//! - Put: O(1)
//! - Remove: O(1)
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. For concurrent access, use
//! [`ConcurrentBoundedCache`](crate::concurrent::ConcurrentBoundedCache) or
//! wrap the cache in a `Mutex`.

extern crate alloc;

use crate::config::BoundedCacheConfig;
use crate::list;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::order::KeyOrder;
use crate::policy::{EvictionPolicy, Fifo, Lifo, Lru, Mru};
use crate::store::RecordStore;
use crate::DefaultHashBuilder;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use tracing::{info, trace};

/// Callback invoked with every evicted entry.
pub type DiscardListener<K, V> = Box<dyn FnMut(&K, &V) + Send>;

/// A fixed-capacity cache with a pluggable eviction policy.
///
/// # Examples
///
/// ```
/// use policy_cache::policy::Lru;
/// use policy_cache::BoundedCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = BoundedCache::new(NonZeroUsize::new(2).unwrap(), Lru);
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // Reading "apple" makes "banana" the least recently used entry
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // Adding beyond capacity evicts exactly one entry and reports it
/// assert_eq!(cache.put("cherry", 3), Some(("banana", 2)));
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.len(), 2);
/// ```
pub struct BoundedCache<K, V, P, S = DefaultHashBuilder> {
    config: BoundedCacheConfig,
    policy: P,
    store: RecordStore<K, V, S>,
    order: KeyOrder<K, S>,
    metrics: CoreCacheMetrics,
    listener: Option<DiscardListener<K, V>>,
}

/// A [`BoundedCache`] that evicts the oldest admitted entry.
pub type FifoCache<K, V, S = DefaultHashBuilder> = BoundedCache<K, V, Fifo, S>;

/// A [`BoundedCache`] that evicts the newest admitted or updated entry.
pub type LifoCache<K, V, S = DefaultHashBuilder> = BoundedCache<K, V, Lifo, S>;

/// A [`BoundedCache`] that evicts the most recently used entry.
pub type MruCache<K, V, S = DefaultHashBuilder> = BoundedCache<K, V, Mru, S>;

/// A [`BoundedCache`] that evicts the least recently used entry.
pub type LruCache<K, V, S = DefaultHashBuilder> = BoundedCache<K, V, Lru, S>;

impl<K: Hash + Eq, V, P: EvictionPolicy> BoundedCache<K, V, P> {
    /// Creates a cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize, policy: P) -> Self {
        Self::with_hasher(cap, policy, DefaultHashBuilder::default())
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// If `hasher` is `None`, the default hash builder is used.
    pub fn init(config: BoundedCacheConfig, policy: P, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::with_hasher(config.capacity, policy, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, P: EvictionPolicy + Default> Default for BoundedCache<K, V, P> {
    /// A cache with the reference capacity of [`MAX_ITEMS`](crate::config::MAX_ITEMS).
    fn default() -> Self {
        Self::init(BoundedCacheConfig::default(), P::default(), None)
    }
}

impl<K: Hash + Eq, V, P: EvictionPolicy, S: BuildHasher + Clone> BoundedCache<K, V, P, S> {
    /// Creates a cache holding at most `cap` entries, hashing keys with `hash_builder`.
    pub fn with_hasher(cap: NonZeroUsize, policy: P, hash_builder: S) -> Self {
        let map_capacity = cap.get().next_power_of_two();
        BoundedCache {
            config: BoundedCacheConfig { capacity: cap },
            policy,
            store: RecordStore::with_capacity_and_hasher(map_capacity, hash_builder.clone()),
            order: KeyOrder::with_capacity_and_hasher(map_capacity, hash_builder),
            metrics: CoreCacheMetrics::new(),
            listener: None,
        }
    }
}

impl<K: Hash + Eq, V, P: EvictionPolicy, S: BuildHasher> BoundedCache<K, V, P, S> {
    /// Maximum number of resident entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    /// Number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no entries are resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The eviction policy in use.
    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Counters collected since the cache was created.
    #[inline]
    pub fn core_metrics(&self) -> &CoreCacheMetrics {
        &self.metrics
    }

    /// Installs a callback that receives every evicted entry, replacing any
    /// previous one.
    pub fn set_discard_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the discard listener, if any.
    pub fn clear_discard_listener(&mut self) {
        self.listener = None;
    }

    /// Returns the value for `key`, letting the policy record the access.
    ///
    /// A missing key is a normal outcome and yields `None`.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.store.get(key) {
            Some(value) => {
                self.policy.on_access(&mut self.order, key);
                self.metrics.record_hit();
                Some(value)
            }
            None => {
                trace!(policy = self.policy.name(), "cache miss");
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Like [`get`](Self::get) but hands out a mutable reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.store.get_mut(key) {
            Some(value) => {
                self.policy.on_access(&mut self.order, key);
                self.metrics.record_hit();
                Some(value)
            }
            None => {
                trace!(policy = self.policy.name(), "cache miss");
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Looks up a possibly absent key. An absent key is a miss.
    pub fn get_nullable<Q>(&mut self, key: Option<&Q>) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match key {
            Some(key) => self.get(key),
            None => {
                trace!(policy = self.policy.name(), "get with absent key");
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Returns the value for `key` without touching the eviction order or metrics.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.get(key)
    }

    /// Returns `true` if `key` is resident. Does not touch the eviction order.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.contains_key(key)
    }

    /// Removes `key` explicitly. This is not an eviction and produces no
    /// discard notification.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let value = self.store.remove(key)?;
        self.order.remove(key);
        self.metrics.record_removal();
        Some(value)
    }

    /// Removes every entry. Metrics are kept.
    pub fn clear(&mut self) {
        self.store.clear();
        self.order.clear();
    }

    /// Resident keys in eviction order, front to back.
    ///
    /// For FIFO, LRU and MRU the next victim is the first key yielded; for
    /// LIFO it is the last.
    pub fn keys(&self) -> list::Iter<'_, K> {
        self.order.iter()
    }

    /// Resident entries in eviction order, front to back.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order.iter().filter_map(move |key| {
            let value = self.store.get(key);
            debug_assert!(value.is_some(), "key order holds a key missing from the record store");
            value.map(|value| (key, value))
        })
    }
}

impl<K, V, P, S> BoundedCache<K, V, P, S>
where
    K: Hash + Eq + Clone + fmt::Debug,
    P: EvictionPolicy,
    S: BuildHasher,
{
    /// Stores `value` under `key`.
    ///
    /// Updating a resident key replaces its value and never evicts. Admitting
    /// a new key into a full cache first evicts exactly one entry chosen by
    /// the policy; that entry is returned and announced as a discard.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.store.get_mut(&key) {
            *slot = value;
            self.policy.on_update(&mut self.order, &key);
            self.metrics.record_update();
            return None;
        }

        let evicted = if self.store.len() >= self.cap().get() {
            Some(self.evict())
        } else {
            None
        };

        self.store.insert(key.clone(), value);
        self.policy.on_insert(&mut self.order, key);
        self.metrics.record_insertion();
        debug_assert_eq!(self.store.len(), self.order.len());

        evicted
    }

    /// Stores the pair unless the key or the value is absent, in which case
    /// the call is a no-op.
    pub fn put_nullable(&mut self, key: Option<K>, value: Option<V>) -> Option<(K, V)> {
        match (key, value) {
            (Some(key), Some(value)) => self.put(key, value),
            _ => {
                trace!(policy = self.policy.name(), "ignoring put with absent key or value");
                self.metrics.record_ignored_put();
                None
            }
        }
    }

    fn evict(&mut self) -> (K, V) {
        let Some(victim) = self.policy.evict_victim(&mut self.order) else {
            panic!(
                "{} policy produced no eviction victim for a full cache of {} entries",
                self.policy.name(),
                self.store.len()
            );
        };
        let Some(value) = self.store.remove(&victim) else {
            panic!(
                "{} policy evicted {:?}, which is not in the record store",
                self.policy.name(),
                victim
            );
        };

        self.metrics.record_eviction();
        info!(
            target: "policy_cache::discard",
            policy = self.policy.name(),
            key = ?victim,
            "DISCARD: {:?}",
            victim
        );
        if let Some(listener) = self.listener.as_mut() {
            listener(&victim, &value);
        }

        (victim, value)
    }
}

impl<K, V, P, S> CacheMetrics for BoundedCache<K, V, P, S>
where
    K: Hash + Eq,
    P: EvictionPolicy,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        self.policy.name()
    }
}

/// Prints `Current cache:` followed by one `key: value` line per entry,
/// sorted by key.
impl<K, V, P, S> fmt::Display for BoundedCache<K, V, P, S>
where
    K: Hash + Eq + Ord + fmt::Display,
    V: fmt::Display,
    P: EvictionPolicy,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current cache:")?;
        let mut entries: Vec<(&K, &V)> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            writeln!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}

impl<K, V, P: fmt::Debug, S> fmt::Debug for BoundedCache<K, V, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("policy", &self.policy)
            .field("capacity", &self.config.capacity)
            .field("store", &self.store)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
