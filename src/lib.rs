#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     BoundedCache<K, V, P>                    │
//! │                                                              │
//! │   ┌──────────────┐   ┌──────────────┐   ┌────────────────┐   │
//! │   │ RecordStore  │   │   KeyOrder   │◀──│ EvictionPolicy │   │
//! │   │  key ─▶ val  │   │ front ... back   │  FIFO / LIFO / │   │
//! │   └──────────────┘   └──────────────┘   │  MRU / LRU     │   │
//! │                                         └────────────────┘   │
//! │   capacity check ─▶ evict_victim ─▶ DISCARD notification     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store and the order always hold exactly the same keys. The policy never
//! owns keys; it only reorders the [`KeyOrder`](order::KeyOrder) and picks the
//! victim when a new key arrives at a full cache.
//!
//! ## Quick Reference
//!
//! | Type | Victim on overflow | Reordered by `get` |
//! |------|--------------------|--------------------|
//! | [`FifoCache`] | oldest admitted | no |
//! | [`LifoCache`] | newest admitted or updated | no |
//! | [`MruCache`] | most recently read or written | yes |
//! | [`LruCache`] | least recently read or written | yes |
//!
//! ## Code Examples
//!
//! ### LIFO (Last In, First Out)
//!
//! ```rust
//! use policy_cache::LifoCache;
//!
//! let mut cache = LifoCache::default();
//! for (k, v) in [("A", 1), ("B", 2), ("C", 3), ("D", 4)] {
//!     cache.put(k, v);
//! }
//! // "D" was the newest key before "E" arrived
//! assert_eq!(cache.put("E", 5), Some(("D", 4)));
//! ```
//!
//! ### Choosing the policy at runtime
//!
//! ```rust
//! use policy_cache::policy::PolicyKind;
//! use policy_cache::BoundedCache;
//! use core::num::NonZeroUsize;
//!
//! let kind: PolicyKind = "mru".parse().unwrap();
//! let mut cache = BoundedCache::new(NonZeroUsize::new(2).unwrap(), kind);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! assert_eq!(cache.put("c", 3), Some(("a", 1)));
//! ```
//!
//! ## Modules
//!
//! - [`cache`]: The bounded cache and its policy aliases
//! - [`policy`]: The eviction policy trait and the built-in policies
//! - [`order`]: The ordered key sequence policies operate on
//! - [`store`]: The unbounded key-value store, also usable as a basic cache
//! - [`config`]: Configuration structures
//! - [`metrics`]: Metrics collection
//! - [`pagination`]: Page arithmetic and page retrieval over a record dataset
//! - [`concurrent`]: A thread-safe bounded cache (requires `concurrent` feature)

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", not(feature = "hashbrown"), test))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

#[cfg(feature = "hashbrown")]
pub use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
pub(crate) use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
pub(crate) use std::collections::HashMap;

/// Doubly linked list with stable node addresses.
///
/// **Note**: This module is internal infrastructure. It exposes unsafe raw
/// pointer operations; use [`order::KeyOrder`] instead.
pub(crate) mod list;

/// Ordered, duplicate-free key sequence with O(1) reordering.
pub mod order;

/// Plain key-value store without ordering or eviction.
pub mod store;

/// Eviction policies.
///
/// Provides the [`EvictionPolicy`](policy::EvictionPolicy) trait and the FIFO,
/// LIFO, MRU and LRU policies.
pub mod policy;

/// Fixed-capacity cache with a pluggable eviction policy.
pub mod cache;

/// Cache configuration structures.
pub mod config;

/// Cache metrics system.
///
/// Every cache tracks the same core counters and reports them through the
/// [`CacheMetrics`](metrics::CacheMetrics) trait.
pub mod metrics;

/// Page arithmetic and paginated access to a record dataset.
pub mod pagination;

/// Thread-safe bounded cache.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use cache::{BoundedCache, DiscardListener, FifoCache, LifoCache, LruCache, MruCache};
pub use policy::{EvictionPolicy, Fifo, Lifo, Lru, Mru, PolicyKind};
pub use store::RecordStore;

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentBoundedCache;
