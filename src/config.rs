//! Cache Configuration Module
//!
//! Configuration structs have all public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: Capacity is a `NonZeroUsize`, so an empty cache cannot be configured
//! - **No boilerplate**: `Default` gives the reference capacity of [`MAX_ITEMS`]
//!
//! The capacity of a cache is fixed once the cache is built.
//!
//! # Examples
//!
//! ```
//! use policy_cache::config::{BoundedCacheConfig, MAX_ITEMS};
//! use policy_cache::policy::Fifo;
//! use policy_cache::BoundedCache;
//! use core::num::NonZeroUsize;
//!
//! // Reference capacity
//! let config = BoundedCacheConfig::default();
//! assert_eq!(config.capacity.get(), MAX_ITEMS);
//!
//! // Explicit capacity
//! let config = BoundedCacheConfig {
//!     capacity: NonZeroUsize::new(128).unwrap(),
//! };
//! let cache: BoundedCache<String, i32, Fifo> = BoundedCache::init(config, Fifo, None);
//! assert_eq!(cache.cap().get(), 128);
//! ```

use core::fmt;
use core::num::NonZeroUsize;

/// Reference item limit for a bounded cache.
pub const MAX_ITEMS: usize = 4;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(MAX_ITEMS) {
    Some(cap) => cap,
    None => panic!("MAX_ITEMS must be non-zero"),
};

/// Configuration for a [`BoundedCache`](crate::BoundedCache) or
/// [`ConcurrentBoundedCache`](crate::concurrent::ConcurrentBoundedCache).
///
/// # Fields
///
/// - `capacity`: Maximum number of resident entries. Inserting a new key into
///   a cache holding `capacity` entries evicts exactly one entry first.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BoundedCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl Default for BoundedCacheConfig {
    fn default() -> Self {
        BoundedCacheConfig {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl fmt::Debug for BoundedCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_max_items() {
        let config = BoundedCacheConfig::default();
        assert_eq!(config.capacity.get(), MAX_ITEMS);
        assert_eq!(MAX_ITEMS, 4);
    }

    #[test]
    fn test_config_creation() {
        let config = BoundedCacheConfig {
            capacity: NonZeroUsize::new(1000).unwrap(),
        };
        assert_eq!(config.capacity.get(), 1000);
    }
}
