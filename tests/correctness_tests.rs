//! Correctness Tests for Eviction Policies
//!
//! This module validates the eviction behaviour of every policy using small,
//! predictable access patterns. Each test states which key must be evicted
//! when a put causes an eviction.
//!
//! ## Test Strategy
//! - The reference capacity of four entries
//! - Simple, deterministic access patterns
//! - Explicit checks of the evicted key and the resident set after each put

use policy_cache::config::{BoundedCacheConfig, MAX_ITEMS};
use policy_cache::metrics::CacheMetrics;
use policy_cache::policy::{EvictionPolicy, Fifo, Lifo, Lru, Mru, PolicyKind};
use policy_cache::{BoundedCache, RecordStore};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn make<P: EvictionPolicy>(policy: P) -> BoundedCache<&'static str, &'static str, P> {
    BoundedCache::init(BoundedCacheConfig::default(), policy, None)
}

/// Puts A..D, the reference fill.
fn fill<P: EvictionPolicy>(cache: &mut BoundedCache<&'static str, &'static str, P>) {
    for (k, v) in [("A", "Hello"), ("B", "World"), ("C", "Holberton"), ("D", "School")] {
        assert_eq!(cache.put(k, v), None);
    }
    assert_eq!(cache.len(), MAX_ITEMS);
}

fn resident<P: EvictionPolicy>(cache: &BoundedCache<&'static str, &'static str, P>) -> BTreeSet<&'static str> {
    cache.keys().copied().collect()
}

fn set(keys: &[&'static str]) -> BTreeSet<&'static str> {
    keys.iter().copied().collect()
}

// ============================================================================
// REFERENCE SCENARIOS
// ============================================================================

#[test]
fn test_fifo_reference_scenario() {
    let mut cache = make(Fifo);
    fill(&mut cache);
    assert_eq!(cache.put("E", "Battery"), Some(("A", "Hello")));
    assert_eq!(resident(&cache), set(&["B", "C", "D", "E"]));

    cache.put("C", "Street");
    assert_eq!(cache.put("F", "Mission"), Some(("B", "World")));
    assert_eq!(cache.put("G", "San Francisco"), Some(("C", "Street")));
    assert_eq!(resident(&cache), set(&["D", "E", "F", "G"]));
}

#[test]
fn test_lifo_reference_scenario() {
    let mut cache = make(Lifo);
    fill(&mut cache);
    assert_eq!(cache.put("E", "Battery"), Some(("D", "School")));
    assert_eq!(resident(&cache), set(&["A", "B", "C", "E"]));

    // Updating C makes it the newest key
    cache.put("C", "Street");
    assert_eq!(cache.put("F", "Mission"), Some(("C", "Street")));
    assert_eq!(cache.put("G", "San Francisco"), Some(("F", "Mission")));
    assert_eq!(resident(&cache), set(&["A", "B", "E", "G"]));
}

#[test]
fn test_mru_reference_scenario() {
    let mut cache = make(Mru);
    fill(&mut cache);
    assert_eq!(cache.get(&"A"), Some(&"Hello"));
    assert_eq!(cache.put("E", "Battery"), Some(("A", "Hello")));
    assert_eq!(resident(&cache), set(&["B", "C", "D", "E"]));

    cache.put("C", "Street");
    assert_eq!(cache.get(&"B"), Some(&"World"));
    assert_eq!(cache.put("F", "Mission"), Some(("B", "World")));
}

#[test]
fn test_lru_reference_scenario() {
    let mut cache = make(Lru);
    fill(&mut cache);
    assert_eq!(cache.get(&"A"), Some(&"Hello"));
    assert_eq!(cache.put("E", "Battery"), Some(("B", "World")));
    assert_eq!(resident(&cache), set(&["A", "C", "D", "E"]));

    cache.put("C", "Street");
    assert_eq!(cache.put("F", "Mission"), Some(("D", "School")));
    assert_eq!(cache.put("G", "San Francisco"), Some(("A", "Hello")));
    assert_eq!(resident(&cache), set(&["C", "E", "F", "G"]));
}

// ============================================================================
// INVARIANTS SHARED BY ALL POLICIES
// ============================================================================

#[test]
fn test_update_at_capacity_is_idempotent() {
    for kind in PolicyKind::ALL {
        let mut cache = make(kind);
        fill(&mut cache);
        let before = resident(&cache);
        assert_eq!(cache.put("B", "again"), None, "{kind}");
        assert_eq!(cache.put("B", "again"), None, "{kind}");
        assert_eq!(resident(&cache), before, "{kind}");
        assert_eq!(cache.peek(&"B"), Some(&"again"));
    }
}

#[test]
fn test_absent_input_is_noop() {
    for kind in PolicyKind::ALL {
        let mut cache = make(kind);
        fill(&mut cache);
        let before: Vec<_> = cache.keys().copied().collect();

        assert_eq!(cache.put_nullable(None, Some("x")), None);
        assert_eq!(cache.put_nullable(Some("Z"), None), None);
        assert_eq!(cache.put_nullable(None, None), None);
        assert_eq!(cache.get_nullable::<&str>(None), None);

        let after: Vec<_> = cache.keys().copied().collect();
        assert_eq!(before, after, "{kind}");
        assert_eq!(cache.core_metrics().evictions, 0);
    }
}

#[test]
fn test_unknown_key_get_is_a_miss() {
    for kind in PolicyKind::ALL {
        let mut cache = make(kind);
        fill(&mut cache);
        assert_eq!(cache.get(&"Z"), None);
        assert_eq!(cache.metrics().get("cache_misses"), Some(&1.0));
        assert_eq!(cache.len(), MAX_ITEMS);
    }
}

#[test]
fn test_exactly_one_eviction_per_overflowing_put() {
    for kind in PolicyKind::ALL {
        let mut cache = make(kind);
        fill(&mut cache);
        for (i, key) in ["E", "F", "G", "H", "I"].into_iter().enumerate() {
            assert!(cache.put(key, "v").is_some(), "{kind}");
            assert_eq!(cache.len(), MAX_ITEMS);
            assert_eq!(cache.core_metrics().evictions, i as u64 + 1);
        }
    }
}

#[test]
fn test_same_sequence_same_discards() {
    let trace = ["A", "B", "C", "A", "D", "E", "B", "F", "A", "G", "C"];
    for kind in PolicyKind::ALL {
        let run = || {
            let mut cache = make(kind);
            let mut discards = Vec::new();
            for (i, &key) in trace.iter().enumerate() {
                if i % 3 == 0 {
                    cache.get(&key);
                }
                if let Some((evicted, _)) = cache.put(key, "v") {
                    discards.push(evicted);
                }
            }
            (discards, cache.keys().copied().collect::<Vec<_>>())
        };
        assert_eq!(run(), run(), "{kind}");
    }
}

#[test]
fn test_listener_receives_every_discard_once() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut cache = make(Lifo);
    cache.set_discard_listener(move |k, _| sink.lock().unwrap().push(*k));
    fill(&mut cache);

    let mut returned = Vec::new();
    for key in ["E", "F", "G"] {
        if let Some((evicted, _)) = cache.put(key, "v") {
            returned.push(evicted);
        }
    }

    assert_eq!(returned, ["D", "E", "F"]);
    assert_eq!(*seen.lock().unwrap(), returned);
}

#[test]
fn test_runtime_policy_matches_static_policy() {
    let ops = ["A", "B", "C", "D", "B", "E", "A", "F", "C", "G"];
    for kind in PolicyKind::ALL {
        let mut dynamic = make(kind);
        let mut discards_dynamic = Vec::new();
        for key in ops {
            dynamic.get(&key);
            discards_dynamic.extend(dynamic.put(key, "v").map(|(k, _)| k));
        }

        let discards_static = match kind {
            PolicyKind::Fifo => run_static(Fifo, &ops),
            PolicyKind::Lifo => run_static(Lifo, &ops),
            PolicyKind::Mru => run_static(Mru, &ops),
            PolicyKind::Lru => run_static(Lru, &ops),
        };
        assert_eq!(discards_dynamic, discards_static, "{kind}");
    }
}

fn run_static<P: EvictionPolicy>(policy: P, ops: &[&'static str]) -> Vec<&'static str> {
    let mut cache = make(policy);
    let mut discards = Vec::new();
    for key in ops {
        cache.get(key);
        discards.extend(cache.put(*key, "v").map(|(k, _)| k));
    }
    discards
}

#[test]
fn test_print_cache() {
    let mut cache: BoundedCache<String, String, Fifo> = BoundedCache::default();
    cache.put("B".to_string(), "World".to_string());
    cache.put("A".to_string(), "Hello".to_string());
    cache.put("C".to_string(), "Holberton".to_string());
    assert_eq!(
        cache.to_string(),
        "Current cache:\nA: Hello\nB: World\nC: Holberton\n"
    );
}

#[test]
fn test_capacity_one() {
    for kind in PolicyKind::ALL {
        let mut cache = BoundedCache::new(NonZeroUsize::new(1).unwrap(), kind);
        assert_eq!(cache.put(1, 'a'), None);
        assert_eq!(cache.put(2, 'b'), Some((1, 'a')));
        assert_eq!(cache.get(&2), Some(&'b'));
        assert_eq!(cache.len(), 1);
    }
}

// ============================================================================
// BASIC CACHE
// ============================================================================

#[test]
fn test_basic_cache_has_no_limit() {
    let mut store = RecordStore::new();
    for (k, v) in [("A", "Hello"), ("B", "World"), ("C", "Holberton"), ("D", "School"), ("E", "Battery")] {
        store.put_nullable(Some(k), Some(v));
    }
    store.put_nullable(None, Some("ignored"));
    assert_eq!(store.len(), 5);
    assert_eq!(store.get_nullable(Some(&"E")), Some(&"Battery"));
    assert_eq!(store.get_nullable(Some(&"Z")), None);
}
