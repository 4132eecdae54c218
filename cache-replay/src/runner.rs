//! Replay runner
//!
//! Feeds a parsed trace through a [`BoundedCache`] and records what happened.

use crate::trace::Operation;
use policy_cache::metrics::CacheMetrics;
use policy_cache::{BoundedCache, PolicyKind};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use tracing::{debug, info};

/// Observable outcome of one trace operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayEvent {
    /// A `put` evicted `key`.
    Discard { key: String },
    /// A `get` returned `value` (`None` on a miss).
    Lookup {
        key: Option<String>,
        value: Option<String>,
    },
    /// A `put` with an absent key or value was ignored.
    Ignored,
}

/// Everything a replay produced for one policy.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub policy: PolicyKind,
    pub capacity: NonZeroUsize,
    pub events: Vec<ReplayEvent>,
    /// Resident entries in eviction order, front to back.
    pub resident: Vec<(String, String)>,
    /// The `Current cache:` dump of the final state.
    pub contents: String,
    pub metrics: BTreeMap<String, f64>,
}

impl ReplayReport {
    /// Evicted keys in eviction order.
    pub fn evicted(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().filter_map(|event| match event {
            ReplayEvent::Discard { key } => Some(key.as_str()),
            _ => None,
        })
    }

    /// Resident keys sorted alphabetically.
    pub fn resident_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.resident.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Writes one line per discard and lookup, then the final cache dump.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for event in &self.events {
            match event {
                ReplayEvent::Discard { key } => writeln!(out, "DISCARD: {key}")?,
                ReplayEvent::Lookup { value: Some(value), .. } => writeln!(out, "{value}")?,
                ReplayEvent::Lookup { value: None, .. } => writeln!(out, "None")?,
                ReplayEvent::Ignored => {}
            }
        }
        write!(out, "{}", self.contents)
    }

    /// Writes a one-line summary used when comparing policies.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let evicted: Vec<&str> = self.evicted().collect();
        let hit_rate = self.metrics.get("hit_rate").copied().unwrap_or(0.0);
        writeln!(
            out,
            "{:<5} evicted [{}] resident [{}] hit rate {:.2}",
            self.policy.to_string(),
            evicted.join(", "),
            self.resident_keys().join(", "),
            hit_rate
        )
    }
}

/// Replays `operations` against a fresh cache of `capacity` entries.
pub fn replay(policy: PolicyKind, capacity: NonZeroUsize, operations: &[Operation]) -> ReplayReport {
    info!(%policy, capacity = capacity.get(), operations = operations.len(), "replaying trace");

    let mut cache: BoundedCache<String, String, PolicyKind> = BoundedCache::new(capacity, policy);
    let mut events = Vec::with_capacity(operations.len());

    for operation in operations {
        match operation {
            Operation::Put { key, value } => {
                if key.is_none() || value.is_none() {
                    debug!(?key, ?value, "ignoring put with absent argument");
                    cache.put_nullable(key.clone(), value.clone());
                    events.push(ReplayEvent::Ignored);
                } else if let Some((evicted, _)) = cache.put_nullable(key.clone(), value.clone()) {
                    events.push(ReplayEvent::Discard { key: evicted });
                }
            }
            Operation::Get { key } => {
                let value = cache.get_nullable(key.as_deref()).cloned();
                events.push(ReplayEvent::Lookup {
                    key: key.clone(),
                    value,
                });
            }
        }
    }

    let resident = cache
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    ReplayReport {
        policy,
        capacity,
        events,
        resident,
        contents: cache.to_string(),
        metrics: cache.metrics(),
    }
}

/// Replays the same trace against every built-in policy.
pub fn compare(capacity: NonZeroUsize, operations: &[Operation]) -> Vec<ReplayReport> {
    PolicyKind::ALL
        .into_iter()
        .map(|policy| replay(policy, capacity, operations))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(key: &str, value: &str) -> Operation {
        Operation::Put {
            key: Some(key.to_string()),
            value: Some(value.to_string()),
        }
    }

    fn get(key: &str) -> Operation {
        Operation::Get {
            key: Some(key.to_string()),
        }
    }

    fn four() -> NonZeroUsize {
        NonZeroUsize::new(4).unwrap()
    }

    #[test]
    fn test_replay_reports_discards() {
        let ops = vec![
            put("A", "Hello"),
            put("B", "World"),
            put("C", "Holberton"),
            put("D", "School"),
            put("E", "Battery"),
        ];
        let report = replay(PolicyKind::Lifo, four(), &ops);
        assert_eq!(report.evicted().collect::<Vec<_>>(), ["D"]);
        assert_eq!(report.resident_keys(), ["A", "B", "C", "E"]);
    }

    #[test]
    fn test_ignored_and_missing() {
        let ops = vec![
            Operation::Put {
                key: None,
                value: Some("x".to_string()),
            },
            Operation::Get { key: None },
            get("nope"),
        ];
        let report = replay(PolicyKind::Fifo, four(), &ops);
        assert_eq!(report.events[0], ReplayEvent::Ignored);
        assert_eq!(
            report.events[1],
            ReplayEvent::Lookup {
                key: None,
                value: None
            }
        );
        assert!(report.resident.is_empty());
        assert_eq!(report.metrics.get("ignored_puts"), Some(&1.0));
    }

    #[test]
    fn test_write_to_output() {
        let ops = vec![put("B", "World"), put("A", "Hello"), get("A"), get("Z")];
        let report = replay(PolicyKind::Lru, four(), &ops);
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Hello\nNone\nCurrent cache:\nA: Hello\nB: World\n"
        );
    }

    #[test]
    fn test_compare_runs_every_policy() {
        let ops = vec![
            put("A", "1"),
            put("B", "2"),
            put("C", "3"),
            put("D", "4"),
            get("A"),
            put("E", "5"),
        ];
        let reports = compare(four(), &ops);
        let victims: Vec<(PolicyKind, Vec<&str>)> = reports
            .iter()
            .map(|r| (r.policy, r.evicted().collect()))
            .collect();
        assert_eq!(
            victims,
            vec![
                (PolicyKind::Fifo, vec!["A"]),
                (PolicyKind::Lifo, vec!["D"]),
                (PolicyKind::Mru, vec!["A"]),
                (PolicyKind::Lru, vec!["B"]),
            ]
        );
    }
}
