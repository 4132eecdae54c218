//! Trace replay for bounded caches.
//!
//! A trace is a CSV file of `put`/`get` operations. Replaying it against a
//! policy yields the sequence of discard events and lookup results plus the
//! final cache contents, which makes the behaviour of each eviction policy
//! easy to compare on the same workload.

pub mod error;
pub mod runner;
pub mod trace;

pub use error::ReplayError;
pub use runner::{compare, replay, ReplayEvent, ReplayReport};
pub use trace::{read_trace, read_trace_file, Operation};
