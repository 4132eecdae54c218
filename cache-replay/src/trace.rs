//! Trace input
//!
//! A trace is a CSV file with the header `op,key,value`:
//!
//! ```text
//! op,key,value
//! put,A,Hello
//! put,,orphan
//! get,A,
//! get,,
//! ```
//!
//! `op` is `put` or `get`. An empty `key` or `value` field means the argument
//! is absent. The `value` column of a `get` row is ignored and may be left out.
//! Lines starting with `#` are comments.

use crate::error::ReplayError;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One cache call from a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Put {
        key: Option<String>,
        value: Option<String>,
    },
    Get {
        key: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Op {
    #[serde(alias = "PUT", alias = "Put")]
    Put,
    #[serde(alias = "GET", alias = "Get")]
    Get,
}

#[derive(Debug, Deserialize)]
struct TraceRow {
    op: Op,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

impl From<TraceRow> for Operation {
    fn from(row: TraceRow) -> Self {
        match row.op {
            Op::Put => Operation::Put {
                key: row.key,
                value: row.value,
            },
            Op::Get => Operation::Get { key: row.key },
        }
    }
}

/// Parses a trace from any reader.
pub fn read_trace<R: Read>(reader: R) -> Result<Vec<Operation>, ReplayError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut operations = Vec::new();
    for row in reader.deserialize::<TraceRow>() {
        operations.push(Operation::from(row?));
    }
    Ok(operations)
}

/// Parses the trace stored at `path`.
pub fn read_trace_file<P: AsRef<Path>>(path: P) -> Result<Vec<Operation>, ReplayError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ReplayError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_trace(BufReader::new(file))
}
