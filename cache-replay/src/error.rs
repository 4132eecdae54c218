use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or replaying a trace.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot open trace {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed trace: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}
