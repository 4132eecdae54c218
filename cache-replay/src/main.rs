use anyhow::Context;
use cache_replay::{compare, read_trace_file, replay, ReplayError};
use clap::{Parser, Subcommand};
use policy_cache::config::BoundedCacheConfig;
use policy_cache::PolicyKind;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Bounded cache trace replayer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace against one eviction policy
    Run {
        /// Eviction policy (fifo, lifo, mru, lru)
        #[arg(short, long, env = "CACHE_REPLAY_POLICY", default_value_t = PolicyKind::Lru)]
        policy: PolicyKind,

        /// Cache capacity (number of entries)
        #[arg(short, long, env = "CACHE_REPLAY_CAPACITY", default_value_t = default_capacity())]
        capacity: NonZeroUsize,

        /// CSV trace with an `op,key,value` header
        #[arg(short, long, value_name = "FILE")]
        trace: PathBuf,
    },

    /// Replay a trace against every eviction policy and summarize
    Compare {
        /// Cache capacity (number of entries)
        #[arg(short, long, env = "CACHE_REPLAY_CAPACITY", default_value_t = default_capacity())]
        capacity: NonZeroUsize,

        /// CSV trace with an `op,key,value` header
        #[arg(short, long, value_name = "FILE")]
        trace: PathBuf,
    },
}

fn default_capacity() -> NonZeroUsize {
    BoundedCacheConfig::default().capacity
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG=policy_cache::discard=info also shows the library's discard events
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Run {
            policy,
            capacity,
            trace,
        } => {
            let operations = read_trace_file(&trace)
                .with_context(|| format!("loading trace {}", trace.display()))?;
            let report = replay(policy, capacity, &operations);
            report.write_to(&mut out).map_err(ReplayError::from)?;
            info!(
                policy = %report.policy,
                evictions = report.evicted().count(),
                "replay finished"
            );
        }
        Commands::Compare { capacity, trace } => {
            let operations = read_trace_file(&trace)
                .with_context(|| format!("loading trace {}", trace.display()))?;
            writeln!(out, "Capacity: {} entries, {} operations", capacity, operations.len())?;
            for report in compare(capacity, &operations) {
                report.write_summary(&mut out).map_err(ReplayError::from)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
