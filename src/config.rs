//! Configuration types for tree-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use crate::namespace::local::DEFAULT_BLOCK_SIZE;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Smallest block size accepted for block descriptors
const MIN_BLOCK_SIZE: u64 = 4096;

/// Concurrent recursive walker for local directory trees
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tree-walker",
    version,
    about = "Concurrent recursive walker for directory trees",
    long_about = "Walks a directory tree with one listing task per directory, reporting every \
                  leaf entry with its block layout.\n\n\
                  The walk stops reporting at the first failure, but directories that were \
                  already scheduled are still listed.",
    after_help = "EXAMPLES:\n    \
        tree-walker /data/warehouse\n    \
        tree-walker /data/warehouse -w 32 --list\n    \
        tree-walker /data/warehouse --executor tokio --block-size 67108864"
)]
pub struct CliArgs {
    /// Root directory to walk
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Number of worker threads
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Execution backend for listing tasks
    #[arg(long, value_enum, default_value_t = ExecutorKind::Threads)]
    pub executor: ExecutorKind,

    /// Block size used to describe file layout (bytes)
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE, value_name = "BYTES")]
    pub block_size: u64,

    /// Print every leaf entry
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Execution backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutorKind {
    /// Dedicated worker thread pool
    Threads,
    /// Blocking pool of a tokio runtime
    Tokio,
}

fn default_workers() -> usize {
    // Listing is I/O bound
    num_cpus::get() * 2
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Root path to walk
    pub root: String,

    /// Number of worker threads
    pub worker_count: usize,

    /// Execution backend
    pub executor: ExecutorKind,

    /// Block size for leaf block descriptors
    pub block_size: u64,

    /// Print every leaf
    pub list_entries: bool,

    /// Show progress indicator
    pub show_progress: bool,
}

impl WalkConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        if args.block_size < MIN_BLOCK_SIZE {
            return Err(ConfigError::InvalidBlockSize {
                size: args.block_size,
                min: MIN_BLOCK_SIZE,
            });
        }

        Ok(Self {
            root: args.root.to_string_lossy().into_owned(),
            worker_count: args.workers,
            executor: args.executor,
            block_size: args.block_size,
            list_entries: args.list,
            // Listing every leaf and a spinner on the same terminal garble each other
            show_progress: !args.quiet && !args.list,
        })
    }
}
