//! tree-walker - Concurrent Recursive Directory Walker
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tree_walker::config::{CliArgs, ExecutorKind, WalkConfig};
use tree_walker::executor::{Executor, TokioExecutor, WorkerPool};
use tree_walker::namespace::LocalFsProvider;
use tree_walker::progress::{print_header, print_summary, ProgressReporter};
use tree_walker::walker::{callback_fn, TreeWalker};

/// How often the spinner is refreshed
const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    setup_logging(args.verbose)?;

    let config = WalkConfig::from_args(args).context("Invalid configuration")?;

    if config.show_progress {
        print_header(&config.root, config.worker_count, executor_name(config.executor));
    }

    // The tokio backend runs listings on the blocking pool, so that pool is
    // what gets sized by --workers.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.worker_count)
        .build()
        .context("Failed to create async runtime")?;

    let executor: Arc<dyn Executor> = match config.executor {
        ExecutorKind::Threads => Arc::new(
            WorkerPool::new(config.worker_count).context("Failed to start worker pool")?,
        ),
        ExecutorKind::Tokio => Arc::new(TokioExecutor::new(runtime.handle().clone())),
    };

    let provider = Arc::new(LocalFsProvider::with_block_size(config.block_size));
    let walker = TreeWalker::new(provider, executor);

    runtime.block_on(walk(&walker, &config))
}

async fn walk(walker: &TreeWalker, config: &WalkConfig) -> Result<()> {
    let list_entries = config.list_entries;
    let mut handle = walker.begin_walk(
        config.root.clone(),
        callback_fn(move |entry, blocks| {
            if list_entries {
                println!("{}\t{}\t{}", entry.path, entry.len, blocks.len());
            }
            Ok(())
        }),
    );

    let progress = config.show_progress.then(ProgressReporter::new);
    if let Some(ref p) = progress {
        p.set_status("Listing root...");
    }

    let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
    let outcome = loop {
        tokio::select! {
            outcome = &mut handle => break outcome,
            _ = ticker.tick() => {
                if let Some(ref p) = progress {
                    p.update(&handle.progress());
                }
            }
        }
    };

    let snapshot = handle.progress();

    if let Some(ref p) = progress {
        match outcome {
            Ok(()) => p.finish("Walk completed"),
            Err(_) => p.finish("Walk failed"),
        }
    }

    if config.show_progress || outcome.is_err() {
        let message = outcome.as_ref().err().map(|e| e.to_string());
        print_summary(&snapshot, message.as_deref());
    }

    outcome.with_context(|| format!("Walk of '{}' failed", config.root))?;

    info!(
        dirs = snapshot.dirs,
        leaves = snapshot.leaves,
        elapsed_ms = snapshot.elapsed.as_millis() as u64,
        "Walk finished"
    );

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("tree_walker=debug,warn")
    } else {
        EnvFilter::new("tree_walker=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn executor_name(kind: ExecutorKind) -> &'static str {
    match kind {
        ExecutorKind::Threads => "thread pool",
        ExecutorKind::Tokio => "tokio blocking pool",
    }
}
