//! Per-directory listing task
//!
//! Each task:
//! - Lists one directory through the namespace provider
//! - Hands leaves to the callback, in provider order
//! - Schedules one new task per subdirectory
//! - Releases its unit of outstanding work on every exit path
//!
//! A [`WorkGuard`] is the unit of outstanding work. The parent creates the
//! child's guard (incrementing the counter) before submitting the child job,
//! and the guard travels inside that job. Since the parent still holds its
//! own guard at that point, the counter cannot reach zero while the child is
//! pending.

use crate::error::{
    classify_callback_error, classify_panic, classify_provider_error, Result, WalkerError,
};
use crate::executor::{Executor, Job};
use crate::namespace::NamespaceProvider;
use crate::walker::callback::EntryCallback;
use crate::walker::counter::OutstandingWork;
use crate::walker::signal::CompletionSignal;
use crate::walker::stats::WalkStats;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, trace, warn};

/// State shared by every task of one walk
pub(crate) struct WalkContext {
    pub(crate) provider: Arc<dyn NamespaceProvider>,
    pub(crate) executor: Arc<dyn Executor>,
    pub(crate) callback: Arc<dyn EntryCallback>,
    pub(crate) counter: Arc<OutstandingWork>,
    pub(crate) stats: Arc<WalkStats>,
    pub(crate) signal: CompletionSignal,
}

/// RAII guard for one unit of outstanding work
pub(crate) struct WorkGuard {
    ctx: Arc<WalkContext>,
    path: String,
    started: bool,
}

impl WorkGuard {
    /// Create a guard (increments the counter)
    fn new(ctx: &Arc<WalkContext>, path: String) -> Self {
        ctx.counter.increment();
        Self {
            ctx: Arc::clone(ctx),
            path,
            started: false,
        }
    }
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if !self.started {
            // Dropped by the executor without running
            self.ctx.signal.fail(WalkerError::Abandoned {
                path: std::mem::take(&mut self.path),
            });
        }

        if self.ctx.counter.decrement_and_check_zero() && self.ctx.signal.succeed() {
            let stats = &self.ctx.stats;
            info!(
                dirs = stats.listings.load(Ordering::Relaxed),
                leaves = stats.leaves.load(Ordering::Relaxed),
                duration_ms = stats.elapsed().as_millis() as u64,
                "Walk completed"
            );
        }
    }
}

/// Schedule a listing task for `path`
///
/// On rejection the walk is failed before the rejected job releases its unit
/// of work, so a rejected root never reads as an empty successful walk.
pub(crate) fn submit(ctx: &Arc<WalkContext>, path: String) -> Result<()> {
    let guard = WorkGuard::new(ctx, path.clone());
    let job: Job = Box::new(move || run(guard));

    match ctx.executor.execute(job) {
        Ok(()) => Ok(()),
        Err(rejected) => {
            warn!(path = %path, reason = rejected.reason, "Listing task rejected");
            ctx.signal.fail(WalkerError::Rejected { path: path.clone() });
            drop(rejected);
            Err(WalkerError::Rejected { path })
        }
    }
}

/// Task body: list, then resolve failure, then release the unit of work
fn run(mut guard: WorkGuard) {
    guard.started = true;
    let ctx = Arc::clone(&guard.ctx);
    let path = guard.path.as_str();

    let outcome = catch_unwind(AssertUnwindSafe(|| list_directory(&ctx, path)))
        .unwrap_or_else(|payload| Err(classify_panic(path, payload)));

    if let Err(err) = outcome {
        ctx.stats.record_failure();
        ctx.signal.fail(err);
    }

    drop(guard);
}

fn list_directory(ctx: &Arc<WalkContext>, path: &str) -> Result<()> {
    ctx.stats.record_listing();
    let entries = ctx
        .provider
        .list(path)
        .map_err(|e| classify_provider_error(path, e))?;

    let mut leaves = 0usize;
    let mut subdirs = 0usize;

    for entry in entries {
        let entry = entry.map_err(|e| classify_provider_error(path, e))?;

        if entry.is_dir() {
            trace!(path = %entry.path, "Scheduling subdirectory");
            subdirs += 1;
            submit(ctx, entry.path)?;
        } else {
            ctx.callback
                .process(&entry, entry.block_locations())
                .map_err(|e| classify_callback_error(path, e))?;
            ctx.stats.record_leaf(entry.len);
            leaves += 1;
        }
    }

    trace!(path = %path, leaves = leaves, subdirs = subdirs, "Directory listed");
    Ok(())
}
