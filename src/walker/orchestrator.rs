//! Walk orchestrator
//!
//! Starts walks without blocking the caller. Each walk gets its own counter,
//! signal and statistics, so concurrent walks over the same provider and
//! executor never share state.

use crate::executor::Executor;
use crate::namespace::NamespaceProvider;
use crate::walker::callback::EntryCallback;
use crate::walker::counter::OutstandingWork;
use crate::walker::signal::{CompletionSignal, WalkHandle};
use crate::walker::stats::WalkStats;
use crate::walker::task::{self, WalkContext};
use std::sync::Arc;
use tracing::{debug, info};

/// Asynchronous recursive walker over a namespace provider
#[derive(Clone)]
pub struct TreeWalker {
    provider: Arc<dyn NamespaceProvider>,
    executor: Arc<dyn Executor>,
}

impl TreeWalker {
    pub fn new(provider: Arc<dyn NamespaceProvider>, executor: Arc<dyn Executor>) -> Self {
        Self { provider, executor }
    }

    /// Begin walking the tree under `root`
    ///
    /// Returns immediately. `callback` runs once for every leaf, on whichever
    /// executor context listed the leaf's parent. The returned handle
    /// resolves once every directory has been listed, or to the first
    /// failure any task observes; failures do not stop tasks that are
    /// already scheduled.
    pub fn begin_walk<C>(&self, root: impl Into<String>, callback: C) -> WalkHandle
    where
        C: EntryCallback + 'static,
    {
        let root = root.into();
        let (signal, receiver) = CompletionSignal::new();
        let counter = Arc::new(OutstandingWork::new());
        let stats = Arc::new(WalkStats::new());

        let ctx = Arc::new(WalkContext {
            provider: Arc::clone(&self.provider),
            executor: Arc::clone(&self.executor),
            callback: Arc::new(callback),
            counter: Arc::clone(&counter),
            stats: Arc::clone(&stats),
            signal,
        });

        info!(root = %root, "Starting walk");

        // The root task's guard seeds the counter to one. A rejected root has
        // already resolved the signal to failure, so the handle reports it.
        if let Err(e) = task::submit(&ctx, root.clone()) {
            debug!(root = %root, error = %e, "Walk failed to start");
        }

        WalkHandle::new(root, receiver, counter, stats)
    }
}
