//! Completion signal and walk handle
//!
//! The signal is resolved at most once. The winner is decided by a single
//! compare-and-swap; only the winning caller touches the result channel, so
//! racing resolutions never contend on a lock and never double-resolve.

use crate::error::{Result, WalkerError};
use crate::walker::counter::OutstandingWork;
use crate::walker::stats::{WalkProgress, WalkStats};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// One-shot result cell shared by every task of a walk
#[derive(Debug)]
pub struct CompletionSignal {
    resolved: AtomicBool,
    sender: Mutex<Option<oneshot::Sender<Result<()>>>>,
}

impl CompletionSignal {
    /// Create an unresolved signal and the receiving end of its result
    pub fn new() -> (Self, oneshot::Receiver<Result<()>>) {
        let (tx, rx) = oneshot::channel();
        let signal = Self {
            resolved: AtomicBool::new(false),
            sender: Mutex::new(Some(tx)),
        };
        (signal, rx)
    }

    /// Resolve to success; returns false if already resolved
    pub fn succeed(&self) -> bool {
        self.resolve(Ok(()))
    }

    /// Resolve to failure; returns false if already resolved
    pub fn fail(&self, error: WalkerError) -> bool {
        self.resolve(Err(error))
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }

    fn resolve(&self, outcome: Result<()>) -> bool {
        if self
            .resolved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        if let Err(ref e) = outcome {
            debug!(error = %e, "Walk resolved to failure");
        }

        if let Some(tx) = self.sender.lock().take() {
            // The handle may already be gone; the walk still counts as resolved
            let _ = tx.send(outcome);
        }
        true
    }
}

/// Handle to the eventual outcome of one walk
///
/// Resolves to `Ok(())` once every directory was listed, or to the first
/// failure observed by any task. Dropping the handle does not stop the walk.
///
/// The outcome is yielded once. Polling, waiting on or chaining a handle that
/// already yielded it gives [`WalkerError::OutcomeTaken`].
#[derive(Debug)]
pub struct WalkHandle {
    root: String,
    receiver: Option<oneshot::Receiver<Result<()>>>,
    counter: Arc<OutstandingWork>,
    stats: Arc<WalkStats>,
}

impl WalkHandle {
    pub(crate) fn new(
        root: String,
        receiver: oneshot::Receiver<Result<()>>,
        counter: Arc<OutstandingWork>,
        stats: Arc<WalkStats>,
    ) -> Self {
        Self {
            root,
            receiver: Some(receiver),
            counter,
            stats,
        }
    }

    /// Root path of the walk
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Live statistics for the walk
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Listing tasks currently scheduled or running
    pub fn outstanding(&self) -> usize {
        self.counter.get()
    }

    /// Snapshot of walk progress
    pub fn progress(&self) -> WalkProgress {
        self.stats.snapshot(self.counter.get())
    }

    /// Block the current thread until the walk resolves
    ///
    /// Panics if called from within an asynchronous execution context; await
    /// the handle there instead.
    pub fn wait(self) -> Result<()> {
        let root = self.root;
        match self.receiver {
            Some(receiver) => receiver
                .blocking_recv()
                .unwrap_or(Err(WalkerError::Abandoned { path: root })),
            None => Err(WalkerError::OutcomeTaken { path: root }),
        }
    }

    /// Run `f` with the outcome once the walk resolves
    pub fn on_complete<F>(self, runtime: &Handle, f: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        runtime.spawn(async move { f(self.await) })
    }
}

impl Future for WalkHandle {
    type Output = Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(receiver) = this.receiver.as_mut() else {
            return Poll::Ready(Err(WalkerError::OutcomeTaken {
                path: this.root.clone(),
            }));
        };

        let received = match Pin::new(receiver).poll(cx) {
            Poll::Ready(received) => received,
            Poll::Pending => return Poll::Pending,
        };
        this.receiver = None;

        Poll::Ready(received.unwrap_or_else(|_| {
            Err(WalkerError::Abandoned {
                path: this.root.clone(),
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_first_resolution_wins() {
        let (signal, rx) = CompletionSignal::new();
        assert!(!signal.is_resolved());

        assert!(signal.fail(WalkerError::NotFound { path: "/a".into() }));
        assert!(!signal.succeed());
        assert!(!signal.fail(WalkerError::NotFound { path: "/b".into() }));
        assert!(signal.is_resolved());

        let outcome = rx.blocking_recv().unwrap();
        assert!(outcome.unwrap_err().is_not_found_at("/a"));
    }

    #[test]
    fn test_racing_resolutions_resolve_once() {
        for _ in 0..200 {
            let (signal, rx) = CompletionSignal::new();
            let signal = Arc::new(signal);
            let barrier = Arc::new(Barrier::new(2));

            let success = {
                let signal = Arc::clone(&signal);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    signal.succeed()
                })
            };
            let failure = {
                let signal = Arc::clone(&signal);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    signal.fail(WalkerError::Runtime {
                        path: "/x".into(),
                        message: "boom".into(),
                    })
                })
            };

            let success_won = success.join().unwrap();
            let failure_won = failure.join().unwrap();
            assert!(success_won ^ failure_won);

            let outcome = rx.blocking_recv().unwrap();
            assert_eq!(outcome.is_ok(), success_won);
        }
    }

    #[test]
    fn test_resolve_after_handle_dropped() {
        let (signal, rx) = CompletionSignal::new();
        drop(rx);
        assert!(signal.succeed());
        assert!(!signal.succeed());
    }

    #[test]
    fn test_dropped_signal_reports_abandoned() {
        let (signal, rx) = CompletionSignal::new();
        let handle = WalkHandle::new(
            "/root".into(),
            rx,
            Arc::new(OutstandingWork::new()),
            Arc::new(WalkStats::new()),
        );
        drop(signal);
        match handle.wait() {
            Err(WalkerError::Abandoned { path }) => assert_eq!(path, "/root"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_is_awaitable() {
        let (signal, rx) = CompletionSignal::new();
        let handle = WalkHandle::new(
            "/root".into(),
            rx,
            Arc::new(OutstandingWork::new()),
            Arc::new(WalkStats::new()),
        );
        signal.succeed();
        assert!(handle.await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_on_complete_runs_follow_up() {
        let (signal, rx) = CompletionSignal::new();
        let handle = WalkHandle::new(
            "/root".into(),
            rx,
            Arc::new(OutstandingWork::new()),
            Arc::new(WalkStats::new()),
        );
        let (tx, done) = oneshot::channel();
        let join = handle.on_complete(&Handle::current(), move |outcome| {
            let _ = tx.send(outcome.is_err());
        });

        signal.fail(WalkerError::NotFound { path: "/root".into() });
        assert!(done.await.unwrap());
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_yields_outcome_once() {
        let (signal, rx) = CompletionSignal::new();
        let mut handle = WalkHandle::new(
            "/root".into(),
            rx,
            Arc::new(OutstandingWork::new()),
            Arc::new(WalkStats::new()),
        );
        signal.succeed();

        assert!((&mut handle).await.is_ok());
        match (&mut handle).await {
            Err(WalkerError::OutcomeTaken { path }) => assert_eq!(path, "/root"),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let waited = tokio::task::spawn_blocking(move || handle.wait())
            .await
            .unwrap();
        assert!(matches!(waited, Err(WalkerError::OutcomeTaken { .. })));
    }
}
