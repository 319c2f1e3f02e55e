//! Tokio-backed executor
//!
//! Listing and callbacks are blocking, so every job goes to the runtime's
//! blocking thread pool rather than onto an async worker.

use crate::error::RejectedJob;
use crate::executor::{Executor, Job};
use tokio::runtime::Handle;

/// Runs jobs with `spawn_blocking` on a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Executor for the runtime the caller is running on
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, job: Job) -> Result<(), RejectedJob> {
        // A runtime that is shutting down drops the job unrun; the walk then
        // observes it as abandoned.
        drop(self.handle.spawn_blocking(job));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tokio_executor_runs_job() {
        let executor = TokioExecutor::current();
        let (tx, rx) = oneshot::channel();
        executor
            .execute(Box::new(move || {
                let _ = tx.send(std::thread::current().name().map(str::to_string));
            }))
            .unwrap();
        assert!(rx.await.is_ok());
    }
}
