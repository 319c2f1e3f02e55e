//! Execution capability
//!
//! The walker hands every directory listing to an [`Executor`] as an
//! independent job. Executors give no ordering guarantee between
//! submissions, and any back-pressure is their own concern.
//!
//! - [`WorkerPool`]: fixed set of OS threads fed by an unbounded channel
//! - [`TokioExecutor`]: `spawn_blocking` on a tokio runtime

pub mod pool;
pub mod runtime;

use crate::error::RejectedJob;

pub use pool::{PoolStats, WorkerPool};
pub use runtime::TokioExecutor;

/// Unit of work accepted by an executor
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs at an unspecified future time on an unspecified context
pub trait Executor: Send + Sync {
    /// Submit a job
    ///
    /// On rejection the job is returned inside the error, unrun.
    fn execute(&self, job: Job) -> Result<(), RejectedJob>;
}
