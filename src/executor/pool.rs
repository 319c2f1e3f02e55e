//! Worker thread pool
//!
//! Each worker:
//! - Pulls jobs from a shared unbounded queue
//! - Runs them to completion, one at a time
//! - Survives panics raised by a job
//!
//! The queue is unbounded on purpose: walk tasks submit their children from
//! inside worker threads, and a bounded queue would let every worker block on
//! a full queue that only workers can drain.

use crate::error::{ExecutorError, RejectedJob};
use crate::executor::{Executor, Job};
use crossbeam_channel::{unbounded, Receiver, SendError, Sender};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Statistics collected by the pool
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Jobs accepted
    pub submitted: AtomicU64,

    /// Jobs that ran to completion (including panicked ones)
    pub completed: AtomicU64,

    /// Jobs that panicked
    pub panicked: AtomicU64,

    /// Workers currently running a job
    pub active: AtomicUsize,
}

impl PoolStats {
    fn record_submit(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_complete(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_panic(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of jobs accepted but not yet finished
    pub fn pending(&self) -> u64 {
        self.submitted
            .load(Ordering::Relaxed)
            .saturating_sub(self.completed.load(Ordering::Relaxed))
    }
}

/// RAII guard marking a worker as busy
struct ActiveGuard<'a> {
    stats: &'a PoolStats,
}

impl<'a> ActiveGuard<'a> {
    fn new(stats: &'a PoolStats) -> Self {
        stats.active.fetch_add(1, Ordering::SeqCst);
        Self { stats }
    }
}

impl<'a> Drop for ActiveGuard<'a> {
    fn drop(&mut self) {
        self.stats.active.fetch_sub(1, Ordering::SeqCst);
        self.stats.record_complete();
    }
}

/// Fixed-size pool of named worker threads
pub struct WorkerPool {
    /// Queue sender, `None` once shut down
    sender: RwLock<Option<Sender<Job>>>,

    /// Worker thread handles
    workers: Mutex<Vec<JoinHandle<()>>>,

    /// Number of workers spawned
    size: usize,

    /// Pool statistics
    stats: Arc<PoolStats>,
}

impl WorkerPool {
    /// Spawn a pool of `size` worker threads
    pub fn new(size: usize) -> Result<Self, ExecutorError> {
        let size = size.max(1);
        let (sender, receiver) = unbounded::<Job>();
        let stats = Arc::new(PoolStats::default());

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let stats = Arc::clone(&stats);
            let handle = thread::Builder::new()
                .name(format!("walker-{}", id))
                .spawn(move || worker_loop(id, receiver, stats))
                .map_err(|e| ExecutorError::SpawnFailed {
                    id,
                    reason: e.to_string(),
                })?;
            workers.push(handle);
        }

        debug!(workers = size, "Worker pool started");

        Ok(Self {
            sender: RwLock::new(Some(sender)),
            workers: Mutex::new(workers),
            size,
            stats,
        })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get pool statistics
    pub fn stats(&self) -> Arc<PoolStats> {
        Arc::clone(&self.stats)
    }

    /// Whether the pool still accepts jobs
    pub fn is_running(&self) -> bool {
        self.sender.read().is_some()
    }

    /// Stop accepting jobs, let queued jobs drain, and join the workers
    ///
    /// A worker calling this (directly or by dropping the last reference to
    /// the pool) is not joined.
    pub fn shutdown(&self) {
        if self.sender.write().take().is_none() {
            return;
        }

        let current = thread::current().id();
        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        for handle in workers {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                warn!("Worker thread terminated abnormally");
            }
        }

        debug!("Worker pool stopped");
    }
}

impl Executor for WorkerPool {
    fn execute(&self, job: Job) -> Result<(), RejectedJob> {
        let sender = self.sender.read();
        let Some(tx) = sender.as_ref() else {
            return Err(RejectedJob::new(job, "worker pool is shut down"));
        };

        tx.send(job)
            .map_err(|SendError(job)| RejectedJob::new(job, "worker pool queue disconnected"))?;
        self.stats.record_submit();
        Ok(())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Main worker loop
fn worker_loop(id: usize, receiver: Receiver<Job>, stats: Arc<PoolStats>) {
    debug!(worker = id, "Worker starting");

    while let Ok(job) = receiver.recv() {
        let _active = ActiveGuard::new(&stats);
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            stats.record_panic();
            warn!(worker = id, "Job panicked");
        }
    }

    debug!(worker = id, "Worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_pool_runs_jobs() {
        let pool = WorkerPool::new(4).unwrap();
        let (tx, rx) = mpsc::channel();

        for i in 0..100 {
            let tx = tx.clone();
            pool.execute(Box::new(move || tx.send(i).unwrap())).unwrap();
        }

        let mut seen: Vec<i32> = (0..100)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());

        pool.shutdown();
        assert_eq!(pool.stats().submitted.load(Ordering::Relaxed), 100);
        assert_eq!(pool.stats().pending(), 0);
    }

    #[test]
    fn test_pool_rejects_after_shutdown() {
        let pool = WorkerPool::new(1).unwrap();
        pool.shutdown();
        assert!(!pool.is_running());

        let rejected = pool.execute(Box::new(|| {})).unwrap_err();
        assert_eq!(rejected.reason, "worker pool is shut down");
        // Rejected job is handed back unrun
        (rejected.job)();
    }

    #[test]
    fn test_pool_survives_panicking_job() {
        let pool = WorkerPool::new(1).unwrap();
        pool.execute(Box::new(|| panic!("job failure"))).unwrap();

        let (tx, rx) = mpsc::channel();
        pool.execute(Box::new(move || tx.send(()).unwrap())).unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        pool.shutdown();
        assert_eq!(pool.stats().panicked.load(Ordering::Relaxed), 1);
        assert_eq!(pool.stats().completed.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_pool_drop_inside_worker_does_not_deadlock() {
        let pool = Arc::new(WorkerPool::new(2).unwrap());
        let (tx, rx) = mpsc::channel();

        let inner = Arc::clone(&pool);
        drop(pool);
        // Pool reference is released by the job itself
        let job_pool = Arc::clone(&inner);
        inner
            .execute(Box::new(move || {
                drop(job_pool);
                tx.send(()).unwrap();
            }))
            .unwrap();
        drop(inner);

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
}
