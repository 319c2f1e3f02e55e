//! tree-walker - Asynchronous Concurrent Namespace Walker
//!
//! Walks a hierarchical storage namespace (directories and leaf entries)
//! without blocking the caller, invoking a callback for every leaf and
//! resolving a single handle once the whole tree has been listed.
//!
//! # Features
//!
//! - **Fan-out Scheduling**: One independently scheduled task per directory;
//!   concurrency scales with directories in flight, not call-stack depth.
//!
//! - **Last Task Out Resolves**: A shared outstanding-work counter and a
//!   one-shot completion signal give exactly one outcome per walk: success,
//!   or the first failure any task observed.
//!
//! - **Pluggable Backends**: Namespace providers and executors are traits;
//!   local filesystem and in-memory providers, a worker thread pool and a
//!   tokio executor are included.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tree_walker::executor::WorkerPool;
//! use tree_walker::namespace::LocalFsProvider;
//! use tree_walker::walker::{callback_fn, TreeWalker};
//!
//! let walker = TreeWalker::new(
//!     Arc::new(LocalFsProvider::new()),
//!     Arc::new(WorkerPool::new(8).unwrap()),
//! );
//!
//! let handle = walker.begin_walk("/data/warehouse", callback_fn(|entry, blocks| {
//!     println!("{} ({} blocks)", entry.path, blocks.len());
//!     Ok(())
//! }));
//!
//! handle.wait().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod namespace;
pub mod progress;
pub mod walker;

pub use config::{CliArgs, ExecutorKind, WalkConfig};
pub use error::{ProviderError, Result, WalkerError};
pub use executor::{Executor, TokioExecutor, WorkerPool};
pub use namespace::{BlockLocation, LocalFsProvider, MemoryProvider, NamespaceEntry, NamespaceProvider};
pub use walker::{callback_fn, EntryCallback, TreeWalker, WalkHandle};
