//! Namespace access module
//!
//! A namespace provider lists the children of one directory as a lazy,
//! finite, non-restartable sequence. The walker never caches or replays a
//! listing; each directory is listed exactly once per walk.
//!
//! # Providers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 NamespaceProvider                    │
//! │  list(path) -> Iterator<Item = Result<Entry>>        │
//! └──────────────┬──────────────────────┬───────────────┘
//!                │                      │
//!                ▼                      ▼
//! ┌──────────────────────────┐ ┌──────────────────────────┐
//! │      LocalFsProvider     │ │      MemoryProvider      │
//! │  - std::fs::read_dir     │ │  - deterministic tree    │
//! │  - symlinks not followed │ │  - fault injection       │
//! └──────────────────────────┘ └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use tree_walker::namespace::{LocalFsProvider, NamespaceProvider};
//!
//! let provider = LocalFsProvider::new();
//! for entry in provider.list("/data").unwrap() {
//!     let entry = entry.unwrap();
//!     println!("{} dir={}", entry.path, entry.is_dir());
//! }
//! ```

pub mod local;
pub mod memory;
pub mod types;

use crate::error::ProviderResult;

pub use local::LocalFsProvider;
pub use memory::{Fault, MemoryProvider, MemoryProviderBuilder};
pub use types::{join_path, BlockLocation, EntryType, NamespaceEntry};

/// Lazy sequence of entries produced by one listing
pub type EntryIter<'a> = Box<dyn Iterator<Item = ProviderResult<NamespaceEntry>> + Send + 'a>;

/// Storage backend that lists a directory's children
pub trait NamespaceProvider: Send + Sync {
    /// List the children of `path`
    ///
    /// Fails with [`ProviderError::NotFound`](crate::error::ProviderError::NotFound)
    /// if `path` does not exist. Iteration may fail part-way through.
    fn list(&self, path: &str) -> ProviderResult<EntryIter<'_>>;
}
