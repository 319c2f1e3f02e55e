//! In-memory namespace provider
//!
//! A deterministic tree whose listings yield entries in insertion order.
//! Faults can be attached to individual paths to exercise failure handling,
//! and every listing call is counted per path.

use crate::error::{ProviderError, ProviderResult};
use crate::namespace::types::{BlockLocation, NamespaceEntry};
use crate::namespace::{EntryIter, NamespaceProvider};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Host name reported for every in-memory block
const MEMORY_HOST: &str = "memory";

/// Default block size for in-memory files
const DEFAULT_BLOCK_SIZE: u64 = 64 * 1024 * 1024;

/// Failure injected into the listing of one path
#[derive(Debug, Clone)]
pub enum Fault {
    /// Listing fails as if the path did not exist
    NotFound,
    /// Listing fails with an I/O error of this kind
    Io(io::ErrorKind),
    /// Listing fails with a provider-specific error
    Other(String),
    /// Listing yields this many entries, then fails with an I/O error
    FailAfter { entries: usize, kind: io::ErrorKind },
    /// Listing sleeps before producing entries
    Delay(Duration),
    /// Listing panics
    Panic(String),
}

/// Builder for [`MemoryProvider`]
///
/// Paths are absolute and `/`-separated. Adding a file or directory
/// registers every missing ancestor directory as well.
#[derive(Debug, Default)]
pub struct MemoryProviderBuilder {
    listings: HashMap<String, Vec<NamespaceEntry>>,
    faults: HashMap<String, Fault>,
    block_size: Option<u64>,
}

impl MemoryProviderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block size used to describe file placement
    pub fn block_size(mut self, block_size: u64) -> Self {
        self.block_size = Some(block_size.max(1));
        self
    }

    /// Add an (initially empty) directory
    pub fn dir(mut self, path: &str) -> Self {
        self.ensure_dir(path);
        self
    }

    /// Add a file of `len` bytes
    pub fn file(mut self, path: &str, len: u64) -> Self {
        let block_size = self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        let blocks = BlockLocation::split(len, block_size, &[MEMORY_HOST.to_string()]);
        self.add_child(NamespaceEntry::file(path, len, blocks));
        self
    }

    /// Add a directory entry to its parent without a listing of its own
    ///
    /// Walking into it fails with not-found, like a directory removed
    /// between the parent's listing and its own.
    pub fn dangling_dir(mut self, path: &str) -> Self {
        self.add_child(NamespaceEntry::directory(path));
        self
    }

    /// Attach a fault to the listing of `path`
    pub fn fault(mut self, path: &str, fault: Fault) -> Self {
        self.faults.insert(path.to_string(), fault);
        self
    }

    pub fn build(self) -> MemoryProvider {
        MemoryProvider {
            listings: self.listings,
            faults: self.faults,
            calls: Mutex::new(HashMap::new()),
            total_calls: AtomicUsize::new(0),
        }
    }

    fn ensure_dir(&mut self, path: &str) {
        if self.listings.contains_key(path) {
            return;
        }
        self.listings.insert(path.to_string(), Vec::new());
        if let Some(parent) = parent_of(path) {
            self.ensure_dir(parent);
            if let Some(siblings) = self.listings.get_mut(parent) {
                siblings.push(NamespaceEntry::directory(path));
            }
        }
    }

    fn add_child(&mut self, entry: NamespaceEntry) {
        let Some(parent) = parent_of(&entry.path).map(str::to_string) else {
            return;
        };
        self.ensure_dir(&parent);
        if let Some(siblings) = self.listings.get_mut(&parent) {
            siblings.push(entry);
        }
    }
}

/// Deterministic in-memory namespace
#[derive(Debug)]
pub struct MemoryProvider {
    listings: HashMap<String, Vec<NamespaceEntry>>,
    faults: HashMap<String, Fault>,
    calls: Mutex<HashMap<String, usize>>,
    total_calls: AtomicUsize,
}

impl MemoryProvider {
    pub fn builder() -> MemoryProviderBuilder {
        MemoryProviderBuilder::new()
    }

    /// Number of times `path` was listed
    pub fn listing_count(&self, path: &str) -> usize {
        self.calls.lock().get(path).copied().unwrap_or(0)
    }

    /// Total number of listing calls across all paths
    pub fn total_listings(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    /// Number of directories that have a listing
    pub fn directory_count(&self) -> usize {
        self.listings.len()
    }

    fn record_call(&self, path: &str) {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().entry(path.to_string()).or_insert(0) += 1;
    }
}

impl NamespaceProvider for MemoryProvider {
    fn list(&self, path: &str) -> ProviderResult<EntryIter<'_>> {
        self.record_call(path);

        let mut fail_after = None;
        match self.faults.get(path) {
            Some(Fault::NotFound) => {
                return Err(ProviderError::NotFound {
                    path: path.to_string(),
                })
            }
            Some(Fault::Io(kind)) => {
                return Err(ProviderError::Io(io::Error::new(
                    *kind,
                    format!("injected failure listing '{}'", path),
                )))
            }
            Some(Fault::Other(message)) => return Err(ProviderError::Other(message.clone())),
            Some(Fault::Panic(message)) => panic!("{}", message),
            Some(Fault::Delay(delay)) => thread::sleep(*delay),
            Some(Fault::FailAfter { entries, kind }) => fail_after = Some((*entries, *kind)),
            None => {}
        }

        let entries = self
            .listings
            .get(path)
            .ok_or_else(|| ProviderError::NotFound {
                path: path.to_string(),
            })?;

        match fail_after {
            None => Ok(Box::new(entries.iter().cloned().map(Ok::<_, ProviderError>))),
            Some((count, kind)) => {
                let failure = io::Error::new(kind, format!("injected failure iterating '{}'", path));
                Ok(Box::new(
                    entries
                        .iter()
                        .take(count)
                        .cloned()
                        .map(Ok)
                        .chain(std::iter::once(Err(ProviderError::Io(failure)))),
                ))
            }
        }
    }
}

/// Parent of an absolute path, `None` for `/` and relative names
fn parent_of(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) if trimmed.len() > 1 => Some("/"),
        Some(0) => None,
        Some(idx) => Some(&trimmed[..idx]),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(provider: &MemoryProvider, path: &str) -> Vec<String> {
        provider
            .list(path)
            .unwrap()
            .map(|e| e.unwrap().path)
            .collect()
    }

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of("/a/b"), Some("/a"));
        assert_eq!(parent_of("/a"), Some("/"));
        assert_eq!(parent_of("/"), None);
        assert_eq!(parent_of("a"), None);
    }

    #[test]
    fn test_builder_preserves_insertion_order() {
        let provider = MemoryProvider::builder()
            .file("/t/b", 1)
            .dir("/t/d")
            .file("/t/a", 1)
            .file("/t/d/x", 1)
            .build();

        assert_eq!(names(&provider, "/t"), vec!["/t/b", "/t/d", "/t/a"]);
        assert_eq!(names(&provider, "/t/d"), vec!["/t/d/x"]);
        assert_eq!(provider.listing_count("/t"), 1);
        assert_eq!(provider.total_listings(), 2);
    }

    #[test]
    fn test_missing_and_dangling() {
        let provider = MemoryProvider::builder().dangling_dir("/t/gone").build();
        let listed = names(&provider, "/t");
        assert_eq!(listed, vec!["/t/gone"]);
        assert!(matches!(
            provider.list("/t/gone"),
            Err(ProviderError::NotFound { .. })
        ));
        assert!(matches!(
            provider.list("/nope"),
            Err(ProviderError::NotFound { .. })
        ));
    }

    #[test]
    fn test_fail_after() {
        let provider = MemoryProvider::builder()
            .file("/t/a", 1)
            .file("/t/b", 1)
            .fault(
                "/t",
                Fault::FailAfter {
                    entries: 1,
                    kind: io::ErrorKind::BrokenPipe,
                },
            )
            .build();

        let results: Vec<_> = provider.list("/t").unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ProviderError::Io(_))));
    }

    #[test]
    fn test_file_blocks() {
        let provider = MemoryProvider::builder()
            .block_size(10)
            .file("/t/f", 25)
            .build();
        let entry = provider.list("/t").unwrap().next().unwrap().unwrap();
        assert_eq!(entry.blocks.len(), 3);
        assert_eq!(entry.blocks[0].hosts, vec!["memory".to_string()]);
    }
}
