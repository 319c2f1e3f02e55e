//! Local filesystem namespace provider

use crate::error::{ProviderError, ProviderResult};
use crate::namespace::types::{epoch_secs, join_path, BlockLocation, EntryType, NamespaceEntry};
use crate::namespace::{EntryIter, NamespaceProvider};
use std::fs;

/// Default block size used to describe file placement (128 MiB)
pub const DEFAULT_BLOCK_SIZE: u64 = 128 * 1024 * 1024;

/// Host name reported for every local block
const LOCAL_HOST: &str = "localhost";

/// Lists directories on the local filesystem
///
/// Symlinks are reported as leaves and never followed, so a walk over a tree
/// with link cycles still terminates.
#[derive(Debug, Clone)]
pub struct LocalFsProvider {
    block_size: u64,
    hosts: Vec<String>,
}

impl LocalFsProvider {
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    /// Describe files as blocks of `block_size` bytes
    pub fn with_block_size(block_size: u64) -> Self {
        Self {
            block_size: block_size.max(1),
            hosts: vec![LOCAL_HOST.to_string()],
        }
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    fn to_entry(&self, parent: &str, dirent: fs::DirEntry) -> ProviderResult<NamespaceEntry> {
        let name = dirent.file_name().to_string_lossy().into_owned();
        let path = join_path(parent, &name);
        // DirEntry::metadata does not traverse symlinks
        let metadata = dirent
            .metadata()
            .map_err(|e| ProviderError::from_io(&path, e))?;

        let entry_type = EntryType::from_metadata(&metadata);
        let modified = metadata.modified().ok().and_then(epoch_secs);

        let (len, blocks) = match entry_type {
            EntryType::Directory => (0, Vec::new()),
            EntryType::File => {
                let len = metadata.len();
                (len, BlockLocation::split(len, self.block_size, &self.hosts))
            }
            _ => (metadata.len(), Vec::new()),
        };

        Ok(NamespaceEntry {
            path,
            entry_type,
            len,
            modified,
            blocks,
        })
    }
}

impl Default for LocalFsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceProvider for LocalFsProvider {
    fn list(&self, path: &str) -> ProviderResult<EntryIter<'_>> {
        let read_dir = fs::read_dir(path).map_err(|e| ProviderError::from_io(path, e))?;
        let parent = path.to_string();

        Ok(Box::new(read_dir.map(move |dirent| {
            let dirent = dirent.map_err(|e| ProviderError::from_io(&parent, e))?;
            self.to_entry(&parent, dirent)
        })))
    }
}
