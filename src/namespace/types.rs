//! Namespace entry types
//!
//! These types describe what a namespace provider yields for each child of a
//! listed directory. Entries are immutable once produced.

use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

/// Type of namespace entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryType {
    /// Regular file
    File = 0,
    /// Directory
    Directory = 1,
    /// Symbolic link (never followed)
    Symlink = 2,
    /// Device, FIFO, socket or anything else
    Other = 255,
}

impl EntryType {
    /// Derive the entry type from local filesystem metadata
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let ft = metadata.file_type();
        if ft.is_dir() {
            EntryType::Directory
        } else if ft.is_symlink() {
            EntryType::Symlink
        } else if ft.is_file() {
            EntryType::File
        } else {
            EntryType::Other
        }
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        *self == EntryType::File
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        *self == EntryType::Directory
    }
}

/// Physical placement of one block of a leaf entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    /// Byte offset of the block within the entry
    pub offset: u64,
    /// Block length in bytes
    pub length: u64,
    /// Hosts holding a replica of the block
    pub hosts: Vec<String>,
}

impl BlockLocation {
    pub fn new(offset: u64, length: u64, hosts: Vec<String>) -> Self {
        Self {
            offset,
            length,
            hosts,
        }
    }

    /// Split `len` bytes into fixed-size blocks all placed on `hosts`
    ///
    /// An empty entry has no blocks. `block_size` must be non-zero.
    pub fn split(len: u64, block_size: u64, hosts: &[String]) -> Vec<BlockLocation> {
        debug_assert!(block_size > 0);
        let mut blocks = Vec::with_capacity(len.div_ceil(block_size) as usize);
        let mut offset = 0;
        while offset < len {
            let length = block_size.min(len - offset);
            blocks.push(BlockLocation::new(offset, length, hosts.to_vec()));
            offset += length;
        }
        blocks
    }
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceEntry {
    /// Full path of the entry
    pub path: String,

    /// Entry type
    pub entry_type: EntryType,

    /// Size in bytes (0 for directories)
    pub len: u64,

    /// Modification time (seconds since epoch)
    pub modified: Option<i64>,

    /// Block placement, in offset order (empty for directories)
    pub blocks: Vec<BlockLocation>,
}

impl NamespaceEntry {
    /// Create a directory entry
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::Directory,
            len: 0,
            modified: None,
            blocks: Vec::new(),
        }
    }

    /// Create a regular file entry with explicit blocks
    pub fn file(path: impl Into<String>, len: u64, blocks: Vec<BlockLocation>) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::File,
            len,
            modified: None,
            blocks,
        }
    }

    /// Set the modification time
    pub fn with_modified(mut self, modified: i64) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Whether the walker should recurse into this entry
    pub fn is_dir(&self) -> bool {
        self.entry_type.is_dir()
    }

    /// Final path component
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) => &trimmed[idx + 1..],
            None => trimmed,
        }
    }

    /// Block placement of this entry
    pub fn block_locations(&self) -> &[BlockLocation] {
        &self.blocks
    }
}

/// Join a parent path and a child name with a single separator
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Convert a SystemTime to seconds since the Unix epoch
pub(crate) fn epoch_secs(time: SystemTime) -> Option<i64> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_blocks() {
        let hosts = vec!["localhost".to_string()];
        let blocks = BlockLocation::split(250, 100, &hosts);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], BlockLocation::new(0, 100, hosts.clone()));
        assert_eq!(blocks[2].offset, 200);
        assert_eq!(blocks[2].length, 50);

        assert!(BlockLocation::split(0, 100, &hosts).is_empty());
        assert_eq!(BlockLocation::split(100, 100, &hosts).len(), 1);
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(NamespaceEntry::directory("/data/part=1/").name(), "part=1");
        assert_eq!(NamespaceEntry::file("/data/a.orc", 0, vec![]).name(), "a.orc");
        assert_eq!(NamespaceEntry::file("a.orc", 0, vec![]).name(), "a.orc");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/data", "a"), "/data/a");
        assert_eq!(join_path("/data/", "a"), "/data/a");
    }

    #[test]
    fn test_entry_types() {
        assert!(NamespaceEntry::directory("/d").is_dir());
        let file = NamespaceEntry::file("/f", 10, vec![]).with_modified(42);
        assert!(file.entry_type.is_file());
        assert!(!file.is_dir());
        assert_eq!(file.modified, Some(42));
    }
}
