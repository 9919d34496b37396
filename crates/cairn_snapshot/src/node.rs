//! Snapshot node variants.
//!
//! A snapshot is an immutable record of a filesystem entry at one point in
//! time. Nodes are built bottom-up by a walker and never change afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use cairn_common::{ContentHash, ContentHasher};

use crate::directory::DirectorySnapshot;

/// The kind of filesystem entry a snapshot node records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// A regular file with content.
    RegularFile,
    /// A directory owning child nodes.
    Directory,
    /// An entry that did not exist when the snapshot was taken.
    Missing,
}

impl FileType {
    /// Tag byte fed into tree hashes.
    pub(crate) fn tag(self) -> u8 {
        match self {
            FileType::RegularFile => 1,
            FileType::Directory => 2,
            FileType::Missing => 3,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileType::RegularFile => "file",
            FileType::Directory => "directory",
            FileType::Missing => "missing",
        };
        f.write_str(s)
    }
}

/// Snapshot of a regular file and its content fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    path: PathBuf,
    name: String,
    content_hash: ContentHash,
}

impl FileSnapshot {
    /// Creates a file snapshot. `name` must be the final segment of `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, content_hash: ContentHash) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            content_hash,
        }
    }

    /// Absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fingerprint attached by the hashing collaborator.
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }
}

/// Snapshot of a path that did not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSnapshot {
    path: PathBuf,
    name: String,
}

impl MissingSnapshot {
    /// Creates a missing-entry snapshot.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Absolute path that was probed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A node in a snapshot tree.
///
/// The set of variants is closed: traversal and comparison code matches on
/// it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotNode {
    /// A regular file.
    File(FileSnapshot),
    /// A directory and its children.
    Directory(DirectorySnapshot),
    /// A path that did not exist.
    Missing(MissingSnapshot),
}

impl SnapshotNode {
    /// Creates a file node, deriving the name from the last path segment.
    pub fn file(path: impl Into<PathBuf>, content_hash: ContentHash) -> Self {
        let path = path.into();
        let name = name_of(&path);
        SnapshotNode::File(FileSnapshot::new(path, name, content_hash))
    }

    /// Creates a missing node, deriving the name from the last path segment.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = name_of(&path);
        SnapshotNode::Missing(MissingSnapshot::new(path, name))
    }

    /// Creates a directory node, deriving the name from the last path segment.
    ///
    /// Children are kept in the given order, which becomes traversal order.
    pub fn directory(path: impl Into<PathBuf>, children: Vec<SnapshotNode>) -> Self {
        let path = path.into();
        let name = name_of(&path);
        SnapshotNode::Directory(DirectorySnapshot::new(path, name, children))
    }

    /// Absolute path of the entry.
    pub fn path(&self) -> &Path {
        match self {
            SnapshotNode::File(file) => file.path(),
            SnapshotNode::Directory(dir) => dir.path(),
            SnapshotNode::Missing(missing) => missing.path(),
        }
    }

    /// Final path segment of the entry.
    pub fn name(&self) -> &str {
        match self {
            SnapshotNode::File(file) => file.name(),
            SnapshotNode::Directory(dir) => dir.name(),
            SnapshotNode::Missing(missing) => missing.name(),
        }
    }

    /// The kind of entry this node records.
    pub fn file_type(&self) -> FileType {
        match self {
            SnapshotNode::File(_) => FileType::RegularFile,
            SnapshotNode::Directory(_) => FileType::Directory,
            SnapshotNode::Missing(_) => FileType::Missing,
        }
    }

    /// Hash of the entry: the content hash for files, the tree hash for
    /// directories and a fixed marker for missing entries.
    pub fn hash(&self) -> ContentHash {
        match self {
            SnapshotNode::File(file) => file.content_hash(),
            SnapshotNode::Directory(dir) => dir.tree_hash(),
            SnapshotNode::Missing(_) => missing_hash(),
        }
    }

    /// Returns the directory variant, if this node is one.
    pub fn as_directory(&self) -> Option<&DirectorySnapshot> {
        match self {
            SnapshotNode::Directory(dir) => Some(dir),
            _ => None,
        }
    }
}

/// Hash shared by every missing node.
pub(crate) fn missing_hash() -> ContentHash {
    ContentHasher::new().write_u8(FileType::Missing.tag()).finish()
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_node_derives_name() {
        let node = SnapshotNode::file("/work/src/a.txt", ContentHash::from_bytes(b"a"));
        assert_eq!(node.name(), "a.txt");
        assert_eq!(node.path(), Path::new("/work/src/a.txt"));
        assert_eq!(node.file_type(), FileType::RegularFile);
    }

    #[test]
    fn file_hash_is_content_hash() {
        let hash = ContentHash::from_bytes(b"content");
        let node = SnapshotNode::file("/work/a.txt", hash);
        assert_eq!(node.hash(), hash);
    }

    #[test]
    fn missing_nodes_share_hash() {
        let a = SnapshotNode::missing("/work/a");
        let b = SnapshotNode::missing("/other/b");
        assert_eq!(a.file_type(), FileType::Missing);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn missing_differs_from_empty_file() {
        let missing = SnapshotNode::missing("/work/a");
        let empty = SnapshotNode::file("/work/a", ContentHash::from_bytes(b""));
        assert_ne!(missing.hash(), empty.hash());
    }

    #[test]
    fn root_path_has_empty_name() {
        let node = SnapshotNode::missing("/");
        assert_eq!(node.name(), "");
    }

    #[test]
    fn explicit_name_is_kept() {
        let file = FileSnapshot::new("/work/A.TXT", "A.TXT", ContentHash::from_bytes(b"x"));
        assert_eq!(file.name(), "A.TXT");
    }

    #[test]
    fn file_type_display() {
        assert_eq!(FileType::RegularFile.to_string(), "file");
        assert_eq!(FileType::Directory.to_string(), "directory");
        assert_eq!(FileType::Missing.to_string(), "missing");
    }

    #[test]
    fn as_directory_only_for_directories() {
        let dir = SnapshotNode::directory("/work", vec![]);
        assert!(dir.as_directory().is_some());
        assert!(SnapshotNode::missing("/work/x").as_directory().is_none());
    }
}
