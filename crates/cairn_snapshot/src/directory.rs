//! Directory snapshots and tree hash composition.

use std::path::{Path, PathBuf};

use cairn_common::{ContentHash, ContentHasher};

use crate::node::{FileType, SnapshotNode};

/// Snapshot of a directory and the ordered children it owns.
///
/// The tree hash is computed once at construction from every child's name,
/// type and hash in stored order, so two directories with the same entries
/// in a different order hash differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    path: PathBuf,
    name: String,
    children: Vec<SnapshotNode>,
    tree_hash: ContentHash,
}

impl DirectorySnapshot {
    /// Creates a directory snapshot owning `children`.
    ///
    /// Every child path must be a strict descendant of `path`; this is a
    /// caller contract checked in debug builds.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, children: Vec<SnapshotNode>) -> Self {
        let path = path.into();
        debug_assert!(
            children
                .iter()
                .all(|child| child.path() != path && child.path().starts_with(&path)),
            "child of {} is not a descendant of it",
            path.display()
        );
        let tree_hash = compose_tree_hash(&children);
        Self {
            path,
            name: name.into(),
            children,
            tree_hash,
        }
    }

    /// Absolute path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Children in traversal order.
    pub fn children(&self) -> &[SnapshotNode] {
        &self.children
    }

    /// Merkle hash of the directory contents.
    pub fn tree_hash(&self) -> ContentHash {
        self.tree_hash
    }

    /// Finds a direct child by name.
    pub fn child(&self, name: &str) -> Option<&SnapshotNode> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Total number of nodes below this directory, excluding itself.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                SnapshotNode::Directory(dir) => 1 + dir.descendant_count(),
                SnapshotNode::File(_) | SnapshotNode::Missing(_) => 1,
            })
            .sum()
    }
}

fn compose_tree_hash(children: &[SnapshotNode]) -> ContentHash {
    let mut hasher = ContentHasher::new();
    hasher.write_u8(FileType::Directory.tag());
    for child in children {
        hasher
            .write_u8(child.file_type().tag())
            .write_str(child.name())
            .write_hash(&child.hash());
    }
    hasher.finish()
}
