//! Bottom-up construction of snapshot trees.
//!
//! A walker reports entries in depth-first order; the builder keeps a stack
//! of open directories and seals each one into a [`DirectorySnapshot`] when
//! it is left, so children always exist before the parent that owns them.

use std::path::{Path, PathBuf};

use cairn_common::ContentHash;

use crate::directory::DirectorySnapshot;
use crate::error::SnapshotBuildError;
use crate::node::{FileSnapshot, MissingSnapshot, SnapshotNode};
use crate::visitor::SnapshotVisitor;

/// A directory whose children are still being collected.
#[derive(Debug)]
struct OpenDirectory {
    path: PathBuf,
    name: String,
    children: Vec<SnapshotNode>,
}

/// Stack-based snapshot builder.
///
/// Also implements [`SnapshotVisitor`], so accepting it on an existing tree
/// produces a copy of that tree, or a pruned copy when wrapped in a filtering
/// visitor such as [`Excluding`](crate::Excluding).
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    stack: Vec<OpenDirectory>,
    root: Option<SnapshotNode>,
}

impl SnapshotBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a directory. Entries added until the matching
    /// [`leave_directory`](Self::leave_directory) become its children.
    pub fn enter_directory(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Result<(), SnapshotBuildError> {
        let path = path.into();
        if self.stack.is_empty() && self.root.is_some() {
            return Err(SnapshotBuildError::MultipleRoots { path });
        }
        self.stack.push(OpenDirectory {
            path,
            name: name.into(),
            children: Vec::new(),
        });
        Ok(())
    }

    /// Adds a regular file to the innermost open directory.
    pub fn add_file(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        content_hash: ContentHash,
    ) -> Result<(), SnapshotBuildError> {
        self.add_node(SnapshotNode::File(FileSnapshot::new(path, name, content_hash)))
    }

    /// Adds a missing entry to the innermost open directory.
    pub fn add_missing(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Result<(), SnapshotBuildError> {
        self.add_node(SnapshotNode::Missing(MissingSnapshot::new(path, name)))
    }

    /// Adds an already built node. With no directory open the node becomes
    /// the root.
    pub fn add_node(&mut self, node: SnapshotNode) -> Result<(), SnapshotBuildError> {
        match self.stack.last_mut() {
            Some(open) => {
                open.children.push(node);
                Ok(())
            }
            None if self.root.is_some() => Err(SnapshotBuildError::MultipleRoots {
                path: node.path().to_path_buf(),
            }),
            None => {
                self.root = Some(node);
                Ok(())
            }
        }
    }

    /// Seals the innermost open directory and attaches it to its parent.
    pub fn leave_directory(&mut self) -> Result<(), SnapshotBuildError> {
        let open = self.stack.pop().ok_or(SnapshotBuildError::Unbalanced)?;
        let dir = DirectorySnapshot::new(open.path, open.name, open.children);
        self.add_node(SnapshotNode::Directory(dir))
    }

    /// Returns the completed root node.
    pub fn finish(mut self) -> Result<SnapshotNode, SnapshotBuildError> {
        if let Some(open) = self.stack.pop() {
            return Err(SnapshotBuildError::UnclosedDirectory { path: open.path });
        }
        self.root.take().ok_or(SnapshotBuildError::Empty)
    }
}

impl SnapshotVisitor for SnapshotBuilder {
    type Error = SnapshotBuildError;

    fn enter_directory(&mut self, path: &Path, name: &str) -> Result<bool, Self::Error> {
        SnapshotBuilder::enter_directory(self, path, name)?;
        Ok(true)
    }

    fn leave_directory(&mut self) -> Result<(), Self::Error> {
        SnapshotBuilder::leave_directory(self)
    }

    fn visit_file(&mut self, node: &SnapshotNode) -> Result<(), Self::Error> {
        self.add_node(node.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::FileType;

    #[test]
    fn builds_nested_tree() {
        let mut builder = SnapshotBuilder::new();
        builder.enter_directory("/root", "root").unwrap();
        builder
            .add_file("/root/a.txt", "a.txt", ContentHash::from_bytes(b"a"))
            .unwrap();
        builder.enter_directory("/root/sub", "sub").unwrap();
        builder.add_missing("/root/sub/gone", "gone").unwrap();
        builder.leave_directory().unwrap();
        builder.leave_directory().unwrap();

        let root = builder.finish().unwrap();
        let dir = root.as_directory().unwrap();
        assert_eq!(dir.name(), "root");
        assert_eq!(dir.children().len(), 2);
        let sub = dir.child("sub").and_then(|n| n.as_directory()).unwrap();
        assert_eq!(sub.children()[0].file_type(), FileType::Missing);
    }

    #[test]
    fn single_file_root() {
        let mut builder = SnapshotBuilder::new();
        builder
            .add_file("/a.txt", "a.txt", ContentHash::from_bytes(b"a"))
            .unwrap();
        let root = builder.finish().unwrap();
        assert_eq!(root.file_type(), FileType::RegularFile);
    }

    #[test]
    fn leave_without_enter_is_unbalanced() {
        let mut builder = SnapshotBuilder::new();
        assert!(matches!(
            builder.leave_directory(),
            Err(SnapshotBuildError::Unbalanced)
        ));
    }

    #[test]
    fn finish_with_open_directory_fails() {
        let mut builder = SnapshotBuilder::new();
        builder.enter_directory("/root", "root").unwrap();
        builder.enter_directory("/root/sub", "sub").unwrap();
        builder.leave_directory().unwrap();
        match builder.finish() {
            Err(SnapshotBuildError::UnclosedDirectory { path }) => {
                assert_eq!(path, PathBuf::from("/root"));
            }
            other => panic!("expected UnclosedDirectory, got {other:?}"),
        }
    }

    #[test]
    fn empty_builder_fails() {
        assert!(matches!(
            SnapshotBuilder::new().finish(),
            Err(SnapshotBuildError::Empty)
        ));
    }

    #[test]
    fn second_root_is_rejected() {
        let mut builder = SnapshotBuilder::new();
        builder.add_missing("/a", "a").unwrap();
        assert!(matches!(
            builder.add_missing("/b", "b"),
            Err(SnapshotBuildError::MultipleRoots { .. })
        ));
        assert!(matches!(
            builder.enter_directory("/c", "c"),
            Err(SnapshotBuildError::MultipleRoots { .. })
        ));
    }

    #[test]
    fn accepting_builder_copies_tree() {
        let tree = SnapshotNode::directory(
            "/root",
            vec![
                SnapshotNode::file("/root/a.txt", ContentHash::from_bytes(b"a")),
                SnapshotNode::directory(
                    "/root/sub",
                    vec![SnapshotNode::file(
                        "/root/sub/b.txt",
                        ContentHash::from_bytes(b"b"),
                    )],
                ),
            ],
        );
        let mut builder = SnapshotBuilder::new();
        tree.accept(&mut builder).unwrap();
        let copy = builder.finish().unwrap();
        assert_eq!(copy, tree);
        assert_eq!(copy.hash(), tree.hash());
    }
}
