//! Reusable visitors.

use std::convert::Infallible;
use std::path::Path;

use cairn_common::ContentHash;

use crate::node::{FileType, SnapshotNode};
use crate::visitor::SnapshotVisitor;

/// A leaf collected by [`RelativePathCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedEntry {
    /// `/`-separated path relative to the traversal root.
    pub relative_path: String,
    /// Either [`FileType::RegularFile`] or [`FileType::Missing`].
    pub file_type: FileType,
    /// Hash of the node.
    pub hash: ContentHash,
}

/// Flattens a tree into the leaves it contains, keyed by their path
/// relative to the root directory.
///
/// The root directory's own name is not part of the relative paths. When the
/// traversal root is itself a file, its name is used.
#[derive(Debug, Default)]
pub struct RelativePathCollector {
    segments: Vec<String>,
    depth: usize,
    entries: Vec<CollectedEntry>,
}

impl RelativePathCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves collected so far, in traversal order.
    pub fn entries(&self) -> &[CollectedEntry] {
        &self.entries
    }

    /// Consumes the collector and returns the collected leaves.
    pub fn into_entries(self) -> Vec<CollectedEntry> {
        self.entries
    }
}

impl SnapshotVisitor for RelativePathCollector {
    type Error = Infallible;

    fn enter_directory(&mut self, _path: &Path, name: &str) -> Result<bool, Infallible> {
        if self.depth > 0 {
            self.segments.push(name.to_string());
        }
        self.depth += 1;
        Ok(true)
    }

    fn leave_directory(&mut self) -> Result<(), Infallible> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            self.segments.pop();
        }
        Ok(())
    }

    fn visit_file(&mut self, node: &SnapshotNode) -> Result<(), Infallible> {
        let mut relative_path = self.segments.join("/");
        if !relative_path.is_empty() {
            relative_path.push('/');
        }
        relative_path.push_str(node.name());
        self.entries.push(CollectedEntry {
            relative_path,
            file_type: node.file_type(),
            hash: node.hash(),
        });
        Ok(())
    }
}

/// Wraps a visitor and hides every directory whose name matches a predicate.
///
/// Excluded directories are invisible to the inner visitor: neither their
/// enter nor their leave callback is forwarded, and their children are
/// never traversed.
#[derive(Debug)]
pub struct Excluding<V, F> {
    inner: V,
    is_excluded: F,
    /// One flag per directory currently open in the traversal.
    hidden: Vec<bool>,
}

impl<V, F> Excluding<V, F>
where
    V: SnapshotVisitor,
    F: Fn(&str) -> bool,
{
    /// Wraps `inner`, excluding directories for which `is_excluded` returns `true`.
    pub fn new(inner: V, is_excluded: F) -> Self {
        Self {
            inner,
            is_excluded,
            hidden: Vec::new(),
        }
    }

    /// Returns the wrapped visitor.
    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<V, F> SnapshotVisitor for Excluding<V, F>
where
    V: SnapshotVisitor,
    F: Fn(&str) -> bool,
{
    type Error = V::Error;

    fn enter_directory(&mut self, path: &Path, name: &str) -> Result<bool, Self::Error> {
        if (self.is_excluded)(name) {
            self.hidden.push(true);
            return Ok(false);
        }
        self.hidden.push(false);
        self.inner.enter_directory(path, name)
    }

    fn leave_directory(&mut self) -> Result<(), Self::Error> {
        match self.hidden.pop() {
            Some(true) => Ok(()),
            _ => self.inner.leave_directory(),
        }
    }

    fn visit_file(&mut self, node: &SnapshotNode) -> Result<(), Self::Error> {
        self.inner.visit_file(node)
    }
}
