//! Depth-first traversal of snapshot trees.
//!
//! Two equivalent forms are provided: [`SnapshotNode::accept`] pushes
//! callbacks into a [`SnapshotVisitor`], and [`SnapshotNode::events`] yields
//! the same sequence as a pull-based iterator. In both forms every
//! "enter directory" is matched by exactly one "leave directory", including
//! for directories whose descent was refused.

use std::iter::FusedIterator;
use std::path::Path;

use crate::node::SnapshotNode;

/// Callbacks invoked while traversing a snapshot tree.
///
/// The first error returned by any callback aborts the traversal and is
/// handed back to the caller of [`SnapshotNode::accept`].
pub trait SnapshotVisitor {
    /// Error produced by the visitor's own callbacks.
    type Error;

    /// Called before a directory's children. Returning `Ok(false)` skips the
    /// children; [`leave_directory`](Self::leave_directory) is still called.
    fn enter_directory(&mut self, path: &Path, name: &str) -> Result<bool, Self::Error>;

    /// Closes the most recently entered directory.
    fn leave_directory(&mut self) -> Result<(), Self::Error>;

    /// Called once for each file or missing node.
    fn visit_file(&mut self, node: &SnapshotNode) -> Result<(), Self::Error>;
}

impl<V: SnapshotVisitor + ?Sized> SnapshotVisitor for &mut V {
    type Error = V::Error;

    fn enter_directory(&mut self, path: &Path, name: &str) -> Result<bool, Self::Error> {
        (**self).enter_directory(path, name)
    }

    fn leave_directory(&mut self) -> Result<(), Self::Error> {
        (**self).leave_directory()
    }

    fn visit_file(&mut self, node: &SnapshotNode) -> Result<(), Self::Error> {
        (**self).visit_file(node)
    }
}

impl SnapshotNode {
    /// Walks this node and its descendants depth-first, pre-order for
    /// "enter" and post-order for "leave".
    pub fn accept<V: SnapshotVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            SnapshotNode::Directory(dir) => {
                if visitor.enter_directory(dir.path(), dir.name())? {
                    for child in dir.children() {
                        child.accept(visitor)?;
                    }
                }
                visitor.leave_directory()
            }
            SnapshotNode::File(_) | SnapshotNode::Missing(_) => visitor.visit_file(self),
        }
    }

    /// Returns the traversal of this node as a lazy sequence of events.
    pub fn events(&self) -> Events<'_> {
        Events {
            root: Some(self),
            stack: Vec::new(),
            just_entered: false,
        }
    }
}

/// A single step of a snapshot traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalEvent<'a> {
    /// A directory is being entered.
    Enter {
        /// Path of the directory.
        path: &'a Path,
        /// Name of the directory.
        name: &'a str,
    },
    /// The most recently entered, still open directory is closed.
    Leave,
    /// A file or missing node.
    File(&'a SnapshotNode),
}

/// Pull-based traversal returned by [`SnapshotNode::events`].
#[derive(Debug)]
pub struct Events<'a> {
    root: Option<&'a SnapshotNode>,
    /// Open directories: children and the index of the next one to yield.
    stack: Vec<(&'a [SnapshotNode], usize)>,
    just_entered: bool,
}

impl<'a> Events<'a> {
    /// Refuses descent into the directory whose [`TraversalEvent::Enter`]
    /// was the last event produced. Its [`TraversalEvent::Leave`] is the
    /// next event.
    ///
    /// Returns `false` and does nothing if the last event was not an `Enter`.
    pub fn skip_children(&mut self) -> bool {
        if !self.just_entered {
            return false;
        }
        if let Some((children, next)) = self.stack.last_mut() {
            *next = children.len();
        }
        self.just_entered = false;
        true
    }

    fn emit(&mut self, node: &'a SnapshotNode) -> TraversalEvent<'a> {
        match node {
            SnapshotNode::Directory(dir) => {
                self.stack.push((dir.children(), 0));
                self.just_entered = true;
                TraversalEvent::Enter {
                    path: dir.path(),
                    name: dir.name(),
                }
            }
            SnapshotNode::File(_) | SnapshotNode::Missing(_) => TraversalEvent::File(node),
        }
    }
}

impl<'a> Iterator for Events<'a> {
    type Item = TraversalEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.just_entered = false;
        if let Some(root) = self.root.take() {
            return Some(self.emit(root));
        }
        let top = self.stack.last_mut()?;
        let children: &'a [SnapshotNode] = top.0;
        match children.get(top.1) {
            Some(child) => {
                top.1 += 1;
                Some(self.emit(child))
            }
            None => {
                self.stack.pop();
                Some(TraversalEvent::Leave)
            }
        }
    }
}

impl FusedIterator for Events<'_> {}
