//! Error types for snapshot construction.

use std::path::PathBuf;

/// Errors reported by [`SnapshotBuilder`](crate::SnapshotBuilder) when the
/// sequence of calls driving it does not describe a single tree.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotBuildError {
    /// `leave_directory` was called with no directory open.
    #[error("leave_directory called with no open directory")]
    Unbalanced,

    /// `finish` was called while a directory was still open.
    #[error("directory {path} was never closed")]
    UnclosedDirectory {
        /// The innermost open directory.
        path: PathBuf,
    },

    /// A second top-level node was added after the root was completed.
    #[error("snapshot already has a root, cannot add {path}")]
    MultipleRoots {
        /// Path of the rejected node.
        path: PathBuf,
    },

    /// `finish` was called before any node was added.
    #[error("no snapshot node was produced")]
    Empty,
}
