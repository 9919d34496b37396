//! Immutable snapshots of filesystem subtrees.
//!
//! A snapshot records the type and content fingerprint of every entry below
//! a root at one point in time. Trees are built bottom-up by a walker, never
//! mutated, and traversed through the enter / skip / leave visitor protocol
//! so that comparison, hashing and filtering can share one representation.

#![warn(missing_docs)]

pub mod builder;
pub mod directory;
pub mod error;
pub mod node;
pub mod visitor;
pub mod visitors;

pub use builder::SnapshotBuilder;
pub use directory::DirectorySnapshot;
pub use error::SnapshotBuildError;
pub use node::{FileSnapshot, FileType, MissingSnapshot, SnapshotNode};
pub use visitor::{Events, SnapshotVisitor, TraversalEvent};
pub use visitors::{CollectedEntry, Excluding, RelativePathCollector};
