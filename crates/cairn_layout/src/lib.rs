//! Versioned, hierarchical cache directory layout.
//!
//! Every logical store gets its own directory named `<name>-<version>`, where
//! the version is composed from the store's own format version and those of
//! its ancestors. A format change in one store moves only that store (and its
//! descendants) to a fresh directory; the old one is simply no longer used.

#![warn(missing_docs)]

pub mod error;
pub mod history;
pub mod loader;
pub mod registry;
pub mod standard;
pub mod version;

pub use error::{HistoryError, LayoutError, ParseReleaseError, ParseVersionError};
pub use history::{VersionHistory, VersionHistoryBuilder, VersionRecord};
pub use loader::{load_layout, load_layout_from_str, LoadedLayout};
pub use registry::{CacheLayoutEntry, CacheLayoutRegistry, LayoutId, RegistryBuilder};
pub use standard::StandardLayout;
pub use version::{Release, Stage, VersionNumber};
