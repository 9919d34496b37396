//! The built-in cache layout.
//!
//! Two root stores exist: `modules` for downloaded dependencies and their
//! metadata, and `transforms` for artifact transform outputs. Each history
//! lists every release that changed the on-disk format. Versions missing from
//! a history were used during development and never shipped.

use std::fmt;

use crate::error::LayoutError;
use crate::history::VersionHistory;
use crate::registry::{CacheLayoutRegistry, LayoutId};

/// The stores of the built-in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardLayout {
    /// `modules`: root of the dependency cache.
    Root,
    /// `files`: downloaded artifact files.
    FileStore,
    /// `metadata`: resolved module metadata.
    MetaData,
    /// `resources`: cached remote resources.
    Resources,
    /// `transforms`: root of the transform cache.
    Transforms,
    /// `metadata` under `transforms`.
    TransformsMetaData,
    /// `files` under `transforms`.
    TransformsStore,
}

impl StandardLayout {
    /// Every store, in registration order.
    pub const ALL: [StandardLayout; 7] = [
        StandardLayout::Root,
        StandardLayout::FileStore,
        StandardLayout::MetaData,
        StandardLayout::Resources,
        StandardLayout::Transforms,
        StandardLayout::TransformsMetaData,
        StandardLayout::TransformsStore,
    ];

    /// Id of this store in the registry returned by [`registry`](Self::registry).
    pub fn id(self) -> LayoutId {
        LayoutId(self as usize)
    }

    /// Builds the registry holding every standard store.
    pub fn registry() -> Result<CacheLayoutRegistry, LayoutError> {
        let mut builder = CacheLayoutRegistry::builder();

        let root = builder.add(
            "modules",
            None,
            VersionHistory::introduced_in("1.9-rc-1").incremented_in("1.9-rc-2"),
        );

        // If the file store changes, locally available resource lookups that
        // scan it need to follow.
        builder.add("files", Some(root), VersionHistory::introduced_in("1.9-rc-1"));

        builder.add(
            "metadata",
            Some(root),
            VersionHistory::introduced_in("1.9-rc-2")
                .changed_to(2, "1.11-rc-1")
                .changed_to(6, "1.12-rc-1")
                .changed_to(12, "2.0-rc-1")
                .changed_to(13, "2.1-rc-3")
                .changed_to(14, "2.2-rc-1")
                .changed_to(15, "2.4-rc-1")
                .changed_to(16, "2.8-rc-1")
                .changed_to(17, "3.0-milestone-1")
                .changed_to(21, "3.1-rc-1")
                .changed_to(23, "3.2-rc-1")
                .changed_to(24, "4.2-rc-1")
                .changed_to(31, "4.3-rc-1")
                .changed_to(36, "4.4-rc-1")
                .changed_to(48, "4.5-rc-1")
                .changed_to(51, "4.5.1")
                .changed_to(53, "4.6-rc-1")
                .changed_to(56, "4.7-rc-1")
                .changed_to(58, "4.8-rc-1"),
        );

        builder.add("resources", Some(root), VersionHistory::introduced_in("1.9-rc-1"));

        let transforms = builder.add("transforms", None, VersionHistory::introduced_in("3.5-rc-1"));
        builder.add(
            "metadata",
            Some(transforms),
            VersionHistory::introduced_in("3.5-rc-1"),
        );
        builder.add(
            "files",
            Some(transforms),
            VersionHistory::introduced_in("3.5-rc-1"),
        );

        builder.build()
    }
}

impl fmt::Display for StandardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StandardLayout::Root => "root",
            StandardLayout::FileStore => "file-store",
            StandardLayout::MetaData => "metadata",
            StandardLayout::Resources => "resources",
            StandardLayout::Transforms => "transforms",
            StandardLayout::TransformsMetaData => "transforms-metadata",
            StandardLayout::TransformsStore => "transforms-store",
        };
        f.write_str(s)
    }
}
