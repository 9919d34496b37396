//! Loading cache layouts from TOML.
//!
//! ```toml
//! [layouts.root]
//! name = "modules"
//! history = [
//!   { version = 1, release = "1.9-rc-1" },
//!   { version = 2, release = "1.9-rc-2" },
//! ]
//!
//! [layouts.meta_data]
//! name = "metadata"
//! parent = "root"
//! history = [{ version = 58, release = "4.8-rc-1" }]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::LayoutError;
use crate::history::VersionHistory;
use crate::registry::{CacheLayoutRegistry, LayoutId};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    #[serde(default)]
    layouts: BTreeMap<String, LayoutDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutDef {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    history: Vec<RecordDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordDef {
    version: u32,
    release: String,
}

/// A registry loaded from configuration, with its table ids.
#[derive(Debug)]
pub struct LoadedLayout {
    /// The validated registry.
    pub registry: CacheLayoutRegistry,
    ids: BTreeMap<String, LayoutId>,
}

impl LoadedLayout {
    /// The entry declared as `[layouts.<table_id>]`.
    pub fn id(&self, table_id: &str) -> Option<LayoutId> {
        self.ids.get(table_id).copied()
    }

    /// Table ids and their entries, sorted by table id.
    pub fn table_ids(&self) -> impl Iterator<Item = (&str, LayoutId)> + '_ {
        self.ids.iter().map(|(key, id)| (key.as_str(), *id))
    }
}

/// Reads and validates a layout configuration file.
pub fn load_layout(path: &Path) -> Result<LoadedLayout, LayoutError> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(
        target = "cairn.layout",
        path = %path.display(),
        "loading cache layout configuration"
    );
    load_layout_from_str(&content)
}

/// Parses and validates a layout configuration from a string.
pub fn load_layout_from_str(content: &str) -> Result<LoadedLayout, LayoutError> {
    let file: LayoutFile =
        toml::from_str(content).map_err(|e| LayoutError::Parse(e.to_string()))?;

    let ids: BTreeMap<String, LayoutId> = file
        .layouts
        .keys()
        .enumerate()
        .map(|(index, key)| (key.clone(), LayoutId(index)))
        .collect();

    let mut builder = CacheLayoutRegistry::builder();
    for def in file.layouts.into_values() {
        let parent = match def.parent {
            Some(parent) => Some(*ids.get(&parent).ok_or_else(|| LayoutError::UnknownParent {
                entry: def.name.clone(),
                parent,
            })?),
            None => None,
        };
        let history = VersionHistory::from_records(
            def.history
                .into_iter()
                .map(|record| (record.version, record.release)),
        );
        builder.add(def.name, parent, history);
    }

    Ok(LoadedLayout {
        registry: builder.build()?,
        ids,
    })
}
