//! `cairn layout`: print the resolved directory of every cache entry.

use std::path::{Path, PathBuf};

use cairn_layout::{CacheLayoutRegistry, LayoutId};
use serde::Serialize;

use crate::registry::load_registry;
use crate::{GlobalArgs, LayoutArgs, ReportFormat};

/// One resolved cache directory.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LayoutRow {
    /// `/`-separated entry name chain.
    pub entry: String,
    /// Directory name, `<name>-<version>`.
    pub key: String,
    /// Composed version.
    pub version: String,
    /// Full directory path. Nested entries resolve under their parent's path.
    pub path: PathBuf,
}

/// Runs the `cairn layout` command.
pub fn run(args: &LayoutArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = load_registry(global)?;
    let rows = layout_rows(&registry, &args.base);

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        ReportFormat::Text => {
            for row in &rows {
                println!("{:<24} {}", row.entry, row.path.display());
            }
        }
    }
    Ok(0)
}

/// Resolves every entry under `base`, nesting children inside their
/// parent's directory.
pub fn layout_rows(registry: &CacheLayoutRegistry, base: &Path) -> Vec<LayoutRow> {
    registry
        .ids()
        .map(|id| LayoutRow {
            entry: registry.qualified_name(id),
            key: registry.key(id),
            version: registry.formatted_version(id),
            path: nested_path(registry, id, base),
        })
        .collect()
}

fn nested_path(registry: &CacheLayoutRegistry, id: LayoutId, base: &Path) -> PathBuf {
    let parent_dir = match registry.entry(id).parent() {
        Some(parent) => nested_path(registry, parent, base),
        None => base.to_path_buf(),
    };
    registry.resolve_path(id, &parent_dir)
}
