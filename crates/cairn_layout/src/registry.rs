//! The cache layout registry: named, versioned cache directories.
//!
//! Entries live in a flat table and refer to their parent by [`LayoutId`].
//! An entry's directory is `<name>-<composed version>`, where the composed
//! version is the parent's composed version followed by `.` and the entry's
//! own latest version. Bumping a parent therefore moves every descendant to
//! a fresh directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::LayoutError;
use crate::history::{VersionHistory, VersionHistoryBuilder};
use crate::version::VersionNumber;

/// Index of an entry within the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub(crate) usize);

impl LayoutId {
    /// Position of the entry in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named cache location with its version history.
#[derive(Debug, Clone)]
pub struct CacheLayoutEntry {
    name: String,
    parent: Option<LayoutId>,
    history: VersionHistory,
}

impl CacheLayoutEntry {
    /// Directory segment name, without version.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing entry, if any.
    pub fn parent(&self) -> Option<LayoutId> {
        self.parent
    }

    /// Full version history.
    pub fn history(&self) -> &VersionHistory {
        &self.history
    }

    /// The entry's own latest version.
    pub fn effective_version(&self) -> u32 {
        self.history.latest_version()
    }
}

/// Immutable, validated set of cache layout entries.
///
/// Resolution is pure string composition: it never touches the filesystem
/// and returns the same result every time it is called.
#[derive(Debug, Clone)]
pub struct CacheLayoutRegistry {
    entries: Vec<CacheLayoutEntry>,
}

impl CacheLayoutRegistry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Returns the entry for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued for a different registry with more entries.
    /// Use [`get`](Self::get) for ids of unknown origin.
    pub fn entry(&self, id: LayoutId) -> &CacheLayoutEntry {
        &self.entries[id.0]
    }

    /// Returns the entry for `id`, or `None` if this registry has no such
    /// entry.
    pub fn get(&self, id: LayoutId) -> Option<&CacheLayoutEntry> {
        self.entries.get(id.0)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entry ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = LayoutId> + '_ {
        (0..self.entries.len()).map(LayoutId)
    }

    /// Direct children of `parent`, or the root entries for `None`.
    pub fn children(&self, parent: Option<LayoutId>) -> impl Iterator<Item = LayoutId> + '_ {
        self.ids()
            .filter(move |id| self.entries[id.0].parent == parent)
    }

    /// Finds an entry by its `/`-separated chain of names from a root,
    /// e.g. `"modules/metadata"`.
    pub fn lookup(&self, qualified_name: &str) -> Option<LayoutId> {
        let mut current = None;
        for segment in qualified_name.split('/') {
            current = Some(
                self.children(current)
                    .find(|id| self.entries[id.0].name == segment)?,
            );
        }
        current
    }

    /// The `/`-separated chain of names from the root to `id`.
    pub fn qualified_name(&self, id: LayoutId) -> String {
        self.ancestry(id)
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The entry's own latest version.
    pub fn effective_version(&self, id: LayoutId) -> u32 {
        self.entry(id).effective_version()
    }

    /// Composed version: ancestors' latest versions followed by the entry's
    /// own, joined with `.`.
    pub fn formatted_version(&self, id: LayoutId) -> String {
        self.ancestry(id)
            .iter()
            .map(|entry| entry.effective_version().to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Composed version as a comparable [`VersionNumber`].
    pub fn version(&self, id: LayoutId) -> VersionNumber {
        VersionNumber::new(
            self.ancestry(id)
                .iter()
                .map(|entry| entry.effective_version())
                .collect(),
        )
    }

    /// Directory name of the entry: `<name>-<formatted version>`.
    pub fn key(&self, id: LayoutId) -> String {
        format!("{}-{}", self.entry(id).name, self.formatted_version(id))
    }

    /// The entry's directory under `base`. The directory is not created.
    pub fn resolve_path(&self, id: LayoutId, base: &Path) -> PathBuf {
        base.join(self.key(id))
    }

    /// Entries from the root down to `id`, inclusive.
    fn ancestry(&self, id: LayoutId) -> Vec<&CacheLayoutEntry> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let entry = self.entry(id);
            chain.push(entry);
            current = entry.parent;
        }
        chain.reverse();
        chain
    }
}

/// Collects entry definitions and validates them in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    pending: Vec<PendingEntry>,
}

#[derive(Debug)]
struct PendingEntry {
    name: String,
    parent: Option<LayoutId>,
    history: VersionHistoryBuilder,
}

impl RegistryBuilder {
    /// Registers an entry and returns the id it will have in the registry.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        parent: Option<LayoutId>,
        history: VersionHistoryBuilder,
    ) -> LayoutId {
        let id = LayoutId(self.pending.len());
        self.pending.push(PendingEntry {
            name: name.into(),
            parent,
            history,
        });
        id
    }

    /// Validates every entry and produces the registry.
    ///
    /// Rejects unusable names, malformed histories, parent references
    /// outside the registry, parent cycles and duplicate sibling names.
    pub fn build(self) -> Result<CacheLayoutRegistry, LayoutError> {
        let count = self.pending.len();
        let mut entries = Vec::with_capacity(count);
        for pending in self.pending {
            validate_name(&pending.name)?;
            if let Some(parent) = pending.parent {
                if parent.0 >= count {
                    return Err(LayoutError::UnknownParent {
                        entry: pending.name,
                        parent: format!("#{}", parent.0),
                    });
                }
            }
            let history = pending
                .history
                .build()
                .map_err(|source| LayoutError::History {
                    entry: pending.name.clone(),
                    source,
                })?;
            entries.push(CacheLayoutEntry {
                name: pending.name,
                parent: pending.parent,
                history,
            });
        }

        check_acyclic(&entries)?;
        let registry = CacheLayoutRegistry { entries };
        check_unique_siblings(&registry)?;

        for id in registry.ids() {
            tracing::debug!(
                target = "cairn.layout",
                entry = %registry.qualified_name(id),
                key = %registry.key(id),
                "registered cache layout entry"
            );
        }
        Ok(registry)
    }
}

fn validate_name(name: &str) -> Result<(), LayoutError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if invalid {
        return Err(LayoutError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_acyclic(entries: &[CacheLayoutEntry]) -> Result<(), LayoutError> {
    for entry in entries {
        let mut current = entry.parent;
        let mut steps = 0;
        while let Some(id) = current {
            steps += 1;
            if steps > entries.len() {
                return Err(LayoutError::ParentCycle {
                    entry: entry.name.clone(),
                });
            }
            current = entries[id.0].parent;
        }
    }
    Ok(())
}

fn check_unique_siblings(registry: &CacheLayoutRegistry) -> Result<(), LayoutError> {
    let mut seen = HashSet::new();
    for id in registry.ids() {
        let entry = registry.entry(id);
        if !seen.insert((entry.parent, entry.name.as_str())) {
            let scope = match entry.parent {
                Some(parent) => format!("'{}'", registry.key(parent)),
                None => "the base directory".to_string(),
            };
            return Err(LayoutError::DuplicateName {
                name: entry.name.clone(),
                scope,
            });
        }
    }
    Ok(())
}
