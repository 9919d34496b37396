//! Error types for cache layout configuration.
//!
//! Every error here describes a mistake in static configuration. They are
//! reported when a registry is built; resolving keys and paths afterwards
//! cannot fail.

/// Errors that can occur while building or loading a cache layout registry.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// An I/O error occurred while reading a layout configuration file.
    #[error("failed to read layout configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse layout configuration: {0}")]
    Parse(String),

    /// An entry's version history is malformed.
    #[error("invalid version history for cache entry '{entry}': {source}")]
    History {
        /// Name of the offending entry.
        entry: String,
        /// What is wrong with the history.
        source: HistoryError,
    },

    /// An entry name cannot be used as a single directory segment.
    #[error("invalid cache entry name '{name}'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// An entry refers to a parent that is not part of the registry.
    #[error("cache entry '{entry}' refers to unknown parent '{parent}'")]
    UnknownParent {
        /// Name of the offending entry.
        entry: String,
        /// The unresolved parent reference.
        parent: String,
    },

    /// Following parent references from an entry leads back to itself.
    #[error("cache entry '{entry}' is part of a parent cycle")]
    ParentCycle {
        /// Name of an entry on the cycle.
        entry: String,
    },

    /// Two entries with the same parent share a name.
    #[error("duplicate cache entry name '{name}' in {scope}")]
    DuplicateName {
        /// The duplicated name.
        name: String,
        /// Where the duplicates live (the base directory or a parent key).
        scope: String,
    },
}

/// Problems with a single entry's version history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The history has no records.
    #[error("history is empty")]
    Empty,

    /// A record's version is not greater than the one before it.
    #[error("version {version} does not increase on previous version {previous}")]
    NotIncreasing {
        /// The version of the preceding record.
        previous: u32,
        /// The offending version.
        version: u32,
    },

    /// A record's release is not later than the one before it.
    #[error("release {release} does not follow previous release {previous}")]
    ReleaseNotIncreasing {
        /// The release of the preceding record.
        previous: String,
        /// The offending release.
        release: String,
    },

    /// `incremented_in` was applied to the largest representable version.
    #[error("version {previous} cannot be incremented")]
    VersionOverflow {
        /// The version that could not be incremented.
        previous: u32,
    },

    /// A record's release label could not be parsed.
    #[error("invalid release label: {0}")]
    InvalidRelease(#[from] ParseReleaseError),
}

/// A release label that does not follow `<major>.<minor>[.<patch>][-(milestone|rc)-<n>]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{label}' is not a release label: {reason}")]
pub struct ParseReleaseError {
    /// The rejected label.
    pub label: String,
    /// Why it was rejected.
    pub reason: String,
}

/// A string that is not a dotted numeric version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a dotted numeric version")]
pub struct ParseVersionError(pub String);
