//! Dotted numeric versions and release labels.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseReleaseError, ParseVersionError};

/// Compares numeric components, treating missing trailing components as zero.
fn cmp_components(a: &[u32], b: &[u32]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn parse_components(s: &str) -> Option<Vec<u32>> {
    if s.is_empty() {
        return None;
    }
    s.split('.').map(|part| part.parse::<u32>().ok()).collect()
}

/// A dotted numeric version such as `2.58`, as used in cache directory names.
///
/// Ordering is component-wise, so `2.9 < 2.58`, and `2.58 == 2.58.0`.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionNumber {
    components: Vec<u32>,
}

impl VersionNumber {
    /// Creates a version from its components, which must not be empty.
    pub(crate) fn new(components: Vec<u32>) -> Self {
        debug_assert!(!components.is_empty(), "a version needs at least one component");
        Self { components }
    }

    /// Numeric components, most significant first.
    pub fn components(&self) -> &[u32] {
        &self.components
    }
}

impl PartialEq for VersionNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_components(&self.components, &other.components)
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for VersionNumber {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_components(s)
            .map(Self::new)
            .ok_or_else(|| ParseVersionError(s.to_string()))
    }
}

impl TryFrom<String> for VersionNumber {
    type Error = ParseVersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VersionNumber> for String {
    fn from(version: VersionNumber) -> Self {
        version.to_string()
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        Ok(())
    }
}

/// Pre-release stage of a tool release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// `-milestone-<n>`.
    Milestone(u32),
    /// `-rc-<n>`.
    ReleaseCandidate(u32),
    /// No suffix.
    Final,
}

/// A tool release label such as `1.9-rc-2`, `3.0-milestone-1` or `4.5.1`.
///
/// Releases order by their numeric part first, then milestone before
/// release candidate before final.
#[derive(Debug, Clone)]
pub struct Release {
    label: String,
    components: Vec<u32>,
    stage: Stage,
}

impl Release {
    /// The label exactly as written.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The pre-release stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The numeric part, e.g. `[4, 5, 1]`.
    pub fn components(&self) -> &[u32] {
        &self.components
    }
}

impl FromStr for Release {
    type Err = ParseReleaseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| ParseReleaseError {
            label: label.to_string(),
            reason: reason.to_string(),
        };

        let (base, suffix) = match label.split_once('-') {
            Some((base, suffix)) => (base, Some(suffix)),
            None => (label, None),
        };
        let components =
            parse_components(base).ok_or_else(|| fail("expected a dotted numeric version"))?;
        if components.len() < 2 {
            return Err(fail("expected at least major and minor components"));
        }

        let stage = match suffix {
            None => Stage::Final,
            Some(suffix) => {
                let (kind, number) = suffix
                    .split_once('-')
                    .ok_or_else(|| fail("expected '<stage>-<number>' after '-'"))?;
                let number = number
                    .parse::<u32>()
                    .map_err(|_| fail("stage number is not numeric"))?;
                match kind {
                    "milestone" => Stage::Milestone(number),
                    "rc" => Stage::ReleaseCandidate(number),
                    _ => return Err(fail("stage must be 'milestone' or 'rc'")),
                }
            }
        };

        Ok(Self {
            label: label.to_string(),
            components,
            stage,
        })
    }
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Release {}

impl Ord for Release {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_components(&self.components, &other.components).then(self.stage.cmp(&other.stage))
    }
}

impl PartialOrd for Release {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
