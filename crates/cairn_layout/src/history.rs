//! Append-only version histories of cache entries.
//!
//! Each cache entry records every format change as a `(version, release)`
//! pair. Only the latest version names the directory in use; the earlier
//! records map old directory names back to the release that wrote them.

use crate::error::HistoryError;
use crate::version::Release;

/// One format change of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Format version introduced by this change.
    pub version: u32,
    /// Release that first shipped this version.
    pub release: Release,
}

/// Validated history of a cache entry's format versions.
///
/// Non-empty, with strictly increasing versions and strictly increasing
/// releases. Skipped numbers are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHistory {
    records: Vec<VersionRecord>,
}

impl VersionHistory {
    /// Starts a history at version 1, introduced in `release`.
    pub fn introduced_in(release: impl Into<String>) -> VersionHistoryBuilder {
        VersionHistoryBuilder {
            records: vec![(1, release.into())],
            overflow: None,
        }
    }

    /// Starts a history from explicit records, in order.
    pub fn from_records<I, S>(records: I) -> VersionHistoryBuilder
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        VersionHistoryBuilder {
            records: records
                .into_iter()
                .map(|(version, release)| (version, release.into()))
                .collect(),
            overflow: None,
        }
    }

    /// The effective version: the number of the most recent record.
    pub fn latest_version(&self) -> u32 {
        self.latest().version
    }

    /// The most recent record.
    pub fn latest(&self) -> &VersionRecord {
        // Non-empty by construction.
        &self.records[self.records.len() - 1]
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    /// The version written by `release`, or `None` if the entry did not
    /// exist yet in that release.
    pub fn version_used_by(&self, release: &Release) -> Option<u32> {
        self.records
            .iter()
            .rev()
            .find(|record| record.release <= *release)
            .map(|record| record.version)
    }

    /// The release that introduced `version`, if it is part of the history.
    pub fn introduced_by(&self, version: u32) -> Option<&Release> {
        self.records
            .iter()
            .find(|record| record.version == version)
            .map(|record| &record.release)
    }
}

/// Fluent builder for [`VersionHistory`]; validated by [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct VersionHistoryBuilder {
    records: Vec<(u32, String)>,
    /// Version that `incremented_in` could not step past.
    overflow: Option<u32>,
}

impl VersionHistoryBuilder {
    /// Appends the version following the current latest one.
    pub fn incremented_in(mut self, release: impl Into<String>) -> Self {
        let previous = self.records.last().map_or(0, |(version, _)| *version);
        match previous.checked_add(1) {
            Some(next) => self.records.push((next, release.into())),
            None => {
                self.overflow.get_or_insert(previous);
            }
        }
        self
    }

    /// Appends an explicit version.
    pub fn changed_to(mut self, version: u32, release: impl Into<String>) -> Self {
        self.records.push((version, release.into()));
        self
    }

    /// Checks the records and produces the history.
    pub fn build(self) -> Result<VersionHistory, HistoryError> {
        if let Some(previous) = self.overflow {
            return Err(HistoryError::VersionOverflow { previous });
        }
        if self.records.is_empty() {
            return Err(HistoryError::Empty);
        }
        let mut records: Vec<VersionRecord> = Vec::with_capacity(self.records.len());
        for (version, label) in self.records {
            if let Some(previous) = records.last() {
                if version <= previous.version {
                    return Err(HistoryError::NotIncreasing {
                        previous: previous.version,
                        version,
                    });
                }
            }
            let release = label.parse::<Release>()?;
            if let Some(previous) = records.last() {
                if release <= previous.release {
                    return Err(HistoryError::ReleaseNotIncreasing {
                        previous: previous.release.label().to_string(),
                        release: release.label().to_string(),
                    });
                }
            }
            records.push(VersionRecord { version, release });
        }
        Ok(VersionHistory { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(s: &str) -> Release {
        s.parse().unwrap()
    }

    fn metadata_history() -> VersionHistory {
        VersionHistory::introduced_in("1.9-rc-2")
            .changed_to(2, "1.11-rc-1")
            .changed_to(6, "1.12-rc-1")
            .changed_to(17, "3.0-milestone-1")
            .changed_to(51, "4.5.1")
            .changed_to(58, "4.8-rc-1")
            .build()
            .unwrap()
    }

    #[test]
    fn introduced_in_starts_at_one() {
        let history = VersionHistory::introduced_in("3.5-rc-1").build().unwrap();
        assert_eq!(history.latest_version(), 1);
        assert_eq!(history.records().len(), 1);
    }

    #[test]
    fn incremented_in_adds_one() {
        let history = VersionHistory::introduced_in("1.9-rc-1")
            .incremented_in("1.9-rc-2")
            .build()
            .unwrap();
        assert_eq!(history.latest_version(), 2);
        assert_eq!(history.latest().release.label(), "1.9-rc-2");
    }

    #[test]
    fn latest_version_is_last_record() {
        assert_eq!(metadata_history().latest_version(), 58);
    }

    #[test]
    fn skipped_versions_are_allowed() {
        let history = VersionHistory::introduced_in("1.0")
            .changed_to(40, "2.0")
            .build()
            .unwrap();
        assert_eq!(history.latest_version(), 40);
    }

    #[test]
    fn non_increasing_version_is_rejected() {
        let err = VersionHistory::introduced_in("1.0")
            .changed_to(5, "2.0")
            .changed_to(5, "3.0")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            HistoryError::NotIncreasing {
                previous: 5,
                version: 5
            }
        );
    }

    #[test]
    fn decreasing_version_is_rejected() {
        let err = VersionHistory::from_records([(3, "1.0"), (2, "2.0")])
            .build()
            .unwrap_err();
        assert!(matches!(err, HistoryError::NotIncreasing { .. }));
    }

    #[test]
    fn decreasing_release_is_rejected() {
        let err = VersionHistory::from_records([(1, "1.0"), (2, "3.0"), (3, "2.0")])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            HistoryError::ReleaseNotIncreasing {
                previous: "3.0".to_string(),
                release: "2.0".to_string(),
            }
        );
    }

    #[test]
    fn repeated_release_is_rejected() {
        let err = VersionHistory::introduced_in("2.0")
            .incremented_in("2.0.0")
            .build()
            .unwrap_err();
        assert!(matches!(err, HistoryError::ReleaseNotIncreasing { .. }));
    }

    #[test]
    fn every_record_is_reachable_by_its_release() {
        let history = metadata_history();
        for record in history.records() {
            assert_eq!(
                history.version_used_by(&record.release),
                Some(record.version),
                "{}",
                record.release
            );
        }
    }

    #[test]
    fn increment_past_max_version_is_rejected() {
        let err = VersionHistory::introduced_in("1.0")
            .changed_to(u32::MAX, "2.0")
            .incremented_in("3.0")
            .build()
            .unwrap_err();
        assert_eq!(err, HistoryError::VersionOverflow { previous: u32::MAX });
    }

    #[test]
    fn empty_history_is_rejected() {
        let err = VersionHistory::from_records(Vec::<(u32, String)>::new())
            .build()
            .unwrap_err();
        assert_eq!(err, HistoryError::Empty);
    }

    #[test]
    fn bad_release_label_is_rejected() {
        let err = VersionHistory::introduced_in("someday").build().unwrap_err();
        assert!(matches!(err, HistoryError::InvalidRelease(_)));
    }

    #[test]
    fn version_used_by_release() {
        let history = metadata_history();
        assert_eq!(history.version_used_by(&release("1.9-rc-1")), None);
        assert_eq!(history.version_used_by(&release("1.9-rc-2")), Some(1));
        assert_eq!(history.version_used_by(&release("1.10")), Some(1));
        assert_eq!(history.version_used_by(&release("1.12")), Some(6));
        assert_eq!(history.version_used_by(&release("2.14.1")), Some(6));
        assert_eq!(history.version_used_by(&release("3.0-rc-1")), Some(17));
        assert_eq!(history.version_used_by(&release("4.5")), Some(17));
        assert_eq!(history.version_used_by(&release("4.5.1")), Some(51));
        assert_eq!(history.version_used_by(&release("4.8")), Some(58));
        assert_eq!(history.version_used_by(&release("9.0")), Some(58));
    }

    #[test]
    fn introduced_by_maps_version_to_release() {
        let history = metadata_history();
        assert_eq!(
            history.introduced_by(51).map(Release::label),
            Some("4.5.1")
        );
        assert!(history.introduced_by(3).is_none());
    }
}
