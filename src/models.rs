//! Core data structures and types for export normalization.
//!
//! Defines site codes, column configuration, per-line and per-file
//! results, and run statistics used throughout the library.

use crate::error::NormalizerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Plant site an export originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    #[serde(rename = "PC1")]
    Pc1,
    #[serde(rename = "P11")]
    P11,
}

impl Site {
    /// Detection order: the first code found wins
    pub const ALL: [Site; 2] = [Site::Pc1, Site::P11];

    /// Code as it appears in filenames and output names
    pub fn code(&self) -> &'static str {
        match self {
            Site::Pc1 => "PC1",
            Site::P11 => "P11",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Site {
    type Err = NormalizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Site::ALL
            .into_iter()
            .find(|site| site.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                NormalizerError::configuration(format!(
                    "Unknown site '{}'. Known sites: PC1, P11",
                    s
                ))
            })
    }
}

/// Shape a configured date column is expected to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnMode {
    /// `DD/MM/YYYY` optionally followed by whitespace and `HH:MM:SS`
    WithTime,
    /// `DD/MM/YYYY` only
    DateOnly,
}

/// A configured date column (1-based index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    pub index: usize,
    pub mode: ColumnMode,
}

impl ColumnSpec {
    pub fn new(index: usize, mode: ColumnMode) -> Self {
        Self { index, mode }
    }
}

/// Result of transforming a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTransformResult {
    pub text: String,
    pub changed: bool,
}

/// Running changed/unchanged line counts for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTally {
    pub total: usize,
    pub changed: usize,
    pub unchanged: usize,
}

impl LineTally {
    /// Count one line
    pub fn record(&mut self, changed: bool) {
        self.total += 1;
        if changed {
            self.changed += 1;
        } else {
            self.unchanged += 1;
        }
    }

    /// Fold another tally into this one
    pub fn merge(&mut self, other: &LineTally) {
        self.total += other.total;
        self.changed += other.changed;
        self.unchanged += other.unchanged;
    }
}

/// Outcome of a successful file conversion
///
/// A failed conversion is reported as an `Err` from the pipeline instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub output_path: PathBuf,
    pub site: Site,
    pub lines: LineTally,
}

impl FileOutcome {
    pub fn total_lines(&self) -> usize {
        self.lines.total
    }

    pub fn changed_lines(&self) -> usize {
        self.lines.changed
    }

    pub fn unchanged_lines(&self) -> usize {
        self.lines.unchanged
    }
}

/// Where a source file ended up after its conversion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Converted and archived in the processed folder
    Processed { outcome: FileOutcome },
    /// Conversion or archiving failed; source moved to the failed folder
    Failed { error: String },
    /// Conversion failed and the source could not be moved to the failed folder either
    Unresolved { error: String, move_error: String },
    /// Dry run: nothing was written or moved
    Skipped { site: Site },
}

/// Per-source-file report kept by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: PathBuf,
    pub disposition: Disposition,
}

/// Processing statistics for a whole run
#[derive(Debug, Default)]
pub struct RunStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub files_unresolved: usize,
    pub lines: LineTally,
    pub reports: Vec<FileReport>,
    pub processing_time_ms: u128,
}

impl RunStats {
    /// True when every discovered file either converted or was skipped by a dry run
    pub fn all_succeeded(&self) -> bool {
        self.files_failed == 0 && self.files_unresolved == 0
    }

    pub(crate) fn record(&mut self, report: FileReport) {
        match &report.disposition {
            Disposition::Processed { outcome } => {
                self.files_processed += 1;
                self.lines.merge(&outcome.lines);
            }
            Disposition::Failed { .. } => self.files_failed += 1,
            Disposition::Unresolved { .. } => self.files_unresolved += 1,
            Disposition::Skipped { .. } => {}
        }
        self.reports.push(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_from_str() {
        assert_eq!("PC1".parse::<Site>().unwrap(), Site::Pc1);
        assert_eq!("p11".parse::<Site>().unwrap(), Site::P11);
        assert!("P12".parse::<Site>().is_err());
    }

    #[test]
    fn test_line_tally_record_and_merge() {
        let mut tally = LineTally::default();
        tally.record(false);
        tally.record(true);
        tally.record(true);

        let mut total = LineTally {
            total: 1,
            changed: 0,
            unchanged: 1,
        };
        total.merge(&tally);

        assert_eq!(tally.changed, 2);
        assert_eq!(tally.unchanged, 1);
        assert_eq!(total.total, 4);
        assert_eq!(total.unchanged, 2);
    }
}
