//! Configuration management and validation.
//!
//! Provides the run configuration: folder layout, input pattern, date
//! column groups, default site and output line ending. Values are layered
//! defaults -> optional TOML file -> command-line overrides.

use crate::constants::{
    DEFAULT_COLUMNS_DATE_ONLY, DEFAULT_COLUMNS_WITH_TIME, DEFAULT_FAILED_DIR,
    DEFAULT_FILE_PATTERN, DEFAULT_INPUT_DIR, DEFAULT_LOG_DIR, DEFAULT_OUTPUT_DIR,
    DEFAULT_PROCESSED_DIR,
};
use crate::error::{NormalizerError, Result};
use crate::models::{ColumnMode, ColumnSpec, Site};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Line terminator appended after each output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Global configuration for a normalization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Folder scanned for exports
    pub input_dir: PathBuf,

    /// Folder receiving normalized output files
    pub output_dir: PathBuf,

    /// Archive for successfully converted source files
    pub processed_dir: PathBuf,

    /// Archive for source files that failed to convert
    pub failed_dir: PathBuf,

    /// Folder holding one log file per run
    pub log_dir: PathBuf,

    /// Glob matched against file names in the input folder
    pub file_pattern: String,

    /// Site used when neither filename nor content names one
    pub default_site: Site,

    /// 1-based columns holding a date with optional time-of-day
    pub columns_with_time: Vec<usize>,

    /// 1-based columns holding a bare date
    pub columns_date_only: Vec<usize>,

    /// Terminator written after each output line
    pub line_ending: LineEnding,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            processed_dir: PathBuf::from(DEFAULT_PROCESSED_DIR),
            failed_dir: PathBuf::from(DEFAULT_FAILED_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            default_site: Site::Pc1,
            columns_with_time: DEFAULT_COLUMNS_WITH_TIME.to_vec(),
            columns_date_only: DEFAULT_COLUMNS_DATE_ONLY.to_vec(),
            line_ending: LineEnding::default(),
        }
    }
}

impl NormalizerConfig {
    /// Load a TOML configuration file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| NormalizerError::io(path, e))?;
        let config: Self = toml::from_str(&contents).map_err(|e| {
            NormalizerError::configuration(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Use one root folder for input, output, archives and logs
    pub fn with_root(mut self, root: &Path) -> Self {
        self.input_dir = root.join(DEFAULT_INPUT_DIR);
        self.output_dir = root.join(DEFAULT_OUTPUT_DIR);
        self.processed_dir = root.join(DEFAULT_PROCESSED_DIR);
        self.failed_dir = root.join(DEFAULT_FAILED_DIR);
        self.log_dir = root.join(DEFAULT_LOG_DIR);
        self
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_processed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.processed_dir = dir.into();
        self
    }

    pub fn with_failed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failed_dir = dir.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_default_site(mut self, site: Site) -> Self {
        self.default_site = site;
        self
    }

    /// Replace both column groups
    pub fn with_columns(mut self, with_time: &[usize], date_only: &[usize]) -> Self {
        self.columns_with_time = with_time.to_vec();
        self.columns_date_only = date_only.to_vec();
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Both column groups as column specs
    pub fn column_specs(&self) -> Vec<ColumnSpec> {
        self.columns_with_time
            .iter()
            .map(|&i| ColumnSpec::new(i, ColumnMode::WithTime))
            .chain(
                self.columns_date_only
                    .iter()
                    .map(|&i| ColumnSpec::new(i, ColumnMode::DateOnly)),
            )
            .collect()
    }

    /// Check the configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.file_pattern.trim().is_empty() {
            return Err(NormalizerError::configuration("File pattern cannot be empty"));
        }

        if self.column_specs().iter().any(|column| column.index == 0) {
            return Err(NormalizerError::configuration(
                "Column indexes are 1-based; 0 is not a valid column",
            ));
        }

        let with_time: HashSet<usize> = self.columns_with_time.iter().copied().collect();
        if let Some(index) = self
            .columns_date_only
            .iter()
            .find(|index| with_time.contains(*index))
        {
            return Err(NormalizerError::configuration(format!(
                "Column {} is configured both with time and date only",
                index
            )));
        }

        if self.input_dir == self.output_dir {
            return Err(NormalizerError::configuration(format!(
                "Output folder must differ from input folder: {}",
                self.input_dir.display()
            )));
        }

        Ok(())
    }
}
