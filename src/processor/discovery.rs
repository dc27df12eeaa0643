//! File discovery for the input folder
//!
//! Lists the exports matching the configured glob directly inside the
//! input folder, oldest modification time first.

use crate::error::{NormalizerError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// File discovery component for the input folder
#[derive(Debug)]
pub struct FileDiscovery {
    input_dir: PathBuf,
    file_pattern: String,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_dir: PathBuf, file_pattern: impl Into<String>) -> Self {
        Self {
            input_dir,
            file_pattern: file_pattern.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Discover matching files, oldest first.
    ///
    /// Ties on modification time are broken by file name so the order is
    /// stable between runs.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(NormalizerError::configuration(format!(
                "Input folder does not exist: {}",
                self.input_dir.display()
            )));
        }

        let full_pattern = format!(
            "{}/{}",
            Pattern::escape(&self.input_dir.to_string_lossy()),
            self.file_pattern
        );
        debug!("Searching for input files matching {}", full_pattern);

        let entries = glob::glob(&full_pattern).map_err(|source| NormalizerError::Pattern {
            pattern: self.file_pattern.clone(),
            source,
        })?;

        let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping entry: {}", NormalizerError::from(e));
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            if let Some(modified) = modified_time(&path) {
                files.push((modified, path));
            }
        }

        files.sort_by(|(a_time, a_path), (b_time, b_path)| {
            a_time
                .cmp(b_time)
                .then_with(|| a_path.file_name().cmp(&b_path.file_name()))
        });

        debug!("Found {} input files", files.len());
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }
}

/// Modification time of `path`, or `None` (with a warning) when it cannot be read,
/// for example because the file was removed after it was listed
fn modified_time(path: &Path) -> Option<SystemTime> {
    match path.metadata().and_then(|m| m.modified()) {
        Ok(modified) => Some(modified),
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}
