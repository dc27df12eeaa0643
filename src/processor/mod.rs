//! Run orchestration.
//!
//! Discovers the exports in the input folder, converts them one at a time
//! oldest first, and routes each source file to the processed or failed
//! folder. Failures never escape the per-file boundary: the run always
//! reaches its completion entry.

pub mod archive;
pub mod discovery;
pub mod naming;
pub mod pipeline;
pub mod sink;

#[cfg(test)]
pub mod tests;

use self::{
    archive::move_into, discovery::FileDiscovery, naming::output_file_name,
    pipeline::FilePipeline,
};

use crate::config::NormalizerConfig;
use crate::constants::RUN_DATE_FORMAT;
use crate::error::{NormalizerError, Result};
use crate::models::{Disposition, FileOutcome, FileReport, RunStats};

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Main processor for a normalization run
#[derive(Debug)]
pub struct BatchProcessor {
    config: NormalizerConfig,
    file_discovery: FileDiscovery,
    pipeline: FilePipeline,
    dry_run: bool,
    show_progress: bool,
}

impl BatchProcessor {
    /// Create a processor for a validated configuration and run date
    pub fn new(config: NormalizerConfig, run_date: NaiveDate) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            file_discovery: FileDiscovery::new(
                config.input_dir.clone(),
                config.file_pattern.clone(),
            ),
            pipeline: FilePipeline::new(&config, run_date)?,
            config,
            dry_run: false,
            show_progress: false,
        })
    }

    /// Only discover files and detect sites; write and move nothing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Draw a progress bar over the discovered files
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Create the output, archive and log folders if missing
    pub fn prepare_directories(&self) -> Result<()> {
        for dir in [
            &self.config.output_dir,
            &self.config.processed_dir,
            &self.config.failed_dir,
            &self.config.log_dir,
        ] {
            fs::create_dir_all(dir).map_err(|e| NormalizerError::io(dir, e))?;
        }
        Ok(())
    }

    /// Main processing entry point.
    ///
    /// Only setup failures (folders, discovery) are returned as errors;
    /// per-file failures are recorded in the returned stats.
    pub fn run(&self) -> Result<RunStats> {
        let start_time = Instant::now();
        info!(
            "Run started: run date {}, input {}",
            self.pipeline.run_date().format(RUN_DATE_FORMAT),
            self.file_discovery.input_dir().display()
        );

        if !self.dry_run {
            self.prepare_directories()?;
        }

        let files = self.file_discovery.discover_files()?;
        info!("Found {} file(s) to process", files.len());

        let mut stats = RunStats {
            files_discovered: files.len(),
            ..Default::default()
        };

        let progress_bar = self.progress_bar(files.len());
        for source in &files {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            progress_bar.set_message(name);

            let report = if self.dry_run {
                self.preview_file(source)
            } else {
                self.process_file(source)
            };
            stats.record(report);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Run completed: {} processed, {} failed, {} unresolved, {} lines ({} changed, {} unchanged) in {} ms",
            stats.files_processed,
            stats.files_failed,
            stats.files_unresolved,
            stats.lines.total,
            stats.lines.changed,
            stats.lines.unchanged,
            stats.processing_time_ms
        );

        Ok(stats)
    }

    /// Convert one file and route its source to processed or failed
    pub fn process_file(&self, source: &Path) -> FileReport {
        info!("Processing {}", source.display());

        let disposition = match self.convert_and_archive(source) {
            Ok(outcome) => Disposition::Processed { outcome },
            Err(primary) => {
                error!("Failed: {}", primary);
                match move_into(source, &self.config.failed_dir) {
                    Ok(target) => {
                        info!("Moved source to failed: {}", target.display());
                        Disposition::Failed {
                            error: primary.to_string(),
                        }
                    }
                    Err(move_error) => {
                        let unresolved = NormalizerError::FallbackMove {
                            path: source.to_path_buf(),
                            source: Box::new(move_error),
                        };
                        error!("{}; source left in place", unresolved);
                        Disposition::Unresolved {
                            error: primary.to_string(),
                            move_error: unresolved.to_string(),
                        }
                    }
                }
            }
        };

        FileReport {
            source: source.to_path_buf(),
            disposition,
        }
    }

    fn convert_and_archive(&self, source: &Path) -> Result<FileOutcome> {
        let outcome = self.pipeline.process(source)?;
        info!(
            "Lines: {} total, {} changed, {} unchanged",
            outcome.total_lines(),
            outcome.changed_lines(),
            outcome.unchanged_lines()
        );
        info!("Output written: {}", outcome.output_path.display());

        match move_into(source, &self.config.processed_dir) {
            Ok(target) => {
                info!("Moved source to processed: {}", target.display());
                Ok(outcome)
            }
            Err(e) => {
                warn!(
                    "Output {} was written but the source could not be archived",
                    outcome.output_path.display()
                );
                Err(e)
            }
        }
    }

    fn preview_file(&self, source: &Path) -> FileReport {
        let disposition = match self.pipeline.detect_site(source) {
            Ok(site) => {
                info!(
                    "Dry run: {} would be written as {} into {}",
                    source.display(),
                    output_file_name(site, self.pipeline.run_date()),
                    self.pipeline.output_dir().display()
                );
                Disposition::Skipped { site }
            }
            Err(e) => {
                error!("Dry run: {} could not be probed: {}", source.display(), e);
                Disposition::Failed {
                    error: e.to_string(),
                }
            }
        };

        FileReport {
            source: source.to_path_buf(),
            disposition,
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        progress_bar
    }
}
