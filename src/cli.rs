//! Command-line interface components.

use crate::config::NormalizerConfig;
use crate::constants::RUN_DATE_FORMAT;
use crate::error::{NormalizerError, Result};
use crate::models::{Disposition, RunStats, Site};
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};

/// Normalize date columns in plant CSV exports for ESKER
///
/// Converts every matching export in the input folder, writes
/// `synthomer_<SITE>_ESKER_<DATE>.csv` into the output folder and archives
/// each source file as processed or failed.
#[derive(Parser, Debug, Clone)]
#[command(name = "esker-normalizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Normalize date columns in plant CSV exports and route them to ESKER")]
pub struct Args {
    /// Run date used in output names (YYYY-MM-DD); defaults to today
    #[arg(short = 'd', long = "date", value_name = "YYYY-MM-DD", value_parser = parse_run_date)]
    pub date: Option<NaiveDate>,

    /// Folder scanned for exports
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input_dir: Option<PathBuf>,

    /// Folder receiving normalized files
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Archive folder for converted source files
    #[arg(long = "processed", value_name = "PATH")]
    pub processed_dir: Option<PathBuf>,

    /// Archive folder for source files that failed
    #[arg(long = "failed", value_name = "PATH")]
    pub failed_dir: Option<PathBuf>,

    /// Folder receiving one log file per run
    #[arg(long = "log-dir", value_name = "PATH")]
    pub log_dir: Option<PathBuf>,

    /// Glob matched against file names in the input folder
    #[arg(short = 'p', long = "pattern", value_name = "GLOB")]
    pub file_pattern: Option<String>,

    /// Site used when neither filename nor content names one (PC1 or P11)
    #[arg(long = "default-site", value_name = "SITE")]
    pub default_site: Option<Site>,

    /// Path to configuration file (TOML format)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Discover files and detect sites without writing or moving anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Parse a `YYYY-MM-DD` run date
pub fn parse_run_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return Err(NormalizerError::InvalidRunDate {
            value: value.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, RUN_DATE_FORMAT).map_err(|_| {
        NormalizerError::InvalidRunDate {
            value: value.to_string(),
        }
    })
}

impl Args {
    /// The run date, defaulting to today's local date
    pub fn run_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Console log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// The run log always records the run's events; -vv and up add detail
    pub fn get_file_log_level(&self) -> &'static str {
        match self.verbose {
            0 | 1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Layer defaults, the optional config file and command-line overrides
    pub fn load_config(&self) -> Result<NormalizerConfig> {
        let mut config = match &self.config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(NormalizerError::configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                NormalizerConfig::from_file(path)?
            }
            None => NormalizerConfig::default(),
        };

        if let Some(dir) = &self.input_dir {
            config.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.processed_dir {
            config.processed_dir = dir.clone();
        }
        if let Some(dir) = &self.failed_dir {
            config.failed_dir = dir.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if let Some(pattern) = &self.file_pattern {
            config.file_pattern = pattern.clone();
        }
        if let Some(site) = self.default_site {
            config.default_site = site;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Print the end-of-run summary to stdout
pub fn print_summary(stats: &RunStats, log_path: &Path) {
    println!("\n{}", "Run summary".bright_green().bold());
    println!(
        "  {} {}",
        "Files found:".bright_cyan(),
        stats.files_discovered.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Processed:".bright_cyan(),
        stats.files_processed.to_string().bright_green()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Failed:".bright_cyan(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    if stats.files_unresolved > 0 {
        println!(
            "  {} {}",
            "Left in input:".bright_cyan(),
            stats.files_unresolved.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {} ({} changed, {} unchanged)",
        "Lines:".bright_cyan(),
        stats.lines.total,
        stats.lines.changed,
        stats.lines.unchanged
    );

    for report in &stats.reports {
        let name = report.source.display();
        match &report.disposition {
            Disposition::Processed { outcome } => {
                println!("  {} {} -> {}", "ok".green(), name, outcome.output_path.display())
            }
            Disposition::Failed { error } => println!("  {} {}: {}", "failed".red(), name, error),
            Disposition::Unresolved { move_error, .. } => {
                println!("  {} {}: {}", "unresolved".red().bold(), name, move_error)
            }
            Disposition::Skipped { site } => {
                println!("  {} {} (site {})", "dry-run".yellow(), name, site)
            }
        }
    }

    println!(
        "  {} {} ms, log: {}",
        "Elapsed:".bright_cyan(),
        stats.processing_time_ms,
        log_path.display()
    );
}
