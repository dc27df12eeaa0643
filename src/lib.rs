//! ESKER Export Normalizer Library
//!
//! Converts CSV exports from the PC1 and P11 plant sites into the layout
//! expected by the ESKER drop folder.
//!
//! This library provides tools for:
//! - Locating a field by position in a raw CSV line, skipping commas inside quoted fields
//! - Rewriting `DD/MM/YYYY[ HH:MM:SS]` dates to `YYYY-MM-DD` while keeping quoting intact
//! - Detecting the originating site from the filename or first data line
//! - Streaming files through a temporary output promoted to a collision-free name
//! - Routing source files to processed or failed archives, one file at a time

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod processor;
pub mod rewrite;
pub mod site;

// Re-export commonly used types
pub use config::{LineEnding, NormalizerConfig};
pub use error::{NormalizerError, Result};
pub use models::{
    ColumnMode, ColumnSpec, Disposition, FileOutcome, FileReport, LineTally, LineTransformResult,
    RunStats, Site,
};
pub use processor::BatchProcessor;
pub use processor::pipeline::FilePipeline;
pub use rewrite::LineTransformer;
pub use site::SiteDetector;
