//! Per-file conversion pipeline
//!
//! Detects the site, streams the source line by line through the line
//! transformer into a temporary output, then promotes the output to its
//! final collision-free name. Nothing reaches the output folder under a
//! final name unless every line converted and was written.

use super::naming::next_output_path;
use super::sink::{LineSink, TempFileSink};
use crate::config::{LineEnding, NormalizerConfig};
use crate::error::{NormalizerError, Result};
use crate::models::{FileOutcome, LineTally, Site};
use crate::rewrite::LineTransformer;
use crate::site::SiteDetector;

use chrono::NaiveDate;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stream every line of `reader` through `transformer` into `sink`.
///
/// Line 0 is the header and is passed through unchanged.
pub fn transform_lines<R: BufRead, S: LineSink>(
    reader: R,
    transformer: &LineTransformer,
    sink: &mut S,
) -> io::Result<LineTally> {
    let mut tally = LineTally::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let result = transformer.transform(&line, index == 0);
        sink.write_line(&result.text)?;
        tally.record(result.changed);
    }

    Ok(tally)
}

/// Converts one source file into one output file
#[derive(Debug)]
pub struct FilePipeline {
    transformer: LineTransformer,
    detector: SiteDetector,
    output_dir: PathBuf,
    line_ending: LineEnding,
    run_date: NaiveDate,
}

impl FilePipeline {
    /// Compile the column table and site patterns once for the whole run
    pub fn new(config: &NormalizerConfig, run_date: NaiveDate) -> Result<Self> {
        let transformer = LineTransformer::from_config(config)?;
        debug!(
            "Date columns in application order: {:?}",
            transformer.columns()
        );

        Ok(Self {
            transformer,
            detector: SiteDetector::new(config.default_site)?,
            output_dir: config.output_dir.clone(),
            line_ending: config.line_ending,
            run_date,
        })
    }

    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Detect the site of `source` without converting it
    pub fn detect_site(&self, source: &Path) -> Result<Site> {
        self.detector.detect(source)
    }

    /// Convert `source` into the output folder
    pub fn process(&self, source: &Path) -> Result<FileOutcome> {
        let site = self.detector.detect(source)?;
        info!("Site detected: {}", site);

        let file = File::open(source).map_err(|e| NormalizerError::io(source, e))?;
        let mut sink = TempFileSink::create(&self.output_dir, self.line_ending)?;
        let lines = transform_lines(BufReader::new(file), &self.transformer, &mut sink)
            .map_err(|e| NormalizerError::io(source, e))?;
        debug!(
            "Converted {} lines of {} into {}",
            lines.total,
            source.display(),
            sink.path().display()
        );

        let target = next_output_path(&self.output_dir, site, self.run_date);
        let output_path = sink.persist(&target)?;

        Ok(FileOutcome {
            output_path,
            site,
            lines,
        })
    }
}
