//! Line sinks for converted output.
//!
//! The line transformation only ever sees a [`LineSink`], so it can be
//! exercised in memory. The file-backed sink writes into a temporary file
//! inside the output folder and is promoted to its final name only after
//! the whole file converted.

use crate::config::LineEnding;
use crate::error::{NormalizerError, Result};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Destination for converted lines
pub trait LineSink {
    /// Write one line; the sink appends the line terminator
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Collects lines in memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl LineSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Streams lines into a temporary file that is deleted unless promoted
#[derive(Debug)]
pub struct TempFileSink {
    writer: BufWriter<NamedTempFile>,
    line_ending: LineEnding,
}

impl TempFileSink {
    /// Create the temporary file inside `dir` so promotion is a same-filesystem rename
    pub fn create(dir: &Path, line_ending: LineEnding) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(".esker-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| NormalizerError::io(dir, e))?;
        debug!("Writing temporary output {}", file.path().display());

        Ok(Self {
            writer: BufWriter::new(file),
            line_ending,
        })
    }

    /// Current location of the temporary file
    pub fn path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    /// Flush and rename the temporary file to `target`.
    ///
    /// Fails instead of overwriting when `target` already exists.
    pub fn persist(self, target: &Path) -> Result<PathBuf> {
        let temp_path = self.path().to_path_buf();
        let file = self
            .writer
            .into_inner()
            .map_err(|e| NormalizerError::io(&temp_path, e.into_error()))?;
        file.as_file()
            .sync_all()
            .map_err(|e| NormalizerError::io(&temp_path, e))?;

        file.persist_noclobber(target)
            .map_err(|e| NormalizerError::move_failed(&temp_path, target, e.error))?;
        Ok(target.to_path_buf())
    }
}

impl LineSink for TempFileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(self.line_ending.as_str().as_bytes())
    }
}
