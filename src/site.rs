//! Site detection for plant exports.
//!
//! The site is taken from the filename when it carries a site code as a
//! whole word, otherwise from the leading tokens of the first data line,
//! otherwise the configured default applies.

use crate::constants::{SITE_PROBE_LINES, SITE_PROBE_TOKENS};
use crate::error::{NormalizerError, Result};
use crate::models::Site;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Detects which site an export belongs to
#[derive(Debug, Clone)]
pub struct SiteDetector {
    default_site: Site,
    patterns: Vec<(Site, Regex)>,
}

impl SiteDetector {
    pub fn new(default_site: Site) -> Result<Self> {
        let patterns = Site::ALL
            .into_iter()
            .map(|site| Ok((site, Regex::new(&format!(r"(?i)\b{}\b", site.code()))?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            default_site,
            patterns,
        })
    }

    /// First site code found as a whole word in `text`, in detection order
    pub fn find_in_text(&self, text: &str) -> Option<Site> {
        self.patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(site, _)| *site)
    }

    /// Detect the site of the export at `path`.
    ///
    /// Reads at most the header and two data lines. The data line is split on
    /// every comma regardless of quoting; this probe is deliberately lenient.
    pub fn detect(&self, path: &Path) -> Result<Site> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if let Some(site) = self.find_in_text(&file_name) {
            debug!("Site {} detected from filename {}", site, file_name);
            return Ok(site);
        }

        let file = File::open(path).map_err(|e| NormalizerError::io(path, e))?;
        let lines = BufReader::new(file)
            .lines()
            .take(SITE_PROBE_LINES)
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| NormalizerError::io(path, e))?;

        if let Some(first_data_line) = lines.get(1) {
            let probe = first_data_line
                .split(',')
                .take(SITE_PROBE_TOKENS)
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(site) = self.find_in_text(&probe) {
                debug!("Site {} detected from first data line of {}", site, file_name);
                return Ok(site);
            }
        }

        debug!(
            "No site code found for {}, using default {}",
            file_name, self.default_site
        );
        Ok(self.default_site)
    }
}
