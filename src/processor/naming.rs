//! Output file naming.
//!
//! Output names follow `synthomer_<SITE>_ESKER_<YYYY-MM-DD>.csv`. When that
//! name is taken a `(N)` suffix is added before the extension, counting up
//! from 1 until a free name is found. The check is not atomic; a single
//! process is assumed, and it is repeated for every file since an earlier
//! file in the same run may have claimed the name.

use crate::constants::{OUTPUT_EXTENSION, OUTPUT_NAME_PREFIX, OUTPUT_SYSTEM_NAME, RUN_DATE_FORMAT};
use crate::models::Site;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Base output file name for a site and run date
pub fn output_file_name(site: Site, run_date: NaiveDate) -> String {
    format!("{}.{}", output_file_stem(site, run_date), OUTPUT_EXTENSION)
}

fn output_file_stem(site: Site, run_date: NaiveDate) -> String {
    format!(
        "{}_{}_{}_{}",
        OUTPUT_NAME_PREFIX,
        site.code(),
        OUTPUT_SYSTEM_NAME,
        run_date.format(RUN_DATE_FORMAT)
    )
}

/// First free output path in `dir` for a site and run date
pub fn next_output_path(dir: &Path, site: Site, run_date: NaiveDate) -> PathBuf {
    unique_path(dir, &output_file_stem(site, run_date), OUTPUT_EXTENSION)
}

/// `dir/stem.ext`, or `dir/stem(N).ext` with the smallest N >= 1 that is free
pub fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.{}", stem, extension));
    if !candidate.exists() {
        return candidate;
    }

    (1usize..)
        .map(|n| dir.join(format!("{}({}).{}", stem, n, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
