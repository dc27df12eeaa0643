//! Orchestration tests for the batch processor

pub mod basic_processing;

use crate::config::NormalizerConfig;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Header plus two data rows in the reference column layout
pub const EXPORT_CSV: &str = "\
order,customer,created,confirmed,a,b,c,d,e,f,due,g,shipped
1001,\"Smith, J\",\"25/12/2023 09:00:00\",26/12/2023 10:15:00,x,y,z,h,i,j,27/12/2023,k,28/12/2023
1002,Jones,N/A,,x,y,z,h,i,j,,k,
";

pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Config rooted in a temp dir with the input folder created
pub fn test_config(temp_dir: &TempDir) -> NormalizerConfig {
    let config = NormalizerConfig::default().with_root(temp_dir.path());
    fs::create_dir_all(&config.input_dir).unwrap();
    config
}

/// Write an input file with a modification time `age_secs` in the past
pub fn write_input(dir: &Path, name: &str, contents: &[u8], age_secs: u64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .unwrap();
    path
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
