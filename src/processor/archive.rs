//! Moving source files into the processed and failed folders.

use crate::error::{NormalizerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Move `source` into `dir`, keeping its file name.
///
/// An existing file of the same name in `dir` is replaced. When a plain
/// rename fails (for example across filesystems) the file is copied and
/// the source removed.
pub fn move_into(source: &Path, dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        NormalizerError::configuration(format!("Not a file path: {}", source.display()))
    })?;
    let target = dir.join(file_name);

    if target.is_file() {
        debug!("Replacing existing {}", target.display());
        fs::remove_file(&target).map_err(|e| NormalizerError::move_failed(source, &target, e))?;
    }

    if let Err(rename_error) = fs::rename(source, &target) {
        debug!(
            "Rename of {} failed ({}), falling back to copy",
            source.display(),
            rename_error
        );
        fs::copy(source, &target).map_err(|e| NormalizerError::move_failed(source, &target, e))?;
        if let Err(e) = fs::remove_file(source) {
            // Leave a single copy behind: the source stays where it was
            discard_copy(&target);
            return Err(NormalizerError::move_failed(source, &target, e));
        }
    }

    Ok(target)
}

/// Remove a copy made by an incomplete move; returns false and warns when it remains
fn discard_copy(copy: &Path) -> bool {
    match fs::remove_file(copy) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Could not remove copy {} after an incomplete move, two copies remain: {}",
                copy.display(),
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_into_folder() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("export.csv");
        let archive = temp_dir.path().join("processed");
        fs::create_dir(&archive).unwrap();
        fs::write(&source, "data").unwrap();

        let target = move_into(&source, &archive).unwrap();

        assert_eq!(target, archive.join("export.csv"));
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "data");
    }

    #[test]
    fn test_move_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("export.csv");
        let archive = temp_dir.path().join("failed");
        fs::create_dir(&archive).unwrap();
        fs::write(&source, "new").unwrap();
        fs::write(archive.join("export.csv"), "old").unwrap();

        let target = move_into(&source, &archive).unwrap();

        assert_eq!(fs::read_to_string(target).unwrap(), "new");
    }

    #[test]
    fn test_discard_copy_reports_leftover() {
        let temp_dir = TempDir::new().unwrap();
        let copy = temp_dir.path().join("export.csv");
        fs::write(&copy, "data").unwrap();

        assert!(discard_copy(&copy));
        assert!(!copy.exists());

        // Already gone: the removal fails and is reported instead of ignored
        assert!(!discard_copy(&copy));
    }

    #[test]
    fn test_move_into_missing_folder_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("export.csv");
        fs::write(&source, "data").unwrap();

        let result = move_into(&source, &temp_dir.path().join("missing"));

        assert!(matches!(result, Err(NormalizerError::Move { .. })));
        assert!(source.exists());
    }
}
