//! Input directory listing.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ArchiveError, Result};

/// List regular files directly inside `dir` whose extension is `extension`,
/// sorted by path.
///
/// `exclude`, when it names an existing file, is left out of the listing even if
/// it matches.
pub fn list_input_files(dir: &Path, extension: &str, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let excluded = exclude.and_then(|path| path.canonicalize().ok());

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ArchiveError::Scan {
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
            continue;
        }
        if excluded.is_some() && path.canonicalize().ok() == excluded {
            warn!(path = %path.display(), "Skipping output file found among inputs");
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "Listed input files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["wind_2020_03.nc", "wind_2020_01.nc", "notes.txt", "wind_2020_02.nc", "x.nc4"] {
            touch(dir.path(), name);
        }
        std::fs::create_dir(dir.path().join("sub.nc")).unwrap();
        touch(&dir.path().join("sub.nc"), "nested.nc");

        let files = list_input_files(dir.path(), "nc", None).unwrap();
        assert_eq!(
            names(&files),
            vec!["wind_2020_01.nc", "wind_2020_02.nc", "wind_2020_03.nc"]
        );
    }

    #[test]
    fn test_excludes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.nc");
        touch(dir.path(), "sflux_air.ww3.nc");

        let output = dir.path().join("sflux_air.ww3.nc");
        let files = list_input_files(dir.path(), "nc", Some(&output)).unwrap();
        assert_eq!(names(&files), vec!["a.nc"]);
    }

    #[test]
    fn test_missing_output_excludes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.nc");
        let output = dir.path().join("sflux_air.ww3.nc");
        let files = list_input_files(dir.path(), "nc", Some(&output)).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let err = list_input_files(Path::new("/nonexistent/inputs"), "nc", None).unwrap_err();
        assert!(matches!(err, ArchiveError::Scan { .. }));
    }
}
