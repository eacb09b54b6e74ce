//! File discovery for the data directory.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// A tabular file found in a source directory, with its size on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularFile {
    /// Path to the CSV file.
    pub path: PathBuf,
    /// Size in bytes at discovery time.
    pub size: u64,
}

impl TabularFile {
    /// File name as UTF-8, lossy.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub(crate) fn read_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        paths.push(entry.path());
    }

    // Sort by filename
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Returns true for names starting with a dot.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Lists the immediate, non-hidden subdirectories of `dir`, sorted by name.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_entries(dir)?
        .into_iter()
        .filter(|path| path.is_dir() && !is_hidden(path))
        .collect())
}

/// Lists all CSV files in a directory with their sizes.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<TabularFile>> {
    let mut files = Vec::new();

    for path in read_entries(dir)? {
        // Skip directories
        if !path.is_file() {
            continue;
        }

        // Check for .csv extension (case-insensitive)
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            let size = std::fs::metadata(&path)
                .map_err(|e| IngestError::from_io(&path, e))?
                .len();
            files.push(TabularFile { path, size });
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        for name in &["survey_results.csv", "Schema.CSV", "notes.txt"] {
            std::fs::write(dir.path().join(name), "header\ndata").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::create_dir(dir.path().join(".cache")).unwrap();

        dir
    }

    #[test]
    fn test_list_csv_files() {
        let dir = create_test_dir();
        let files = list_csv_files(dir.path()).unwrap();

        assert_eq!(files.len(), 2);
        // Sorted by filename (byte order puts uppercase first)
        assert_eq!(files[0].file_name(), "Schema.CSV");
        assert_eq!(files[1].file_name(), "survey_results.csv");
        assert_eq!(files[1].size, 11);
    }

    #[test]
    fn test_list_csv_files_empty_dir() {
        let dir = TempDir::new().unwrap();
        let files = list_csv_files(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_csv_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.csv");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_csv_files(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_list_subdirectories_skips_hidden() {
        let dir = create_test_dir();
        let dirs = list_subdirectories(dir.path()).unwrap();

        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].ends_with("nested"));
    }
}
