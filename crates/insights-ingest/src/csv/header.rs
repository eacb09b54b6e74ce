//! Header-only CSV reading.

use std::path::Path;

use crate::error::{IngestError, Result};

/// Column names from the header row of a CSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvHeaders {
    /// Normalized column names (trimmed), in file order.
    pub columns: Vec<String>,
}

impl CsvHeaders {
    /// Creates headers from already-normalized column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns true if `column` is one of the header names (exact match).
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Normalizes a header value by trimming whitespace and a leading BOM.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

/// Reads only the header row of a CSV file.
///
/// Data rows are never parsed, so this is cheap even for very large survey
/// exports.
pub fn read_csv_schema(path: &Path) -> Result<CsvHeaders> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            let not_found = matches!(
                e.kind(),
                csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound
            );
            if not_found {
                IngestError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                IngestError::CsvHeader {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

    let record = reader.headers().map_err(|e| IngestError::CsvHeader {
        path: path.to_path_buf(),
        source: e,
    })?;

    let columns: Vec<String> = record.iter().map(normalize_header).collect();
    if columns.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    Ok(CsvHeaders::new(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  hello  "), "hello");
        assert_eq!(normalize_header("\u{feff}ResponseId"), "ResponseId");
    }

    #[test]
    fn test_read_csv_schema() {
        let file = create_temp_csv("ResponseId,LanguageHaveWorkedWith,Country\n1,Rust;Go,NZ\n");
        let headers = read_csv_schema(file.path()).unwrap();

        assert_eq!(
            headers.columns,
            vec!["ResponseId", "LanguageHaveWorkedWith", "Country"]
        );
        assert!(headers.contains("Country"));
        assert!(!headers.contains("country"));
    }

    #[test]
    fn test_read_csv_schema_quoted() {
        let file = create_temp_csv("\"Tools, misc\",B\n1,2\n");
        let headers = read_csv_schema(file.path()).unwrap();
        assert_eq!(headers.columns, vec!["Tools, misc", "B"]);
    }

    #[test]
    fn test_read_csv_schema_with_bom() {
        let file = create_temp_csv("\u{feff}A,B,C\n1,2,3\n");
        let headers = read_csv_schema(file.path()).unwrap();
        assert_eq!(headers.columns, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_read_csv_schema_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_schema(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_schema_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = read_csv_schema(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
