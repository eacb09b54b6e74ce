//! Full-table CSV reading into Polars.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Check that a file exists and is a regular file.
///
/// This is a sync function meant to be called via `spawn_blocking` from async contexts.
pub fn ensure_file_exists(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Cell texts read as missing values, matching the markers common survey
/// exports (and pandas) use for blank answers.
pub const MISSING_VALUE_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads a CSV file into a Polars DataFrame with every column typed as text.
///
/// Schema inference is disabled so survey answers such as `"5"` and
/// `"More than 50 years"` in the same column never cause a parse failure.
/// Cells equal to one of [`MISSING_VALUE_MARKERS`] are read as null.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    let null_values = NullValues::AllColumns(
        MISSING_VALUE_MARKERS
            .iter()
            .map(|marker| PlSmallStr::from(*marker))
            .collect(),
    );
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_null_values(Some(null_values.clone())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded CSV table"
    );

    Ok(df)
}

/// Returns a column of `df` cast to a string series.
pub fn text_column(df: &DataFrame, column: &str) -> Result<Series> {
    let col = df.column(column).map_err(|_| IngestError::ColumnNotFound {
        column: column.to_string(),
    })?;
    Ok(col.cast(&DataType::String)?.take_materialized_series())
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
    fn test_read_csv_table_all_text() {
        let file = create_temp_csv("Id,YearsCode\n1,5\n2,More than 50 years\n");
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("Id").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_text_column_missing() {
        let file = create_temp_csv("A,B\n1,2\n");
        let df = read_csv_table(file.path()).unwrap();

        let result = text_column(&df, "C");
        assert!(matches!(result, Err(IngestError::ColumnNotFound { .. })));
    }

    #[test]
    fn test_text_column_values() {
        let file = create_temp_csv("Lang\nRust;Go\nPython\n");
        let df = read_csv_table(file.path()).unwrap();

        let series = text_column(&df, "Lang").unwrap();
        let values: Vec<Option<&str>> = series.str().unwrap().iter().collect();
        assert_eq!(values, vec![Some("Rust;Go"), Some("Python")]);
    }

    #[test]
    fn test_missing_value_markers_read_as_null() {
        let file = create_temp_csv("Lang,Note\nNA,N/A\nRust,null\nNaN,NAS\n");
        let df = read_csv_table(file.path()).unwrap();

        let lang = text_column(&df, "Lang").unwrap();
        let values: Vec<Option<&str>> = lang.str().unwrap().iter().collect();
        assert_eq!(values, vec![None, Some("Rust"), None]);

        let note = text_column(&df, "Note").unwrap();
        let values: Vec<Option<&str>> = note.str().unwrap().iter().collect();
        assert_eq!(values, vec![None, None, Some("NAS")]);
    }

    #[test]
    fn test_ensure_file_exists() {
        let file = create_temp_csv("A\n1\n");
        assert!(ensure_file_exists(file.path()).is_ok());

        let dir = tempfile::TempDir::new().unwrap();
        let result = ensure_file_exists(&dir.path().join("gone.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));

        let result = ensure_file_exists(dir.path());
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
