//! Loading a source's tables from disk.

use std::path::Path;

use insights_catalog::DataSourceDescriptor;
use insights_ingest::{ensure_file_exists, read_csv_table, text_column};
use polars::prelude::DataFrame;

use crate::error::{AnalysisError, Result};

/// A source's main table with its schema table attached, if any.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub table: DataFrame,
    /// Auxiliary metadata; never required for counting.
    pub schema: Option<DataFrame>,
}

/// Schema (data dictionary) rows as text, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTable {
    pub columns: Vec<String>,
    /// One entry per row, parallel to `columns`. Missing values are `""`.
    pub rows: Vec<Vec<String>>,
}

impl SchemaTable {
    /// Converts a loaded table into text rows.
    pub fn from_frame(df: &DataFrame, path: &Path) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect();

        let mut rows = vec![Vec::with_capacity(columns.len()); df.height()];
        for column in &columns {
            let series =
                text_column(df, column).map_err(|e| AnalysisError::load(path, e))?;
            let values = series.str().map_err(|e| AnalysisError::load(path, e))?;
            for (row, value) in rows.iter_mut().zip(values.iter()) {
                row.push(value.unwrap_or_default().to_string());
            }
        }

        Ok(Self { columns, rows })
    }

    /// Iterates rows as `(column, value)` pairs.
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &str)>> {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Loads the main table (and schema table, if registered) for a source.
///
/// The main file is checked on every call; nothing is cached.
pub fn load_source(descriptor: &DataSourceDescriptor) -> Result<LoadedSource> {
    let name = descriptor.name();
    let path = descriptor.main_file();

    ensure_file_exists(path).map_err(|e| AnalysisError::from_ingest(name, path, e))?;
    let table = read_csv_table(path).map_err(|e| AnalysisError::from_ingest(name, path, e))?;

    let schema = match descriptor.schema_file() {
        Some(schema_path) if schema_path.is_file() => Some(
            read_csv_table(schema_path).map_err(|e| AnalysisError::load(schema_path, e))?,
        ),
        _ => None,
    };

    Ok(LoadedSource { table, schema })
}

/// Loads only the schema table of a source; `None` when it has none on disk.
pub fn load_schema(descriptor: &DataSourceDescriptor) -> Result<Option<SchemaTable>> {
    let Some(path) = descriptor.schema_file().filter(|path| path.is_file()) else {
        return Ok(None);
    };

    let df = read_csv_table(path).map_err(|e| AnalysisError::load(path, e))?;
    SchemaTable::from_frame(&df, path).map(Some)
}
