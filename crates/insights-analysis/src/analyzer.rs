//! Technology-usage frequency analysis against the catalog.

use insights_catalog::{Catalog, DataSourceDescriptor};
use insights_ingest::{IngestError, text_column};

use crate::error::{AnalysisError, Result};
use crate::loader::{SchemaTable, load_schema, load_source};
use crate::tally::{FrequencyResult, TokenTally};

/// Runs frequency analyses over the sources of a [`Catalog`].
///
/// Every call re-reads the backing file, so results always reflect the file
/// as it is on disk. Calls are blocking; from async code run them via
/// `spawn_blocking`.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyAnalyzer<'a> {
    catalog: &'a Catalog,
}

impl<'a> FrequencyAnalyzer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    fn descriptor(&self, source: &str) -> Result<&'a DataSourceDescriptor> {
        self.catalog
            .get(source)
            .ok_or_else(|| AnalysisError::UnknownSource {
                name: source.to_string(),
            })
    }

    /// Counts `;`-separated tokens in `column` of `source` and returns the
    /// `top_n` most frequent.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::UnknownSource`] if `source` is not registered
    /// - [`AnalysisError::MissingFile`] if the main file is not on disk
    /// - [`AnalysisError::InvalidTopN`] if `top_n` is zero
    /// - [`AnalysisError::UnknownColumn`] if the table has no such column
    /// - [`AnalysisError::Load`] for any other read or parse failure
    pub fn analyze(&self, source: &str, column: &str, top_n: usize) -> Result<FrequencyResult> {
        let descriptor = self.descriptor(source)?;
        if top_n == 0 {
            return Err(AnalysisError::InvalidTopN);
        }

        let loaded = load_source(descriptor)?;
        let path = descriptor.main_file();

        let series = text_column(&loaded.table, column).map_err(|e| match e {
            IngestError::ColumnNotFound { column } => AnalysisError::UnknownColumn {
                column,
                candidates: descriptor.candidate_columns().to_vec(),
            },
            other => AnalysisError::load(path, other),
        })?;
        let cells = series.str().map_err(|e| AnalysisError::load(path, e))?;

        let tally = TokenTally::from_cells(cells.iter());
        let result = tally.into_ranked(top_n);

        tracing::debug!(
            source,
            column,
            top_n,
            rows = loaded.table.height(),
            non_empty = result.total_non_empty_rows,
            distinct = result.distinct_token_count,
            "Technology usage analyzed"
        );

        Ok(result)
    }

    /// Schema table of `source`; `Ok(None)` when the source has no schema file.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::UnknownSource`] for unregistered names,
    /// [`AnalysisError::Load`] if the schema file cannot be read.
    pub fn schema(&self, source: &str) -> Result<Option<SchemaTable>> {
        load_schema(self.descriptor(source)?)
    }
}
