//! Request handlers.

use std::io;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use insights_analysis::{AnalysisError, FrequencyAnalyzer, FrequencyResult, SchemaTable};
use insights_catalog::{FLAGSHIP_DEFAULT_COLUMN, FLAGSHIP_SOURCE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AppState;
use super::error::ApiError;

/// Result size of the popular-languages endpoint.
pub const POPULAR_LANGUAGES_TOP_N: usize = 10;

/// One entry of `GET /api/data-sources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceInfo {
    pub name: String,
    pub description: String,
    pub available_columns: Vec<String>,
}

/// Query string of `GET /api/analysis/technology-usage`.
///
/// `top_n` is kept as text so malformed values get the same JSON error body
/// as out-of-range ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageQuery {
    pub source: Option<String>,
    pub column: Option<String>,
    pub top_n: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub total_responses: usize,
    pub unique_technologies: usize,
    pub analysis_column: String,
    pub data_source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularLanguages {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub source: String,
    /// One object per schema row, keys in column order.
    pub schema: Vec<Map<String, Value>>,
}

/// `GET /`
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    match tokio::fs::read_to_string(&state.template).await {
        Ok(page) => Ok(Html(page)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ApiError::not_found("The dashboard template is missing"))
        }
        Err(e) => Err(ApiError::internal(format!(
            "Failed to read dashboard template: {e}"
        ))),
    }
}

/// `GET /api/data-sources`
pub async fn list_sources(State(state): State<Arc<AppState>>) -> Json<Vec<DataSourceInfo>> {
    let sources = state
        .catalog
        .iter()
        .map(|descriptor| DataSourceInfo {
            name: descriptor.name().to_string(),
            description: descriptor.description().to_string(),
            available_columns: descriptor.candidate_columns().to_vec(),
        })
        .collect();
    Json(sources)
}

/// `GET /api/analysis/technology-usage`
pub async fn technology_usage(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let defaults = &state.analysis;
    let top_n = parse_top_n(
        query.top_n.as_deref(),
        defaults.default_top_n,
        defaults.max_top_n,
    )?;
    let source = query
        .source
        .unwrap_or_else(|| defaults.default_source.clone());
    let column = query
        .column
        .unwrap_or_else(|| defaults.default_column.clone());

    if !state.catalog.contains(&source) {
        let available: Vec<&str> = state.catalog.names().collect();
        return Err(ApiError::bad_request(format!(
            "Unknown data source '{source}'. Available sources: [{}]",
            available.join(", ")
        )));
    }

    let candidates = state.catalog.candidate_columns(&source);
    if !candidates.contains(&column) {
        return Err(ApiError::bad_request(format!(
            "Column '{column}' not available for analysis in source '{source}'. \
             Available columns: [{}]",
            candidates.join(", ")
        )));
    }

    let result = run_analysis(Arc::clone(&state), source.clone(), column.clone(), top_n).await?;
    Ok(Json(AnalysisResponse {
        labels: result.labels,
        values: result.counts,
        total_responses: result.total_non_empty_rows,
        unique_technologies: result.distinct_token_count,
        analysis_column: column,
        data_source: source,
    }))
}

/// `GET /api/languages/popular`: flagship languages, top ten.
pub async fn popular_languages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PopularLanguages>, ApiError> {
    let result = run_analysis(
        state,
        FLAGSHIP_SOURCE.to_string(),
        FLAGSHIP_DEFAULT_COLUMN.to_string(),
        POPULAR_LANGUAGES_TOP_N,
    )
    .await?;

    Ok(Json(PopularLanguages {
        labels: result.labels,
        values: result.counts,
    }))
}

/// `GET /api/schema/{source_name}`
pub async fn data_schema(
    State(state): State<Arc<AppState>>,
    Path(source_name): Path<String>,
) -> Result<Json<SchemaResponse>, ApiError> {
    let name = source_name.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        FrequencyAnalyzer::new(&state.catalog).schema(&name)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Failed to retrieve schema: {e}")))?;

    match loaded {
        Ok(Some(table)) => Ok(Json(SchemaResponse {
            schema: schema_records(&table),
            source: source_name,
        })),
        Ok(None) | Err(AnalysisError::UnknownSource { .. }) => Err(ApiError::not_found(format!(
            "No schema information available for '{source_name}'"
        ))),
        Err(e) => Err(ApiError::internal(format!("Failed to retrieve schema: {e}"))),
    }
}

/// Validates the `top_n` query value; absent means `default`.
pub fn parse_top_n(raw: Option<&str>, default: usize, max: usize) -> Result<usize, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let out_of_range =
        || ApiError::bad_request(format!("top_n must be between 1 and {max}, got '{raw}'"));

    let value: i64 = raw.trim().parse().map_err(|_| out_of_range())?;
    match usize::try_from(value) {
        Ok(top_n) if (1..=max).contains(&top_n) => Ok(top_n),
        _ => Err(out_of_range()),
    }
}

/// Runs one analysis off the async executor.
async fn run_analysis(
    state: Arc<AppState>,
    source: String,
    column: String,
    top_n: usize,
) -> Result<FrequencyResult, ApiError> {
    let outcome = tokio::task::spawn_blocking(move || {
        FrequencyAnalyzer::new(&state.catalog).analyze(&source, &column, top_n)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Analysis failed: {e}")))?;

    outcome.map_err(ApiError::from)
}

fn schema_records(table: &SchemaTable) -> Vec<Map<String, Value>> {
    table
        .records()
        .map(|record| {
            record
                .into_iter()
                .map(|(column, value)| (column.to_string(), Value::String(value.to_string())))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_top_n_default() {
        assert_eq!(parse_top_n(None, 10, 50).unwrap(), 10);
    }

    #[test]
    fn test_parse_top_n_bounds() {
        assert_eq!(parse_top_n(Some("1"), 10, 50).unwrap(), 1);
        assert_eq!(parse_top_n(Some("50"), 10, 50).unwrap(), 50);

        for raw in ["0", "51", "-3", "ten", ""] {
            let err = parse_top_n(Some(raw), 10, 50).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "top_n={raw}");
        }
    }

    #[test]
    fn test_schema_records_keep_column_order() {
        let table = SchemaTable {
            columns: vec!["qname".to_string(), "question".to_string()],
            rows: vec![vec!["Lang".to_string(), String::new()]],
        };
        let records = schema_records(&table);

        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, ["qname", "question"]);
        assert_eq!(records[0]["question"], Value::String(String::new()));
    }
}
