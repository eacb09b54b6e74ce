//! Data source descriptors.

use std::path::{Path, PathBuf};

/// Column-name keywords that flag a column as holding delimited technology tags.
///
/// Matched case-insensitively as substrings, in this order.
pub const CANDIDATE_KEYWORDS: [&str; 6] = [
    "language",
    "database",
    "platform",
    "framework",
    "tool",
    "tech",
];

/// Upper bound on auto-discovered candidate columns per source.
pub const MAX_CANDIDATE_COLUMNS: usize = 8;

/// Registered metadata for one data source.
///
/// Built once while the catalog is constructed and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceDescriptor {
    name: String,
    description: String,
    main_file: PathBuf,
    schema_file: Option<PathBuf>,
    candidate_columns: Vec<String>,
    categorical_columns: Vec<String>,
}

impl DataSourceDescriptor {
    /// Creates a descriptor with no schema file and no columns.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        main_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            main_file: main_file.into(),
            schema_file: None,
            candidate_columns: Vec::new(),
            categorical_columns: Vec::new(),
        }
    }

    /// Set the schema file.
    #[must_use]
    pub fn with_schema_file(mut self, path: Option<PathBuf>) -> Self {
        self.schema_file = path;
        self
    }

    /// Set the columns eligible for frequency analysis.
    #[must_use]
    pub fn with_candidate_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidate_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the informational categorical columns.
    #[must_use]
    pub fn with_categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn main_file(&self) -> &Path {
        &self.main_file
    }

    pub fn schema_file(&self) -> Option<&Path> {
        self.schema_file.as_deref()
    }

    pub fn candidate_columns(&self) -> &[String] {
        &self.candidate_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }
}

/// Normalizes a directory name into a source key.
///
/// Lower-cases, collapses runs of non-alphanumeric characters into a single
/// `_`, and drops leading/trailing separators: `"Kaggle SO-2023"` becomes
/// `"kaggle_so_2023"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Picks up to [`MAX_CANDIDATE_COLUMNS`] header names that look like
/// technology-tag columns, preserving header order.
pub fn select_candidate_columns(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|column| {
            let lower = column.to_lowercase();
            CANDIDATE_KEYWORDS
                .iter()
                .any(|keyword| lower.contains(keyword))
        })
        .take(MAX_CANDIDATE_COLUMNS)
        .cloned()
        .collect()
}
