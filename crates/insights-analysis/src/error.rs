//! Error types for frequency analysis.

use std::fmt;
use std::path::{Path, PathBuf};

use insights_ingest::IngestError;
use thiserror::Error;

/// Coarse error category, used by callers to choose a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown source, missing backing file, or missing schema.
    NotFound,
    /// Unknown column or out-of-range parameter.
    InvalidArgument,
    /// Unexpected I/O or parsing failure.
    Internal,
}

impl ErrorKind {
    /// Stable snake_case label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while analyzing a data source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// No source with this name is registered.
    #[error("unknown data source: {name}")]
    UnknownSource { name: String },

    /// The source's main file is not on disk.
    #[error("data file not found: {path}")]
    MissingFile { name: String, path: PathBuf },

    /// The requested column is not in the loaded table.
    #[error(
        "column '{column}' not found in dataset. Available columns with technology data: [{}]",
        .candidates.join(", ")
    )]
    UnknownColumn {
        column: String,
        candidates: Vec<String>,
    },

    /// `top_n` was zero.
    #[error("top_n must be a positive integer")]
    InvalidTopN,

    /// Loading or reading the table failed.
    #[error("error loading data from {path}: {message}")]
    Load { path: PathBuf, message: String },
}

impl AnalysisError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownSource { .. } | Self::MissingFile { .. } => ErrorKind::NotFound,
            Self::UnknownColumn { .. } | Self::InvalidTopN => ErrorKind::InvalidArgument,
            Self::Load { .. } => ErrorKind::Internal,
        }
    }

    /// Wraps an ingestion failure for `path` belonging to source `name`.
    pub(crate) fn from_ingest(name: &str, path: &Path, err: IngestError) -> Self {
        match err {
            IngestError::FileNotFound { path } => Self::MissingFile {
                name: name.to_string(),
                path,
            },
            other => Self::load(path, other),
        }
    }

    pub(crate) fn load(path: &Path, message: impl fmt::Display) -> Self {
        Self::Load {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
