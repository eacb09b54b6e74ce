//! Survey data ingestion utilities.
//!
//! This crate provides functionality for unpacking, discovering, and loading
//! survey source data (CSV files) into Polars DataFrames.
//!
//! # Features
//!
//! - **Bundle Unpacking**: Extract `.zip` / `.tar.gz` downloads once, next to the bundle
//! - **File Discovery**: List source subdirectories and their CSV files with sizes
//! - **CSV Loading**: Read header rows cheaply, or whole tables as text columns
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use insights_ingest::{unpack_archives, list_subdirectories, list_csv_files, read_csv_table};
//!
//! let data_dir = Path::new("data");
//!
//! // Extract any new bundles
//! let report = unpack_archives(data_dir);
//!
//! // Discover CSV files per source directory
//! for dir in list_subdirectories(data_dir)? {
//!     let files = list_csv_files(&dir)?;
//! }
//!
//! // Read a table
//! let df = read_csv_table(Path::new("data/kaggle_so_2023/survey_results_public.csv"))?;
//! ```

mod archive;
mod csv;
mod discovery;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === Bundle Unpacking ===
pub use archive::{ArchiveType, UnpackReport, detect_archive_type, extract_bundle, unpack_archives};

// === CSV Reading ===
pub use self::csv::{
    CsvHeaders, MISSING_VALUE_MARKERS, ensure_file_exists, read_csv_schema, read_csv_table,
    text_column,
};

// === File Discovery ===
pub use discovery::{TabularFile, list_csv_files, list_subdirectories};
