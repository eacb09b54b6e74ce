//! Technology-usage frequency analysis.
//!
//! Counts `;`-separated tags (languages, databases, platforms, ...) in one
//! column of a registered survey source and ranks them by frequency.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use insights_analysis::FrequencyAnalyzer;
//! use insights_catalog::Catalog;
//!
//! let catalog = Catalog::discover(Path::new("data"));
//! let result = FrequencyAnalyzer::new(&catalog)
//!     .analyze("stackoverflow_2023", "LanguageHaveWorkedWith", 10)?;
//!
//! for (label, count) in result.entries() {
//!     println!("{label}: {count}");
//! }
//! ```

mod analyzer;
mod error;
mod loader;
mod tally;

pub use analyzer::FrequencyAnalyzer;
pub use error::{AnalysisError, ErrorKind, Result};
pub use loader::{LoadedSource, SchemaTable, load_schema, load_source};
pub use tally::{FrequencyResult, TOKEN_SEPARATOR, TokenTally};
