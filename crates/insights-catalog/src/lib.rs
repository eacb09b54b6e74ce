//! Data source catalog for survey datasets.
//!
//! Scans the (already unpacked) data directory and registers one
//! [`DataSourceDescriptor`] per source directory, plus the hand-curated
//! Stack Overflow 2023 survey.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use insights_catalog::Catalog;
//!
//! let catalog = Catalog::discover(Path::new("data"));
//! for (name, description) in catalog.list_all() {
//!     println!("{name}: {description}");
//! }
//! ```

mod catalog;
mod classify;
mod descriptor;
mod flagship;

pub use catalog::Catalog;
pub use classify::{Classification, classify_files};
pub use descriptor::{
    CANDIDATE_KEYWORDS, DataSourceDescriptor, MAX_CANDIDATE_COLUMNS, select_candidate_columns,
    slugify,
};
pub use flagship::{
    FLAGSHIP_DEFAULT_COLUMN, FLAGSHIP_DIRECTORY, FLAGSHIP_SOURCE, flagship_descriptor,
};
