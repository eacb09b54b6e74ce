//! CSV reading utilities.

mod header;
mod reader;

pub use header::{CsvHeaders, read_csv_schema};
pub use reader::{MISSING_VALUE_MARKERS, ensure_file_exists, read_csv_table, text_column};
