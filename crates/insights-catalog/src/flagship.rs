//! Hand-curated descriptor for the Stack Overflow 2023 developer survey.

use std::path::Path;

use crate::descriptor::DataSourceDescriptor;

/// Source key of the flagship dataset.
pub const FLAGSHIP_SOURCE: &str = "stackoverflow_2023";

/// Directory (under the data directory) holding the flagship dataset.
pub const FLAGSHIP_DIRECTORY: &str = "kaggle_so_2023";

/// Column analyzed when a caller does not name one.
pub const FLAGSHIP_DEFAULT_COLUMN: &str = "LanguageHaveWorkedWith";

const MAIN_FILE: &str = "survey_results_public.csv";
const SCHEMA_FILE: &str = "survey_results_schema.csv";

const DESCRIPTION: &str =
    "Stack Overflow Developer Survey 2023 - The complete dataset of developer insights";

const CANDIDATE_COLUMNS: [&str; 8] = [
    "LanguageHaveWorkedWith",
    "LanguageWantToWorkWith",
    "DatabaseHaveWorkedWith",
    "DatabaseWantToWorkWith",
    "PlatformHaveWorkedWith",
    "PlatformWantToWorkWith",
    "WebframeHaveWorkedWith",
    "WebframeWantToWorkWith",
];

const CATEGORICAL_COLUMNS: [&str; 7] = [
    "Country",
    "Employment",
    "DevType",
    "EdLevel",
    "YearsCode",
    "YearsCodePro",
    "OrgSize",
];

/// Builds the flagship descriptor rooted at `base_dir`.
///
/// The main file is registered whether or not it exists yet; the schema file
/// only if it is present on disk.
pub fn flagship_descriptor(base_dir: &Path) -> DataSourceDescriptor {
    let dir = base_dir.join(FLAGSHIP_DIRECTORY);
    let schema = dir.join(SCHEMA_FILE);

    DataSourceDescriptor::new(FLAGSHIP_SOURCE, DESCRIPTION, dir.join(MAIN_FILE))
        .with_schema_file(schema.is_file().then_some(schema))
        .with_candidate_columns(CANDIDATE_COLUMNS)
        .with_categorical_columns(CATEGORICAL_COLUMNS)
}
