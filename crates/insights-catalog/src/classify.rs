//! Main-data vs schema file classification for one source directory.

use insights_ingest::TabularFile;

/// Name hints for a schema (data dictionary) file.
const SCHEMA_HINT: &str = "schema";

/// Name hints for a main survey export.
const MAIN_DATA_HINTS: [&str; 2] = ["results", "survey"];

/// The files chosen to back a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// File holding the survey responses.
    pub main: TabularFile,
    /// Data dictionary describing the main file, if one was found.
    pub schema: Option<TabularFile>,
}

fn lower_name(file: &TabularFile) -> String {
    file.file_name().to_lowercase()
}

fn is_schema_named(file: &TabularFile) -> bool {
    lower_name(file).contains(SCHEMA_HINT)
}

fn is_main_named(file: &TabularFile) -> bool {
    let name = lower_name(file);
    MAIN_DATA_HINTS.iter().any(|hint| name.contains(hint))
}

/// Largest file by size; the earliest wins on equal sizes.
fn largest<'a>(files: impl IntoIterator<Item = &'a TabularFile>) -> Option<&'a TabularFile> {
    files.into_iter().fold(None, |best, file| match best {
        Some(current) if current.size >= file.size => Some(current),
        _ => Some(file),
    })
}

/// Classifies the tabular files of one directory.
///
/// `files` is expected in file-name order, as returned by
/// [`insights_ingest::list_csv_files`].
///
/// 1. The first file whose name contains `schema` is the schema file.
/// 2. Among files not named like a schema, the largest one whose name contains
///    `results` or `survey` is the main file.
/// 3. Without such a file, the largest tabular file in the directory is the main file.
///
/// A file is never its own schema: when the fallback picks the schema file as
/// the main file, the schema slot is left empty. Returns `None` for an empty
/// directory.
pub fn classify_files(files: &[TabularFile]) -> Option<Classification> {
    let schema = files.iter().find(|file| is_schema_named(file));

    let named_main = largest(
        files
            .iter()
            .filter(|file| !is_schema_named(file) && is_main_named(file)),
    );
    let main = named_main.or_else(|| largest(files))?;

    let schema = schema.filter(|candidate| candidate.path != main.path).cloned();

    Some(Classification {
        main: main.clone(),
        schema,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str, size: u64) -> TabularFile {
        TabularFile {
            path: PathBuf::from("/data/src").join(name),
            size,
        }
    }

    #[test]
    fn test_empty_directory() {
        assert!(classify_files(&[]).is_none());
    }

    #[test]
    fn test_results_and_schema() {
        let files = [
            file("survey_results_public.csv", 100),
            file("survey_results_schema.csv", 10),
        ];
        let classified = classify_files(&files).unwrap();

        assert_eq!(classified.main.file_name(), "survey_results_public.csv");
        assert_eq!(
            classified.schema.map(|s| s.file_name()),
            Some("survey_results_schema.csv".to_string())
        );
    }

    #[test]
    fn test_larger_named_candidate_wins() {
        let files = [
            file("results_2022.csv", 50),
            file("results_2023.csv", 80),
            file("survey_extra.csv", 60),
        ];
        let classified = classify_files(&files).unwrap();
        assert_eq!(classified.main.file_name(), "results_2023.csv");
        assert!(classified.schema.is_none());
    }

    #[test]
    fn test_equal_size_keeps_first() {
        let files = [file("a_results.csv", 50), file("b_results.csv", 50)];
        let classified = classify_files(&files).unwrap();
        assert_eq!(classified.main.file_name(), "a_results.csv");
    }

    #[test]
    fn test_named_candidate_beats_larger_unnamed_file() {
        let files = [file("lookup.csv", 900), file("Survey.csv", 10)];
        let classified = classify_files(&files).unwrap();
        assert_eq!(classified.main.file_name(), "Survey.csv");
    }

    #[test]
    fn test_fallback_to_largest() {
        let files = [
            file("answers.csv", 300),
            file("codes.csv", 20),
            file("schema.csv", 5),
        ];
        let classified = classify_files(&files).unwrap();

        assert_eq!(classified.main.file_name(), "answers.csv");
        assert_eq!(
            classified.schema.map(|s| s.file_name()),
            Some("schema.csv".to_string())
        );
    }

    #[test]
    fn test_schema_named_survey_is_not_main_candidate() {
        let files = [file("data.csv", 10), file("survey_schema.csv", 500)];
        let classified = classify_files(&files).unwrap();

        // Fallback applies to the whole directory, so the big schema file wins.
        assert_eq!(classified.main.file_name(), "survey_schema.csv");
        assert!(classified.schema.is_none());
    }

    #[test]
    fn test_only_schema_file() {
        let files = [file("schema.csv", 42)];
        let classified = classify_files(&files).unwrap();

        assert_eq!(classified.main.file_name(), "schema.csv");
        assert!(classified.schema.is_none());
    }
}
