//! The data source catalog.

use std::collections::BTreeMap;
use std::path::Path;

use insights_ingest::{list_csv_files, list_subdirectories, read_csv_schema};

use crate::classify::classify_files;
use crate::descriptor::{DataSourceDescriptor, select_candidate_columns, slugify};
use crate::flagship::{FLAGSHIP_DIRECTORY, flagship_descriptor};

/// Registry of data sources keyed by source name.
///
/// Constructed once at startup and read-only afterwards, so it can be shared
/// across request handlers without locking.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sources: BTreeMap<String, DataSourceDescriptor>,
}

impl Catalog {
    /// Builds a catalog from explicit descriptors. The first descriptor wins
    /// when two share a name.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = DataSourceDescriptor>) -> Self {
        let mut catalog = Self::default();
        for descriptor in descriptors {
            catalog.register(descriptor);
        }
        catalog
    }

    /// Discovers data sources under `base_dir`.
    ///
    /// Always registers the flagship dataset, then one source per non-hidden
    /// subdirectory containing CSV files. A subdirectory that cannot be read
    /// is logged and skipped; this never fails.
    pub fn discover(base_dir: &Path) -> Self {
        let mut catalog = Self::default();
        catalog.register(flagship_descriptor(base_dir));

        let directories = match list_subdirectories(base_dir) {
            Ok(directories) => directories,
            Err(error) => {
                tracing::warn!(path = %base_dir.display(), %error, "Cannot list data directory");
                return catalog;
            }
        };

        for dir in directories {
            let dir_name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if dir_name == FLAGSHIP_DIRECTORY {
                continue;
            }

            match describe_directory(&dir, &dir_name) {
                Ok(Some(descriptor)) => {
                    catalog.register(descriptor);
                }
                Ok(None) => {
                    tracing::debug!(path = %dir.display(), "No tabular files, skipping");
                }
                Err(error) => {
                    tracing::warn!(path = %dir.display(), %error, "Failed to register data source");
                }
            }
        }

        tracing::info!(sources = catalog.len(), "Data source catalog built");
        catalog
    }

    fn register(&mut self, descriptor: DataSourceDescriptor) {
        if self.sources.contains_key(descriptor.name()) {
            tracing::warn!(
                source = descriptor.name(),
                path = %descriptor.main_file().display(),
                "Duplicate data source name, keeping the first registration"
            );
            return;
        }
        tracing::debug!(
            source = descriptor.name(),
            columns = descriptor.candidate_columns().len(),
            "Registered data source"
        );
        self.sources.insert(descriptor.name().to_string(), descriptor);
    }

    /// Looks up a source by name.
    pub fn get(&self, name: &str) -> Option<&DataSourceDescriptor> {
        self.sources.get(name)
    }

    /// Returns true if a source with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// All source names with their descriptions.
    pub fn list_all(&self) -> BTreeMap<String, String> {
        self.sources
            .iter()
            .map(|(name, source)| (name.clone(), source.description().to_string()))
            .collect()
    }

    /// Candidate analysis columns for a source; empty for unknown names.
    pub fn candidate_columns(&self, name: &str) -> &[String] {
        self.get(name)
            .map(DataSourceDescriptor::candidate_columns)
            .unwrap_or_default()
    }

    /// Registered source names, in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &DataSourceDescriptor> {
        self.sources.values()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Builds a descriptor for one subdirectory, or `None` if it has no CSV files.
fn describe_directory(
    dir: &Path,
    dir_name: &str,
) -> insights_ingest::Result<Option<DataSourceDescriptor>> {
    let files = list_csv_files(dir)?;
    let Some(classified) = classify_files(&files) else {
        return Ok(None);
    };

    let name = slugify(dir_name);
    if name.is_empty() {
        tracing::warn!(path = %dir.display(), "Directory name has no usable characters for a source name");
        return Ok(None);
    }

    let headers = read_csv_schema(&classified.main.path)?;
    let candidates = select_candidate_columns(&headers.columns);

    tracing::debug!(
        source = %name,
        main = %classified.main.path.display(),
        schema = ?classified.schema.as_ref().map(|s| s.path.display().to_string()),
        candidates = candidates.len(),
        "Classified source directory"
    );

    Ok(Some(
        DataSourceDescriptor::new(
            name,
            format!("Auto-discovered dataset from '{dir_name}'"),
            classified.main.path,
        )
        .with_schema_file(classified.schema.map(|schema| schema.path))
        .with_candidate_columns(candidates),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_descriptors_first_wins() {
        let catalog = Catalog::from_descriptors([
            DataSourceDescriptor::new("a", "first", "/x.csv"),
            DataSourceDescriptor::new("a", "second", "/y.csv"),
            DataSourceDescriptor::new("b", "other", "/z.csv").with_candidate_columns(["Lang"]),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().description(), "first");
        assert_eq!(catalog.candidate_columns("b"), ["Lang".to_string()]);
        assert!(catalog.candidate_columns("missing").is_empty());
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_list_all() {
        let catalog = Catalog::from_descriptors([DataSourceDescriptor::new("a", "first", "/x.csv")]);
        let all = catalog.list_all();
        assert_eq!(all.get("a").map(String::as_str), Some("first"));
    }
}
