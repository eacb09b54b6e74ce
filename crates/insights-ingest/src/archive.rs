//! Bundle extraction for the data directory.
//!
//! Survey exports usually arrive as `.zip` (or `.tar.gz`) downloads dropped
//! into the data directory. Each bundle is unpacked once into a sibling
//! directory named after it; later runs leave populated directories alone.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::discovery::read_entries;
use crate::error::{IngestError, Result};

/// Archive type for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// ZIP archive
    Zip,
    /// gzip-compressed tarball
    TarGz,
}

impl ArchiveType {
    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Zip => "ZIP",
            Self::TarGz => "tar.gz",
        }
    }
}

impl std::fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Recognised bundle extensions, longest first.
const BUNDLE_EXTENSIONS: [(&str, ArchiveType); 3] = [
    (".tar.gz", ArchiveType::TarGz),
    (".tgz", ArchiveType::TarGz),
    (".zip", ArchiveType::Zip),
];

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (stem, ext) = name.split_at(split);
    ext.eq_ignore_ascii_case(suffix).then_some(stem)
}

/// Detects the archive type from a file name and returns it with the name
/// stripped of its archive extension.
#[must_use]
pub fn detect_archive_type(file_name: &str) -> Option<(ArchiveType, &str)> {
    BUNDLE_EXTENSIONS.iter().find_map(|(suffix, archive_type)| {
        strip_suffix_ignore_case(file_name, suffix)
            .filter(|stem| !stem.is_empty())
            .map(|stem| (*archive_type, stem))
    })
}

/// Outcome of one unpacking pass, by bundle file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackReport {
    /// Bundles extracted during this pass.
    pub extracted: Vec<String>,
    /// Bundles whose target directory already had content.
    pub skipped: Vec<String>,
    /// Bundles that failed to extract.
    pub failed: Vec<String>,
}

impl UnpackReport {
    /// Total bundles seen.
    pub fn total(&self) -> usize {
        self.extracted.len() + self.skipped.len() + self.failed.len()
    }
}

/// Returns true if `dir` exists and has at least one entry.
fn is_populated(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Extracts every bundle found directly inside `base_dir`.
///
/// Never fails: a bundle that cannot be extracted is logged and recorded in
/// [`UnpackReport::failed`], and the pass continues with the next one.
pub fn unpack_archives(base_dir: &Path) -> UnpackReport {
    let mut report = UnpackReport::default();

    let entries = match read_entries(base_dir) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(path = %base_dir.display(), %error, "Cannot scan data directory for bundles");
            return report;
        }
    };

    for path in entries {
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some((archive_type, stem)) = detect_archive_type(file_name) else {
            continue;
        };
        let file_name = file_name.to_string();
        let target = base_dir.join(stem);

        if is_populated(&target) {
            tracing::debug!(bundle = %file_name, target = %target.display(), "Bundle already extracted");
            report.skipped.push(file_name);
            continue;
        }

        tracing::info!(bundle = %file_name, kind = %archive_type, target = %target.display(), "Extracting bundle");
        match extract_bundle(&path, archive_type, &target) {
            Ok(()) => report.extracted.push(file_name),
            Err(error) => {
                tracing::warn!(bundle = %file_name, %error, "Bundle extraction failed");
                // Leave no half-populated directory behind, or the next pass would skip it.
                if let Err(cleanup) = fs::remove_dir_all(&target) {
                    tracing::debug!(target = %target.display(), error = %cleanup, "Cleanup after failed extraction");
                }
                report.failed.push(file_name);
            }
        }
    }

    report
}

/// Extracts a single bundle into `target`, creating it first.
pub fn extract_bundle(path: &Path, archive_type: ArchiveType, target: &Path) -> Result<()> {
    fs::create_dir_all(target).map_err(|e| IngestError::FileRead {
        path: target.to_path_buf(),
        source: e,
    })?;

    match archive_type {
        ArchiveType::Zip => extract_zip(path, target),
        ArchiveType::TarGz => extract_tar_gz(path, target),
    }
}

fn extraction_error(path: &Path, message: impl std::fmt::Display) -> IngestError {
    IngestError::ArchiveExtraction {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

fn open_bundle(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| IngestError::from_io(path, e))
}

/// Extracts a ZIP archive.
fn extract_zip(path: &Path, target: &Path) -> Result<()> {
    tracing::debug!("Extracting from ZIP archive");

    let mut archive = zip::ZipArchive::new(open_bundle(path)?)
        .map_err(|e| extraction_error(path, format!("Failed to read ZIP: {e}")))?;
    archive
        .extract(target)
        .map_err(|e| extraction_error(path, format!("Failed to extract ZIP: {e}")))?;

    tracing::debug!(entries = archive.len(), "ZIP extracted");
    Ok(())
}

/// Extracts a tar.gz archive.
fn extract_tar_gz(path: &Path, target: &Path) -> Result<()> {
    tracing::debug!("Extracting from tar.gz archive");

    let mut archive = Archive::new(GzDecoder::new(open_bundle(path)?));
    archive
        .unpack(target)
        .map_err(|e| extraction_error(path, format!("Failed to extract tar.gz: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_archive_type() {
        assert_eq!(
            detect_archive_type("kaggle_so_2023.zip"),
            Some((ArchiveType::Zip, "kaggle_so_2023"))
        );
        assert_eq!(
            detect_archive_type("Survey.TAR.GZ"),
            Some((ArchiveType::TarGz, "Survey"))
        );
        assert_eq!(
            detect_archive_type("survey.tgz"),
            Some((ArchiveType::TarGz, "survey"))
        );
        assert_eq!(detect_archive_type("survey.csv"), None);
        assert_eq!(detect_archive_type(".zip"), None);
    }

    #[test]
    fn test_missing_base_dir_yields_empty_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = unpack_archives(&dir.path().join("absent"));
        assert_eq!(report, UnpackReport::default());
    }

    #[test]
    fn test_corrupt_bundle_is_reported_and_cleaned_up() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("broken.zip"), b"not a zip").unwrap();

        let report = unpack_archives(dir.path());

        assert_eq!(report.failed, vec!["broken.zip".to_string()]);
        assert!(!dir.path().join("broken").exists());
    }
}
