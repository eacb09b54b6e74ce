//! Integration tests for bundle unpacking.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use insights_ingest::{list_csv_files, unpack_archives};
use tempfile::TempDir;

fn write_zip(path: &Path, files: &[(&str, &str)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in files {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn write_tar_gz(path: &Path, files: &[(&str, &str)]) {
    let encoder = flate2::write::GzEncoder::new(
        File::create(path).unwrap(),
        flate2::Compression::default(),
    );
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn test_zip_bundle_is_extracted_next_to_itself() {
    let dir = TempDir::new().unwrap();
    write_zip(
        &dir.path().join("kaggle_so_2023.zip"),
        &[
            ("survey_results_public.csv", "Lang\nRust\n"),
            ("survey_results_schema.csv", "qname,question\n"),
        ],
    );

    let report = unpack_archives(dir.path());

    assert_eq!(report.extracted, vec!["kaggle_so_2023.zip".to_string()]);
    let files = list_csv_files(&dir.path().join("kaggle_so_2023")).unwrap();
    assert_eq!(files.len(), 2);
}

#[test]
fn test_tar_gz_bundle_is_extracted() {
    let dir = TempDir::new().unwrap();
    write_tar_gz(
        &dir.path().join("jetbrains.tar.gz"),
        &[("results.csv", "Tool\nIntelliJ\n")],
    );

    let report = unpack_archives(dir.path());

    assert_eq!(report.extracted, vec!["jetbrains.tar.gz".to_string()]);
    let content = fs::read_to_string(dir.path().join("jetbrains").join("results.csv")).unwrap();
    assert_eq!(content, "Tool\nIntelliJ\n");
}

#[test]
fn test_second_pass_does_not_extract_again() {
    let dir = TempDir::new().unwrap();
    write_zip(&dir.path().join("survey.zip"), &[("results.csv", "Lang\nGo\n")]);

    let first = unpack_archives(dir.path());
    assert_eq!(first.extracted.len(), 1);

    // A local edit survives the second pass only if nothing is re-extracted.
    let extracted = dir.path().join("survey").join("results.csv");
    fs::write(&extracted, "Lang\nEdited\n").unwrap();
    let modified = fs::metadata(&extracted).unwrap().modified().unwrap();

    let second = unpack_archives(dir.path());

    assert!(second.extracted.is_empty());
    assert_eq!(second.skipped, vec!["survey.zip".to_string()]);
    assert_eq!(fs::read_to_string(&extracted).unwrap(), "Lang\nEdited\n");
    assert_eq!(fs::metadata(&extracted).unwrap().modified().unwrap(), modified);
}

#[test]
fn test_empty_target_directory_is_filled() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("survey")).unwrap();
    write_zip(&dir.path().join("survey.zip"), &[("results.csv", "Lang\nGo\n")]);

    let report = unpack_archives(dir.path());

    assert_eq!(report.extracted, vec!["survey.zip".to_string()]);
    assert!(dir.path().join("survey").join("results.csv").is_file());
}

#[test]
fn test_one_broken_bundle_does_not_stop_others() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a_broken.zip"), b"garbage").unwrap();
    write_zip(&dir.path().join("b_good.zip"), &[("results.csv", "Lang\nC\n")]);

    let report = unpack_archives(dir.path());

    assert_eq!(report.failed, vec!["a_broken.zip".to_string()]);
    assert_eq!(report.extracted, vec!["b_good.zip".to_string()]);
    assert_eq!(report.total(), 2);
    assert!(dir.path().join("b_good").join("results.csv").is_file());
}
