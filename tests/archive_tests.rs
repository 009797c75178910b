// tests/archive_tests.rs
use std::fs::{self, File};
use std::io::Write;

use crypt_pipeline::archive::{pack, unpack};
use crypt_pipeline::error::CoreError;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

fn write_zip(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn test_pack_unpack_roundtrip_restores_name_and_bytes() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("bookstore.sql");
    let container = dir.path().join("bookstore_20240101120000.zip");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    fs::write(&source, b"CREATE TABLE books (id INTEGER PRIMARY KEY);").unwrap();

    let size = pack(&source, &container).unwrap();
    assert_eq!(size, fs::metadata(&container).unwrap().len());

    let (name, path) = unpack(&container, &out).unwrap();
    assert_eq!(name, "bookstore.sql");
    assert_eq!(path, out.join("bookstore.sql"));
    assert_eq!(fs::read(&path).unwrap(), fs::read(&source).unwrap());
}

#[test]
fn test_pack_stores_single_deflated_entry_without_directories() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("queries");
    fs::create_dir(&nested).unwrap();
    let source = nested.join("report.sql");
    fs::write(&source, b"SELECT 1;".repeat(200)).unwrap();
    let container = dir.path().join("report.zip");

    pack(&source, &container).unwrap();

    let mut archive = ZipArchive::new(File::open(&container).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);
    let entry = archive.by_index(0).unwrap();
    assert_eq!(entry.name(), "report.sql");
    assert_eq!(entry.compression(), zip::CompressionMethod::Deflated);
}

#[test]
fn test_unpack_extracts_only_first_entry() {
    let dir = tempdir().unwrap();
    let container = dir.path().join("multi.zip");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    write_zip(
        &container,
        &[
            ("zeta.sql", &b"first"[..]),
            ("alpha.sql", &b"second, smaller name"[..]),
        ],
    );

    let (name, path) = unpack(&container, &out).unwrap();

    assert_eq!(name, "zeta.sql");
    assert_eq!(fs::read(path).unwrap(), b"first");
    assert!(!out.join("alpha.sql").exists());
}

#[test]
fn test_unpack_flattens_entry_path() {
    let dir = tempdir().unwrap();
    let container = dir.path().join("nested.zip");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    write_zip(&container, &[("exports/2024/books.sql", &b"flat"[..])]);

    let (name, path) = unpack(&container, &out).unwrap();

    assert_eq!(name, "books.sql");
    assert_eq!(path, out.join("books.sql"));
}

#[test]
fn test_unpack_empty_archive_is_decoding_error() {
    let dir = tempdir().unwrap();
    let container = dir.path().join("empty.zip");
    write_zip(&container, &[]);

    let err = unpack(&container, dir.path()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::MalformedContainer(_) | CoreError::Archive(_)
    ));
}

#[test]
fn test_unpack_rejects_directory_as_first_entry() {
    let dir = tempdir().unwrap();
    let container = dir.path().join("dir_first.zip");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let mut zip = ZipWriter::new(File::create(&container).unwrap());
    zip.add_directory("exports/", SimpleFileOptions::default())
        .unwrap();
    zip.start_file("exports/books.sql", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"SELECT 1;").unwrap();
    zip.finish().unwrap();

    assert!(matches!(
        unpack(&container, &out),
        Err(CoreError::MalformedContainer(_))
    ));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_unpack_garbage_leaves_no_partial_output() {
    let dir = tempdir().unwrap();
    let container = dir.path().join("garbage.zip");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(&container, b"definitely not a zip file").unwrap();

    assert!(matches!(
        unpack(&container, &out),
        Err(CoreError::Archive(_))
    ));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_missing_source_and_container_are_not_found() {
    let dir = tempdir().unwrap();

    let missing_source = dir.path().join("nope.sql");
    match pack(&missing_source, &dir.path().join("nope.zip")) {
        Err(CoreError::NotFound(path)) => assert_eq!(path, missing_source),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(!dir.path().join("nope.zip").exists());

    let missing_container = dir.path().join("nope.zip");
    assert!(matches!(
        unpack(&missing_container, dir.path()),
        Err(CoreError::NotFound(_))
    ));
}
