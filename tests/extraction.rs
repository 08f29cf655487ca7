//! Bulk extraction tests.

mod common;

use mphkit::{ArchiveError, extract_all};

use common::{demo_entries, expect_err, write_container, write_demo_container};

#[test]
fn test_extract_demo() {
    let (dir, path) = write_demo_container();
    let dest = dir.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    let outcome = extract_all(&path, &dest).unwrap();

    assert_eq!(outcome.extracted_path, dest.join("demo-extracted"));
    // six files plus the savepoint1 directory
    assert_eq!(outcome.file_count, 7);

    for (name, data) in demo_entries() {
        let extracted = std::fs::read(outcome.extracted_path.join(name)).unwrap();
        assert_eq!(extracted, data, "content mismatch for {}", name);
    }
}

#[test]
fn test_extract_reuses_existing_directory() {
    let (dir, path) = write_demo_container();
    let first = extract_all(&path, dir.path()).unwrap();
    let second = extract_all(&path, dir.path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_extract_counts_directory_entries() {
    let (dir, path) = write_container(
        "dirs.mph",
        &[
            ("empty/", &b""[..]),
            ("a/b/c.txt", &b"c"[..]),
            ("top.xml", &b"<t/>"[..]),
        ],
    );

    let outcome = extract_all(&path, dir.path()).unwrap();
    // empty/, a/, a/b/, a/b/c.txt, top.xml
    assert_eq!(outcome.file_count, 5);
    assert!(outcome.extracted_path.join("empty").is_dir());
}

#[test]
fn test_extract_into_missing_destination_fails() {
    let (dir, path) = write_demo_container();
    let err = expect_err(extract_all(&path, dir.path().join("no/such/dir")));
    assert!(matches!(err, ArchiveError::Io { .. }));
}

#[test]
fn test_extract_rejects_parent_traversal() {
    let (dir, path) = write_container("evil.mph", &[("../escape.txt", &b"x"[..])]);
    let dest = dir.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    let err = expect_err(extract_all(&path, &dest));
    assert!(matches!(err, ArchiveError::UnsafeMemberPath { .. }));
    assert!(!dest.join("escape.txt").exists());
    assert!(!dir.path().join("escape.txt").exists());
}

#[test]
fn test_extract_rejects_absolute_member() {
    let (dir, path) = write_container("abs.mph", &[("/tmp/abs.txt", &b"x"[..])]);
    let err = expect_err(extract_all(&path, dir.path()));
    assert!(matches!(err, ArchiveError::UnsafeMemberPath { .. }));
}

#[test]
fn test_extract_rejects_non_container() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.mph");
    std::fs::write(&path, b"PK but not really").unwrap();

    let err = expect_err(extract_all(&path, dir.path()));
    assert!(matches!(err, ArchiveError::NotAnArchive { .. }));
}
