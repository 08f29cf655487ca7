//! Model summary extraction tests.

mod common;

use mphkit::container::NOT_AVAILABLE;
use mphkit::{SizeBreakdown, extract_info, list};

use common::{DEMO_MODELINFO, demo_entries, write_container, write_demo_container};

#[test]
fn test_demo_info() {
    let (_dir, path) = write_demo_container();
    let info = extract_info(&path).expect("demo container has metadata");

    assert_eq!(info.version, "5.6");
    assert_eq!(info.title, "Demo");
    assert_eq!(info.description, "Test");
    assert_eq!(info.member_count, 6);
}

#[test]
fn test_totals_follow_classification() {
    let (_dir, path) = write_demo_container();
    let info = extract_info(&path).unwrap();
    let entries = demo_entries();

    let size_of = |name: &str| {
        entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, d)| d.len() as u64)
            .unwrap()
    };

    let total: u64 = entries.iter().map(|(_, d)| d.len() as u64).sum();
    assert_eq!(info.total_bytes, total);
    assert_eq!(
        info.text_bytes,
        size_of("modelinfo.xml") + size_of("dmodel.xml") + size_of("clusterinfo.json")
    );
    assert_eq!(info.binary_bytes, 4096);
    assert!(info.text_bytes + info.binary_bytes <= info.total_bytes);

    let breakdown = SizeBreakdown::from_members(&list(&path).unwrap());
    assert_eq!(breakdown.total_bytes(), info.total_bytes);
    assert_eq!(breakdown.text_bytes(), info.text_bytes);
}

#[test]
fn test_percentages() {
    let (_dir, path) = write_demo_container();
    let info = extract_info(&path).unwrap();

    let expected = info.binary_bytes as f64 / info.total_bytes as f64 * 100.0;
    assert!((info.binary_percent() - expected).abs() < 1e-9);
    assert!(info.text_percent() + info.binary_percent() <= 100.0 + 1e-9);
}

#[test]
fn test_version_is_trimmed() {
    let (_dir, path) = write_container(
        "v.mph",
        &[
            ("fileversion", &b"  6.2 build 290\r\n"[..]),
            ("modelinfo.xml", DEMO_MODELINFO.as_bytes()),
        ],
    );
    assert_eq!(extract_info(&path).unwrap().version, "6.2 build 290");
}

#[test]
fn test_invalid_utf8_in_version_is_dropped() {
    let (_dir, path) = write_container(
        "v.mph",
        &[
            ("fileversion", &b"5.\xff6"[..]),
            ("modelinfo.xml", DEMO_MODELINFO.as_bytes()),
        ],
    );
    assert_eq!(extract_info(&path).unwrap().version, "5.6");
}

#[test]
fn test_missing_title_reads_not_available() {
    let (_dir, path) = write_container(
        "na.mph",
        &[
            ("fileversion", &b"5.6"[..]),
            ("modelinfo.xml", &b"<modelinfo author=\"x\"/>"[..]),
        ],
    );
    let info = extract_info(&path).unwrap();
    assert_eq!(info.title, NOT_AVAILABLE);
    assert_eq!(info.description, NOT_AVAILABLE);
}

#[test]
fn test_missing_version_member_yields_none() {
    let (_dir, path) = write_container("nv.mph", &[("modelinfo.xml", DEMO_MODELINFO.as_bytes())]);
    assert!(extract_info(&path).is_none());
}

#[test]
fn test_missing_record_member_yields_none() {
    let (_dir, path) = write_container("nr.mph", &[("fileversion", &b"5.6"[..])]);
    assert!(extract_info(&path).is_none());
}

#[test]
fn test_malformed_record_yields_none() {
    let (_dir, path) = write_container(
        "bad.mph",
        &[
            ("fileversion", &b"5.6"[..]),
            ("modelinfo.xml", &b"<modelinfo title=\"Demo\"><broken></modelinfo>"[..]),
        ],
    );
    assert!(extract_info(&path).is_none());
}

#[test]
fn test_non_container_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero.mph");
    std::fs::write(&path, b"").unwrap();
    assert!(extract_info(&path).is_none());
}
