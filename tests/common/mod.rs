//! Shared test utilities for integration tests.
//!
//! Container fixtures are built in memory with `zip::ZipWriter` and, when a
//! test needs a path, written into a temporary directory.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// `dmodel.xml` of the demo container: one user parameter plus entries the
/// extractor must skip.
pub const DEMO_DMODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<model tag="Model">
  <param tag="param">
    <expressions name="Voltage" expr="10[V]" descr="Supply voltage"/>
    <expressions name="currentiter" expr="1" descr="Solver iteration"/>
  </param>
  <mesh tag="mesh1">
    <expressions name="mesh1" expr="Triangle(hmax=0.1)" descr="Mesh seed"/>
  </mesh>
</model>
"#;

/// `modelinfo.xml` of the demo container.
pub const DEMO_MODELINFO: &str =
    r#"<?xml version="1.0"?><modelinfo title="Demo" description="Test" author="lab"/>"#;

/// Members of the demo container, in archive order.
pub fn demo_entries() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("fileversion", b"5.6".to_vec()),
        ("modelinfo.xml", DEMO_MODELINFO.as_bytes().to_vec()),
        ("dmodel.xml", DEMO_DMODEL.as_bytes().to_vec()),
        ("savepoint1/data.mphbin", vec![0xA5; 4096]),
        ("preview.png", vec![0x89, b'P', b'N', b'G', 0, 0, 0, 0]),
        ("clusterinfo.json", br#"{"nodes":1}"#.to_vec()),
    ]
}

/// Builds a `dmodel.xml` document from `(name, expr, descr)` declarations.
/// Values are inserted verbatim, so callers escape them when needed.
pub fn dmodel_xml(declarations: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<model>\n  <param>\n");
    for (name, expr, descr) in declarations {
        xml.push_str(&format!(
            "    <expressions name=\"{}\" expr=\"{}\" descr=\"{}\"/>\n",
            name, expr, descr
        ));
    }
    xml.push_str("  </param>\n</model>\n");
    xml
}

/// Creates an in-memory container. Names ending in `/` become directory
/// entries and their data is ignored.
pub fn create_container<N, D>(entries: &[(N, D)]) -> Vec<u8>
where
    N: AsRef<str>,
    D: AsRef<[u8]>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        let name = name.as_ref();
        if name.ends_with('/') {
            writer
                .add_directory(name, options)
                .expect("Failed to add directory");
        } else {
            writer
                .start_file(name, options)
                .expect("Failed to start member");
            writer.write_all(data.as_ref()).expect("Failed to write member");
        }
    }

    writer
        .finish()
        .expect("Failed to finish container")
        .into_inner()
}

/// Writes a container into a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn write_container<N, D>(file_name: &str, entries: &[(N, D)]) -> (TempDir, PathBuf)
where
    N: AsRef<str>,
    D: AsRef<[u8]>,
{
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(file_name);
    std::fs::write(&path, create_container(entries)).expect("Failed to write container");
    (temp_dir, path)
}

/// Writes the demo container as `demo.mph` into a fresh temporary directory.
pub fn write_demo_container() -> (TempDir, PathBuf) {
    write_container("demo.mph", &demo_entries())
}

/// Reads one member of the container at `path`, panicking if it is absent.
pub fn read_member(path: &Path, name: &str) -> Vec<u8> {
    let file = std::fs::File::open(path).expect("Failed to open container");
    let mut zip = ZipArchive::new(file).expect("Failed to read container");
    let mut entry = zip
        .by_name(name)
        .unwrap_or_else(|e| panic!("Missing member '{}': {}", name, e));
    let mut data = Vec::new();
    entry.read_to_end(&mut data).expect("Failed to read member");
    data
}

/// Returns the member names of the container at `path`, in archive order.
pub fn member_names(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).expect("Failed to open container");
    let zip = ZipArchive::new(file).expect("Failed to read container");
    (0..zip.len())
        .filter_map(|i| zip.name_for_index(i).map(str::to_string))
        .collect()
}

/// Extracts the error from a Result, panicking if it's Ok.
///
/// Useful when the Ok type doesn't implement Debug.
pub fn expect_err<T, E>(result: Result<T, E>) -> E {
    match result {
        Ok(_) => panic!("Expected error but got Ok"),
        Err(e) => e,
    }
}
