//! Member checksums and container comparison.
//!
//! CRC-32 (the IEEE polynomial used by ZIP itself) is computed over each
//! member's decompressed contents. Comparing two containers by digest tells
//! which members a patch actually changed.
//!
//! # Example
//!
//! ```rust
//! use mphkit::checksum::Crc32;
//!
//! let mut crc = Crc32::new();
//! crc.update(b"1234");
//! crc.update(b"56789");
//! assert_eq!(crc.finalize(), 0xCBF4_3926);
//! assert_eq!(Crc32::compute(b"123456789"), 0xCBF4_3926);
//! ```

use std::collections::BTreeMap;
use std::io::{self, Read, Seek};
use std::path::Path;

use crate::container::Container;
use crate::{ArchiveError, ArchiveResult, READ_BUFFER_SIZE};

/// Incremental CRC-32 calculator.
#[derive(Debug, Clone, Default)]
pub struct Crc32 {
    hasher: crc32fast::Hasher,
}

impl Crc32 {
    /// Creates a new calculator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds more data.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Returns the checksum of everything fed so far.
    pub fn finalize(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Computes the checksum of a single slice.
    pub fn compute(data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }

    /// Computes the checksum of everything `reader` yields.
    pub fn compute_reader<R: Read>(reader: &mut R) -> io::Result<u32> {
        let mut crc = Self::new();
        let mut buffer = [0u8; READ_BUFFER_SIZE];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            crc.update(&buffer[..n]);
        }
        Ok(crc.finalize())
    }
}

/// Size and checksum of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDigest {
    /// Member name.
    pub name: String,
    /// Uncompressed size.
    pub size_bytes: u64,
    /// CRC-32 of the decompressed contents.
    pub crc32: u32,
}

/// Difference between two containers, by member name and content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDiff {
    /// Members present only in the left container.
    pub only_in_left: Vec<String>,
    /// Members present only in the right container.
    pub only_in_right: Vec<String>,
    /// Members present in both with different contents.
    pub changed: Vec<String>,
    /// Number of members present in both with identical contents.
    pub unchanged: usize,
}

impl ContainerDiff {
    /// Returns true if both containers hold the same members with the same
    /// contents (member order and compression are not compared).
    pub fn is_identical(&self) -> bool {
        self.only_in_left.is_empty() && self.only_in_right.is_empty() && self.changed.is_empty()
    }
}

/// Computes digests of every member of the container at `path`, in archive
/// order. Directory entries are skipped.
pub fn member_digests(path: impl AsRef<Path>) -> ArchiveResult<Vec<MemberDigest>> {
    digests_of(&mut Container::open(path)?)
}

fn digests_of<R: Read + Seek>(
    container: &mut Container<R>,
) -> ArchiveResult<Vec<MemberDigest>> {
    let zip = container.zip_mut();
    let mut digests = Vec::with_capacity(zip.len());
    for idx in 0..zip.len() {
        let mut entry = zip.by_index(idx).map_err(|e| ArchiveError::MemberRead {
            member: format!("#{}", idx),
            reason: e.to_string(),
        })?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let crc32 = Crc32::compute_reader(&mut entry).map_err(|e| ArchiveError::MemberRead {
            member: name.clone(),
            reason: e.to_string(),
        })?;
        digests.push(MemberDigest {
            size_bytes: entry.size(),
            name,
            crc32,
        });
    }
    Ok(digests)
}

/// Compares the containers at `left` and `right` member by member.
pub fn compare(left: impl AsRef<Path>, right: impl AsRef<Path>) -> ArchiveResult<ContainerDiff> {
    let left = member_digests(left)?;
    let right = member_digests(right)?;
    Ok(diff_digests(&left, &right))
}

fn diff_digests(left: &[MemberDigest], right: &[MemberDigest]) -> ContainerDiff {
    let right_index: BTreeMap<&str, &MemberDigest> =
        right.iter().map(|d| (d.name.as_str(), d)).collect();
    let left_index: BTreeMap<&str, &MemberDigest> =
        left.iter().map(|d| (d.name.as_str(), d)).collect();

    let mut diff = ContainerDiff::default();
    for (name, digest) in &left_index {
        match right_index.get(name) {
            Some(other) if other.crc32 == digest.crc32 && other.size_bytes == digest.size_bytes => {
                diff.unchanged += 1;
            }
            Some(_) => diff.changed.push((*name).to_string()),
            None => diff.only_in_left.push((*name).to_string()),
        }
    }
    diff.only_in_right = right_index
        .keys()
        .filter(|name| !left_index.contains_key(*name))
        .map(|name| (*name).to_string())
        .collect();
    diff
}
