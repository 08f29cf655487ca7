//! Read-only access to model containers.
//!
//! A container is a ZIP-compatible archive. This module opens it, lists and
//! classifies its members, derives the [`ModelInfo`] summary, and extracts
//! its contents to disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use mphkit::Container;
//!
//! let mut container = Container::open("busbar.mph")?;
//!
//! for member in container.members()? {
//!     println!("{:>10}  {:<16} {}", member.size_label(), member.category, member.name);
//! }
//!
//! if let Some(info) = container.info() {
//!     println!("{} (version {})", info.title, info.version);
//! }
//! # Ok::<(), mphkit::ArchiveError>(())
//! ```

mod extraction;
mod info;
mod listing;

pub use extraction::{ExtractOutcome, extract_all, extracted_dir_for};
pub use info::{ModelInfo, NOT_AVAILABLE, extract_info};
pub use listing::{Category, Member, format_size, list};

pub(crate) use extraction::unpack_into;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::{ArchiveError, ArchiveResult};

/// An open model container.
///
/// The container is a read-only view: nothing here writes back to the
/// source. Patching produces a new file, see [`crate::edit`].
pub struct Container<R = BufReader<File>> {
    zip: ZipArchive<R>,
    path: Option<PathBuf>,
}

impl Container<BufReader<File>> {
    /// Opens the container at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the file cannot be opened and
    /// [`ArchiveError::NotAnArchive`] if it is not a ZIP container
    /// (corrupt header, wrong magic, zero length).
    pub fn open(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
        let zip = ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::NotAnArchive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::debug!("opened '{}' ({} members)", path.display(), zip.len());
        Ok(Self {
            zip,
            path: Some(path.to_path_buf()),
        })
    }
}

impl<R: Read + Seek> Container<R> {
    /// Opens a container from any seekable reader.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NotAnArchive`] if the data is not a ZIP container.
    pub fn from_reader(reader: R) -> ArchiveResult<Self> {
        let zip = ZipArchive::new(reader).map_err(|e| ArchiveError::NotAnArchive {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;
        Ok(Self { zip, path: None })
    }

    /// Returns the path the container was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.zip.len()
    }

    /// Returns true if the container has no members.
    pub fn is_empty(&self) -> bool {
        self.zip.len() == 0
    }

    /// Lists members in archive order.
    pub fn members(&mut self) -> ArchiveResult<Vec<Member>> {
        let mut members = Vec::with_capacity(self.zip.len());
        for idx in 0..self.zip.len() {
            let entry = self
                .zip
                .by_index(idx)
                .map_err(|e| member_error(format!("#{}", idx), e))?;
            members.push(Member::new(entry.name(), entry.size()));
        }
        Ok(members)
    }

    /// Returns true if a member with exactly this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.zip.index_for_name(name).is_some()
    }

    /// Reads a member's full contents.
    ///
    /// Returns `Ok(None)` when no member has this name.
    pub fn read_member(&mut self, name: &str) -> ArchiveResult<Option<Vec<u8>>> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(member_error(name, e)),
        };
        let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry
            .read_to_end(&mut data)
            .map_err(|e| ArchiveError::MemberRead {
                member: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Some(data))
    }

    /// Reads a member as UTF-8 text.
    ///
    /// Returns `Ok(None)` when no member has this name.
    pub fn read_member_text(&mut self, name: &str) -> ArchiveResult<Option<String>> {
        match self.read_member(name)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| ArchiveError::MemberRead {
                    member: name.to_string(),
                    reason: "not valid UTF-8".to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Derives the model summary, see [`extract_info`].
    pub fn info(&mut self) -> Option<ModelInfo> {
        info::from_container(self)
    }

    /// Reads the parameter table, see [`crate::params::extract_parameters`].
    pub fn parameters(&mut self) -> Vec<crate::params::Parameter> {
        crate::params::from_container(self)
    }

    pub(crate) fn zip_mut(&mut self) -> &mut ZipArchive<R> {
        &mut self.zip
    }
}

fn member_error(member: impl Into<String>, error: ZipError) -> ArchiveError {
    ArchiveError::MemberRead {
        member: member.into(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_from_reader_members_in_archive_order() {
        let bytes = zip_bytes(&[("z.xml", b"<a/>"), ("a.mphbin", &[0u8; 10])]);
        let mut container = Container::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(container.len(), 2);
        assert!(container.path().is_none());
        let members = container.members().unwrap();
        assert_eq!(members[0].name, "z.xml");
        assert_eq!(members[1].name, "a.mphbin");
        assert_eq!(members[1].size_bytes, 10);
        assert_eq!(members[1].category, Category::SimulationData);
    }

    #[test]
    fn test_read_member_missing_is_none() {
        let bytes = zip_bytes(&[("fileversion", b"6.1")]);
        let mut container = Container::from_reader(Cursor::new(bytes)).unwrap();

        assert!(container.contains("fileversion"));
        assert!(!container.contains("dmodel.xml"));
        assert_eq!(container.read_member("dmodel.xml").unwrap(), None);
        assert_eq!(
            container.read_member_text("fileversion").unwrap().as_deref(),
            Some("6.1")
        );
    }

    #[test]
    fn test_read_member_text_rejects_invalid_utf8() {
        let bytes = zip_bytes(&[("bad.xml", &[0xff, 0xfe, 0x00])]);
        let mut container = Container::from_reader(Cursor::new(bytes)).unwrap();
        let err = container.read_member_text("bad.xml").unwrap_err();
        assert!(matches!(err, ArchiveError::MemberRead { .. }));
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = zip_bytes(&[]);
        let mut container = Container::from_reader(Cursor::new(bytes)).unwrap();
        assert!(container.is_empty());
        assert!(container.members().unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_not_an_archive() {
        let result = Container::from_reader(Cursor::new(b"definitely not a zip".to_vec()));
        assert!(matches!(result, Err(ArchiveError::NotAnArchive { .. })));

        let result = Container::from_reader(Cursor::new(Vec::new()));
        assert!(matches!(result, Err(ArchiveError::NotAnArchive { .. })));
    }
}
