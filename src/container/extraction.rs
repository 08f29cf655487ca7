//! Writing container members to the filesystem.

use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{ArchiveError, ArchiveResult, MemberPath};

use super::{Container, member_error};

/// Result of a bulk extraction.
#[must_use = "extraction results report where the members were written"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// The `<stem>-extracted` directory that received the members.
    pub extracted_path: PathBuf,
    /// Number of filesystem entries under `extracted_path` afterwards,
    /// directories included.
    pub file_count: usize,
}

/// Returns the extraction directory for `container` under `destination`:
/// `<destination>/<stem>-extracted`.
pub fn extracted_dir_for(container: &Path, destination: &Path) -> PathBuf {
    let stem = container
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.join(format!("{}-extracted", stem))
}

/// Extracts every member of the container at `path` into
/// `<destination_dir>/<stem>-extracted`, preserving relative paths.
///
/// `destination_dir` must already exist; the extraction directory itself is
/// created if needed and reused if present.
///
/// # Errors
///
/// Fails if the container cannot be opened, a member name is unsafe
/// ([`ArchiveError::UnsafeMemberPath`]), or writing fails.
pub fn extract_all(
    path: impl AsRef<Path>,
    destination_dir: impl AsRef<Path>,
) -> ArchiveResult<ExtractOutcome> {
    let path = path.as_ref();
    let mut container = Container::open(path)?;

    let root = extracted_dir_for(path, destination_dir.as_ref());
    match fs::create_dir(&root) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && root.is_dir() => {}
        Err(e) => return Err(ArchiveError::io(&root, e)),
    }

    unpack_into(&mut container, &root)?;
    let file_count = count_entries(&root)?;

    log::info!(
        "extracted '{}' to '{}' ({} entries)",
        path.display(),
        root.display(),
        file_count
    );
    Ok(ExtractOutcome {
        extracted_path: root,
        file_count,
    })
}

/// Writes every member under `root`. Returns the number of regular files
/// written.
pub(crate) fn unpack_into<R: Read + Seek>(
    container: &mut Container<R>,
    root: &Path,
) -> ArchiveResult<usize> {
    let zip = container.zip_mut();
    let mut files_written = 0;

    for idx in 0..zip.len() {
        let mut entry = zip
            .by_index(idx)
            .map_err(|e| member_error(format!("#{}", idx), e))?;
        let member = MemberPath::new(entry.name())?;
        let target = root.join(member.to_relative_path());

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ArchiveError::io(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }
        let mut output = File::create(&target).map_err(|e| ArchiveError::io(&target, e))?;
        io::copy(&mut entry, &mut output).map_err(|e| ArchiveError::MemberRead {
            member: member.to_string(),
            reason: e.to_string(),
        })?;
        files_written += 1;
    }

    Ok(files_written)
}

/// Counts files and directories below `root` (excluding `root` itself).
fn count_entries(root: &Path) -> ArchiveResult<usize> {
    let mut count = 0;
    for entry in WalkDir::new(root).min_depth(1) {
        entry.map_err(|e| ArchiveError::io(root, e.into()))?;
        count += 1;
    }
    Ok(count)
}
