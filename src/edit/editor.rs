//! The extract, patch and repackage pipeline.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::container::{Container, unpack_into};
use crate::{DMODEL_MEMBER, PatchError, PatchResult};

use super::patch::patch_expressions;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Compression used for members of the modified container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    Stored,
    /// Deflate, as written by generic ZIP tools.
    #[default]
    Deflated,
}

impl From<Compression> for zip::CompressionMethod {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::Stored => zip::CompressionMethod::Stored,
            Compression::Deflated => zip::CompressionMethod::Deflated,
        }
    }
}

/// Options for [`apply_patch_with_options`].
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    output_dir: Option<PathBuf>,
    compression: Compression,
}

impl PatchOptions {
    /// Creates the default options: outputs next to the original, Deflate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the backup and the modified container into `dir` instead of
    /// the original's directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the member compression of the modified container.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

/// Result of a successful patch.
#[must_use = "patch outcome carries the paths of the files that were written"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// The `<stem>_modified<ext>` container.
    pub new_container_path: PathBuf,
    /// The `<stem>_backup<ext>` copy of the original.
    pub backup_path: PathBuf,
    /// Number of edits that matched a declaration.
    pub parameters_patched: usize,
    /// Edit names with no declaration in the container.
    pub unmatched: Vec<String>,
}

/// Backup path for `original`: `<stem>_backup<ext>` in the same directory.
pub fn backup_path_for(original: &Path) -> PathBuf {
    sibling_with_suffix(original, None, "_backup")
}

/// Modified-container path for `original`: `<stem>_modified<ext>` in the same
/// directory.
pub fn modified_path_for(original: &Path) -> PathBuf {
    sibling_with_suffix(original, None, "_modified")
}

fn sibling_with_suffix(original: &Path, dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match original.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    let dir = dir.or_else(|| original.parent()).unwrap_or(Path::new(""));
    dir.join(file_name)
}

/// Applies `edits` (parameter name to new expression) to the container at
/// `path`, writing a backup and a modified copy next to it.
///
/// See [`apply_patch_with_options`] for the full contract.
pub fn apply_patch<I, K, V>(path: impl AsRef<Path>, edits: I) -> PatchResult<PatchOutcome>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    apply_patch_with_options(path, edits, &PatchOptions::default())
}

/// Applies `edits` to the container at `path`.
///
/// 1. Every member is unpacked into a private scratch directory, which is
///    removed on every exit path.
/// 2. `dmodel.xml` must be present.
/// 3. Each edit rewrites the `expr` value of the first declaration with that
///    name. Unknown names are ignored and reported in
///    [`PatchOutcome::unmatched`].
/// 4. The original is copied to `<stem>_backup<ext>`.
/// 5. The scratch tree is packed into `<stem>_modified<ext>`, walked in
///    sorted order; directories are not written as members.
///
/// The original file is never modified. If the process dies between steps 4
/// and 5, a backup without a modified container is left behind; treat that
/// as an incomplete operation.
///
/// # Errors
///
/// Any failure aborts the operation; see [`PatchError`] and
/// [`PatchError::stage`].
pub fn apply_patch_with_options<I, K, V>(
    path: impl AsRef<Path>,
    edits: I,
    options: &PatchOptions,
) -> PatchResult<PatchOutcome>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let original = path.as_ref();
    let edits: BTreeMap<String, String> = edits
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();

    let scratch = tempfile::Builder::new()
        .prefix("mphkit-")
        .tempdir()
        .map_err(|source| PatchError::ScratchIo {
            path: std::env::temp_dir(),
            source,
        })?;

    {
        let mut container = Container::open(original)?;
        unpack_into(&mut container, scratch.path())?;
    }

    let target = scratch.path().join(DMODEL_MEMBER);
    if !target.is_file() {
        return Err(PatchError::MissingTargetMember {
            member: DMODEL_MEMBER.to_string(),
        });
    }

    let bytes = fs::read(&target).map_err(|source| PatchError::ScratchIo {
        path: target.clone(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| PatchError::TargetNotUtf8 {
        member: DMODEL_MEMBER.to_string(),
    })?;
    let patched = patch_expressions(&text, &edits).map_err(|e| PatchError::MalformedTarget {
        member: DMODEL_MEMBER.to_string(),
        reason: e.to_string(),
    })?;
    if patched.is_changed() {
        fs::write(&target, patched.text.as_bytes()).map_err(|source| PatchError::ScratchIo {
            path: target.clone(),
            source,
        })?;
    }

    let output_dir = options.output_dir.as_deref();
    let backup_path = sibling_with_suffix(original, output_dir, "_backup");
    fs::copy(original, &backup_path).map_err(|source| PatchError::BackupFailed {
        path: backup_path.clone(),
        source,
    })?;

    let new_container_path = sibling_with_suffix(original, output_dir, "_modified");
    let written = repackage(scratch.path(), &new_container_path, options.compression)?;

    if let Err(e) = scratch.close() {
        log::warn!("failed to remove scratch directory: {}", e);
    }

    log::info!(
        "patched {} of {} parameters in '{}' -> '{}' ({} members)",
        patched.matched.len(),
        edits.len(),
        original.display(),
        new_container_path.display(),
        written
    );

    Ok(PatchOutcome {
        new_container_path,
        backup_path,
        parameters_patched: patched.matched.len(),
        unmatched: patched.unmatched,
    })
}

/// Packs every regular file under `root` into a new container at `dest`.
/// Returns the number of members written.
///
/// A partially written `dest` is removed on failure.
pub(crate) fn repackage(root: &Path, dest: &Path, compression: Compression) -> PatchResult<usize> {
    let output = File::create(dest).map_err(|e| PatchError::Repackage {
        path: dest.to_path_buf(),
        reason: e.to_string(),
    })?;

    match write_tree(root, output, compression) {
        Ok(written) => Ok(written),
        Err(e) => {
            if let Err(remove_err) = fs::remove_file(dest) {
                log::warn!(
                    "failed to remove partial output '{}': {}",
                    dest.display(),
                    remove_err
                );
            }
            Err(PatchError::Repackage {
                path: dest.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

fn write_tree(root: &Path, output: File, compression: Compression) -> Result<usize, BoxError> {
    let mut writer = ZipWriter::new(BufWriter::new(output));
    let mut written = 0;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = member_name(entry.path().strip_prefix(root)?);
        let options = SimpleFileOptions::default()
            .compression_method(compression.into())
            .large_file(entry.metadata()?.len() >= u64::from(u32::MAX));

        writer.start_file(name, options)?;
        let mut input = File::open(entry.path())?;
        io::copy(&mut input, &mut writer)?;
        written += 1;
    }

    let mut output = writer.finish()?;
    output.flush()?;
    Ok(written)
}

/// Converts a path relative to the scratch root into a `/`-separated name.
fn member_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        let original = Path::new("/projects/busbar.mph");
        assert_eq!(
            backup_path_for(original),
            Path::new("/projects/busbar_backup.mph")
        );
        assert_eq!(
            modified_path_for(original),
            Path::new("/projects/busbar_modified.mph")
        );
    }

    #[test]
    fn test_output_paths_keep_original_extension() {
        assert_eq!(
            backup_path_for(Path::new("dir/model.v2.zip")),
            Path::new("dir/model.v2_backup.zip")
        );
        assert_eq!(
            modified_path_for(Path::new("model")),
            Path::new("model_modified")
        );
    }

    #[test]
    fn test_output_dir_override() {
        let path = sibling_with_suffix(
            Path::new("/projects/busbar.mph"),
            Some(Path::new("/out")),
            "_modified",
        );
        assert_eq!(path, Path::new("/out/busbar_modified.mph"));
    }

    #[test]
    fn test_member_name_uses_forward_slashes() {
        let relative = Path::new("savepoint1").join("data").join("mesh.mphbin");
        assert_eq!(member_name(&relative), "savepoint1/data/mesh.mphbin");
    }

    #[test]
    fn test_repackage_skips_directories() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("tree");
        fs::create_dir_all(root.join("empty_dir")).unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/b.txt"), b"b").unwrap();
        fs::write(root.join("a.xml"), b"<a/>").unwrap();

        let dest = temp.path().join("out.mph");
        let written = repackage(&root, &dest, Compression::Deflated).unwrap();
        assert_eq!(written, 2);

        let names: Vec<_> = crate::list(&dest)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["a.xml", "sub/b.txt"]);
    }

    #[test]
    fn test_repackage_failure_reports_path() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("missing_dir").join("out.mph");
        let err = repackage(temp.path(), &dest, Compression::Stored).unwrap_err();
        assert!(matches!(err, PatchError::Repackage { .. }));
        assert_eq!(err.stage(), crate::Stage::Repackage);
    }
}
