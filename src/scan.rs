//! Discovery of model containers under a projects directory.
//!
//! ```rust,no_run
//! use mphkit::scan::scan_projects;
//!
//! for project in scan_projects("comsol_projects") {
//!     println!("{:<30} {:>10}  {}", project.relative_name, project.size_label, project.folder.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

/// File extension of model containers, without the dot.
pub const CONTAINER_EXTENSION: &str = "mph";

/// One container found by [`scan_projects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    /// Full path of the container.
    pub path: PathBuf,
    /// File stem, used as the project's display name.
    pub display_name: String,
    /// Path relative to the scanned root, with `/` separators.
    pub relative_name: String,
    /// File size.
    pub size_bytes: u64,
    /// Human-readable size ("B", "KB" or "MB" with one decimal).
    pub size_label: String,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
    /// Directory containing the container.
    pub folder: PathBuf,
}

/// Recursively finds `*.mph` files under `root`, sorted by path.
///
/// Paths compare component by component, as [`Path`] orders them, so
/// `a/b.mph` sorts before `a.mph`.
///
/// An absent or unreadable root yields an empty list. Entries whose
/// metadata cannot be read are skipped with a warning.
pub fn scan_projects(root: impl AsRef<Path>) -> Vec<ProjectEntry> {
    let root = root.as_ref();
    if !root.is_dir() {
        log::debug!("projects directory '{}' does not exist", root.display());
        return Vec::new();
    }

    let mut projects = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_container(entry.path()) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                log::warn!("skipping '{}': {}", entry.path().display(), e);
                continue;
            }
        };

        let path = entry.path().to_path_buf();
        let relative = path.strip_prefix(root).unwrap_or(&path);
        projects.push(ProjectEntry {
            display_name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            relative_name: relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            size_bytes: metadata.len(),
            size_label: format_file_size(metadata.len()),
            modified: metadata.modified().ok(),
            folder: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            path,
        });
    }

    projects
}

fn is_container(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CONTAINER_EXTENSION)
}

/// Formats a file size as "N B", "x.y KB" or "x.y MB".
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}
