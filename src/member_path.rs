//! Validated member names for safe materialization on disk.

use std::fmt;
use std::path::PathBuf;

use crate::{ArchiveError, ArchiveResult};

/// Maximum length for member names (in bytes).
const MAX_PATH_LENGTH: usize = 32768;

/// A member name that is safe to join onto an extraction root.
///
/// `MemberPath` accepts the `/`-separated names stored in a container and
/// rejects anything that could write outside the destination:
/// - NUL bytes
/// - absolute names (`/etc/passwd`, `C:\x`)
/// - `.` or `..` segments
///
/// Only `/` separates segments. A `\` is an ordinary character of the name,
/// so `a\b` stays a single file and is repackaged under the same name. On
/// Windows, where the filesystem would split it, such names are rejected.
///
/// A single trailing `/` (the ZIP convention for directory entries) is
/// stripped. Empty segments (`a//b`) are tolerated and dropped.
///
/// # Examples
///
/// ```
/// use mphkit::MemberPath;
///
/// let path = MemberPath::new("savepoint1/data.mphbin").unwrap();
/// assert_eq!(path.as_str(), "savepoint1/data.mphbin");
///
/// assert!(MemberPath::new("../outside.txt").is_err());
/// assert!(MemberPath::new("/etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberPath(String);

impl MemberPath {
    /// Validates a member name.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::UnsafeMemberPath`] if the name is empty,
    /// absolute, too long, contains NUL, or has `.`/`..` segments. On
    /// Windows, a name containing `\` is rejected as well.
    pub fn new(name: &str) -> ArchiveResult<Self> {
        let trimmed = name.strip_suffix('/').unwrap_or(name);
        let reject = |reason: &str| ArchiveError::UnsafeMemberPath {
            member: name.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.contains('\0') {
            return Err(reject("contains NUL byte"));
        }
        if trimmed.len() > MAX_PATH_LENGTH {
            return Err(reject("name exceeds maximum length"));
        }
        if cfg!(windows) && trimmed.contains('\\') {
            return Err(reject("backslash not allowed in member name"));
        }
        if trimmed.starts_with('/') {
            return Err(reject("absolute path not allowed"));
        }
        let bytes = trimmed.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
            return Err(reject("drive-prefixed path not allowed"));
        }

        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            return Err(reject("empty path"));
        }
        for segment in &segments {
            if *segment == "." {
                return Err(reject("'.' segment not allowed"));
            }
            if *segment == ".." {
                return Err(reject("'..' segment not allowed (path traversal)"));
            }
        }

        Ok(Self(segments.join("/")))
    }

    /// Returns the normalized name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name as a relative filesystem path.
    pub fn to_relative_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }

    /// Returns the last segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl AsRef<str> for MemberPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
