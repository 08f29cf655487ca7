//! Error types for container inspection and patching.
//!
//! Failures fall into two families:
//!
//! - [`ArchiveError`]: the container could not be opened, a member could not
//!   be read, or a member name is unsafe to materialize on disk.
//! - [`PatchError`]: the edit-and-repackage cycle failed. These are always
//!   surfaced to the caller because a lost edit must never look like a
//!   successful save.
//!
//! Metadata and parameter extraction do not appear here: they degrade to
//! `None` or an empty table instead of failing.
//!
//! Every error can report the [`Stage`] it belongs to, so a front end can
//! tell "nothing to show" apart from "edit not saved".
//!
//! ```rust
//! use mphkit::{ArchiveError, Stage};
//!
//! fn describe(stage: Stage, error: &ArchiveError) -> String {
//!     match error {
//!         ArchiveError::NotAnArchive { .. } => format!("{stage}: not a model container"),
//!         other => format!("{stage}: {other}"),
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Pipeline step in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Enumerating container members.
    List,
    /// Reading the version marker and model-info record.
    Metadata,
    /// Reading the parameter table.
    Parameters,
    /// Bulk extraction to a destination directory.
    Extract,
    /// Unpacking and rewriting the parameter member.
    Patch,
    /// Writing the backup or the modified container.
    Repackage,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Metadata => "extract-metadata",
            Self::Parameters => "extract-parameters",
            Self::Extract => "extract",
            Self::Patch => "patch",
            Self::Repackage => "repackage",
        };
        f.write_str(name)
    }
}

/// Errors raised while opening or reading a container.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// The file exists but is not a readable ZIP container.
    #[error("'{}' is not a model container: {reason}", path.display())]
    NotAnArchive {
        /// Path of the offending file.
        path: PathBuf,
        /// Description of the format problem.
        reason: String,
    },

    /// Filesystem access failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A member exists but its contents could not be read.
    #[error("cannot read member '{member}': {reason}")]
    MemberRead {
        /// Member name inside the container.
        member: String,
        /// Description of the failure.
        reason: String,
    },

    /// A member name would escape the extraction root.
    #[error("unsafe member path '{member}': {reason}")]
    UnsafeMemberPath {
        /// Member name inside the container.
        member: String,
        /// Why the name was rejected.
        reason: String,
    },
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the container itself is unreadable, as opposed to a
    /// single member or the destination filesystem.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::NotAnArchive { .. })
    }
}

/// Errors raised by the patch-and-repackage engine.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PatchError {
    /// Unpacking the source container into the scratch directory failed.
    #[error("failed to unpack container: {0}")]
    Extract(#[from] ArchiveError),

    /// The member holding the parameter declarations is absent.
    #[error("could not find {member} in container")]
    MissingTargetMember {
        /// Name of the missing member.
        member: String,
    },

    /// The parameter member is not valid UTF-8 text.
    #[error("{member} is not valid UTF-8 text")]
    TargetNotUtf8 {
        /// Name of the member.
        member: String,
    },

    /// The parameter member could not be parsed as XML.
    #[error("{member} is not well-formed: {reason}")]
    MalformedTarget {
        /// Name of the member.
        member: String,
        /// Parser message.
        reason: String,
    },

    /// Reading or writing inside the scratch directory failed.
    #[error("scratch I/O error on '{}': {source}", path.display())]
    ScratchIo {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The backup copy of the original could not be written.
    #[error("failed to write backup '{}': {source}", path.display())]
    BackupFailed {
        /// Intended backup path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Writing the modified container failed.
    #[error("failed to write modified container '{}': {reason}", path.display())]
    Repackage {
        /// Intended output path.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },
}

impl PatchError {
    /// Returns the pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Extract(_)
            | Self::MissingTargetMember { .. }
            | Self::TargetNotUtf8 { .. }
            | Self::MalformedTarget { .. }
            | Self::ScratchIo { .. } => Stage::Patch,
            Self::BackupFailed { .. } | Self::Repackage { .. } => Stage::Repackage,
        }
    }
}

/// Errors raised while staging edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EditError {
    /// Parameter names cannot be empty.
    #[error("parameter name cannot be empty")]
    EmptyName,

    /// A staged value cannot be empty after trimming.
    #[error("value for '{name}' cannot be empty")]
    EmptyValue {
        /// Parameter the value was staged for.
        name: String,
    },
}

/// Result alias for reading operations.
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Result alias for the patch engine.
pub type PatchResult<T> = std::result::Result<T, PatchError>;
