//! Exit codes for the CLI tool.

use mphkit::{ArchiveError, PatchError};

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Operation completed with warnings
pub const WARNING: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Container format error
pub const BAD_ARCHIVE: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Warning,
    FatalError,
    BadArchive,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a container error to an exit code
pub fn archive_error_to_exit_code(error: &ArchiveError) -> ExitCode {
    match error {
        ArchiveError::NotAnArchive { .. } => ExitCode::BadArchive,
        ArchiveError::MemberRead { .. } => ExitCode::BadArchive,
        ArchiveError::Io { .. } => ExitCode::IoError,
        ArchiveError::UnsafeMemberPath { .. } => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}

/// Converts a patch error to an exit code
pub fn patch_error_to_exit_code(error: &PatchError) -> ExitCode {
    match error {
        PatchError::Extract(inner) => archive_error_to_exit_code(inner),
        PatchError::MissingTargetMember { .. }
        | PatchError::TargetNotUtf8 { .. }
        | PatchError::MalformedTarget { .. } => ExitCode::BadArchive,
        PatchError::ScratchIo { .. }
        | PatchError::BackupFailed { .. }
        | PatchError::Repackage { .. } => ExitCode::IoError,
        _ => ExitCode::FatalError,
    }
}
