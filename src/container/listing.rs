//! Member enumeration and classification.

use std::fmt;
use std::path::Path;

use crate::ArchiveResult;

use super::Container;

/// Presentation class of a member, derived from its filename suffix.
///
/// Categories carry no behavior; they drive labels and size summaries only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// `.xml` structured configuration.
    Config,
    /// `.json` metadata.
    Metadata,
    /// `.mphbin` simulation payloads.
    SimulationData,
    /// `.png` previews.
    PreviewImage,
    /// `.txt` text data.
    TextData,
    /// `.zip` nested checkpoint archives.
    CheckpointArchive,
    /// Anything else.
    Data,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 7] = [
        Category::Config,
        Category::Metadata,
        Category::SimulationData,
        Category::PreviewImage,
        Category::TextData,
        Category::CheckpointArchive,
        Category::Data,
    ];

    /// Classifies a member by its name suffix (case-sensitive).
    pub fn classify(name: &str) -> Self {
        if name.ends_with(".xml") {
            Self::Config
        } else if name.ends_with(".json") {
            Self::Metadata
        } else if name.ends_with(".mphbin") {
            Self::SimulationData
        } else if name.ends_with(".png") {
            Self::PreviewImage
        } else if name.ends_with(".txt") {
            Self::TextData
        } else if name.ends_with(".zip") {
            Self::CheckpointArchive
        } else {
            Self::Data
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Config => "Configuration",
            Self::Metadata => "Metadata",
            Self::SimulationData => "Simulation Data",
            Self::PreviewImage => "Preview Image",
            Self::TextData => "Text Data",
            Self::CheckpointArchive => "Checkpoint",
            Self::Data => "Data",
        }
    }

    /// Short tag used for coloring and machine-readable output.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Config => "xml",
            Self::Metadata => "json",
            Self::SimulationData => "binary",
            Self::PreviewImage => "image",
            Self::TextData | Self::Data => "text",
            Self::CheckpointArchive => "archive",
        }
    }

    /// Whether members of this category count toward the text subtotal.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Config | Self::Metadata | Self::TextData)
    }

    /// Whether members of this category count toward the binary subtotal.
    pub fn is_binary(self) -> bool {
        matches!(self, Self::SimulationData)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One named entry inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Path within the archive, `/` separated.
    pub name: String,
    /// Uncompressed size.
    pub size_bytes: u64,
    /// Classification by suffix.
    pub category: Category,
}

impl Member {
    /// Creates a member and classifies it.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let category = Category::classify(&name);
        Self {
            name,
            size_bytes,
            category,
        }
    }

    /// Size formatted for display, see [`format_size`].
    pub fn size_label(&self) -> String {
        format_size(self.size_bytes)
    }

    /// Returns true for ZIP directory entries.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// Formats a member size: plain bytes below 1 KiB, otherwise kibibytes with
/// one decimal.
///
/// ```
/// use mphkit::container::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

/// Lists all members of the container at `path` in archive order.
///
/// # Errors
///
/// Fails with [`ArchiveError::NotAnArchive`](crate::ArchiveError::NotAnArchive)
/// if the file is not a ZIP container. An empty archive is not an error.
pub fn list(path: impl AsRef<Path>) -> ArchiveResult<Vec<Member>> {
    Container::open(path)?.members()
}
