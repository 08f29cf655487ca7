//! # mphkit
//!
//! Inspection and non-destructive editing of simulation-model containers.
//!
//! A model container is a ZIP archive that holds structured text (XML and
//! JSON), binary solver payloads, preview images and nested checkpoint
//! archives. Three members have fixed meaning:
//!
//! - `fileversion`: the format version marker, plain text;
//! - `modelinfo.xml`: a record whose first element carries `title` and
//!   `description` attributes;
//! - `dmodel.xml`: the model document, where global parameters are declared
//!   as elements with `name`, `expr` and `descr` attributes.
//!
//! ## Quick Start
//!
//! ### Inspecting a Container
//!
//! ```rust,no_run
//! use mphkit::{extract_info, extract_parameters, list};
//!
//! fn main() -> mphkit::ArchiveResult<()> {
//!     for member in list("busbar.mph")? {
//!         println!("{:<40} {:>10} {}", member.name, member.size_label(), member.category);
//!     }
//!
//!     if let Some(info) = extract_info("busbar.mph") {
//!         println!("{} (version {})", info.title, info.version);
//!     }
//!
//!     for param in extract_parameters("busbar.mph") {
//!         println!("{} = {}  # {}", param.name, param.value, param.description);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Editing Parameters
//!
//! ```rust,no_run
//! use mphkit::{EditSet, apply_patch};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut edits = EditSet::new();
//!     edits.stage("Vtot", "30[mV]")?;
//!     edits.stage("L", "12[cm]")?;
//!
//!     let outcome = apply_patch("busbar.mph", &edits)?;
//!     println!("{} parameters patched", outcome.parameters_patched);
//!     println!("modified: {}", outcome.new_container_path.display());
//!     println!("backup:   {}", outcome.backup_path.display());
//!     Ok(())
//! }
//! ```
//!
//! The original file is never modified: a patch always writes a backup copy
//! and a separate modified container.
//!
//! ## Failure Model
//!
//! Listing, extraction and patching return typed errors ([`ArchiveError`],
//! [`PatchError`]). Metadata and parameter extraction are best-effort: a
//! missing or malformed member yields `None` or an empty table, and the
//! cause is logged at `debug` level through the [`log`] facade.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Builds the `mphkit` command-line tool |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Buffer size for streaming member contents.
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

/// Member holding the format version marker.
pub const FILEVERSION_MEMBER: &str = "fileversion";

/// Member holding the title and description record.
pub const MODEL_INFO_MEMBER: &str = "modelinfo.xml";

/// Member holding the model document with parameter declarations.
pub const DMODEL_MEMBER: &str = "dmodel.xml";

pub mod capability;
pub mod checksum;
pub mod container;
pub mod edit;
pub mod error;
pub mod member_path;
pub mod params;
pub mod scan;
pub mod stats;

mod xml;

pub use container::{
    Category, Container, ExtractOutcome, Member, ModelInfo, extract_all, extract_info, list,
};
pub use edit::{EditSet, PatchOptions, PatchOutcome, apply_patch, apply_patch_with_options};
pub use error::{ArchiveError, ArchiveResult, EditError, PatchError, PatchResult, Stage};
pub use member_path::MemberPath;
pub use params::{Parameter, extract_parameters};
pub use stats::SizeBreakdown;
