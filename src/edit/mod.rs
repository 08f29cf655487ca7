//! Parameter editing and repackaging.
//!
//! Edits never touch the source container. Committing an [`EditSet`]
//! produces two new files next to the original:
//!
//! - `<stem>_backup<ext>`: a byte-for-byte copy of the original;
//! - `<stem>_modified<ext>`: the repackaged container with the patched
//!   `dmodel.xml`. Every other member carries the same bytes as before.
//!
//! # Example
//!
//! ```rust,no_run
//! use mphkit::{EditSet, extract_parameters};
//! use mphkit::edit::apply_patch;
//!
//! let table = extract_parameters("busbar.mph");
//!
//! let mut edits = EditSet::new();
//! edits.stage("Vtot", "30[mV]")?;
//! println!("{} of {} edits change a value", edits.effective_count(&table), edits.modified_count());
//!
//! let outcome = apply_patch("busbar.mph", &edits)?;
//! println!("wrote {}", outcome.new_container_path.display());
//! println!("backup {}", outcome.backup_path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Implementation Notes
//!
//! The engine works by:
//! 1. Unpacking the whole container into a `tempfile` scratch directory
//! 2. Rewriting only the `expr` attribute values of the targeted
//!    declarations in the scratch copy of `dmodel.xml`
//! 3. Copying the original to the backup path
//! 4. Packing the scratch tree into the modified container
//!
//! The scratch directory is owned by the operation and removed when it
//! returns, whether it succeeded or not.

mod edit_set;
mod editor;
mod patch;

pub use edit_set::EditSet;
pub use editor::{
    Compression, PatchOptions, PatchOutcome, apply_patch, apply_patch_with_options,
    backup_path_for, modified_path_for,
};
pub use patch::{PatchedText, patch_expressions};
