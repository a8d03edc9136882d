//! Mod packaging - redistributable archives of a full or partial atlas
//!
//! An export produces a package directory laid out like the target
//! application's assets (descriptor and image under the atlas directory,
//! manifest and icon at the root) and a zip of that directory.

pub mod archive;
pub mod layout;
pub mod manifest;
pub mod package;

pub use archive::zip_directory;
pub use layout::{StackLayout, partial_atlas, stack_vertically};
pub use manifest::{generate_manifest, to_folder_name};
pub use package::{
    ExportKind, ExportResult, export_full, export_full_with_progress, export_partial,
    export_partial_with_progress,
};
