//! # `PokAtlas`
//!
//! Split a packed texture atlas into individual sprite PNGs, track which
//! sprites were edited afterwards, and put them back together as a full
//! atlas, a partial atlas of just the edits, or a zipped mod package.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pokatlas::AtlasProject;
//!
//! let mut project = AtlasProject::open("menu/menu.atlas")?;
//!
//! // Crop every sprite into menu/sprites/ and record baselines
//! project.decompose()?;
//!
//! // ... edit some PNGs in menu/sprites/ ...
//!
//! println!("edited: {:?}", project.dirty_sprites()?);
//! let export = project.export_partial()?;
//! println!("wrote {}", export.archive_path.display());
//! # Ok::<(), pokatlas::Error>(())
//! ```
//!
//! ## Lower-level pieces
//!
//! - [`formats::atlas`] - descriptor parsing and writing
//! - [`ops`] - decompose and rebuild over an [`Atlas`] and a [`SpriteStore`]
//! - [`tracking`] - duplicate groups, dirty detection, baseline ledger
//! - [`mods`] - full/partial export and zip packaging
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `pokatlas` command-line binary

pub mod codec;
pub mod config;
pub mod error;
pub mod formats;
pub mod mods;
pub mod ops;
pub mod project;
pub mod store;
pub mod tracking;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};
pub use formats::atlas::{Atlas, SpriteEntry};
pub use project::{AtlasProject, StatusReport};
pub use store::SpriteStore;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::atlas::{
        Atlas, Offset, PixelFormat, Point, Rect, Rotation, Size, SpriteEntry, parse_descriptor,
        write_descriptor,
    };

    pub use crate::config::ProjectConfig;
    pub use crate::project::{AtlasProject, StatusReport};
    pub use crate::store::SpriteStore;

    pub use crate::ops::{AtlasPhase, AtlasProgress, decompose, rebuild};
    pub use crate::tracking::{BaselineLedger, check_duplicates, dirty_sprites, find_duplicates};
    pub use crate::mods::{ExportKind, ExportResult, export_full, export_partial};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
