//! Atlas transforms: decompose into sprite files and rebuild from them

pub mod decompose;
pub mod rebuild;
pub mod types;

pub use decompose::{decompose, decompose_with_progress};
pub use rebuild::{rebuild, rebuild_with_progress};
pub use types::{AtlasPhase, AtlasProgress, AtlasProgressCallback};
