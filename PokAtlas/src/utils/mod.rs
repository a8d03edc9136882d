//! Utility functions

pub mod hash;
pub mod path;

pub use hash::file_digest;
pub use path::{is_contained, normalize_path, relative_path};
