//! File format support

pub mod atlas;

pub use atlas::{Atlas, SpriteEntry, parse_descriptor, write_descriptor};
