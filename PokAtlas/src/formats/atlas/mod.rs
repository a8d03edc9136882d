//! Atlas descriptor format
//!
//! A descriptor is the text sidecar of a packed spritesheet: five header
//! lines (image name, canvas size, pixel format, filter, repeat) followed by
//! one record per packed rectangle.

mod document;
mod reader;
mod writer;

pub use document::{Atlas, Offset, PixelFormat, Point, Rect, Rotation, Size, SpriteEntry};
pub use reader::parse_descriptor;
pub use writer::write_descriptor;
