//! Edit tracking
//!
//! Decompose records a content digest per sprite. Comparing those baselines
//! against the files currently in the sprite store tells which sprites were
//! edited externally, and which edits touched a rectangle shared by several
//! sprites.

pub mod baseline;
pub mod dirty;
pub mod duplicates;

pub use baseline::BaselineLedger;
pub use dirty::{check_duplicates, dirty_sprites};
pub use duplicates::{duplicate_groups, find_duplicates};
