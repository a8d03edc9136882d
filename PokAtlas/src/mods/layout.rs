//! Single-column layout for partial atlases

use crate::error::{Error, Result};
use crate::formats::atlas::{Atlas, Point, Size};

/// Result of stacking rectangles top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackLayout {
    /// Widest rectangle by the sum of all heights.
    pub canvas: Size,
    /// Top-left corner of each rectangle, in input order.
    pub placements: Vec<Point>,
}

/// Stack rectangles in a single column starting at the top-left corner.
#[must_use]
pub fn stack_vertically<I: IntoIterator<Item = Size>>(sizes: I) -> StackLayout {
    let mut width = 0;
    let mut running_height = 0;
    let mut placements = Vec::new();

    for size in sizes {
        placements.push(Point::new(0, running_height));
        running_height += size.height;
        width = width.max(size.width);
    }

    StackLayout {
        canvas: Size::new(width, running_height),
        placements,
    }
}

/// Derive an atlas holding only `keys`, restacked into a minimal canvas.
///
/// Sprites keep every attribute except `xy`, and appear in the order given.
///
/// # Errors
/// Returns [`Error::UnknownSprite`] if a key is not in `atlas`.
pub fn partial_atlas(atlas: &Atlas, keys: &[String]) -> Result<Atlas> {
    let selected = keys
        .iter()
        .map(|key| {
            atlas
                .sprite(key)
                .map(|sprite| (key, sprite))
                .ok_or_else(|| Error::UnknownSprite(key.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let layout = stack_vertically(selected.iter().map(|(_, sprite)| sprite.size));

    let mut partial = atlas.with_header_only();
    partial.canvas_size = layout.canvas;
    for ((key, sprite), xy) in selected.into_iter().zip(layout.placements) {
        let mut entry = sprite.clone();
        entry.xy = xy;
        partial.sprites.insert(key.clone(), entry);
    }

    Ok(partial)
}
