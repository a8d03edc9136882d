//! Recompose an atlas image from its sprite files

use image::DynamicImage;

use crate::codec;
use crate::error::{Error, Result};
use crate::formats::atlas::Atlas;
use crate::store::SpriteStore;

use super::types::{AtlasPhase, AtlasProgress, AtlasProgressCallback};

/// Paste every sprite file back onto a fresh canvas.
///
/// See [`rebuild_with_progress`].
pub fn rebuild(atlas: &Atlas, store: &SpriteStore) -> Result<DynamicImage> {
    rebuild_with_progress(atlas, store, &|_| {})
}

/// Paste every sprite file back onto a fresh canvas.
///
/// The canvas is `canvas_size`, fully transparent, laid out per the
/// atlas's pixel format. Sprites are pasted at their `xy` in table order
/// without blending, so later entries overwrite earlier ones where they
/// overlap. The caller decides where to save the result.
///
/// # Errors
/// Returns [`Error::AssetMissing`] if a sprite file is absent, or
/// [`Error::DimensionMismatch`] if a sprite file's size differs from the
/// recorded `size`.
pub fn rebuild_with_progress(
    atlas: &Atlas,
    store: &SpriteStore,
    progress: AtlasProgressCallback,
) -> Result<DynamicImage> {
    let mut canvas = codec::new_canvas(atlas.canvas_size, &atlas.pixel_format);
    let total = atlas.sprites.len();

    for (i, (key, sprite)) in atlas.sprites.iter().enumerate() {
        progress(&AtlasProgress::with_item(AtlasPhase::Compositing, i + 1, total, key));

        let piece = store.load(key)?;
        let found = codec::image_size(&piece);
        if found != sprite.size {
            return Err(Error::DimensionMismatch {
                subject: key.clone(),
                expected: sprite.size.as_tuple(),
                found: found.as_tuple(),
            });
        }
        codec::paste(&mut canvas, &piece, sprite.xy);
    }

    progress(&AtlasProgress::new(AtlasPhase::Complete, total, total));
    tracing::info!(
        "Rebuilt {}x{} canvas from {} sprites",
        atlas.canvas_size.width,
        atlas.canvas_size.height,
        total
    );
    Ok(canvas)
}
