//! Decompose an atlas image into one file per sprite

use image::DynamicImage;
use indexmap::IndexMap;

use crate::codec;
use crate::error::{Error, Result};
use crate::formats::atlas::Atlas;
use crate::store::SpriteStore;

use super::types::{AtlasPhase, AtlasProgress, AtlasProgressCallback};

/// Crop every sprite out of `image` into `store` and record baselines.
///
/// See [`decompose_with_progress`].
pub fn decompose(atlas: &mut Atlas, image: &DynamicImage, store: &SpriteStore) -> Result<()> {
    decompose_with_progress(atlas, image, store, &|_| {})
}

/// Crop every sprite out of `image` into `store` and record baselines.
///
/// Sprites are written in table order as `"{key}.png"`. Each baseline is the
/// digest of the file as written, not of the in-memory crop. The hash table
/// is only replaced once every sprite has been written; a failure part way
/// leaves earlier files on disk and the previous baselines untouched.
///
/// # Errors
/// Returns [`Error::DimensionMismatch`] if `image` is not exactly the
/// declared canvas size, or an IO/codec error from writing a sprite.
pub fn decompose_with_progress(
    atlas: &mut Atlas,
    image: &DynamicImage,
    store: &SpriteStore,
    progress: AtlasProgressCallback,
) -> Result<()> {
    let found = codec::image_size(image);
    if found != atlas.canvas_size {
        return Err(Error::DimensionMismatch {
            subject: atlas.image_name.clone(),
            expected: atlas.canvas_size.as_tuple(),
            found: found.as_tuple(),
        });
    }

    let total = atlas.sprites.len();
    let mut hashes = IndexMap::with_capacity(total);

    for (i, (key, sprite)) in atlas.sprites.iter().enumerate() {
        progress(&AtlasProgress::with_item(AtlasPhase::Extracting, i + 1, total, key));

        let piece = codec::crop(image, sprite.rect());
        let digest = store.save(key, &piece)?;
        tracing::debug!(
            "Extracted {} ({}x{}) -> {}",
            key,
            sprite.size.width,
            sprite.size.height,
            digest
        );
        hashes.insert(key.clone(), digest);
    }

    atlas.sprite_hashes = hashes;
    progress(&AtlasProgress::new(AtlasPhase::Complete, total, total));

    tracing::info!("Decomposed {} sprites into {:?}", total, store.root());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::atlas::parse_descriptor;
    use image::{GenericImageView, Rgba, RgbaImage};
    use std::sync::Mutex;

    const DESCRIPTOR: &str = "main.png\n8, 4\nRGBA8888\nLinear,Linear\nnone\nleft\n  xy: 0, 0\n  size: 4, 4\nright\n  xy: 4, 0\n  size: 4, 4\n";

    fn halves() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(8, 4, |x, _| {
            if x < 4 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        }))
    }

    #[test]
    fn test_decompose_writes_sprites_and_baselines() {
        let dir = tempfile::tempdir().unwrap();
        let store = SpriteStore::new(dir.path());
        let mut atlas = parse_descriptor(DESCRIPTOR).unwrap();

        let seen = Mutex::new(Vec::new());
        decompose_with_progress(&mut atlas, &halves(), &store, &|p| {
            seen.lock().unwrap().push((p.phase, p.current_item.clone()));
        })
        .unwrap();

        let right = store.load("right").unwrap();
        assert_eq!(right.dimensions(), (4, 4));
        assert_eq!(right.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(atlas.sprite_hashes["left"], store.digest("left").unwrap());

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.first(), Some(&(AtlasPhase::Extracting, Some("left".to_string()))));
        assert_eq!(seen.last(), Some(&(AtlasPhase::Complete, None)));
    }

    #[test]
    fn test_decompose_rejects_wrong_image_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = SpriteStore::new(dir.path());
        let mut atlas = parse_descriptor(DESCRIPTOR).unwrap();
        let small = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));

        match decompose(&mut atlas, &small, &store).unwrap_err() {
            Error::DimensionMismatch { subject, expected, found } => {
                assert_eq!(subject, "main.png");
                assert_eq!(expected, (8, 4));
                assert_eq!(found, (4, 4));
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
        assert!(atlas.sprite_hashes.is_empty());
    }
}
