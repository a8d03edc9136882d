//! Image codec adapter
//!
//! Thin layer over the `image` crate providing the primitives the atlas
//! operations need: load, save, crop, paste and blank canvas creation.
//! PNG is the only on-disk format.

use std::io::Write;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{DynamicImage, GenericImageView, ImageEncoder, Luma, LumaA, Rgb, Rgba};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::formats::atlas::{PixelFormat, Point, Rect, Size};

/// Extension used for every image this crate writes.
pub const IMAGE_EXTENSION: &str = "png";

/// Load an image file.
///
/// A missing file is reported as [`Error::AssetMissing`] rather than a bare
/// IO error so callers can prompt for a replacement.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::AssetMissing {
            path: path.to_path_buf(),
            sprite: None,
        });
    }
    Ok(image::open(path)?)
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    let encoder = PngEncoder::new(&mut png_data);
    encoder.write_image(
        image.as_bytes(),
        image.width(),
        image.height(),
        image.color().into(),
    )?;
    Ok(png_data)
}

/// Save an image as PNG.
///
/// The bytes go to a temp file in the destination directory which is then
/// persisted over `path`, so an interrupted save never leaves a truncated
/// file behind.
pub fn save_image<P: AsRef<Path>>(image: &DynamicImage, path: P) -> Result<()> {
    let path = path.as_ref();
    let png_data = encode_png(image)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(&png_data)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    Ok(())
}

/// Copy the pixels inside `rect` into a new image.
#[must_use]
pub fn crop(image: &DynamicImage, rect: Rect) -> DynamicImage {
    image.crop_imm(rect.left, rect.top, rect.width(), rect.height())
}

/// Overwrite the canvas with `image` at `at` (no blending).
pub fn paste(canvas: &mut DynamicImage, image: &DynamicImage, at: Point) {
    image::imageops::replace(canvas, image, i64::from(at.x), i64::from(at.y));
}

/// Blank, fully transparent canvas in the channel layout `format` calls for.
#[must_use]
pub fn new_canvas(size: Size, format: &PixelFormat) -> DynamicImage {
    let (w, h) = (size.width, size.height);
    match format {
        PixelFormat::Intensity => {
            DynamicImage::ImageLuma8(image::ImageBuffer::from_pixel(w, h, Luma([0])))
        }
        PixelFormat::Alpha | PixelFormat::LuminanceAlpha => {
            DynamicImage::ImageLumaA8(image::ImageBuffer::from_pixel(w, h, LumaA([0, 0])))
        }
        PixelFormat::Rgb565 | PixelFormat::Rgb888 => {
            DynamicImage::ImageRgb8(image::ImageBuffer::from_pixel(w, h, Rgb([0, 0, 0])))
        }
        PixelFormat::Rgba4444 | PixelFormat::Rgba8888 | PixelFormat::Other(_) => {
            DynamicImage::ImageRgba8(image::ImageBuffer::from_pixel(w, h, Rgba([0, 0, 0, 0])))
        }
    }
}

/// Pixel dimensions of an image as a [`Size`].
#[must_use]
pub fn image_size(image: &DynamicImage) -> Size {
    let (width, height) = image.dimensions();
    Size::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 16) as u8, (y * 16) as u8, ((x + y) % 2 * 255) as u8, 255])
        }))
    }

    #[test]
    fn test_crop_then_paste_restores_pixels() {
        let source = checkerboard(8, 8);
        let rect = Rect { left: 2, top: 3, right: 6, bottom: 5 };
        let piece = crop(&source, rect);
        assert_eq!(image_size(&piece), Size::new(4, 2));

        let mut canvas = new_canvas(Size::new(8, 8), &PixelFormat::Rgba8888);
        paste(&mut canvas, &piece, Point::new(2, 3));
        assert_eq!(canvas.get_pixel(2, 3), source.get_pixel(2, 3));
        assert_eq!(canvas.get_pixel(5, 4), source.get_pixel(5, 4));
        assert_eq!(canvas.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_canvas_layout_follows_pixel_format() {
        let size = Size::new(2, 2);
        assert!(matches!(new_canvas(size, &PixelFormat::Rgb888), DynamicImage::ImageRgb8(_)));
        assert!(matches!(new_canvas(size, &PixelFormat::Rgba8888), DynamicImage::ImageRgba8(_)));
        assert!(matches!(
            new_canvas(size, &PixelFormat::Other("BGRA".into())),
            DynamicImage::ImageRgba8(_)
        ));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("piece.png");
        let image = checkerboard(5, 3);

        save_image(&image, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.to_rgba8(), image.to_rgba8());

        // Deterministic encoder: identical pixels produce identical bytes
        let first = std::fs::read(&path).unwrap();
        save_image(&loaded, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_load_missing_is_asset_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path().join("gone.png")).unwrap_err();
        assert!(matches!(err, Error::AssetMissing { .. }));
    }
}
