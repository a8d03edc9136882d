//! Sprite store - one image file per sprite key

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::codec::{self, IMAGE_EXTENSION};
use crate::error::{Error, Result};
use crate::utils::{file_digest, is_contained};

/// Directory holding the decomposed sprites as `"{key}.png"`.
///
/// Keys containing `/` map to nested directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteStore {
    root: PathBuf,
}

impl SpriteStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path of a sprite, whether or not it exists yet.
    #[must_use]
    pub fn sprite_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{IMAGE_EXTENSION}"))
    }

    /// [`Self::sprite_path`] for keys that stay inside the store root.
    fn checked_path(&self, key: &str) -> Result<PathBuf> {
        if !is_contained(key) {
            return Err(Error::InvalidPath(format!(
                "sprite key '{key}' escapes {}",
                self.root.display()
            )));
        }
        Ok(self.sprite_path(key))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        is_contained(key) && self.sprite_path(key).is_file()
    }

    fn missing(&self, key: &str) -> Error {
        Error::AssetMissing {
            path: self.sprite_path(key),
            sprite: Some(key.to_string()),
        }
    }

    /// Load a sprite's current image.
    pub fn load(&self, key: &str) -> Result<DynamicImage> {
        match codec::load_image(self.checked_path(key)?) {
            Err(Error::AssetMissing { .. }) => Err(self.missing(key)),
            other => other,
        }
    }

    /// Write a sprite and return the digest of the bytes now on disk.
    pub fn save(&self, key: &str, image: &DynamicImage) -> Result<String> {
        let path = self.checked_path(key)?;
        codec::save_image(image, &path)?;
        file_digest(&path)
    }

    /// Digest of the sprite file as it currently exists on disk.
    pub fn digest(&self, key: &str) -> Result<String> {
        let path = self.checked_path(key)?;
        if !path.is_file() {
            return Err(self.missing(key));
        }
        file_digest(path)
    }

    /// Overwrite a sprite's file with a raw copy of `source`.
    pub fn replace<P: AsRef<Path>>(&self, key: &str, source: P) -> Result<()> {
        let source = source.as_ref();
        let dest = self.checked_path(key)?;
        if !source.is_file() {
            return Err(Error::AssetMissing {
                path: source.to_path_buf(),
                sprite: Some(key.to_string()),
            });
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, &dest)?;

        tracing::debug!("Replaced sprite {} from {:?}", key, source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([value, value, value, 255]),
        ))
    }

    #[test]
    fn test_save_returns_on_disk_digest() {
        let dir = tempfile::tempdir().unwrap();
        let store = SpriteStore::new(dir.path());

        let digest = store.save("ui/button", &solid(4, 4, 10)).unwrap();
        assert!(store.contains("ui/button"));
        assert!(store.sprite_path("ui/button").ends_with("ui/button.png"));
        assert_eq!(store.digest("ui/button").unwrap(), digest);
    }

    #[test]
    fn test_replace_changes_digest() {
        let dir = tempfile::tempdir().unwrap();
        let store = SpriteStore::new(dir.path().join("sprites"));
        let before = store.save("coin", &solid(4, 4, 10)).unwrap();

        let replacement = dir.path().join("coin_new.png");
        codec::save_image(&solid(4, 4, 200), &replacement).unwrap();
        store.replace("coin", &replacement).unwrap();

        assert_ne!(store.digest("coin").unwrap(), before);
        assert_eq!(store.load("coin").unwrap().to_rgba8().get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn test_missing_sprite_names_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = SpriteStore::new(dir.path());
        match store.load("ghost").unwrap_err() {
            Error::AssetMissing { sprite, .. } => assert_eq!(sprite.as_deref(), Some("ghost")),
            other => panic!("expected missing asset, got {other:?}"),
        }
        assert!(matches!(store.digest("ghost"), Err(Error::AssetMissing { .. })));
        assert!(matches!(
            store.replace("ghost", dir.path().join("nothing.png")),
            Err(Error::AssetMissing { .. })
        ));
    }

    #[test]
    fn test_escaping_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SpriteStore::new(dir.path().join("a").join("sprites"));
        let source = dir.path().join("source.png");
        codec::save_image(&solid(2, 2, 10), &source).unwrap();

        let escaped = store.save("../../escaped", &solid(2, 2, 10));
        assert!(matches!(escaped, Err(Error::InvalidPath(_))));
        let escaped = store.replace("../../escaped", &source);
        assert!(matches!(escaped, Err(Error::InvalidPath(_))));
        assert!(matches!(store.load("/etc/passwd"), Err(Error::InvalidPath(_))));
        assert!(matches!(store.digest(".."), Err(Error::InvalidPath(_))));
        assert!(!store.contains("../../source"));
        assert!(!dir.path().join("escaped.png").exists());
    }
}
