//! Atlas project - a descriptor plus its working directories
//!
//! [`AtlasProject`] ties together the parsed atlas, its `pokatlas.toml`,
//! the sprite store and the persisted baselines. It is the entry point the
//! CLI (and any other front end) drives.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use walkdir::WalkDir;

use crate::codec::{self, IMAGE_EXTENSION};
use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::formats::atlas::{Atlas, Point};
use crate::mods::{self, ExportResult};
use crate::ops::{self, AtlasPhase, AtlasProgress, AtlasProgressCallback};
use crate::store::SpriteStore;
use crate::tracking::{self, BaselineLedger};
use crate::utils::{is_contained, normalize_path};

/// Read-only snapshot of an atlas's edit state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Whether baselines exist for every sprite.
    pub decomposed: bool,
    /// Sprites sharing a source rectangle, keyed by that rectangle's origin.
    pub duplicate_groups: IndexMap<Point, Vec<String>>,
    /// Sprites whose file differs from its baseline, in table order.
    /// Empty when the atlas has not been decomposed.
    pub dirty: Vec<String>,
}

/// An opened atlas with its configuration and sprite store.
#[derive(Debug, Clone)]
pub struct AtlasProject {
    atlas: Atlas,
    config: ProjectConfig,
    store: SpriteStore,
}

impl AtlasProject {
    /// Open a descriptor, its optional `pokatlas.toml` and any saved baselines.
    ///
    /// An unreadable baseline ledger is logged and ignored, leaving the
    /// project undecomposed so a fresh decompose can replace it.
    pub fn open<P: AsRef<Path>>(descriptor: P) -> Result<Self> {
        let mut atlas = Atlas::open(descriptor)?;
        let config = ProjectConfig::load_from_dir(atlas.base_dir())?;
        let store = SpriteStore::new(atlas.base_dir().join(&config.paths.sprites));

        let project_baseline = atlas.base_dir().join(&config.paths.baseline);
        if project_baseline.is_file() {
            match BaselineLedger::load(&project_baseline) {
                Ok(ledger) => {
                    let restored = ledger.apply(&mut atlas);
                    tracing::info!("Restored {} baselines from {:?}", restored, project_baseline);
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable baselines {:?}: {}", project_baseline, e);
                }
            }
        }

        Ok(Self { atlas, config, store })
    }

    #[must_use]
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    #[must_use]
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &SpriteStore {
        &self.store
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.atlas.base_dir()
    }

    #[must_use]
    pub fn baseline_path(&self) -> PathBuf {
        self.base_dir().join(&self.config.paths.baseline)
    }

    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir().join(&self.config.paths.output)
    }

    #[must_use]
    pub fn export_root(&self) -> PathBuf {
        self.base_dir().join(&self.config.paths.export)
    }

    /// Whether every sprite has a decompose-time digest.
    #[must_use]
    pub fn is_decomposed(&self) -> bool {
        self.atlas
            .sprites
            .keys()
            .all(|key| self.atlas.sprite_hashes.contains_key(key))
    }

    /// Split the atlas image into the sprite store and persist the baselines.
    pub fn decompose(&mut self) -> Result<()> {
        self.decompose_with_progress(&|_| {})
    }

    /// Split the atlas image into the sprite store, with progress.
    ///
    /// # Errors
    /// Returns [`Error::AssetMissing`] if the atlas image does not exist.
    pub fn decompose_with_progress(&mut self, progress: AtlasProgressCallback) -> Result<()> {
        progress(&AtlasProgress::with_item(
            AtlasPhase::LoadingImage,
            0,
            1,
            &self.atlas.image_name,
        ));
        let image = codec::load_image(self.atlas.image_path())?;

        ops::decompose_with_progress(&mut self.atlas, &image, &self.store, progress)?;
        self.save_baseline()
    }

    /// Write the current baselines to the configured ledger file.
    pub fn save_baseline(&self) -> Result<()> {
        let path = self.baseline_path();
        BaselineLedger::from_atlas(&self.atlas).save(&path)?;
        tracing::debug!("Saved baselines to {:?}", path);
        Ok(())
    }

    /// Rebuild the atlas image into the configured output directory.
    pub fn rebuild(&self) -> Result<PathBuf> {
        self.rebuild_to(&self.output_dir(), &|_| {})
    }

    /// Rebuild the atlas image into `dir`, returning the written image path.
    ///
    /// Edited duplicates are settled first (on a copy of the table), so
    /// their new artwork is painted over stale siblings.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the image name would land outside `dir`.
    pub fn rebuild_to(&self, dir: &Path, progress: AtlasProgressCallback) -> Result<PathBuf> {
        if !is_contained(&self.atlas.image_name) {
            return Err(Error::InvalidPath(format!(
                "image name '{}' escapes {}",
                self.atlas.image_name,
                dir.display()
            )));
        }
        let atlas = self.settled_atlas()?;
        let canvas = ops::rebuild_with_progress(&atlas, &self.store, progress)?;

        let path = dir.join(&atlas.image_name);
        codec::save_image(&canvas, &path)?;
        tracing::info!("Wrote rebuilt atlas to {:?}", path);
        Ok(path)
    }

    /// Re-home edited duplicate groups in the in-memory table.
    ///
    /// The persisted baselines are not touched.
    pub fn check_duplicates(&mut self) -> Result<()> {
        tracking::check_duplicates(&mut self.atlas, &self.store)
    }

    /// Sprites edited since decompose, in table order.
    pub fn dirty_sprites(&self) -> Result<Vec<String>> {
        tracking::dirty_sprites(&self.atlas, &self.store)
    }

    /// Duplicate groups and edited sprites, without changing anything.
    pub fn status(&self) -> Result<StatusReport> {
        let decomposed = self.is_decomposed();
        let dirty = if decomposed { self.dirty_sprites()? } else { Vec::new() };

        Ok(StatusReport {
            decomposed,
            duplicate_groups: tracking::duplicate_groups(&self.atlas),
            dirty,
        })
    }

    /// Overwrite one sprite's file with `source`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownSprite`] if `key` is not in the atlas, or
    /// [`Error::AssetMissing`] if `source` does not exist.
    pub fn replace_sprite<P: AsRef<Path>>(&self, key: &str, source: P) -> Result<()> {
        if self.atlas.sprite(key).is_none() {
            return Err(Error::UnknownSprite(key.to_string()));
        }
        self.store.replace(key, source)?;
        tracing::info!("Replaced sprite {}", key);
        Ok(())
    }

    /// Replace every sprite that has a `"{key}.png"` under `dir`.
    ///
    /// Nested directories map to keys containing `/`. Files matching no
    /// sprite are skipped. Returns the replaced keys in table order.
    pub fn mass_replace<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::AssetMissing {
                path: dir.to_path_buf(),
                sprite: None,
            });
        }

        let mut candidates: HashMap<String, PathBuf> = HashMap::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_image = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(IMAGE_EXTENSION));
            if !entry.file_type().is_file() || !is_image {
                continue;
            }

            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            let key = normalize_path(relative.with_extension(""));
            if self.atlas.sprite(&key).is_some() {
                candidates.insert(key, path.to_path_buf());
            } else {
                tracing::warn!("Skipping {:?}: no sprite named '{}'", path, key);
            }
        }

        let mut replaced = Vec::new();
        for key in self.atlas.sprites.keys() {
            if let Some(source) = candidates.get(key) {
                self.store.replace(key, source)?;
                replaced.push(key.clone());
            }
        }

        tracing::info!("Replaced {} sprites from {:?}", replaced.len(), dir);
        Ok(replaced)
    }

    /// Package the whole atlas into the configured export directory.
    pub fn export_full(&self) -> Result<ExportResult> {
        self.export_full_with_progress(&|_| {})
    }

    /// Package the whole atlas, with progress.
    ///
    /// Edited duplicates are settled on a copy of the table first.
    pub fn export_full_with_progress(
        &self,
        progress: AtlasProgressCallback,
    ) -> Result<ExportResult> {
        let atlas = self.settled_atlas()?;
        mods::export_full_with_progress(
            &atlas,
            &self.store,
            &self.config,
            &self.export_root(),
            progress,
        )
    }

    /// Package only the edited sprites.
    pub fn export_partial(&self) -> Result<ExportResult> {
        self.export_partial_with_progress(&|_| {})
    }

    /// Package only the edited sprites, with progress.
    pub fn export_partial_with_progress(
        &self,
        progress: AtlasProgressCallback,
    ) -> Result<ExportResult> {
        mods::export_partial_with_progress(
            &self.atlas,
            &self.store,
            &self.config,
            &self.export_root(),
            progress,
        )
    }

    /// Copy of the atlas with edited duplicate groups re-homed.
    ///
    /// Without baselines there is nothing to compare against, so the table
    /// is returned in descriptor order.
    fn settled_atlas(&self) -> Result<Atlas> {
        let mut atlas = self.atlas.clone();
        if self.is_decomposed() {
            tracking::check_duplicates(&mut atlas, &self.store)?;
        } else {
            tracing::debug!("No baselines recorded, rebuilding in descriptor order");
        }
        Ok(atlas)
    }
}
