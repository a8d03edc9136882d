//! Full and partial atlas exports

use std::path::{Component, Path, PathBuf};

use image::DynamicImage;

use crate::codec;
use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::formats::atlas::{Atlas, Size};
use crate::ops::{AtlasPhase, AtlasProgress, AtlasProgressCallback, rebuild_with_progress};
use crate::store::SpriteStore;
use crate::tracking::dirty_sprites;

use super::archive::zip_directory;
use super::layout::partial_atlas;
use super::manifest::generate_manifest;

/// Descriptor name used when neither the config nor the atlas provides one.
const FALLBACK_DESCRIPTOR_NAME: &str = "atlas.atlas";

/// Which export to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Every sprite at its original position
    Full,
    /// Only edited sprites, restacked into a minimal canvas
    Partial,
}

impl ExportKind {
    /// Directory name under the export root, also used in the manifest.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
        }
    }
}

/// What an export produced
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub kind: ExportKind,
    /// Package root directory
    pub package_dir: PathBuf,
    /// The zip archive of the package
    pub archive_path: PathBuf,
    /// Sprite keys included, in descriptor order
    pub sprites: Vec<String>,
    pub canvas_size: Size,
    /// Number of files in the archive
    pub archived_files: usize,
}

/// Export every sprite at its recorded position.
pub fn export_full(
    atlas: &Atlas,
    store: &SpriteStore,
    config: &ProjectConfig,
    export_root: &Path,
) -> Result<ExportResult> {
    export_full_with_progress(atlas, store, config, export_root, &|_| {})
}

/// Export every sprite at its recorded position, with progress.
///
/// The descriptor is regenerated from the sprite table as is and the atlas
/// image is rebuilt from the sprite store.
pub fn export_full_with_progress(
    atlas: &Atlas,
    store: &SpriteStore,
    config: &ProjectConfig,
    export_root: &Path,
    progress: AtlasProgressCallback,
) -> Result<ExportResult> {
    let canvas = rebuild_with_progress(atlas, store, progress)?;
    write_package(ExportKind::Full, atlas, &canvas, config, export_root, progress)
}

/// Export only the sprites edited since decompose.
pub fn export_partial(
    atlas: &Atlas,
    store: &SpriteStore,
    config: &ProjectConfig,
    export_root: &Path,
) -> Result<ExportResult> {
    export_partial_with_progress(atlas, store, config, export_root, &|_| {})
}

/// Export only the sprites edited since decompose, with progress.
///
/// Every sprite is compared against its baseline. The edited ones are
/// stacked in a single column in table order and written with a descriptor
/// holding just those sprites.
///
/// # Errors
/// Returns [`Error::NothingToExport`] if no sprite was edited, or
/// [`Error::BaselineMissing`] if the atlas was never decomposed.
pub fn export_partial_with_progress(
    atlas: &Atlas,
    store: &SpriteStore,
    config: &ProjectConfig,
    export_root: &Path,
    progress: AtlasProgressCallback,
) -> Result<ExportResult> {
    progress(&AtlasProgress::new(AtlasPhase::Scanning, 0, atlas.len()));
    let edited = dirty_sprites(atlas, store)?;
    if edited.is_empty() {
        return Err(Error::NothingToExport);
    }
    tracing::info!("Found {} edited sprites", edited.len());

    let partial = partial_atlas(atlas, &edited)?;
    let canvas = rebuild_with_progress(&partial, store, progress)?;
    write_package(ExportKind::Partial, &partial, &canvas, config, export_root, progress)
}

/// Reject absolute paths and `..` so package files stay inside the package root.
fn package_relative(value: &str) -> Result<&Path> {
    let path = Path::new(value);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if value.is_empty() || escapes {
        return Err(Error::InvalidPath(format!(
            "'{value}' must be a relative path inside the package"
        )));
    }
    Ok(path)
}

fn write_package(
    kind: ExportKind,
    atlas: &Atlas,
    canvas: &DynamicImage,
    config: &ProjectConfig,
    export_root: &Path,
    progress: AtlasProgressCallback,
) -> Result<ExportResult> {
    let folder = config.package.folder_name();
    let descriptor_name = config
        .layout
        .descriptor_name
        .as_deref()
        .or_else(|| atlas.descriptor_name())
        .unwrap_or(FALLBACK_DESCRIPTOR_NAME);

    let atlas_dir = package_relative(&config.layout.atlas_dir)?;
    package_relative(&folder)?;
    package_relative(descriptor_name)?;
    package_relative(&atlas.image_name)?;
    package_relative(&config.layout.manifest_name)?;
    package_relative(&config.layout.icon_name)?;

    // Checked before the previous export is wiped
    let icon = match config.icon_path(atlas.base_dir()) {
        Some(path) if !path.is_file() => return Err(Error::AssetMissing { path, sprite: None }),
        Some(path) => Some(path),
        None => {
            tracing::warn!("No package icon configured, exporting without one");
            None
        }
    };

    let export_dir = export_root.join(kind.as_str());
    if export_dir.exists() {
        tracing::debug!("Removing previous export {:?}", export_dir);
        std::fs::remove_dir_all(&export_dir)?;
    }

    let package_dir = export_dir.join(&folder);
    let package_atlas_dir = package_dir.join(atlas_dir);
    std::fs::create_dir_all(&package_atlas_dir)?;

    let steps = if icon.is_some() { 4 } else { 3 };
    progress(&AtlasProgress::with_item(AtlasPhase::Writing, 1, steps, descriptor_name));
    std::fs::write(package_atlas_dir.join(descriptor_name), atlas.to_descriptor())?;

    progress(&AtlasProgress::with_item(AtlasPhase::Writing, 2, steps, &atlas.image_name));
    codec::save_image(canvas, package_atlas_dir.join(&atlas.image_name))?;

    let manifest_name = &config.layout.manifest_name;
    progress(&AtlasProgress::with_item(AtlasPhase::Writing, 3, steps, manifest_name));
    let atlas_prefix = config.layout.atlas_dir.trim_end_matches('/');
    let descriptor_entry = format!("{atlas_prefix}/{descriptor_name}");
    let manifest = generate_manifest(
        &config.package,
        &folder,
        &descriptor_entry,
        atlas,
        kind.as_str(),
    );
    std::fs::write(package_dir.join(manifest_name), manifest)?;

    if let Some(icon) = icon {
        let icon_name = &config.layout.icon_name;
        progress(&AtlasProgress::with_item(AtlasPhase::Writing, 4, steps, icon_name));
        std::fs::copy(&icon, package_dir.join(icon_name))?;
    }

    let archive_path = export_dir.join(format!("{folder}.zip"));
    let archived_files = zip_directory(&package_dir, &export_dir, &archive_path, progress)?;

    progress(&AtlasProgress::new(AtlasPhase::Complete, archived_files, archived_files));
    tracing::info!(
        "Exported {} atlas ({} sprites) to {:?}",
        kind.as_str(),
        atlas.len(),
        archive_path
    );

    Ok(ExportResult {
        kind,
        package_dir,
        archive_path,
        sprites: atlas.sprites.keys().cloned().collect(),
        canvas_size: atlas.canvas_size,
        archived_files,
    })
}
