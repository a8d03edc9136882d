//! Project configuration (`pokatlas.toml`)
//!
//! Every section is optional. A missing file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mods::manifest::to_folder_name;

/// File name looked up beside the descriptor.
pub const CONFIG_FILE_NAME: &str = "pokatlas.toml";

fn default_name() -> String {
    "Atlas Mod".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_atlas_dir() -> String {
    "assets/atlas".to_string()
}

fn default_manifest_name() -> String {
    "manifest.xml".to_string()
}

fn default_icon_name() -> String {
    "icon.png".to_string()
}

fn default_sprites_dir() -> String {
    "sprites".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_export_dir() -> String {
    "export".to_string()
}

fn default_baseline() -> String {
    "baseline.json".to_string()
}

/// The full project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub package: PackageMeta,
    #[serde(default)]
    pub layout: PackageLayout,
    #[serde(default)]
    pub paths: WorkingPaths,
}

/// Mod package metadata, written into the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMeta {
    #[serde(default = "default_name")]
    pub name: String,
    /// Package root folder; derived from `name` when absent.
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Icon copied into the package. `~` is expanded; relative paths
    /// resolve against the descriptor directory.
    #[serde(default)]
    pub icon: Option<String>,
}

impl Default for PackageMeta {
    fn default() -> Self {
        Self {
            name: default_name(),
            folder: None,
            author: String::new(),
            description: String::new(),
            version: default_version(),
            icon: None,
        }
    }
}

impl PackageMeta {
    /// Package root folder name.
    #[must_use]
    pub fn folder_name(&self) -> String {
        match &self.folder {
            Some(folder) if !folder.is_empty() => folder.clone(),
            _ => to_folder_name(&self.name),
        }
    }
}

/// Where things go inside the exported package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLayout {
    #[serde(default = "default_atlas_dir")]
    pub atlas_dir: String,
    /// Descriptor file name; the opened descriptor's name when absent.
    #[serde(default)]
    pub descriptor_name: Option<String>,
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
    #[serde(default = "default_icon_name")]
    pub icon_name: String,
}

impl Default for PackageLayout {
    fn default() -> Self {
        Self {
            atlas_dir: default_atlas_dir(),
            descriptor_name: None,
            manifest_name: default_manifest_name(),
            icon_name: default_icon_name(),
        }
    }
}

/// Working directories, relative to the descriptor directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingPaths {
    #[serde(default = "default_sprites_dir")]
    pub sprites: String,
    #[serde(default = "default_output_dir")]
    pub output: String,
    #[serde(default = "default_export_dir")]
    pub export: String,
    #[serde(default = "default_baseline")]
    pub baseline: String,
}

impl Default for WorkingPaths {
    fn default() -> Self {
        Self {
            sprites: default_sprites_dir(),
            output: default_output_dir(),
            export: default_export_dir(),
            baseline: default_baseline(),
        }
    }
}

impl ProjectConfig {
    /// Load a config file; a missing file gives the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `pokatlas.toml` from a descriptor directory.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::load(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Resolved icon path, if one is configured.
    #[must_use]
    pub fn icon_path(&self, base_dir: &Path) -> Option<PathBuf> {
        let icon = self.package.icon.as_deref()?;
        let expanded = shellexpand::tilde(icon);
        Some(base_dir.join(&*expanded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.layout.atlas_dir, "assets/atlas");
        assert_eq!(config.paths.baseline, "baseline.json");
        assert_eq!(config.package.folder_name(), "Atlas_Mod");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: ProjectConfig = toml::from_str(
            r#"
[package]
name = "Shiny Menu's Redux"
author = "Someone"

[paths]
sprites = "edit"
"#,
        )
        .unwrap();

        assert_eq!(config.package.folder_name(), "Shiny_Menus_Redux");
        assert_eq!(config.package.version, "1.0.0");
        assert_eq!(config.paths.sprites, "edit");
        assert_eq!(config.paths.output, "output");
        assert_eq!(config.layout.manifest_name, "manifest.xml");
    }

    #[test]
    fn test_invalid_config_is_not_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[package\nname = 1").unwrap();
        let err = ProjectConfig::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_icon_path_resolution() {
        let mut config = ProjectConfig::default();
        assert_eq!(config.icon_path(Path::new("/atlas")), None);

        config.package.icon = Some("art/icon.png".into());
        assert_eq!(
            config.icon_path(Path::new("/atlas")),
            Some(PathBuf::from("/atlas/art/icon.png"))
        );

        config.package.icon = Some("/abs/icon.png".into());
        assert_eq!(config.icon_path(Path::new("/atlas")), Some(PathBuf::from("/abs/icon.png")));
    }
}
