//! Error types for `PokAtlas`

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The error type for `PokAtlas` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode failure from the codec.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    // ==================== Descriptor Errors ====================
    /// The atlas descriptor is malformed.
    ///
    /// Parsing never returns a partially populated atlas; the whole open
    /// operation is aborted.
    #[error("invalid atlas descriptor{}: line {line}: {message}", origin(.path.as_deref()))]
    Format {
        /// Descriptor file, when parsed from disk.
        path: Option<PathBuf>,
        /// 1-based line number of the offending line.
        line: usize,
        /// What is wrong with the line.
        message: String,
    },

    // ==================== Asset Errors ====================
    /// A referenced image or sprite file does not exist.
    #[error("missing asset{}: {}", sprite_label(.sprite.as_deref()), .path.display())]
    AssetMissing {
        /// The expected file path.
        path: PathBuf,
        /// The sprite key the file belongs to, if any.
        sprite: Option<String>,
    },

    /// A loaded image does not have the dimensions recorded in the descriptor.
    #[error(
        "dimension mismatch for '{subject}': expected {}x{}, found {}x{}",
        .expected.0, .expected.1, .found.0, .found.1
    )]
    DimensionMismatch {
        /// Sprite key or atlas image name.
        subject: String,
        /// Recorded (width, height).
        expected: (u32, u32),
        /// Actual (width, height) of the file on disk.
        found: (u32, u32),
    },

    /// The sprite key is not part of the atlas.
    #[error("unknown sprite: {0}")]
    UnknownSprite(String),

    // ==================== Tracking Errors ====================
    /// No decompose-time digest exists for a sprite.
    #[error("no baseline hash for sprite '{key}' (decompose the atlas first)")]
    BaselineMissing {
        /// The sprite key.
        key: String,
    },

    /// A partial export found no edited sprites.
    #[error("no edited sprites to export")]
    NothingToExport,

    // ==================== Packaging Errors ====================
    /// ZIP archive creation failed.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    // ==================== Configuration Errors ====================
    /// `pokatlas.toml` could not be parsed.
    #[error("config error in {}: {message}", .path.display())]
    Config {
        /// The config file.
        path: PathBuf,
        /// The parse error message.
        message: String,
    },

    /// JSON parsing or serialization error (baseline ledger).
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller can reasonably retry after user correction.
    ///
    /// Descriptor and config format errors abort the open operation.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Format { .. } | Error::Config { .. })
    }

    /// Attach the descriptor path to a format error.
    pub(crate) fn at_path(self, source: &Path) -> Self {
        match self {
            Error::Format { path: None, line, message } => Error::Format {
                path: Some(source.to_path_buf()),
                line,
                message,
            },
            other => other,
        }
    }
}

fn origin(path: Option<&Path>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}

fn sprite_label(sprite: Option<&str>) -> String {
    sprite.map(|s| format!(" for sprite '{s}'")).unwrap_or_default()
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}

/// A specialized Result type for `PokAtlas` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = Error::Format {
            path: None,
            line: 7,
            message: "attribute line before any sprite name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid atlas descriptor: line 7: attribute line before any sprite name"
        );

        let err = err.at_path(Path::new("atlas/main.atlas"));
        assert_eq!(
            err.to_string(),
            "invalid atlas descriptor atlas/main.atlas: line 7: attribute line before any sprite name"
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_asset_missing_is_recoverable() {
        let err = Error::AssetMissing {
            path: PathBuf::from("sprites/walk_0.png"),
            sprite: Some("walk_0".to_string()),
        };
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "missing asset for sprite 'walk_0': sprites/walk_0.png"
        );
    }
}
