//! Atlas document model

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::Result;

/// A (left, top) offset into the atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// A (width, height) pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// A signed (x, y) offset, used by the pre-trim `offset` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

/// A crop rectangle as (left, top, right, bottom), right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Point {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Tuple form, as carried by dimension errors.
    #[must_use]
    pub const fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Rect {
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right - self.left
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Split a `"a, b"` attribute value into its two components.
fn parse_pair<T: FromStr>(s: &str) -> Option<(T, T)> {
    let (a, b) = s.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

impl FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_pair(s)
            .map(|(x, y)| Self { x, y })
            .ok_or_else(|| format!("expected 'x, y' with non-negative integers, found '{s}'"))
    }
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_pair(s)
            .map(|(width, height)| Self { width, height })
            .ok_or_else(|| {
                format!("expected 'width, height' with non-negative integers, found '{s}'")
            })
    }
}

impl FromStr for Offset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_pair(s)
            .map(|(x, y)| Self { x, y })
            .ok_or_else(|| format!("expected 'x, y' with integers, found '{s}'"))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.width, self.height)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// The `rotate` flag. Never interpreted, only carried through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// `rotate: false`
    Unrotated,
    /// `rotate: true`
    Rotated,
    /// `rotate: <degrees>`
    Degrees(u16),
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "false" => Ok(Self::Unrotated),
            "true" => Ok(Self::Rotated),
            other => other
                .parse()
                .map(Self::Degrees)
                .map_err(|_| format!("expected 'true', 'false' or degrees, found '{other}'")),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrotated => f.write_str("false"),
            Self::Rotated => f.write_str("true"),
            Self::Degrees(d) => write!(f, "{d}"),
        }
    }
}

/// Declared channel layout of the atlas image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    Alpha,
    Intensity,
    LuminanceAlpha,
    Rgb565,
    Rgba4444,
    Rgb888,
    Rgba8888,
    /// Unrecognized layout name, kept verbatim and treated as RGBA.
    Other(String),
}

impl PixelFormat {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Alpha => "Alpha",
            Self::Intensity => "Intensity",
            Self::LuminanceAlpha => "LuminanceAlpha",
            Self::Rgb565 => "RGB565",
            Self::Rgba4444 => "RGBA4444",
            Self::Rgb888 => "RGB888",
            Self::Rgba8888 => "RGBA8888",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for PixelFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "Alpha" => Self::Alpha,
            "Intensity" => Self::Intensity,
            "LuminanceAlpha" => Self::LuminanceAlpha,
            "RGB565" => Self::Rgb565,
            "RGBA4444" => Self::Rgba4444,
            "RGB888" => Self::Rgb888,
            "RGBA8888" => Self::Rgba8888,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One packed rectangle of the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteEntry {
    /// Logical name as written in the descriptor (may repeat across frames).
    pub name: String,
    pub rotate: Option<Rotation>,
    pub xy: Point,
    pub size: Size,
    pub orig: Option<Size>,
    pub offset: Option<Offset>,
    /// Animation frame; absent or negative means a standalone sprite.
    pub index: Option<i32>,
    /// Attributes this crate does not model (`split`, `pad`, ...), in source order.
    pub extra: Vec<(String, String)>,
}

impl SpriteEntry {
    /// Create a standalone sprite with only geometry set.
    #[must_use]
    pub fn new(name: impl Into<String>, xy: Point, size: Size) -> Self {
        Self {
            name: name.into(),
            rotate: None,
            xy,
            size,
            orig: None,
            offset: None,
            index: None,
            extra: Vec::new(),
        }
    }

    /// Effective frame index, `-1` when absent.
    #[must_use]
    pub fn frame_index(&self) -> i32 {
        self.index.unwrap_or(-1)
    }

    /// Table key: `"{name}_{index}"` for animation frames, `name` otherwise.
    #[must_use]
    pub fn key(&self) -> String {
        match self.frame_index() {
            i if i >= 0 => format!("{}_{i}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Crop rectangle inside the atlas image.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect {
            left: self.xy.x,
            top: self.xy.y,
            right: self.xy.x + self.size.width,
            bottom: self.xy.y + self.size.height,
        }
    }
}

/// One packed spritesheet definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    /// Descriptor location; relative asset paths resolve against its directory.
    pub source_path: PathBuf,
    /// Backing image, relative to the descriptor's directory.
    pub image_name: String,
    pub canvas_size: Size,
    pub pixel_format: PixelFormat,
    pub filter_mode: String,
    pub repeat_mode: String,
    /// Sprite table in descriptor order.
    pub sprites: IndexMap<String, SpriteEntry>,
    /// Decompose-time content digests, keyed like `sprites`.
    pub sprite_hashes: IndexMap<String, String>,
}

impl Atlas {
    /// Read and parse a descriptor file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut atlas = super::parse_descriptor(&text).map_err(|e| e.at_path(path))?;
        atlas.source_path = path.to_path_buf();

        tracing::info!(
            "Opened atlas {:?}: {} sprites on a {}x{} canvas",
            path,
            atlas.sprites.len(),
            atlas.canvas_size.width,
            atlas.canvas_size.height
        );
        Ok(atlas)
    }

    /// Directory containing the descriptor.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        match self.source_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Full path of the backing atlas image.
    #[must_use]
    pub fn image_path(&self) -> PathBuf {
        self.base_dir().join(&self.image_name)
    }

    /// File name of the descriptor itself, if it came from disk.
    #[must_use]
    pub fn descriptor_name(&self) -> Option<&str> {
        self.source_path.file_name().and_then(|n| n.to_str())
    }

    #[must_use]
    pub fn sprite(&self, key: &str) -> Option<&SpriteEntry> {
        self.sprites.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Regenerate descriptor text for this atlas.
    #[must_use]
    pub fn to_descriptor(&self) -> String {
        super::write_descriptor(self)
    }

    /// Copy of the header with an empty sprite table, for derived atlases.
    #[must_use]
    pub fn with_header_only(&self) -> Self {
        Self {
            source_path: self.source_path.clone(),
            image_name: self.image_name.clone(),
            canvas_size: self.canvas_size,
            pixel_format: self.pixel_format.clone(),
            filter_mode: self.filter_mode.clone(),
            repeat_mode: self.repeat_mode.clone(),
            sprites: IndexMap::new(),
            sprite_hashes: IndexMap::new(),
        }
    }
}
