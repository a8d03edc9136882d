//! Atlas descriptor reader
//!
//! The descriptor is line oriented. After five positional header lines,
//! every line either names a new sprite (no `": "` separator) or sets one
//! attribute on the sprite being accumulated. A sprite is complete once its
//! `index` attribute is read, or when the next sprite name / end of input is
//! reached for records that carry no index.

use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::utils::is_contained;

use super::document::{Atlas, Offset, PixelFormat, Point, Rotation, Size, SpriteEntry};

/// Parse descriptor text into an [`Atlas`].
///
/// The returned atlas has an empty `source_path`; use [`Atlas::open`] to
/// parse from disk. Any malformed line aborts the whole parse.
pub fn parse_descriptor(text: &str) -> Result<Atlas> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let header = Header::read(&mut lines, text.lines().count() + 1)?;

    let mut sprites = IndexMap::new();
    let mut state = State::AwaitingKey;

    for (line_no, line) in lines {
        state = match (state, classify(line)) {
            (state, Line::Key(name)) => {
                if let State::Accumulating(pending) = state {
                    pending.finish(&header, &mut sprites)?;
                }
                State::Accumulating(Pending::new(name, line_no))
            }
            (State::AwaitingKey, Line::Attribute(key, _)) => {
                return Err(format_error(
                    line_no,
                    format!("attribute '{key}' appears before any sprite name"),
                ));
            }
            (State::Accumulating(mut pending), Line::Attribute(key, value)) => {
                if pending.set(key, value, line_no)? {
                    pending.finish(&header, &mut sprites)?;
                    State::AwaitingKey
                } else {
                    State::Accumulating(pending)
                }
            }
        };
    }

    if let State::Accumulating(pending) = state {
        pending.finish(&header, &mut sprites)?;
    }

    tracing::debug!("Parsed {} sprites from descriptor", sprites.len());

    Ok(Atlas {
        source_path: std::path::PathBuf::new(),
        image_name: header.image_name,
        canvas_size: header.canvas_size,
        pixel_format: header.pixel_format,
        filter_mode: header.filter_mode,
        repeat_mode: header.repeat_mode,
        sprites,
        sprite_hashes: IndexMap::new(),
    })
}

fn format_error(line: usize, message: impl Into<String>) -> Error {
    Error::Format {
        path: None,
        line,
        message: message.into(),
    }
}

/// Positional header fields.
struct Header {
    image_name: String,
    canvas_size: Size,
    pixel_format: PixelFormat,
    filter_mode: String,
    repeat_mode: String,
}

impl Header {
    const FIELDS: [&'static str; 5] = ["image name", "size", "format", "filter", "repeat"];

    fn read<'a, I>(lines: &mut I, end_line: usize) -> Result<Self>
    where
        I: Iterator<Item = (usize, &'a str)>,
    {
        let mut fields: Vec<(usize, &str)> = Vec::with_capacity(Self::FIELDS.len());
        for field in Self::FIELDS {
            let Some((line_no, line)) = lines.next() else {
                return Err(format_error(
                    end_line,
                    format!("descriptor header ends before the '{field}' field"),
                ));
            };
            fields.push((line_no, line.trim()));
        }

        let (image_line, image_name) = fields[0];
        if !is_contained(image_name) {
            return Err(format_error(
                image_line,
                format!("image name '{image_name}' must be a relative path beside the descriptor"),
            ));
        }
        let (size_line, size_text) = fields[1];
        let canvas_size: Size = header_value(size_text)
            .parse()
            .map_err(|e| format_error(size_line, format!("invalid canvas size: {e}")))?;
        if canvas_size.width == 0 || canvas_size.height == 0 {
            return Err(format_error(
                size_line,
                format!("canvas size must be positive, found {canvas_size}"),
            ));
        }

        let Ok(pixel_format) = header_value(fields[2].1).parse::<PixelFormat>();

        Ok(Self {
            image_name: image_name.to_string(),
            canvas_size,
            pixel_format,
            filter_mode: header_value(fields[3].1).to_string(),
            repeat_mode: header_value(fields[4].1).to_string(),
        })
    }
}

/// Header values may be written bare (`2048, 2048`) or labelled (`size: 2048, 2048`).
fn header_value(line: &str) -> &str {
    line.split_once(": ").map_or(line, |(_, value)| value.trim())
}

enum Line<'a> {
    Key(&'a str),
    Attribute(&'a str, &'a str),
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    match line.split_once(": ") {
        Some((key, value)) => Line::Attribute(key.trim(), value.trim()),
        None => Line::Key(line),
    }
}

enum State {
    AwaitingKey,
    Accumulating(Pending),
}

/// A sprite record whose attributes are still being read.
struct Pending {
    name: String,
    line: usize,
    rotate: Option<Rotation>,
    xy: Option<Point>,
    size: Option<Size>,
    orig: Option<Size>,
    offset: Option<Offset>,
    index: Option<i32>,
    extra: Vec<(String, String)>,
}

fn parse_value<T>(attribute: &str, value: &str, line: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| format_error(line, format!("invalid '{attribute}' value: {e}")))
}

impl Pending {
    fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            line,
            rotate: None,
            xy: None,
            size: None,
            orig: None,
            offset: None,
            index: None,
            extra: Vec::new(),
        }
    }

    /// Apply one attribute. Returns `true` when the record is complete.
    fn set(&mut self, key: &str, value: &str, line: usize) -> Result<bool> {
        match key {
            "rotate" => self.rotate = Some(parse_value(key, value, line)?),
            "xy" => self.xy = Some(parse_value(key, value, line)?),
            "size" => self.size = Some(parse_value(key, value, line)?),
            "orig" => self.orig = Some(parse_value(key, value, line)?),
            "offset" => self.offset = Some(parse_value(key, value, line)?),
            "index" => {
                self.index = Some(parse_value(key, value, line)?);
                return Ok(true);
            }
            _ => self.extra.push((key.to_string(), value.to_string())),
        }
        Ok(false)
    }

    fn finish(self, header: &Header, sprites: &mut IndexMap<String, SpriteEntry>) -> Result<()> {
        let line = self.line;
        if !is_contained(&self.name) {
            return Err(format_error(
                line,
                format!("sprite name '{}' must be a relative path", self.name),
            ));
        }
        let Some(xy) = self.xy else {
            return Err(format_error(line, format!("sprite '{}' has no 'xy'", self.name)));
        };
        let Some(size) = self.size else {
            return Err(format_error(line, format!("sprite '{}' has no 'size'", self.name)));
        };

        let canvas = header.canvas_size;
        let right = u64::from(xy.x) + u64::from(size.width);
        let bottom = u64::from(xy.y) + u64::from(size.height);
        if right > u64::from(canvas.width) || bottom > u64::from(canvas.height) {
            return Err(format_error(
                line,
                format!(
                    "sprite '{}' at ({xy}) with size ({size}) exceeds the {}x{} canvas",
                    self.name, canvas.width, canvas.height
                ),
            ));
        }

        let sprite = SpriteEntry {
            name: self.name,
            rotate: self.rotate,
            xy,
            size,
            orig: self.orig,
            offset: self.offset,
            index: self.index,
            extra: self.extra,
        };

        let key = unique_key(sprite.key(), sprites);
        sprites.insert(key, sprite);
        Ok(())
    }
}

/// Repeated keys get a `_dup{n}` suffix so every record keeps its own file.
fn unique_key(key: String, sprites: &IndexMap<String, SpriteEntry>) -> String {
    if !sprites.contains_key(&key) {
        return key;
    }
    let derived = (1..)
        .map(|n| format!("{key}_dup{n}"))
        .find(|candidate| !sprites.contains_key(candidate))
        .unwrap_or_default();
    tracing::warn!("Sprite key '{}' repeats, storing it as '{}'", key, derived);
    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "
main.png
size: 64, 64
format: RGBA8888
filter: Linear,Linear
repeat: none
";

    fn descriptor(body: &str) -> String {
        format!("{HEADER}{body}")
    }

    #[test]
    fn test_parse_header() {
        let atlas = parse_descriptor(HEADER).unwrap();
        assert_eq!(atlas.image_name, "main.png");
        assert_eq!(atlas.canvas_size, Size::new(64, 64));
        assert_eq!(atlas.pixel_format, PixelFormat::Rgba8888);
        assert_eq!(atlas.filter_mode, "Linear,Linear");
        assert_eq!(atlas.repeat_mode, "none");
        assert!(atlas.is_empty());
        assert!(atlas.sprite_hashes.is_empty());
    }

    #[test]
    fn test_parse_bare_header_values() {
        let atlas = parse_descriptor("main.png\n32, 16\nRGB888\nNearest,Nearest\nxy\n").unwrap();
        assert_eq!(atlas.canvas_size, Size::new(32, 16));
        assert_eq!(atlas.pixel_format, PixelFormat::Rgb888);
        assert_eq!(atlas.repeat_mode, "xy");
    }

    #[test]
    fn test_parse_sprite_attributes() {
        let text = descriptor(
            "button
  rotate: false
  xy: 2, 4
  size: 10, 12
  split: 1, 1, 1, 1
  orig: 11, 13
  offset: -1, 0
  index: -1
",
        );
        let atlas = parse_descriptor(&text).unwrap();
        let sprite = atlas.sprite("button").unwrap();
        assert_eq!(sprite.rotate, Some(Rotation::Unrotated));
        assert_eq!(sprite.xy, Point::new(2, 4));
        assert_eq!(sprite.size, Size::new(10, 12));
        assert_eq!(sprite.orig, Some(Size::new(11, 13)));
        assert_eq!(sprite.offset, Some(Offset { x: -1, y: 0 }));
        assert_eq!(sprite.index, Some(-1));
        assert_eq!(
            sprite.extra,
            vec![("split".to_string(), "1, 1, 1, 1".to_string())]
        );
    }

    #[test]
    fn test_animation_frames_are_disambiguated() {
        let text = descriptor(
            "walk
  xy: 0, 0
  size: 8, 8
  index: 0
walk
  xy: 8, 0
  size: 8, 8
  index: 1
walk
  xy: 16, 0
  size: 8, 8
  index: -1
",
        );
        let atlas = parse_descriptor(&text).unwrap();
        let keys: Vec<_> = atlas.sprites.keys().cloned().collect();
        assert_eq!(keys, vec!["walk_0", "walk_1", "walk"]);
        assert_eq!(atlas.sprite("walk_1").unwrap().name, "walk");
    }

    #[test]
    fn test_record_without_index_keeps_name() {
        let text = descriptor(
            "walk
  xy: 0, 0
  size: 8, 8
  index: 0
walk
  xy: 16, 0
  size: 8, 8
idle
  xy: 24, 0
  size: 8, 8
",
        );
        let atlas = parse_descriptor(&text).unwrap();
        let keys: Vec<_> = atlas.sprites.keys().cloned().collect();
        assert_eq!(keys, vec!["walk_0", "walk", "idle"]);
        assert_eq!(atlas.sprite("idle").unwrap().index, None);
    }

    #[test]
    fn test_attribute_before_key_is_rejected() {
        let text = "
main.png
size: 64, 64
format: RGBA8888
filter: Linear,Linear
repeat: none
  xy: 0, 0
";
        let err = parse_descriptor(text).unwrap_err();
        match err {
            Error::Format { line, path, .. } => {
                assert_eq!(line, 7);
                assert!(path.is_none());
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_attribute_after_completed_record_is_rejected() {
        let text = descriptor(
            "a
  xy: 0, 0
  size: 8, 8
  index: -1
  rotate: false
",
        );
        assert!(matches!(
            parse_descriptor(&text),
            Err(Error::Format { line: 11, .. })
        ));
    }

    #[test]
    fn test_bad_value_reports_line() {
        let text = descriptor("a\n  xy: 0, zero\n  size: 8, 8\n");
        match parse_descriptor(&text).unwrap_err() {
            Error::Format { line, message, .. } => {
                assert_eq!(line, 8);
                assert!(message.contains("'xy'"), "{message}");
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_sprite_outside_canvas_is_rejected() {
        let text = descriptor("a\n  xy: 60, 0\n  size: 8, 8\n  index: -1\n");
        assert!(matches!(
            parse_descriptor(&text),
            Err(Error::Format { line: 7, .. })
        ));
    }

    #[test]
    fn test_missing_geometry_is_rejected() {
        let text = descriptor("a\n  xy: 0, 0\n  index: -1\n");
        assert!(matches!(parse_descriptor(&text), Err(Error::Format { .. })));
    }

    #[test]
    fn test_repeated_key_gets_derived_key() {
        let text = descriptor(
            "a\n  xy: 0, 0\n  size: 8, 8\na\n  xy: 8, 0\n  size: 8, 8\na\n  xy: 16, 0\n  size: 8, 8\n",
        );
        let atlas = parse_descriptor(&text).unwrap();
        let keys: Vec<_> = atlas.sprites.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "a_dup1", "a_dup2"]);
        assert_eq!(atlas.sprite("a_dup1").unwrap().name, "a");
        assert_eq!(atlas.sprite("a_dup2").unwrap().xy, Point::new(16, 0));

        // The descriptor keeps the original names
        let reparsed = parse_descriptor(&atlas.to_descriptor()).unwrap();
        assert_eq!(reparsed.sprites, atlas.sprites);
    }

    #[test]
    fn test_escaping_sprite_name_is_rejected() {
        let text = descriptor(
            "ui/button\n  xy: 0, 0\n  size: 8, 8\n../../escaped\n  xy: 8, 0\n  size: 8, 8\n",
        );
        match parse_descriptor(&text).unwrap_err() {
            Error::Format { line, message, .. } => {
                assert_eq!(line, 10);
                assert!(message.contains("../../escaped"), "{message}");
            }
            other => panic!("expected format error, got {other:?}"),
        }

        let text = descriptor("/abs/sprite\n  xy: 0, 0\n  size: 8, 8\n");
        assert!(matches!(parse_descriptor(&text), Err(Error::Format { line: 7, .. })));
    }

    #[test]
    fn test_escaping_image_name_is_rejected() {
        let text = "/tmp/victim.png\n8, 8\nRGBA8888\nLinear,Linear\nnone\n";
        assert!(matches!(parse_descriptor(text), Err(Error::Format { line: 1, .. })));

        let text = "../main.png\n8, 8\nRGBA8888\nLinear,Linear\nnone\n";
        assert!(matches!(parse_descriptor(text), Err(Error::Format { line: 1, .. })));
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        assert!(matches!(
            parse_descriptor("main.png\nsize: 4, 4\n"),
            Err(Error::Format { line: 3, .. })
        ));
        assert!(matches!(
            parse_descriptor("main.png\nsize: 0, 4\nRGBA8888\nLinear\nnone\n"),
            Err(Error::Format { line: 2, .. })
        ));
    }
}
