//! Atlas descriptor writer
//!
//! Emits the labelled dialect: a leading blank line, the image name, the
//! `size`/`format`/`filter`/`repeat` header, then one record per sprite in
//! table order. Only attributes present on a sprite are written, so parsing
//! the output yields the same sprite table.

use std::fmt::Write;

use super::document::{Atlas, SpriteEntry};

/// Render an [`Atlas`] back to descriptor text.
#[must_use]
pub fn write_descriptor(atlas: &Atlas) -> String {
    let mut out = String::with_capacity(64 + atlas.sprites.len() * 96);

    out.push('\n');
    let _ = writeln!(out, "{}", atlas.image_name);
    let _ = writeln!(out, "size: {}", atlas.canvas_size);
    let _ = writeln!(out, "format: {}", atlas.pixel_format);
    let _ = writeln!(out, "filter: {}", atlas.filter_mode);
    let _ = writeln!(out, "repeat: {}", atlas.repeat_mode);

    for sprite in atlas.sprites.values() {
        write_sprite(&mut out, sprite);
    }

    out
}

fn write_sprite(out: &mut String, sprite: &SpriteEntry) {
    let _ = writeln!(out, "{}", sprite.name);
    if let Some(rotate) = sprite.rotate {
        let _ = writeln!(out, "  rotate: {rotate}");
    }
    let _ = writeln!(out, "  xy: {}", sprite.xy);
    let _ = writeln!(out, "  size: {}", sprite.size);
    for (key, value) in &sprite.extra {
        let _ = writeln!(out, "  {key}: {value}");
    }
    if let Some(orig) = sprite.orig {
        let _ = writeln!(out, "  orig: {orig}");
    }
    if let Some(offset) = sprite.offset {
        let _ = writeln!(out, "  offset: {offset}");
    }
    if let Some(index) = sprite.index {
        let _ = writeln!(out, "  index: {index}");
    }
}
