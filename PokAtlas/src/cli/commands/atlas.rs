//! CLI commands for whole-atlas operations

use std::path::Path;
use std::time::Instant;

use anyhow::Context;

use crate::cli::progress::{
    DISK, LOOKING_GLASS, PICTURE, SCISSORS, atlas_bar, print_done, print_step, update_bar,
};
use crate::project::AtlasProject;

fn open(descriptor: &Path) -> anyhow::Result<AtlasProject> {
    AtlasProject::open(descriptor)
        .with_context(|| format!("Failed to open {}", descriptor.display()))
}

/// Show the atlas header and optionally the sprite table
pub fn info(descriptor: &Path, list_sprites: bool) -> anyhow::Result<()> {
    let project = open(descriptor)?;
    let atlas = project.atlas();

    println!("Atlas: {}", descriptor.display());
    println!();
    println!("Image:   {}", atlas.image_name);
    println!("Size:    {}x{}", atlas.canvas_size.width, atlas.canvas_size.height);
    println!("Format:  {}", atlas.pixel_format);
    println!("Filter:  {}", atlas.filter_mode);
    println!("Repeat:  {}", atlas.repeat_mode);
    println!("Sprites: {}", atlas.len());
    println!(
        "Decomposed: {}",
        if project.is_decomposed() { "yes" } else { "no" }
    );

    if list_sprites {
        println!();
        for (key, sprite) in &atlas.sprites {
            println!(
                "  {key:<32} {:>5},{:<5} {:>4}x{:<4}",
                sprite.xy.x, sprite.xy.y, sprite.size.width, sprite.size.height
            );
        }
    }

    Ok(())
}

/// Split the atlas into sprite files
pub fn decompose(descriptor: &Path, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut project = open(descriptor)?;

    if !quiet {
        print_step(1, 2, SCISSORS, &format!("Extracting {} sprites...", project.atlas().len()));
    }
    let pb = atlas_bar(quiet);
    project.decompose_with_progress(&|progress| update_bar(&pb, progress))?;
    pb.finish_and_clear();

    if !quiet {
        print_step(
            2,
            2,
            DISK,
            &format!("Saved baselines to {}", project.baseline_path().display()),
        );
        println!("Sprites written to {}", project.store().root().display());
        print_done(start.elapsed());
    }
    Ok(())
}

/// Recompose the atlas image
pub fn rebuild(descriptor: &Path, output: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let project = open(descriptor)?;
    let output_dir = output.map_or_else(|| project.output_dir(), Path::to_path_buf);

    if !quiet {
        print_step(1, 1, PICTURE, "Compositing sprites...");
    }
    let pb = atlas_bar(quiet);
    let path = project.rebuild_to(&output_dir, &|progress| update_bar(&pb, progress))?;
    pb.finish_and_clear();

    println!("Wrote {}", path.display());
    if !quiet {
        print_done(start.elapsed());
    }
    Ok(())
}

/// Report duplicate groups and edited sprites
pub fn status(descriptor: &Path) -> anyhow::Result<()> {
    let project = open(descriptor)?;
    println!("{LOOKING_GLASS}Scanning {}", descriptor.display());
    let report = project.status()?;

    println!();
    if report.duplicate_groups.is_empty() {
        println!("No duplicate groups");
    } else {
        println!("Duplicate groups ({}):", report.duplicate_groups.len());
        for (origin, keys) in &report.duplicate_groups {
            println!("  at {origin}: {}", keys.join(", "));
        }
    }

    println!();
    if !report.decomposed {
        println!("Not decomposed yet; run `pokatlas decompose` to record baselines");
    } else if report.dirty.is_empty() {
        println!("No edited sprites");
    } else {
        println!("Edited sprites ({}):", report.dirty.len());
        for key in &report.dirty {
            println!("  {key}");
        }
    }

    Ok(())
}
