//! CLI command for mod export

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{PACKAGE, atlas_bar, print_done, print_step, update_bar};
use crate::error::Error;
use crate::ops::AtlasProgress;
use crate::project::AtlasProject;

/// Export a full or partial mod package
pub fn export(descriptor: &Path, partial: bool, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let project = AtlasProject::open(descriptor)?;
    let kind = if partial { "partial" } else { "full" };

    if !quiet {
        print_step(1, 1, PACKAGE, &format!("Building {kind} package..."));
    }
    let pb = atlas_bar(quiet);
    let callback = |progress: &AtlasProgress| update_bar(&pb, progress);
    let result = if partial {
        project.export_partial_with_progress(&callback)
    } else {
        project.export_full_with_progress(&callback)
    };
    pb.finish_and_clear();

    let result = match result {
        Err(Error::NothingToExport) => {
            println!("No edited sprites, nothing to export");
            return Ok(());
        }
        other => other?,
    };

    println!(
        "Packaged {} sprites ({}x{}) into {}",
        result.sprites.len(),
        result.canvas_size.width,
        result.canvas_size.height,
        result.archive_path.display()
    );
    if !quiet {
        print_done(start.elapsed());
    }
    Ok(())
}
