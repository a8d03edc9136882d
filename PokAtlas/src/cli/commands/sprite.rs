//! CLI commands for replacing sprite files

use std::path::Path;

use anyhow::Context;

use crate::project::AtlasProject;

/// Replace a single sprite
pub fn replace(descriptor: &Path, key: &str, file: &Path) -> anyhow::Result<()> {
    let project = AtlasProject::open(descriptor)?;
    project
        .replace_sprite(key, file)
        .with_context(|| format!("Failed to replace '{key}' with {}", file.display()))?;
    println!("Replaced {key}");
    Ok(())
}

/// Replace every sprite with a matching file in `dir`
pub fn mass_replace(descriptor: &Path, dir: &Path) -> anyhow::Result<()> {
    let project = AtlasProject::open(descriptor)?;
    let replaced = project.mass_replace(dir)?;

    if replaced.is_empty() {
        println!("No files in {} match a sprite", dir.display());
    } else {
        println!("Replaced {} sprites:", replaced.len());
        for key in &replaced {
            println!("  {key}");
        }
    }
    Ok(())
}
