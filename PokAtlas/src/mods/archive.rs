//! Zip archive creation

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::ops::{AtlasPhase, AtlasProgress, AtlasProgressCallback};
use crate::utils::relative_path;

/// Zip every regular file under `source_dir`.
///
/// Entry names are relative to `base_dir` (which must contain
/// `source_dir`) and always use forward slashes. Files are added in sorted
/// order so the same tree produces the same entry list.
///
/// Returns the number of files archived.
pub fn zip_directory(
    source_dir: &Path,
    base_dir: &Path,
    output_zip: &Path,
    progress: AtlasProgressCallback,
) -> Result<usize> {
    tracing::info!("Archiving {:?} -> {:?}", source_dir, output_zip);

    let mut entries = Vec::new();
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = relative_path(entry.path(), base_dir).ok_or_else(|| {
            Error::InvalidPath(format!(
                "{} is outside {}",
                entry.path().display(),
                base_dir.display()
            ))
        })?;
        entries.push((entry.path().to_path_buf(), name));
    }

    if let Some(parent) = output_zip.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut zip = zip::ZipWriter::new(BufWriter::new(File::create(output_zip)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let total = entries.len();
    for (i, (path, name)) in entries.into_iter().enumerate() {
        progress(&AtlasProgress::with_item(AtlasPhase::Archiving, i + 1, total, &name));
        tracing::debug!("Adding {}", name);

        zip.start_file(name, options)?;
        let mut file = File::open(&path)?;
        std::io::copy(&mut file, &mut zip)?;
    }

    zip.finish()?.flush()?;
    tracing::info!("Archived {} files", total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    #[test]
    fn test_entries_are_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let package = dir.path().join("Menu_Mod");
        std::fs::create_dir_all(package.join("assets").join("atlas")).unwrap();
        std::fs::write(package.join("manifest.xml"), "<mod/>").unwrap();
        let descriptor = package.join("assets").join("atlas").join("menu.atlas");
        std::fs::write(descriptor, "menu.png\n").unwrap();

        let zip_path = dir.path().join("Menu_Mod.zip");
        let count = zip_directory(&package, dir.path(), &zip_path, &|_| {}).unwrap();
        assert_eq!(count, 2);

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["Menu_Mod/assets/atlas/menu.atlas", "Menu_Mod/manifest.xml"]);

        let mut content = String::new();
        archive.by_name("Menu_Mod/manifest.xml").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "<mod/>");
    }

    #[test]
    fn test_source_outside_base_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        std::fs::write(other.path().join("stray.txt"), "x").unwrap();

        let err = zip_directory(other.path(), dir.path(), &dir.path().join("out.zip"), &|_| {})
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }
}
