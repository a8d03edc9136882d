//! Path utilities

use std::path::{Component, Path};

/// Normalize path separators to forward slashes (for archive entries)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Get relative path and normalize separators
pub fn relative_path<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> Option<String> {
    path.as_ref()
        .strip_prefix(base.as_ref())
        .ok()
        .map(normalize_path)
}

/// Whether `value` is a non-empty relative path that stays below the
/// directory it is joined onto (no root, prefix or `..` components).
#[must_use]
pub fn is_contained(value: &str) -> bool {
    let path = Path::new(value);
    path.components().any(|c| matches!(c, Component::Normal(_)))
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
