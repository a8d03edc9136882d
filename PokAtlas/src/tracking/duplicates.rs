//! Duplicate detection by shared source coordinates

use indexmap::{IndexMap, IndexSet};

use crate::formats::atlas::{Atlas, Point};

/// Keys of every sprite whose `xy` is shared with at least one other sprite.
///
/// Returned in table order.
#[must_use]
pub fn find_duplicates(atlas: &Atlas) -> IndexSet<String> {
    let groups = group_by_origin(atlas);
    atlas
        .sprites
        .iter()
        .filter(|(_, sprite)| groups.get(&sprite.xy).is_some_and(|keys| keys.len() > 1))
        .map(|(key, _)| key.clone())
        .collect()
}

/// Duplicate groups keyed by their shared origin, in order of first appearance.
#[must_use]
pub fn duplicate_groups(atlas: &Atlas) -> IndexMap<Point, Vec<String>> {
    let mut groups = group_by_origin(atlas);
    groups.retain(|_, keys| keys.len() > 1);
    groups
}

fn group_by_origin(atlas: &Atlas) -> IndexMap<Point, Vec<String>> {
    let mut groups: IndexMap<Point, Vec<String>> = IndexMap::new();
    for (key, sprite) in &atlas.sprites {
        groups.entry(sprite.xy).or_default().push(key.clone());
    }
    groups
}
