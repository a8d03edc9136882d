//! Dirty detection against decompose-time baselines

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::formats::atlas::Atlas;
use crate::store::SpriteStore;

use super::duplicates::{duplicate_groups, find_duplicates};

fn baseline<'a>(atlas: &'a Atlas, key: &str) -> Result<&'a str> {
    atlas
        .sprite_hashes
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| Error::BaselineMissing { key: key.to_string() })
}

/// Re-home edited duplicate groups at the tail of the sprite table.
///
/// Only sprites sharing their `xy` with another sprite are inspected. For
/// each group with at least one edited member, the unchanged siblings are
/// moved to the end of both tables first, then the edited members, whose
/// hash entries take the digest of the file now on disk. Edited
/// non-duplicates are left where they are.
pub fn check_duplicates(atlas: &mut Atlas, store: &SpriteStore) -> Result<()> {
    let duplicates = find_duplicates(atlas);

    let mut changed: IndexMap<String, String> = IndexMap::new();
    for key in &duplicates {
        let recorded = baseline(atlas, key)?;
        let current = store.digest(key)?;
        if current != recorded {
            changed.insert(key.clone(), current);
        }
    }

    if changed.is_empty() {
        tracing::debug!("No edited duplicates among {} shared sprites", duplicates.len());
        return Ok(());
    }

    for (origin, keys) in duplicate_groups(atlas) {
        if !keys.iter().any(|key| changed.contains_key(key)) {
            continue;
        }
        tracing::debug!("Re-homing duplicate group at {}: {:?}", origin, keys);

        let (edited, untouched): (Vec<_>, Vec<_>) =
            keys.into_iter().partition(|key| changed.contains_key(key));
        for key in untouched {
            rehome(atlas, &key, None);
        }
        for key in edited {
            let digest = changed.get(&key).cloned();
            rehome(atlas, &key, digest);
        }
    }

    tracing::info!("Re-homed {} edited duplicate sprites", changed.len());
    Ok(())
}

/// Move a sprite's table and hash entries to the tail, optionally replacing the hash.
fn rehome(atlas: &mut Atlas, key: &str, digest: Option<String>) {
    if let Some(entry) = atlas.sprites.shift_remove(key) {
        atlas.sprites.insert(key.to_string(), entry);
    }
    let previous = atlas.sprite_hashes.shift_remove(key);
    if let Some(hash) = digest.or(previous) {
        atlas.sprite_hashes.insert(key.to_string(), hash);
    }
}

/// Keys of every sprite whose file no longer matches its baseline, in table order.
///
/// Read-only: unlike [`check_duplicates`] this scans every sprite and never
/// reorders anything.
pub fn dirty_sprites(atlas: &Atlas, store: &SpriteStore) -> Result<Vec<String>> {
    let mut dirty = Vec::new();
    for key in atlas.sprites.keys() {
        let recorded = baseline(atlas, key)?;
        if store.digest(key)? != recorded {
            dirty.push(key.clone());
        }
    }
    Ok(dirty)
}
