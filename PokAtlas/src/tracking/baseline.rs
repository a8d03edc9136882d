//! Baseline persistence
//!
//! The decompose-time digests live in memory on the [`Atlas`]; the ledger
//! writes them next to the descriptor so a later process can still tell
//! which sprites were edited.

use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::formats::atlas::Atlas;

/// Serialized form of an atlas's `sprite_hashes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineLedger {
    /// Atlas image the digests were taken from.
    pub image_name: String,
    /// Sprite key to MD5 hex digest, in table order.
    pub sprites: IndexMap<String, String>,
}

impl BaselineLedger {
    #[must_use]
    pub fn from_atlas(atlas: &Atlas) -> Self {
        Self {
            image_name: atlas.image_name.clone(),
            sprites: atlas.sprite_hashes.clone(),
        }
    }

    /// Load a ledger file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the ledger as pretty-printed JSON.
    ///
    /// The previous ledger is only replaced once the new one is fully on disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(self)?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path)?;
        Ok(())
    }

    /// Restore digests onto `atlas` for sprites it still defines.
    ///
    /// Entries for keys the descriptor no longer contains are dropped.
    /// Returns the number of restored digests.
    pub fn apply(&self, atlas: &mut Atlas) -> usize {
        if self.image_name != atlas.image_name {
            tracing::warn!(
                "Baseline was recorded for {}, atlas uses {}",
                self.image_name,
                atlas.image_name
            );
        }

        atlas.sprite_hashes = atlas
            .sprites
            .keys()
            .filter_map(|key| self.sprites.get(key).map(|hash| (key.clone(), hash.clone())))
            .collect();

        let stale = self.sprites.len() - atlas.sprite_hashes.len();
        if stale > 0 {
            tracing::debug!("Dropped {} baseline entries for unknown sprites", stale);
        }
        atlas.sprite_hashes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::atlas::parse_descriptor;
    use pretty_assertions::assert_eq;

    const DESCRIPTOR: &str = "main.png\n8, 8\nRGBA8888\nLinear,Linear\nnone\nb\n  xy: 4, 0\n  size: 4, 4\na\n  xy: 0, 0\n  size: 4, 4\n";

    #[test]
    fn test_ledger_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("baseline.json");

        let mut atlas = parse_descriptor(DESCRIPTOR).unwrap();
        atlas.sprite_hashes.insert("b".into(), "bbbb".into());
        atlas.sprite_hashes.insert("a".into(), "aaaa".into());

        BaselineLedger::from_atlas(&atlas).save(&path).unwrap();
        let loaded = BaselineLedger::load(&path).unwrap();
        assert_eq!(loaded, BaselineLedger::from_atlas(&atlas));

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
    }

    #[test]
    fn test_save_replaces_ledger_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        std::fs::write(&path, "{ \"image_name\": \"main.p").unwrap();
        assert!(matches!(BaselineLedger::load(&path), Err(crate::Error::JsonError(_))));

        let mut atlas = parse_descriptor(DESCRIPTOR).unwrap();
        atlas.sprite_hashes.insert("a".into(), "aaaa".into());
        BaselineLedger::from_atlas(&atlas).save(&path).unwrap();

        assert_eq!(BaselineLedger::load(&path).unwrap(), BaselineLedger::from_atlas(&atlas));
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_apply_keeps_table_order_and_drops_unknown_keys() {
        let mut atlas = parse_descriptor(DESCRIPTOR).unwrap();
        let ledger = BaselineLedger {
            image_name: "main.png".into(),
            sprites: IndexMap::from([
                ("a".to_string(), "aaaa".to_string()),
                ("gone".to_string(), "ffff".to_string()),
                ("b".to_string(), "bbbb".to_string()),
            ]),
        };

        assert_eq!(ledger.apply(&mut atlas), 2);
        assert_eq!(
            atlas.sprite_hashes.into_iter().collect::<Vec<_>>(),
            vec![("b".to_string(), "bbbb".to_string()), ("a".to_string(), "aaaa".to_string())]
        );
    }
}
