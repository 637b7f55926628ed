use crate::roster::{Ninja, Roster, ScrollList, ScrollName};
use directories::ProjectDirs;
use fs_err as fs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const NINJAS_FILE: &str = "ninjas.json";
pub const SCROLLS_FILE: &str = "scrolls.json";
pub const RULES_FILE: &str = "rules.txt";
pub const DEFAULT_RULES: &str = "Enter the rules here...";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to determine data directory")]
    DataDirNotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    let proj_dirs =
        ProjectDirs::from("org", "shinobi", "dojo").ok_or(StoreError::DataDirNotFound)?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Flat files under one data directory. Every save rewrites the whole file.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Creates the directory and any missing file with its empty default.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        // watcher events carry absolute paths
        let store = Self {
            dir: fs::canonicalize(&dir)?,
        };

        if !store.ninjas_path().exists() {
            store.save_ninjas(&Roster::default())?;
        }
        if !store.scrolls_path().exists() {
            store.save_scrolls(&ScrollList::default())?;
        }
        if !store.rules_path().exists() {
            store.save_rules(DEFAULT_RULES)?;
        }
        Ok(store)
    }

    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_data_dir()?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ninjas_path(&self) -> PathBuf {
        self.dir.join(NINJAS_FILE)
    }

    pub fn scrolls_path(&self) -> PathBuf {
        self.dir.join(SCROLLS_FILE)
    }

    pub fn rules_path(&self) -> PathBuf {
        self.dir.join(RULES_FILE)
    }

    /// Whether `path` is one of the files this store owns.
    pub fn owns(&self, path: &Path) -> bool {
        [self.ninjas_path(), self.scrolls_path(), self.rules_path()]
            .iter()
            .any(|p| p == path)
    }

    pub fn load_roster(&self) -> Roster {
        Roster::new(read_json_or_default::<Vec<Ninja>>(&self.ninjas_path()))
    }

    pub fn save_ninjas(&self, roster: &Roster) -> Result<(), StoreError> {
        write_json(&self.ninjas_path(), roster.ninjas())
    }

    pub fn load_scrolls(&self) -> ScrollList {
        ScrollList::new(read_json_or_default::<Vec<ScrollName>>(&self.scrolls_path()))
    }

    pub fn save_scrolls(&self, scrolls: &ScrollList) -> Result<(), StoreError> {
        write_json(&self.scrolls_path(), scrolls.items())
    }

    pub fn load_rules(&self) -> String {
        fs::read_to_string(self.rules_path()).unwrap_or_else(|e| {
            log::warn!("{}", e);
            DEFAULT_RULES.to_string()
        })
    }

    pub fn save_rules(&self, rules: &str) -> Result<(), StoreError> {
        fs::write(self.rules_path(), rules)?;
        Ok(())
    }

    /// Load, change, save. Nothing is written when `f` reports no change.
    pub fn update_roster<T>(
        &self,
        f: impl FnOnce(&mut Roster) -> T,
    ) -> Result<(Roster, T), StoreError> {
        let mut roster = self.load_roster();
        let before = roster.clone();
        let out = f(&mut roster);
        if roster != before {
            self.save_ninjas(&roster)?;
        }
        Ok((roster, out))
    }

    pub fn update_scrolls(
        &self,
        f: impl FnOnce(&mut ScrollList) -> bool,
    ) -> Result<ScrollList, StoreError> {
        let mut scrolls = self.load_scrolls();
        if f(&mut scrolls) {
            self.save_scrolls(&scrolls)?;
        }
        Ok(scrolls)
    }
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let parsed = fs::read_to_string(path)
        .map_err(StoreError::from)
        .and_then(|s| serde_json::from_str(&s).map_err(StoreError::from));

    parsed.unwrap_or_else(|e| {
        log::warn!("Falling back to empty data for {}: {}", path.display(), e);
        T::default()
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Rank;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_default_files() {
        let (_dir, store) = temp_store();
        assert_eq!(fs::read_to_string(store.ninjas_path()).unwrap(), "[]");
        assert_eq!(fs::read_to_string(store.scrolls_path()).unwrap(), "[]");
        assert_eq!(store.load_rules(), DEFAULT_RULES);
    }

    #[test]
    fn test_open_keeps_existing_files() {
        let (dir, store) = temp_store();
        store.save_rules("no jutsu").unwrap();

        let reopened = Store::open(dir.path().join("data")).unwrap();
        assert_eq!(reopened.load_rules(), "no jutsu");
    }

    #[test]
    fn test_roster_round_trip() {
        let (_dir, store) = temp_store();
        let (roster, added) = store
            .update_roster(|r| r.add_batch("Neji Hinata", Rank::B))
            .unwrap();
        assert_eq!(added.unwrap().added, 2);

        let loaded = store.load_roster();
        assert_eq!(loaded, roster);
        assert_eq!(loaded.by_rank(Rank::B).count(), 2);
    }

    #[test]
    fn test_unicode_written_verbatim() {
        let (_dir, store) = temp_store();
        store
            .update_scrolls(|s| s.add("螺旋丸"))
            .unwrap();

        let raw = fs::read_to_string(store.scrolls_path()).unwrap();
        assert!(raw.contains("螺旋丸"));
        assert_eq!(store.load_scrolls().labels(), vec!["螺旋丸"]);
    }

    #[test]
    fn test_corrupt_files_fall_back_to_empty() {
        let (_dir, store) = temp_store();
        fs::write(store.ninjas_path(), "{not json").unwrap();
        fs::remove_file(store.scrolls_path()).unwrap();
        fs::remove_file(store.rules_path()).unwrap();

        assert!(store.load_roster().is_empty());
        assert!(store.load_scrolls().is_empty());
        assert_eq!(store.load_rules(), DEFAULT_RULES);
    }

    #[test]
    fn test_unchanged_update_does_not_write() {
        let (_dir, store) = temp_store();
        fs::write(store.scrolls_path(), "[\"a\"]").unwrap();

        let scrolls = store.update_scrolls(|s| s.add("a")).unwrap();
        assert_eq!(scrolls.labels(), vec!["a"]);
        assert_eq!(fs::read_to_string(store.scrolls_path()).unwrap(), "[\"a\"]");
    }

    #[test]
    fn test_owns_only_data_files() {
        let (_dir, store) = temp_store();
        assert!(store.owns(&store.scrolls_path()));
        assert!(!store.owns(&store.dir().join("other.json")));
    }
}
