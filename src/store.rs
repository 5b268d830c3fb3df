//! Bookmark collection and its JSON file.

use crate::bookmark::{Bookmark, generate_id};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Random suffixes tried before falling back to counting upwards.
const MAX_ID_ATTEMPTS: usize = 64;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read bookmarks from {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write bookmarks to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse bookmarks in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize bookmarks: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to move unreadable bookmarks {path} aside: {source}")]
    Backup { path: PathBuf, source: io::Error },
}

/// Bookmarks in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkStore {
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the store from `path`. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No bookmarks at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let store: Self = serde_json::from_str(&json).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded {} bookmarks from {}", store.len(), path.display());
        Ok(store)
    }

    /// Like [`BookmarkStore::load`], but an unparsable file is renamed to
    /// `<file>.bak` so the next save cannot overwrite it. Returns the backup
    /// path when that happened.
    pub fn load_or_back_up(path: &Path) -> Result<(Self, Option<PathBuf>), StoreError> {
        match Self::load(path) {
            Ok(store) => Ok((store, None)),
            Err(StoreError::Parse { source, .. }) => {
                let mut backup = path.as_os_str().to_owned();
                backup.push(".bak");
                let backup = PathBuf::from(backup);

                fs::rename(path, &backup).map_err(|source| StoreError::Backup {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::warn!(
                    "Unreadable bookmarks ({source}) moved to {}",
                    backup.display()
                );
                Ok((Self::new(), Some(backup)))
            }
            Err(err) => Err(err),
        }
    }

    /// Writes the store to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, json).map_err(write_err)?;

        log::debug!("Saved {} bookmarks to {}", self.len(), path.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|bookmark| bookmark.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Appends a bookmark. Returns `false` if its id is already taken.
    pub fn add(&mut self, bookmark: Bookmark) -> bool {
        if self.contains(&bookmark.id) {
            return false;
        }
        self.bookmarks.push(bookmark);
        true
    }

    /// Replaces the bookmark with the same id. Returns `false` if none exists.
    pub fn update(&mut self, bookmark: Bookmark) -> bool {
        match self.bookmarks.iter_mut().find(|b| b.id == bookmark.id) {
            Some(existing) => {
                *existing = bookmark;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Bookmark> {
        let index = self.bookmarks.iter().position(|bookmark| bookmark.id == id)?;
        Some(self.bookmarks.remove(index))
    }

    /// An id for `name` that no stored bookmark uses yet.
    pub fn unique_id<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> String {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_id(name, rng);
            if !self.contains(&id) {
                return id;
            }
        }

        (1000..)
            .map(|n| format!("{name}{n}"))
            .find(|id| !self.contains(id))
            .unwrap_or_else(|| name.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::{Category, Level};
    use crate::crs::LatLng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bookmark(id: &str) -> Bookmark {
        Bookmark {
            id: id.to_owned(),
            name: id.to_owned(),
            category: Category::Lockpick,
            level: Some(Level::Two),
            latlng: LatLng::new(-12.5, 40.0),
        }
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut store = BookmarkStore::new();

        assert!(store.add(bookmark("a1")));
        assert!(!store.add(bookmark("a1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_by_id() {
        let mut store = BookmarkStore::new();
        store.add(bookmark("a1"));

        let mut renamed = bookmark("a1");
        renamed.name = "Renamed".to_owned();

        assert!(store.update(renamed));
        assert_eq!(store.get("a1").unwrap().name, "Renamed");
        assert!(!store.update(bookmark("missing")));
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut store = BookmarkStore::new();
        for id in ["a", "b", "c"] {
            store.add(bookmark(id));
        }

        assert_eq!(store.remove("b").map(|b| b.id), Some("b".to_owned()));
        assert!(store.remove("b").is_none());

        let ids: Vec<_> = store.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn unique_id_avoids_taken_suffixes() {
        let mut store = BookmarkStore::new();
        for n in 0..1000 {
            if n != 512 {
                store.add(bookmark(&format!("x{n}")));
            }
        }
        let mut rng = StdRng::seed_from_u64(9);

        let id = store.unique_id("x", &mut rng);

        assert!(!store.contains(&id));
        assert!(id.starts_with('x'));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();

        let store = BookmarkStore::load(&dir.path().join("bookmarks.json")).unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn saved_bookmarks_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bookmarks.json");
        let mut store = BookmarkStore::new();
        store.add(bookmark("a1"));
        store.add(bookmark("b2"));

        store.save(&path).unwrap();

        assert_eq!(BookmarkStore::load(&path).unwrap(), store);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, "{ not json").unwrap();

        let err = BookmarkStore::load(&path).unwrap_err();

        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn corrupt_file_survives_the_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, "{ not json").unwrap();

        let (mut store, backup) = BookmarkStore::load_or_back_up(&path).unwrap();
        assert!(store.is_empty());
        let backup = backup.unwrap();
        assert_eq!(backup, dir.path().join("bookmarks.json.bak"));

        store.add(bookmark("a1"));
        store.save(&path).unwrap();

        assert_eq!(fs::read_to_string(&backup).unwrap(), "{ not json");
        assert_eq!(BookmarkStore::load(&path).unwrap(), store);
    }

    #[test]
    fn readable_file_is_not_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        let mut store = BookmarkStore::new();
        store.add(bookmark("a1"));
        store.save(&path).unwrap();

        let (loaded, backup) = BookmarkStore::load_or_back_up(&path).unwrap();

        assert_eq!(loaded, store);
        assert!(backup.is_none());
        assert!(!dir.path().join("bookmarks.json.bak").exists());
    }
}
