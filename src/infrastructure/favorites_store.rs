//! Favorite recipe ids persisted as TOML.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::errors::StorageError;

const FAVORITES_FILE_NAME: &str = "favorites.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct FavoritesFile {
    #[serde(default)]
    ids: Vec<Uuid>,
}

/// Set of favorited recipe ids, written to disk after every change.
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    ids: BTreeSet<Uuid>,
}

impl FavoritesStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store, and so is one that fails to parse
    /// (with a warning).
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let ids = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match toml::from_str::<FavoritesFile>(&content) {
                Ok(file) => file.ids.into_iter().collect(),
                Err(e) => {
                    warn!("Failed to parse favorites file: {}. Starting empty.", e);
                    BTreeSet::new()
                }
            }
        } else {
            BTreeSet::new()
        };

        debug!(path = %path.display(), count = ids.len(), "Loaded favorites");
        Ok(Self { path, ids })
    }

    /// Default location in the platform data directory.
    ///
    /// # Errors
    /// Returns error if the data directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        directories::ProjectDirs::from("com", "recipedeck", "recipe-deck")
            .map(|dirs| dirs.data_dir().join(FAVORITES_FILE_NAME))
            .ok_or(StorageError::DirNotFound)
    }

    /// Returns true if `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    /// Current favorites in a stable order.
    pub fn ids(&self) -> impl Iterator<Item = &Uuid> {
        self.ids.iter()
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flips `id` in or out of the favorites. Returns whether it is now a favorite.
    ///
    /// # Errors
    /// Returns error if the change cannot be persisted.
    pub fn toggle(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let now_favorite = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        };
        self.save()?;
        Ok(now_favorite)
    }

    /// Adds `id`; a no-op if it is already present.
    ///
    /// # Errors
    /// Returns error if the change cannot be persisted.
    pub fn add(&mut self, id: Uuid) -> Result<(), StorageError> {
        if self.ids.insert(id) {
            self.save()?;
        }
        Ok(())
    }

    /// Removes `id`; a no-op if it is absent.
    ///
    /// # Errors
    /// Returns error if the change cannot be persisted.
    pub fn remove(&mut self, id: &Uuid) -> Result<(), StorageError> {
        if self.ids.remove(id) {
            self.save()?;
        }
        Ok(())
    }

    /// Drops every favorite and deletes the backing file.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be removed.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.ids.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self) -> Result<(), StorageError> {
        let file = FavoritesFile {
            ids: self.ids.iter().copied().collect(),
        };
        let content = toml::to_string_pretty(&file)?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
