//! Snapshot persistence.
//!
//! The engine only serializes games; where the snapshots live is decided
//! here. Callers receive a [`SnapshotStore`] instead of reaching for a
//! global, so the arena can run against files or purely in memory.

use baduk_engine::{Game, SnapshotError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from saving or loading snapshots.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("No snapshot named '{0}'")]
    NotFound(String),
    /// Ids become file names, so they are limited to a safe alphabet.
    #[error("Invalid snapshot id '{0}'")]
    InvalidId(String),
}

/// Somewhere games can be saved and restored by id.
pub trait SnapshotStore {
    fn save(&mut self, id: &str, game: &Game) -> Result<(), StoreError>;

    fn load(&self, id: &str) -> Result<Game, StoreError>;

    fn contains(&self, id: &str) -> bool;

    /// Returns every stored id in ascending order.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

fn check_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

/// Stores each snapshot as `<id>.json` in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl SnapshotStore for FileStore {
    fn save(&mut self, id: &str, game: &Game) -> Result<(), StoreError> {
        check_id(id)?;
        let path = self.path(id);
        std::fs::write(&path, game.to_snapshot()?)?;
        tracing::debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Game, StoreError> {
        check_id(id)?;
        let path = self.path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Game::from_snapshot(&content)?)
    }

    fn contains(&self, id: &str) -> bool {
        check_id(id).is_ok() && self.path(id).exists()
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Keeps snapshots in memory, serialized exactly as a file store would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshots: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, id: &str, game: &Game) -> Result<(), StoreError> {
        check_id(id)?;
        self.snapshots.insert(id.to_string(), game.to_snapshot()?);
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Game, StoreError> {
        let snapshot = self
            .snapshots
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(Game::from_snapshot(snapshot)?)
    }

    fn contains(&self, id: &str) -> bool {
        self.snapshots.contains_key(id)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.snapshots.keys().cloned().collect())
    }
}
