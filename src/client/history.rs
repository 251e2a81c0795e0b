use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::client::card::WordCard;

pub const HISTORY_FILE: &str = "wordHistory.json";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("history serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Explicit handle to the persisted history. Read once at startup, written
/// in full after each append.
pub trait HistoryStore {
    /// A missing or unreadable history is not an error the user sees:
    /// deserialization failures are logged and an empty list is returned.
    fn load(&self) -> Vec<WordCard>;

    fn save(&mut self, history: &[WordCard]) -> Result<(), HistoryError>;
}

/// One JSON file holding the serialized WordCard array, the stand-in for
/// the browser's `wordHistory` local-storage key.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Places the history under the platform data directory.
    pub fn in_data_dir() -> Option<Self> {
        let dir = dirs::data_dir()?.join("eitango");
        Some(Self::new(dir.join(HISTORY_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Vec<WordCard> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "discarding malformed word history");
                Vec::new()
            }
        }
    }

    fn save(&mut self, history: &[WordCard]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(history)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    entries: Vec<WordCard>,
}

impl MemoryHistoryStore {
    pub fn new(entries: Vec<WordCard>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WordCard] {
        &self.entries
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Vec<WordCard> {
        self.entries.clone()
    }

    fn save(&mut self, history: &[WordCard]) -> Result<(), HistoryError> {
        self.entries = history.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileHistoryStore::new(dir.path().join(HISTORY_FILE));

        store
            .save(&[WordCard::new("cat", "猫。哺乳類の動物です。")])
            .unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].word, "cat");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistoryStore::new(dir.path().join(HISTORY_FILE));
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_json_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE);
        fs::write(&path, "{not json").unwrap();

        let store = FileHistoryStore::new(path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileHistoryStore::new(dir.path().join("nested/deep").join(HISTORY_FILE));

        store.save(&[WordCard::new("dog", "犬。")]).unwrap();
        assert_eq!(store.load().len(), 1);
    }
}
