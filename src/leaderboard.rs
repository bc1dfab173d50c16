//! Persistent top scores.
//!
//! The whole list lives under a single key of a [`BlobStore`] as a JSON
//! array, sorted by prize and capped at [`MAX_ENTRIES`]. Every record
//! rewrites the full list.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::models::ScoreEntry;

pub const LEADERBOARD_KEY: &str = "show-ingles-leaderboard";
pub const MAX_ENTRIES: usize = 10;
pub const DISPLAYED_ENTRIES: usize = 5;
pub const DEFAULT_NAME: &str = "Anônimo";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value storage for opaque text blobs.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Keeps each key in its own `<key>.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(mut self, key: &str, value: &str) -> Self {
        self.blobs.insert(key.to_string(), value.to_string());
        self
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    store: Box<dyn BlobStore>,
}

impl Leaderboard {
    /// Reads the saved list. Missing or unreadable data yields an empty board.
    pub fn load(store: Box<dyn BlobStore>) -> Self {
        let entries = match store.get(LEADERBOARD_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<ScoreEntry>>(&blob) {
                Ok(entries) => entries,
                Err(err) => {
                    log::warn!("ignoring unreadable leaderboard: {}", err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("cannot read leaderboard: {}", err);
                Vec::new()
            }
        };

        let mut leaderboard = Self { entries, store };
        leaderboard.normalize();
        log::info!("leaderboard loaded with {} entries", leaderboard.entries.len());
        leaderboard
    }

    /// All retained entries, best first.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// The entries shown on screen.
    pub fn top(&self) -> &[ScoreEntry] {
        &self.entries[..self.entries.len().min(DISPLAYED_ENTRIES)]
    }

    pub fn best_score(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    /// Adds a result dated today. See [`Leaderboard::record_on`].
    pub fn record(&mut self, name: &str, prize: u32) -> Result<(), StoreError> {
        self.record_on(name, prize, Local::now().date_naive())
    }

    /// Adds a result and persists the list. Zero prizes are ignored.
    ///
    /// The in-memory list is updated even if writing it out fails.
    pub fn record_on(&mut self, name: &str, prize: u32, date: NaiveDate) -> Result<(), StoreError> {
        if prize == 0 {
            return Ok(());
        }

        let name = match name.trim() {
            "" => DEFAULT_NAME,
            trimmed => trimmed,
        };

        self.entries.push(ScoreEntry {
            name: name.to_string(),
            score: prize,
            date: date.format("%d/%m/%Y").to_string(),
        });
        self.normalize();

        let blob = serde_json::to_string(&self.entries)?;
        self.store.set(LEADERBOARD_KEY, &blob)?;
        log::info!("recorded {} for {}", prize, name);
        Ok(())
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}
