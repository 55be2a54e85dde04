//! Persistence backends for the deck store
//!
//! The JSON backend keeps the whole deck set in one document:
//! ```text
//! {data-dir}/
//! └── decks.json      # { "version": 1, "decks": [ { ..., "cards": [...] } ] }
//! ```
//! Commits write `decks.json.tmp`, fsync it, then rename it over `decks.json`,
//! so a reader only ever sees the previous or the next committed document.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::Deck;

const FORMAT_VERSION: u32 = 1;
const DECKS_FILE: &str = "decks.json";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt deck store: {0}")]
    Corrupt(String),

    #[error("Unsupported deck store version: {0}")]
    UnsupportedVersion(u32),

    #[error("Store lock poisoned by a panicked writer")]
    LockPoisoned,
}

/// A durable keeper of the full deck set
///
/// `commit` must either persist all of `decks` or fail leaving the previously
/// committed set readable.
pub trait StoreBackend: Send {
    fn load(&self) -> Result<Vec<Deck>, PersistenceError>;

    fn commit(&mut self, decks: &[Deck]) -> Result<(), PersistenceError>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecksFile {
    version: u32,
    #[serde(default)]
    decks: Vec<Deck>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DecksFileRef<'a> {
    version: u32,
    decks: &'a [Deck],
}

/// Reject documents that break deck/card identity rules
fn check_integrity(decks: &[Deck]) -> Result<(), PersistenceError> {
    let mut deck_ids = HashSet::new();
    let mut card_ids = HashSet::new();

    for deck in decks {
        if !deck_ids.insert(deck.id) {
            return Err(PersistenceError::Corrupt(format!("duplicate deck id {}", deck.id)));
        }
        if deck.title.trim().is_empty() {
            return Err(PersistenceError::Corrupt(format!("deck {} has a blank title", deck.id)));
        }
        for card in &deck.cards {
            if !card_ids.insert(card.id) {
                return Err(PersistenceError::Corrupt(format!("duplicate card id {}", card.id)));
            }
            if card.question.trim().is_empty() {
                return Err(PersistenceError::Corrupt(format!(
                    "card {} has a blank question",
                    card.id
                )));
            }
        }
    }

    Ok(())
}

/// Deck store persisted as a single JSON document
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Open (creating if needed) the store document inside `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self, PersistenceError> {
        fs::create_dir_all(data_dir)?;

        let mut backend = Self {
            path: data_dir.join(DECKS_FILE),
        };
        if !backend.path.exists() {
            backend.commit(&[])?;
            log::info!("Created empty deck store at {}", backend.path.display());
        }

        Ok(backend)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<Deck>, PersistenceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let file: DecksFile = serde_json::from_str(&content)?;
        if file.version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(file.version));
        }
        check_integrity(&file.decks)?;

        Ok(file.decks)
    }

    fn commit(&mut self, decks: &[Deck]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&DecksFileRef {
            version: FORMAT_VERSION,
            decks,
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        let result = (|| {
            let mut file = File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if let Err(err) = result {
            // Leave no stray temp file; the committed document is untouched
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        sync_parent_dir(&self.path)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Flush the directory entry so the rename itself survives a crash
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) => File::open(dir)?.sync_all(),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Non-durable backend for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryBackend {
    decks: Vec<Deck>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decks(decks: Vec<Deck>) -> Self {
        Self { decks }
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<Deck>, PersistenceError> {
        Ok(self.decks.clone())
    }

    fn commit(&mut self, decks: &[Deck]) -> Result<(), PersistenceError> {
        self.decks = decks.to_vec();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
