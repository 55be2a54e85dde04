//! The deck store: single source of truth for decks and their cards
//!
//! Every mutating call runs against a copy of the committed deck set, commits
//! the copy through the backend, and only then swaps it in and notifies
//! subscribers. A failed validation or commit leaves both the in-memory state
//! and the change feed untouched.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use super::backend::{JsonFileBackend, PersistenceError, StoreBackend};
use super::models::*;
use super::validation::{self, ValidationError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeckNotFound(_) | Self::CardNotFound(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

struct StoreInner {
    backend: Box<dyn StoreBackend>,
    decks: Vec<Deck>,
}

/// Durable CRUD over decks and cards
///
/// Mutations are serialized by a per-store lock, so add/delete sequences on
/// the same deck cannot interleave.
pub struct Store {
    inner: Mutex<StoreInner>,
    changes: watch::Sender<Vec<Deck>>,
}

fn find_deck(decks: &[Deck], deck_id: Uuid) -> Result<&Deck> {
    decks
        .iter()
        .find(|d| d.id == deck_id)
        .ok_or(StoreError::DeckNotFound(deck_id))
}

fn find_deck_mut(decks: &mut [Deck], deck_id: Uuid) -> Result<&mut Deck> {
    decks
        .iter_mut()
        .find(|d| d.id == deck_id)
        .ok_or(StoreError::DeckNotFound(deck_id))
}

impl Store {
    /// Open the JSON-backed store in `data_dir`, creating it if missing
    pub fn open(data_dir: &Path) -> Result<Self> {
        let backend = JsonFileBackend::open(data_dir)?;
        Self::with_backend(Box::new(backend))
    }

    /// Build a store over any backend, loading its committed state
    pub fn with_backend(backend: Box<dyn StoreBackend>) -> Result<Self> {
        let decks = backend.load()?;
        log::info!(
            "Opened deck store at {} ({} decks)",
            backend.location(),
            decks.len()
        );

        let (changes, _) = watch::channel(decks.clone());
        Ok(Self {
            inner: Mutex::new(StoreInner { backend, decks }),
            changes,
        })
    }

    /// Tear down the store. Every successful mutation is already durable, so
    /// this only releases the backend and ends the change feed.
    pub fn close(self) {
        if let Ok(inner) = self.inner.into_inner() {
            log::info!("Closed deck store at {}", inner.backend.location());
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Persistence(PersistenceError::LockPoisoned))
    }

    /// Apply `op` to a copy of the deck set and commit it
    fn mutate<T>(&self, op: &str, f: impl FnOnce(&mut Vec<Deck>) -> Result<T>) -> Result<T> {
        let mut inner = self.lock()?;

        let mut next = inner.decks.clone();
        let out = match f(&mut next) {
            Ok(out) => out,
            Err(err) => {
                log::warn!("{} rejected: {}", op, err);
                return Err(err);
            }
        };

        if let Err(err) = inner.backend.commit(&next) {
            log::warn!("{} failed to commit: {}", op, err);
            return Err(err.into());
        }

        inner.decks = next;
        self.changes.send_replace(inner.decks.clone());
        log::debug!("{} committed", op);

        Ok(out)
    }

    // ==================== Deck Operations ====================

    /// List all decks in creation order
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        Ok(self.lock()?.decks.clone())
    }

    pub fn list_deck_summaries(&self) -> Result<Vec<DeckSummary>> {
        Ok(self.lock()?.decks.iter().map(DeckSummary::from).collect())
    }

    /// Get a specific deck
    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        let inner = self.lock()?;
        find_deck(&inner.decks, deck_id).cloned()
    }

    /// Subscribe to the committed deck list; updated after every successful
    /// mutation
    pub fn subscribe(&self) -> watch::Receiver<Vec<Deck>> {
        self.changes.subscribe()
    }

    /// Create a new deck with optional initial cards
    pub fn create_deck(&self, title: &str, initial_cards: Vec<CardDraft>) -> Result<Deck> {
        let title = validation::deck_title(title)?;
        let cards = initial_cards
            .iter()
            .map(|draft| validation::card_draft(draft).map(|(q, a)| Card::new(q, a)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let deck = Deck::new(title, cards);
        let created = deck.clone();
        self.mutate("create deck", move |decks| {
            decks.push(deck);
            Ok(())
        })?;

        log::info!("Created deck '{}' ({})", created.title, created.id);
        Ok(created)
    }

    /// Rename a deck. A blank title is silently skipped.
    pub fn rename_deck(&self, deck_id: Uuid, new_title: &str) -> Result<()> {
        let title = match validation::deck_title(new_title) {
            Ok(title) => title,
            Err(_) => {
                // Unknown decks still report NotFound
                let inner = self.lock()?;
                find_deck(&inner.decks, deck_id)?;
                log::debug!("Skipped blank rename of deck {}", deck_id);
                return Ok(());
            }
        };

        self.mutate("rename deck", |decks| {
            let deck = find_deck_mut(decks, deck_id)?;
            deck.title = title;
            Ok(())
        })
    }

    /// Delete a deck and all its cards
    pub fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        let removed = self.mutate("delete deck", |decks| {
            let pos = decks
                .iter()
                .position(|d| d.id == deck_id)
                .ok_or(StoreError::DeckNotFound(deck_id))?;
            Ok(decks.remove(pos))
        })?;

        log::info!(
            "Deleted deck '{}' ({}) with {} cards",
            removed.title,
            removed.id,
            removed.cards.len()
        );
        Ok(())
    }

    // ==================== Card Operations ====================

    /// List the cards of a deck in display order
    pub fn list_cards(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        Ok(self.get_deck(deck_id)?.cards)
    }

    /// Append a new card to a deck
    pub fn add_card(&self, deck_id: Uuid, question: &str, answer: &str) -> Result<Card> {
        let (question, answer) = validation::card_text(question, answer)?;
        let card = Card::new(question, answer);
        let added = card.clone();

        self.mutate("add card", move |decks| {
            find_deck_mut(decks, deck_id)?.cards.push(card);
            Ok(())
        })?;

        Ok(added)
    }

    /// Replace the question and answer of a card, keeping its id and position
    pub fn edit_card(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        question: &str,
        answer: &str,
    ) -> Result<Card> {
        let (question, answer) = validation::card_text(question, answer)?;

        self.mutate("edit card", |decks| {
            let card = find_deck_mut(decks, deck_id)?
                .cards
                .iter_mut()
                .find(|c| c.id == card_id)
                .ok_or(StoreError::CardNotFound(card_id))?;
            card.question = question;
            card.answer = answer;
            Ok(card.clone())
        })
    }

    /// Remove a card from its deck, preserving the order of the rest
    pub fn delete_card(&self, deck_id: Uuid, card_id: Uuid) -> Result<()> {
        self.mutate("delete card", |decks| {
            let deck = find_deck_mut(decks, deck_id)?;
            let pos = deck
                .card_position(card_id)
                .ok_or(StoreError::CardNotFound(card_id))?;
            deck.cards.remove(pos);
            Ok(())
        })
    }
}
