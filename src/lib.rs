//! MemoDash core: decks of flashcards and shuffled self-quiz sessions

pub mod config;
pub mod flashcards;
pub mod quiz;

pub use config::{Config, ConfigError, QuizConfig};
pub use flashcards::{Card, CardDraft, Deck, DeckSummary, Store, StoreError};
pub use quiz::{QuizDriver, QuizEvent, QuizSession};
