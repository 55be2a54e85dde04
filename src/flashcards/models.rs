//! Data models for decks and cards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single question/answer study unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}

impl Card {
    pub fn new(question: String, answer: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            question,
            answer,
        }
    }
}

/// A named, ordered collection of cards
///
/// Insertion order of `cards` is the display order. The deck owns its cards
/// exclusively: a card id never appears twice in one deck or in two decks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(title: String, cards: Vec<Card>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            cards,
            created_at: Utc::now(),
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, card_id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    /// Index of a card within the deck's display order
    pub fn card_position(&self, card_id: Uuid) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}

/// Question/answer text submitted by a new-card or edit-card form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
}

impl CardDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Lightweight deck listing, used by list views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub id: Uuid,
    pub title: String,
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Deck> for DeckSummary {
    fn from(deck: &Deck) -> Self {
        Self {
            id: deck.id,
            title: deck.title.clone(),
            card_count: deck.cards.len(),
            created_at: deck.created_at,
        }
    }
}
