use std::path::Path;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use memodash_lib::{Card, Config, Deck, Store};

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub store: Store,
}

impl App {
    /// Load config and open the store. An explicit `data_dir` wins over the
    /// config file.
    pub fn new(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::load_default().context("Failed to load config")?,
        };

        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => config
                .resolve_data_dir()
                .context("Failed to get data directory")?,
        };

        let store = Store::open(&data_dir)
            .with_context(|| format!("Failed to open deck store in {}", data_dir.display()))?;

        Ok(Self { config, store })
    }

    pub fn close(self) {
        self.store.close();
    }

    /// Find a deck by id, exact title, or unique title prefix (case-insensitive)
    pub fn find_deck(&self, name: &str) -> Result<Deck> {
        if name.trim().is_empty() {
            bail!("Deck name must not be blank");
        }

        let decks = self.store.list_decks().context("Failed to list decks")?;

        if let Ok(id) = Uuid::parse_str(name) {
            if let Some(deck) = decks.iter().find(|d| d.id == id) {
                return Ok(deck.clone());
            }
        }

        let name_lower = name.trim().to_lowercase();

        // Exact match first
        if let Some(deck) = decks.iter().find(|d| d.title.to_lowercase() == name_lower) {
            return Ok(deck.clone());
        }

        // Prefix match
        let matches: Vec<&Deck> = decks
            .iter()
            .filter(|d| d.title.to_lowercase().starts_with(&name_lower))
            .collect();

        match matches.as_slice() {
            [] => bail!(
                "No deck matching '{}'. Available decks:\n{}",
                name,
                decks
                    .iter()
                    .map(|d| format!("  - {}", d.title))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            [deck] => Ok((*deck).clone()),
            _ => bail!(
                "Ambiguous deck name '{}'. Matches:\n{}",
                name,
                matches
                    .iter()
                    .map(|d| format!("  - {}", d.title))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Find a card in a deck by id or 1-based position
    pub fn find_card<'a>(&self, deck: &'a Deck, reference: &str) -> Result<&'a Card> {
        if let Ok(id) = Uuid::parse_str(reference) {
            return deck
                .card(id)
                .with_context(|| format!("No card {} in deck '{}'", id, deck.title));
        }

        let index: usize = reference
            .parse()
            .with_context(|| format!("'{}' is neither a card id nor a position", reference))?;
        index
            .checked_sub(1)
            .and_then(|i| deck.cards.get(i))
            .with_context(|| {
                format!(
                    "Deck '{}' has {} cards, no card at position {}",
                    deck.title,
                    deck.cards.len(),
                    index
                )
            })
    }
}
