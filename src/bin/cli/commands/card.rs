use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_add(
    app: &App,
    deck_name: &str,
    question: &str,
    answer: &str,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let card = app
        .store
        .add_card(deck.id, question, answer)
        .context("Failed to add card")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            println!(
                "Added card {} to \"{}\"",
                deck.cards.len() + 1,
                deck.title
            );
            println!("  ID: {}", card.id);
        }
    }

    Ok(())
}

pub fn run_edit(
    app: &App,
    deck_name: &str,
    card_ref: &str,
    question: &str,
    answer: &str,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let card = app.find_card(&deck, card_ref)?;
    let edited = app
        .store
        .edit_card(deck.id, card.id, question, answer)
        .context("Failed to edit card")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&edited)?),
        OutputFormat::Plain => println!("Updated card in \"{}\"", deck.title),
    }

    Ok(())
}

pub fn run_delete(app: &App, deck_name: &str, card_ref: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let card = app.find_card(&deck, card_ref)?;
    app.store
        .delete_card(deck.id, card.id)
        .context("Failed to delete card")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deckId": deck.id.to_string(),
                "deletedCard": card,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted \"{}\" from \"{}\"", card.question, deck.title);
        }
    }

    Ok(())
}
