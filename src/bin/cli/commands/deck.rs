use anyhow::{bail, Context, Result};

use memodash_lib::CardDraft;

use crate::app::App;
use crate::render::terminal as renderer;
use crate::OutputFormat;

/// Parse a `question::answer` pair given on the command line
pub fn parse_card_arg(arg: &str) -> Result<CardDraft> {
    match arg.split_once("::") {
        Some((question, answer)) => Ok(CardDraft::new(question, answer)),
        None => bail!("Card '{}' must be written as \"question::answer\"", arg),
    }
}

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let decks = app
        .store
        .list_deck_summaries()
        .context("Failed to list decks")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&decks)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("(no decks)");
            }
            for deck in &decks {
                println!("{}", renderer::render_deck_row(deck, use_color));
            }
        }
    }

    Ok(())
}

pub fn run_show(app: &App, name: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app.find_deck(name)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => println!("{}", renderer::render_deck(&deck, use_color)),
    }

    Ok(())
}

pub fn run_new(app: &App, title: &str, cards: &[String], format: &OutputFormat) -> Result<()> {
    let drafts = cards
        .iter()
        .map(|c| parse_card_arg(c.as_str()))
        .collect::<Result<Vec<_>>>()?;

    let deck = app
        .store
        .create_deck(title, drafts)
        .context("Failed to create deck")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => {
            println!("Created deck \"{}\" with {} cards", deck.title, deck.cards.len());
            println!("  ID: {}", deck.id);
        }
    }

    Ok(())
}

pub fn run_rename(app: &App, name: &str, title: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(name)?;
    app.store
        .rename_deck(deck.id, title)
        .context("Failed to rename deck")?;
    let renamed = app.store.get_deck(deck.id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&renamed)?),
        OutputFormat::Plain => {
            if renamed.title == deck.title {
                println!("Deck \"{}\" unchanged", deck.title);
            } else {
                println!("Renamed \"{}\" to \"{}\"", deck.title, renamed.title);
            }
        }
    }

    Ok(())
}

pub fn run_delete(app: &App, name: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(name)?;
    app.store
        .delete_deck(deck.id)
        .context("Failed to delete deck")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": deck.id.to_string(),
                "title": deck.title,
                "deletedCards": deck.cards.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted deck \"{}\" and {} cards", deck.title, deck.cards.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card_arg() {
        let draft = parse_card_arg("Paris?::France").unwrap();
        assert_eq!(draft.question, "Paris?");
        assert_eq!(draft.answer, "France");

        // Only the first separator splits
        let draft = parse_card_arg("a::b::c").unwrap();
        assert_eq!(draft.answer, "b::c");

        assert!(parse_card_arg("no separator").is_err());
    }
}
