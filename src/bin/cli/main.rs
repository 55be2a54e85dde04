mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "memodash-cli", about = "Flashcard decks and self-quizzes", version)]
struct Cli {
    /// Directory holding decks.json (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/memodash/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Deck management
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Card management
    #[command(subcommand)]
    Card(CardCommand),

    /// Run a shuffled quiz over a deck
    Quiz {
        /// Deck title (case-insensitive prefix match) or id
        deck: String,
        /// Line-based quiz instead of the interactive TUI
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand)]
enum DeckCommand {
    /// List decks with card counts
    List,

    /// Show a deck and its cards
    Show {
        /// Deck title or id
        deck: String,
    },

    /// Create a new deck
    New {
        /// Deck title
        title: String,
        /// Initial card as "question::answer" (repeatable)
        #[arg(long = "card")]
        cards: Vec<String>,
    },

    /// Rename a deck (a blank title is ignored)
    Rename {
        /// Deck title or id
        deck: String,
        /// New title
        title: String,
    },

    /// Delete a deck and all its cards
    Delete {
        /// Deck title or id
        deck: String,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Append a card to a deck
    Add {
        /// Deck title or id
        deck: String,
        question: String,
        answer: String,
    },

    /// Replace a card's question and answer
    Edit {
        /// Deck title or id
        deck: String,
        /// Card id or 1-based position
        card: String,
        question: String,
        answer: String,
    },

    /// Remove a card from a deck
    Delete {
        /// Deck title or id
        deck: String,
        /// Card id or 1-based position
        card: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref(), cli.data_dir.as_deref())?;

    match cli.command {
        Command::Deck(subcmd) => match subcmd {
            DeckCommand::List => commands::deck::run_list(&app, &cli.format, use_color)?,
            DeckCommand::Show { deck } => {
                commands::deck::run_show(&app, &deck, &cli.format, use_color)?
            }
            DeckCommand::New { title, cards } => {
                commands::deck::run_new(&app, &title, &cards, &cli.format)?
            }
            DeckCommand::Rename { deck, title } => {
                commands::deck::run_rename(&app, &deck, &title, &cli.format)?
            }
            DeckCommand::Delete { deck } => commands::deck::run_delete(&app, &deck, &cli.format)?,
        },
        Command::Card(subcmd) => match subcmd {
            CardCommand::Add { deck, question, answer } => {
                commands::card::run_add(&app, &deck, &question, &answer, &cli.format)?
            }
            CardCommand::Edit { deck, card, question, answer } => {
                commands::card::run_edit(&app, &deck, &card, &question, &answer, &cli.format)?
            }
            CardCommand::Delete { deck, card } => {
                commands::card::run_delete(&app, &deck, &card, &cli.format)?
            }
        },
        Command::Quiz { deck, plain } => {
            let interactive = !plain && std::io::stdin().is_terminal();
            #[cfg(feature = "tui")]
            {
                if interactive {
                    tui::run(&app, &deck)?;
                    app.close();
                    return Ok(());
                }
            }
            #[cfg(not(feature = "tui"))]
            {
                if interactive {
                    log::info!("Built without the 'tui' feature, using the line quiz");
                }
            }
            commands::quiz::run(&app, &deck, use_color)?;
        }
    }

    app.close();
    Ok(())
}
