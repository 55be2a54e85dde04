use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};

use memodash_lib::quiz::Transition;
use memodash_lib::{Deck, QuizSession};

use crate::app::App;
use crate::render::terminal::{self as renderer, paint, Color};

/// Shuffle a deck into a new session. Empty decks cannot be quizzed.
pub fn start_session(app: &App, deck: &Deck) -> Result<QuizSession> {
    if deck.is_empty() {
        bail!("Deck \"{}\" is empty. Add cards before starting a quiz.", deck.title);
    }
    log::info!("Starting quiz over \"{}\" ({} cards)", deck.title, deck.cards.len());
    Ok(QuizSession::start(&deck.cards).with_swipe_threshold(app.config.quiz.swipe_threshold))
}

fn print_card(session: &QuizSession, use_color: bool) {
    let Some(card) = session.current_card() else {
        return;
    };
    let (current, total) = session.progress();

    println!();
    println!("{}", paint(&renderer::render_progress(current, total, 20), Color::DIM, use_color));
    println!("{} {}", paint("Q:", Color::MAGENTA, use_color), card.question);
    if session.is_revealed() {
        println!("{} {}", paint("A:", Color::GREEN, use_color), card.answer);
    }
}

/// Line-based quiz: Enter reveals, then advances
pub fn run(app: &App, deck_name: &str, use_color: bool) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let mut session = start_session(app, &deck)?;

    println!("Quiz: {}", paint(&deck.title, Color::BOLD, use_color));
    println!("{}", paint("Enter: reveal/next  r: flip  n: next  q: quit", Color::DIM, use_color));
    print_card(&session, use_color);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let transition = match line?.trim() {
            "" if !session.is_revealed() => session.toggle_reveal(),
            "" | "n" => session.advance(),
            "r" => session.toggle_reveal(),
            "q" => break,
            other => {
                println!("Unknown command '{}'", other);
                continue;
            }
        };

        match transition {
            Transition::Finished => {
                println!("{}", paint("Quiz complete!", Color::GREEN, use_color));
                break;
            }
            Transition::Ignored => {}
            _ => print_card(&session, use_color),
        }
    }

    Ok(())
}
