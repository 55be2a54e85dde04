mod key_handler;
mod quiz_state;
mod ui;

use std::io;

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use memodash_lib::QuizDriver;

use crate::app::App;
use crate::commands::quiz::start_session;
use quiz_state::QuizTuiState;

pub fn run(app: &App, deck_name: &str) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let session = start_session(app, &deck)?;
    let driver = QuizDriver::from_config(session, &app.config.quiz);
    let mut state = QuizTuiState::new(deck.title, driver);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Event loop
    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let (seen, total) = state.driver.session().progress();
    log::info!("Quiz ended at card {}/{}", seen, total);
    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut QuizTuiState) -> Result<()> {
    loop {
        state.tick();
        terminal.draw(|f| ui::draw(f, state))?;

        if state.quit {
            return Ok(());
        }

        // Wake up in time for a pending card transition
        if event::poll(state.poll_timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    key_handler::handle_key(state, key);
                }
                Event::Mouse(mouse) => {
                    key_handler::handle_mouse(state, mouse);
                }
                _ => {}
            }
        }
    }
}
