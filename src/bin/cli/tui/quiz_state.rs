use std::time::{Duration, Instant};

use memodash_lib::quiz::{Handled, Offset, QuizDriver, QuizEvent};

/// Terminal cells are roughly twice as tall as wide; these scale a drag in
/// cells to gesture units so the swipe threshold feels the same on both axes.
const CELL_WIDTH: f32 = 8.0;
const CELL_HEIGHT: f32 = 16.0;

/// Upper bound on how long the event loop blocks for input
const MAX_POLL: Duration = Duration::from_millis(100);

pub struct QuizTuiState {
    pub deck_title: String,
    pub driver: QuizDriver,
    /// Cell where the current mouse drag started
    pub drag_origin: Option<(u16, u16)>,
    pub show_help: bool,
    pub quit: bool,
}

impl QuizTuiState {
    pub fn new(deck_title: String, driver: QuizDriver) -> Self {
        Self {
            deck_title,
            driver,
            drag_origin: None,
            show_help: false,
            quit: false,
        }
    }

    pub fn send(&mut self, event: QuizEvent) -> Handled {
        self.driver.handle(event, Instant::now())
    }

    /// Fire a due card transition, if any
    pub fn tick(&mut self) {
        self.driver.tick(Instant::now());
    }

    /// How long the loop may wait for input before the next transition is due
    pub fn poll_timeout(&self) -> Duration {
        match self.driver.next_deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(MAX_POLL),
            None => MAX_POLL,
        }
    }

    /// A key-press swipe: just past the threshold along one axis
    pub fn key_swipe(&self, x: f32, y: f32) -> Offset {
        let distance = self.driver.session().swipe_threshold() + 1.0;
        Offset::new(x * distance, y * distance)
    }

    pub fn drag_offset(&self, column: u16, row: u16) -> Option<Offset> {
        let (col0, row0) = self.drag_origin?;
        Some(Offset::new(
            (f32::from(column) - f32::from(col0)) * CELL_WIDTH,
            (f32::from(row) - f32::from(row0)) * CELL_HEIGHT,
        ))
    }

    /// Current drag offset in whole cells, for drawing the card displaced
    pub fn offset_cells(&self) -> (i32, i32) {
        let offset = self.driver.session().offset();
        ((offset.x / CELL_WIDTH) as i32, (offset.y / CELL_HEIGHT) as i32)
    }
}
