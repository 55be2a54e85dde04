//! Randomized self-quiz over a deck's cards
//!
//! This module provides:
//! - Drag classification into horizontal (flip) and vertical (dismiss) swipes
//! - The quiz session state machine over a shuffled card snapshot
//! - A driver that defers card transitions behind a cancelable timer

pub mod driver;
pub mod gesture;
pub mod session;

pub use driver::{
    run_driver, DeferredTimer, DeferredTransition, Handled, QuizDriver, QuizEvent,
    DEFAULT_TRANSITION_DELAY,
};
pub use gesture::{classify, Direction, Gesture, Offset, DEFAULT_SWIPE_THRESHOLD};
pub use session::{Phase, QuizSession, QuizSnapshot, Transition};
