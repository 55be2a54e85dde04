//! Quiz session state machine
//!
//! A session runs over a shuffled copy of a deck's cards. It starts Active at
//! position 0 (or Finished when there are no cards) and only ever moves
//! forward:
//!
//! ```text
//!            toggle_reveal            advance (not last)
//!          ┌──────────────┐        ┌───────────────────┐
//!          ▼              │        ▼                   │
//!   ──▶ Active(position, revealed) ─┴──── advance (last) ──▶ Finished
//! ```
//!
//! Invalid events never fail: anything sent to a Finished session is ignored.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::gesture::{classify, Gesture, Offset, DEFAULT_SWIPE_THRESHOLD};
use crate::flashcards::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Active,
    Finished,
}

/// Outcome of feeding one event into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Reveal state flipped to the contained value
    Revealed(bool),
    /// Moved to the contained position
    Advanced(usize),
    /// Moved past the last card
    Finished,
    /// Nothing changed
    Ignored,
}

/// Read-only view of a session for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    pub phase: Phase,
    pub position: usize,
    pub total: usize,
    pub revealed: bool,
    pub offset: Offset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Card>,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    order: Vec<Card>,
    position: usize,
    revealed: bool,
    offset: Offset,
    phase: Phase,
    swipe_threshold: f32,
}

impl QuizSession {
    /// Start a session over a uniformly shuffled copy of `cards`
    pub fn start(cards: &[Card]) -> Self {
        Self::start_with_rng(cards, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Self {
        let mut order = cards.to_vec();
        order.shuffle(rng);

        let phase = if order.is_empty() {
            Phase::Finished
        } else {
            Phase::Active
        };
        log::debug!("Started quiz session over {} cards", order.len());

        Self {
            order,
            position: 0,
            revealed: false,
            offset: Offset::ZERO,
            phase,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }

    pub fn with_swipe_threshold(mut self, threshold: f32) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    // ==================== Reads ====================

    pub fn order(&self) -> &[Card] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn swipe_threshold(&self) -> f32 {
        self.swipe_threshold
    }

    /// The card at the current position, while Active
    pub fn current_card(&self) -> Option<&Card> {
        match self.phase {
            Phase::Active => self.order.get(self.position),
            Phase::Finished => None,
        }
    }

    /// One-based progress as `(current, total)`
    pub fn progress(&self) -> (usize, usize) {
        ((self.position + 1).min(self.order.len()), self.order.len())
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            phase: self.phase,
            position: self.position,
            total: self.order.len(),
            revealed: self.revealed,
            offset: self.offset,
            current: self.current_card().cloned(),
        }
    }

    // ==================== Events ====================

    pub fn toggle_reveal(&mut self) -> Transition {
        if self.is_finished() {
            return Transition::Ignored;
        }
        self.revealed = !self.revealed;
        Transition::Revealed(self.revealed)
    }

    /// Move to the next card, or finish after the last one
    pub fn advance(&mut self) -> Transition {
        if self.is_finished() {
            return Transition::Ignored;
        }

        self.revealed = false;
        self.offset = Offset::ZERO;

        if self.position + 1 < self.order.len() {
            self.position += 1;
            log::debug!("Quiz advanced to {}/{}", self.position + 1, self.order.len());
            Transition::Advanced(self.position)
        } else {
            self.phase = Phase::Finished;
            log::debug!("Quiz finished after {} cards", self.order.len());
            Transition::Finished
        }
    }

    /// Both dismiss directions move forward
    pub fn dismiss_up(&mut self) -> Transition {
        self.advance()
    }

    pub fn dismiss_down(&mut self) -> Transition {
        self.advance()
    }

    pub fn horizontal_swipe(&mut self, distance: Offset) -> Transition {
        if classify(distance, self.swipe_threshold) != Gesture::Horizontal {
            return Transition::Ignored;
        }
        let transition = self.toggle_reveal();
        if transition != Transition::Ignored {
            self.offset = Offset::ZERO;
        }
        transition
    }

    pub fn vertical_swipe(&mut self, distance: Offset) -> Transition {
        match classify(distance, self.swipe_threshold) {
            Gesture::Vertical(_) => self.advance(),
            _ => Transition::Ignored,
        }
    }

    /// Track an in-progress drag; presentation only
    pub fn drag_update(&mut self, distance: Offset) {
        if !self.is_finished() {
            self.offset = distance;
        }
    }

    /// End a drag, classifying its final distance
    pub fn drag_settle(&mut self, distance: Offset) -> Transition {
        if self.is_finished() {
            return Transition::Ignored;
        }
        match classify(distance, self.swipe_threshold) {
            Gesture::Horizontal => self.horizontal_swipe(distance),
            Gesture::Vertical(_) => self.vertical_swipe(distance),
            Gesture::None => {
                self.offset = Offset::ZERO;
                Transition::Ignored
            }
        }
    }

    /// Snap the transient offset back to rest
    pub(crate) fn reset_offset(&mut self) {
        self.offset = Offset::ZERO;
    }

    pub(crate) fn set_offset(&mut self, offset: Offset) {
        if !self.is_finished() {
            self.offset = offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card::new(format!("Q{}", i), format!("A{}", i)))
            .collect()
    }

    fn capitals() -> Vec<Card> {
        vec![
            Card::new("Paris?".to_string(), "France".to_string()),
            Card::new("Berlin?".to_string(), "Germany".to_string()),
        ]
    }

    fn seeded(cards: &[Card]) -> QuizSession {
        QuizSession::start_with_rng(cards, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_order_is_permutation() {
        let input = cards(12);
        let session = QuizSession::start(&input);

        let mut expected: Vec<Uuid> = input.iter().map(|c| c.id).collect();
        let mut actual: Vec<Uuid> = session.order().iter().map(|c| c.id).collect();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
        assert_eq!(session.position(), 0);
        assert!(!session.is_revealed());
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn test_shuffle_is_uniform() {
        let input = cards(3);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<Vec<Uuid>, usize> = HashMap::new();

        for _ in 0..6000 {
            let session = QuizSession::start_with_rng(&input, &mut rng);
            let key = session.order().iter().map(|c| c.id).collect();
            *counts.entry(key).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            assert!((850..1150).contains(count), "skewed permutation count {}", count);
        }
    }

    #[test]
    fn test_capitals_walkthrough() {
        let input = capitals();
        let mut session = QuizSession::start(&input);
        let first = session.current_card().cloned().unwrap();
        assert!(input.contains(&first));

        session.toggle_reveal();
        assert_eq!(session.advance(), Transition::Advanced(1));
        assert_eq!(session.position(), 1);
        assert!(!session.is_revealed());
        assert_ne!(session.current_card().unwrap().id, first.id);

        assert_eq!(session.advance(), Transition::Finished);
        assert!(session.is_finished());
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_advance_to_finished_then_noop() {
        let n = 5;
        let mut session = seeded(&cards(n));

        for step in 1..n {
            assert_eq!(session.advance(), Transition::Advanced(step));
        }
        assert_eq!(session.position(), n - 1);
        assert_eq!(session.progress(), (n, n));
        assert!(!session.is_finished());

        assert_eq!(session.advance(), Transition::Finished);
        assert_eq!(session.advance(), Transition::Ignored);
        assert!(session.is_finished());
        assert_eq!(session.position(), n - 1);
    }

    #[test]
    fn test_order_never_changes() {
        let mut session = seeded(&cards(6));
        let before: Vec<Uuid> = session.order().iter().map(|c| c.id).collect();

        session.toggle_reveal();
        session.advance();
        session.drag_settle(Offset::new(200.0, 0.0));
        session.dismiss_down();

        let after: Vec<Uuid> = session.order().iter().map(|c| c.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_empty_session_is_finished() {
        let mut session = QuizSession::start(&[]);
        assert!(session.is_finished());
        assert!(session.current_card().is_none());
        assert_eq!(session.progress(), (0, 0));
        assert_eq!(session.toggle_reveal(), Transition::Ignored);
        assert_eq!(session.advance(), Transition::Ignored);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut session = seeded(&cards(3));
        assert_eq!(session.toggle_reveal(), Transition::Revealed(true));
        assert_eq!(session.toggle_reveal(), Transition::Revealed(false));
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_advance_always_hides_answer() {
        for reveal_first in [false, true] {
            let mut session = seeded(&cards(3));
            if reveal_first {
                session.toggle_reveal();
            }
            session.advance();
            assert!(!session.is_revealed());
        }
    }

    #[test]
    fn test_dismiss_both_directions_advance() {
        let mut session = seeded(&cards(3));
        assert_eq!(session.dismiss_up(), Transition::Advanced(1));
        assert_eq!(session.dismiss_down(), Transition::Advanced(2));
        assert_eq!(session.dismiss_up(), Transition::Finished);
    }

    #[test]
    fn test_swipes_respect_axis_and_threshold() {
        let mut session = seeded(&cards(3));

        assert_eq!(session.horizontal_swipe(Offset::new(50.0, 0.0)), Transition::Ignored);
        assert_eq!(session.horizontal_swipe(Offset::new(100.0, 120.0)), Transition::Ignored);
        assert_eq!(session.vertical_swipe(Offset::new(120.0, 100.0)), Transition::Ignored);

        assert_eq!(session.horizontal_swipe(Offset::new(-100.0, 20.0)), Transition::Revealed(true));
        assert_eq!(session.vertical_swipe(Offset::new(0.0, -300.0)), Transition::Advanced(1));
    }

    #[test]
    fn test_drag_tracks_and_settles() {
        let mut session = seeded(&cards(3));

        session.drag_update(Offset::new(30.0, 5.0));
        assert_eq!(session.offset(), Offset::new(30.0, 5.0));

        // Short drag snaps back
        assert_eq!(session.drag_settle(Offset::new(30.0, 5.0)), Transition::Ignored);
        assert!(session.offset().is_zero());

        session.drag_update(Offset::new(150.0, 10.0));
        assert_eq!(session.drag_settle(Offset::new(150.0, 10.0)), Transition::Revealed(true));
        assert!(session.offset().is_zero());

        session.drag_update(Offset::new(0.0, 220.0));
        assert_eq!(session.drag_settle(Offset::new(0.0, 220.0)), Transition::Advanced(1));
        assert!(session.offset().is_zero());
        assert!(!session.is_revealed());
    }

    #[test]
    fn test_custom_threshold() {
        let mut session = seeded(&cards(2)).with_swipe_threshold(10.0);
        assert_eq!(session.horizontal_swipe(Offset::new(20.0, 0.0)), Transition::Revealed(true));
    }

    #[test]
    fn test_snapshot() {
        let mut session = seeded(&capitals());
        session.toggle_reveal();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Active);
        assert_eq!(snapshot.total, 2);
        assert!(snapshot.revealed);
        assert_eq!(snapshot.current.as_ref(), session.current_card());

        session.advance();
        session.advance();
        assert!(session.snapshot().current.is_none());
    }
}
