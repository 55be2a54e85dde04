//! Quiz driver: owns a session plus its deferred card transition
//!
//! Advancing is not applied the moment the user asks for it. The card is first
//! tossed off-screen, and only after a fixed delay does the next card snap in.
//! The driver models that delay with a [`DeferredTimer`] holding at most one
//! pending transition. Every incoming event cancels whatever is pending before
//! it is handled, so two quick dismisses advance the session once.

use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};

use super::gesture::{classify, Direction, Gesture, Offset};
use super::session::{QuizSession, QuizSnapshot, Transition};
use crate::config::QuizConfig;

/// Delay between a dismiss and the next card snapping in
pub const DEFAULT_TRANSITION_DELAY: Duration = Duration::from_millis(200);

/// A single cancelable deferred action
#[derive(Debug)]
pub struct DeferredTimer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> DeferredTimer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` to fire `delay` after `now`, cancelling any pending
    /// one. Returns the cancelled action, if there was one.
    pub fn schedule(&mut self, action: T, now: Instant) -> Option<T> {
        let cancelled = self.cancel();
        self.pending = Some((now + self.delay, action));
        cancelled
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, action)| action)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending action if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.deadline().map_or(false, |due| due <= now) {
            self.cancel()
        } else {
            None
        }
    }
}

/// Input events a presentation layer forwards to the driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuizEvent {
    ToggleReveal,
    Advance,
    DismissUp,
    DismissDown,
    HorizontalSwipe(Offset),
    VerticalSwipe(Offset),
    DragUpdate(Offset),
    DragSettle(Offset),
}

/// The transition waiting on the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTransition {
    /// Next-card button
    Advance,
    /// Card tossed off-screen in a direction
    Dismiss(Direction),
}

/// What the driver did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Applied to the session immediately
    Applied(Transition),
    /// Deferred until the contained deadline
    Scheduled(Instant),
}

pub struct QuizDriver {
    session: QuizSession,
    timer: DeferredTimer<DeferredTransition>,
}

impl QuizDriver {
    pub fn new(session: QuizSession, delay: Duration) -> Self {
        Self {
            session,
            timer: DeferredTimer::new(delay),
        }
    }

    /// Build a driver tuned by the quiz configuration
    pub fn from_config(session: QuizSession, config: &QuizConfig) -> Self {
        Self::new(
            session.with_swipe_threshold(config.swipe_threshold),
            config.transition_delay(),
        )
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn into_session(self) -> QuizSession {
        self.session
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        self.session.snapshot()
    }

    pub fn pending(&self) -> Option<DeferredTransition> {
        self.timer.pending.as_ref().map(|(_, t)| *t)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    fn defer(&mut self, transition: DeferredTransition, now: Instant) -> Handled {
        if self.timer.delay().is_zero() {
            return Handled::Applied(self.session.advance());
        }
        self.timer.schedule(transition, now);
        Handled::Scheduled(now + self.timer.delay())
    }

    /// Feed one event. Any pending transition is cancelled first.
    pub fn handle(&mut self, event: QuizEvent, now: Instant) -> Handled {
        if let Some(cancelled) = self.timer.cancel() {
            log::debug!("Cancelled pending {:?} on {:?}", cancelled, event);
            if let DeferredTransition::Dismiss(_) = cancelled {
                // The tossed card snaps back if its dismiss never fires
                self.session.reset_offset();
            }
        }
        if self.session.is_finished() {
            return Handled::Applied(Transition::Ignored);
        }

        let threshold = self.session.swipe_threshold();
        match event {
            QuizEvent::ToggleReveal => Handled::Applied(self.session.toggle_reveal()),
            QuizEvent::Advance => self.defer(DeferredTransition::Advance, now),
            QuizEvent::DismissUp => self.defer(DeferredTransition::Dismiss(Direction::Up), now),
            QuizEvent::DismissDown => {
                self.defer(DeferredTransition::Dismiss(Direction::Down), now)
            }
            QuizEvent::HorizontalSwipe(distance) => {
                Handled::Applied(self.session.horizontal_swipe(distance))
            }
            QuizEvent::VerticalSwipe(distance) => match classify(distance, threshold) {
                Gesture::Vertical(direction) => {
                    self.defer(DeferredTransition::Dismiss(direction), now)
                }
                _ => Handled::Applied(Transition::Ignored),
            },
            QuizEvent::DragUpdate(distance) => {
                self.session.drag_update(distance);
                Handled::Applied(Transition::Ignored)
            }
            QuizEvent::DragSettle(distance) => match classify(distance, threshold) {
                Gesture::Vertical(direction) => {
                    // The card keeps its tossed offset until the transition fires
                    self.session.set_offset(distance);
                    self.defer(DeferredTransition::Dismiss(direction), now)
                }
                _ => Handled::Applied(self.session.drag_settle(distance)),
            },
        }
    }

    /// Fire the pending transition if it is due
    pub fn tick(&mut self, now: Instant) -> Option<Transition> {
        let fired = self.timer.poll(now)?;
        let transition = self.session.advance();
        self.session.reset_offset();
        log::debug!("Deferred {:?} fired: {:?}", fired, transition);
        Some(transition)
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn tokio_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Drive a session from an event channel, publishing a snapshot after every
/// change. Ends when the session finishes or the event channel closes, and
/// hands the driver back.
pub async fn run_driver(
    mut driver: QuizDriver,
    mut events: mpsc::Receiver<QuizEvent>,
    snapshots: watch::Sender<QuizSnapshot>,
) -> QuizDriver {
    snapshots.send_replace(driver.snapshot());

    while !driver.session().is_finished() {
        let deadline = driver.next_deadline();

        tokio::select! {
            _ = wait_until(deadline) => {
                if driver.tick(tokio_now()).is_some() {
                    snapshots.send_replace(driver.snapshot());
                }
            }
            event = events.recv() => {
                match event {
                    Some(event) => {
                        driver.handle(event, tokio_now());
                        snapshots.send_replace(driver.snapshot());
                    }
                    None => {
                        log::debug!("Quiz event channel closed");
                        break;
                    }
                }
            }
        }
    }

    driver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::Card;
    use crate::quiz::session::Phase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DELAY: Duration = Duration::from_millis(200);

    fn session(n: usize) -> QuizSession {
        let cards: Vec<Card> = (0..n)
            .map(|i| Card::new(format!("Q{}", i), format!("A{}", i)))
            .collect();
        QuizSession::start_with_rng(&cards, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_timer_schedule_and_poll() {
        let start = Instant::now();
        let mut timer = DeferredTimer::new(DELAY);

        assert!(timer.schedule("a", start).is_none());
        assert_eq!(timer.deadline(), Some(start + DELAY));
        assert_eq!(timer.poll(start + Duration::from_millis(199)), None);
        assert_eq!(timer.poll(start + DELAY), Some("a"));
        assert!(!timer.is_pending());
        assert_eq!(timer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn test_timer_reschedule_cancels_previous() {
        let start = Instant::now();
        let mut timer = DeferredTimer::new(DELAY);

        timer.schedule(1, start);
        assert_eq!(timer.schedule(2, start + Duration::from_millis(100)), Some(1));
        assert_eq!(timer.poll(start + DELAY), None);
        assert_eq!(timer.poll(start + Duration::from_millis(300)), Some(2));
    }

    #[test]
    fn test_advance_is_deferred() {
        let start = Instant::now();
        let mut driver = QuizDriver::new(session(3), DELAY);

        assert_eq!(
            driver.handle(QuizEvent::Advance, start),
            Handled::Scheduled(start + DELAY)
        );
        assert_eq!(driver.session().position(), 0);
        assert_eq!(driver.pending(), Some(DeferredTransition::Advance));

        assert_eq!(driver.tick(start + Duration::from_millis(50)), None);
        assert_eq!(driver.tick(start + DELAY), Some(Transition::Advanced(1)));
        assert_eq!(driver.session().position(), 1);
        assert_eq!(driver.pending(), None);
    }

    #[test]
    fn test_new_event_cancels_pending_advance() {
        let start = Instant::now();
        let mut driver = QuizDriver::new(session(3), DELAY);

        driver.handle(QuizEvent::DismissUp, start);
        driver.handle(QuizEvent::DismissDown, start + Duration::from_millis(100));

        // The first dismiss never fires
        assert_eq!(driver.tick(start + DELAY), None);
        assert_eq!(driver.tick(start + Duration::from_millis(300)), Some(Transition::Advanced(1)));
        assert_eq!(driver.tick(start + Duration::from_secs(5)), None);
        assert_eq!(driver.session().position(), 1);
    }

    #[test]
    fn test_reveal_cancels_pending_advance() {
        let start = Instant::now();
        let mut driver = QuizDriver::new(session(3), DELAY);

        driver.handle(QuizEvent::Advance, start);
        assert_eq!(
            driver.handle(QuizEvent::ToggleReveal, start + Duration::from_millis(10)),
            Handled::Applied(Transition::Revealed(true))
        );
        assert_eq!(driver.tick(start + Duration::from_secs(1)), None);
        assert_eq!(driver.session().position(), 0);
        assert!(driver.session().is_revealed());
    }

    #[test]
    fn test_vertical_settle_keeps_offset_until_fire() {
        let start = Instant::now();
        let mut driver = QuizDriver::new(session(2), DELAY);
        let toss = Offset::new(5.0, -240.0);

        driver.handle(QuizEvent::DragUpdate(toss), start);
        let handled = driver.handle(QuizEvent::DragSettle(toss), start);
        assert_eq!(handled, Handled::Scheduled(start + DELAY));
        assert_eq!(driver.pending(), Some(DeferredTransition::Dismiss(Direction::Up)));
        assert_eq!(driver.session().offset(), toss);

        driver.tick(start + DELAY);
        assert!(driver.session().offset().is_zero());
        assert_eq!(driver.session().position(), 1);
    }

    #[test]
    fn test_cancelled_toss_resets_offset() {
        let start = Instant::now();
        let mut driver = QuizDriver::new(session(2), DELAY);
        let toss = Offset::new(0.0, -240.0);

        driver.handle(QuizEvent::DragUpdate(toss), start);
        driver.handle(QuizEvent::DragSettle(toss), start);
        driver.handle(QuizEvent::ToggleReveal, start + Duration::from_millis(10));

        assert!(driver.session().offset().is_zero());
        assert_eq!(driver.pending(), None);
        assert_eq!(driver.tick(start + Duration::from_secs(5)), None);
        assert_eq!(driver.session().position(), 0);
        assert!(driver.session().offset().is_zero());
    }

    #[test]
    fn test_horizontal_settle_applies_immediately() {
        let start = Instant::now();
        let mut driver = QuizDriver::new(session(2), DELAY);

        let handled = driver.handle(QuizEvent::DragSettle(Offset::new(-120.0, 4.0)), start);
        assert_eq!(handled, Handled::Applied(Transition::Revealed(true)));
        assert!(driver.pending().is_none());
    }

    #[test]
    fn test_short_vertical_swipe_ignored() {
        let start = Instant::now();
        let mut driver = QuizDriver::new(session(2), DELAY);

        let handled = driver.handle(QuizEvent::VerticalSwipe(Offset::new(0.0, 40.0)), start);
        assert_eq!(handled, Handled::Applied(Transition::Ignored));
        assert!(driver.pending().is_none());
    }

    #[test]
    fn test_zero_delay_applies_immediately() {
        let mut driver = QuizDriver::new(session(2), Duration::ZERO);
        let handled = driver.handle(QuizEvent::Advance, Instant::now());
        assert_eq!(handled, Handled::Applied(Transition::Advanced(1)));
    }

    #[test]
    fn test_events_after_finish_ignored() {
        let start = Instant::now();
        let mut driver = QuizDriver::new(session(1), DELAY);

        driver.handle(QuizEvent::Advance, start);
        assert_eq!(driver.tick(start + DELAY), Some(Transition::Finished));

        let handled = driver.handle(QuizEvent::Advance, start + DELAY);
        assert_eq!(handled, Handled::Applied(Transition::Ignored));
        assert!(driver.pending().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_driver_applies_after_delay() {
        let driver = QuizDriver::new(session(3), DELAY);
        let (tx, rx) = mpsc::channel(8);
        let (snap_tx, snap_rx) = watch::channel(driver.snapshot());
        let handle = tokio::spawn(run_driver(driver, rx, snap_tx));

        tx.send(QuizEvent::Advance).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(snap_rx.borrow().position, 0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(snap_rx.borrow().position, 1);
        assert!(!snap_rx.borrow().revealed);

        drop(tx);
        let driver = handle.await.unwrap();
        assert_eq!(driver.session().position(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_driver_does_not_double_advance() {
        let driver = QuizDriver::new(session(3), DELAY);
        let (tx, rx) = mpsc::channel(8);
        let (snap_tx, snap_rx) = watch::channel(driver.snapshot());
        let handle = tokio::spawn(run_driver(driver, rx, snap_tx));

        tx.send(QuizEvent::DismissUp).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(QuizEvent::DismissDown).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(snap_rx.borrow().position, 1);
        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_driver_ends_when_finished() {
        let driver = QuizDriver::new(session(2), DELAY);
        let (tx, rx) = mpsc::channel(8);
        let (snap_tx, snap_rx) = watch::channel(driver.snapshot());
        let handle = tokio::spawn(run_driver(driver, rx, snap_tx));

        tx.send(QuizEvent::Advance).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        tx.send(QuizEvent::Advance).await.unwrap();

        // The loop exits on its own once the last card is dismissed
        let session = handle.await.unwrap().into_session();
        assert!(session.is_finished());
        assert_eq!(session.progress(), (2, 2));
        assert_eq!(snap_rx.borrow().phase, Phase::Finished);
    }
}
