//! Presentation layer seam.

use super::event::GameEvent;
use crate::cards::{CardIndex, CardState};

/// Receives engine events for rendering.
///
/// The four core callbacks are required. Session start and deal default
/// to no-ops since many front ends derive them from the other callbacks.
pub trait Presenter {
    /// A card changed face state.
    fn on_card_state_changed(&mut self, index: CardIndex, state: CardState);

    /// The move counter changed.
    fn on_moves_changed(&mut self, moves: u32);

    /// One tick of elapsed time.
    fn on_timer_tick(&mut self, seconds: u32);

    /// Every pair was found.
    fn on_win(&mut self, moves: u32, seconds: u32);

    /// The first flip started the session.
    fn on_session_started(&mut self) {}

    /// A fresh board was dealt, on construction and on every restart.
    fn on_dealt(&mut self, _card_count: usize) {}
}

/// A presenter that records every event it receives.
///
/// Handy for tests and for headless front ends that poll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Has nothing been recorded?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Record an event.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every recorded event, leaving the log empty.
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Last state reported for a card, if any.
    #[must_use]
    pub fn last_state_of(&self, index: CardIndex) -> Option<CardState> {
        self.events.iter().rev().find_map(|event| match *event {
            GameEvent::CardStateChanged { index: i, state } if i == index => Some(state),
            _ => None,
        })
    }
}

impl Presenter for EventLog {
    fn on_card_state_changed(&mut self, index: CardIndex, state: CardState) {
        self.push(GameEvent::CardStateChanged { index, state });
    }

    fn on_moves_changed(&mut self, moves: u32) {
        self.push(GameEvent::MovesChanged { moves });
    }

    fn on_timer_tick(&mut self, seconds: u32) {
        self.push(GameEvent::TimerTick { seconds });
    }

    fn on_win(&mut self, moves: u32, seconds: u32) {
        self.push(GameEvent::Won { moves, seconds });
    }

    fn on_session_started(&mut self) {
        self.push(GameEvent::SessionStarted);
    }

    fn on_dealt(&mut self, card_count: usize) {
        self.push(GameEvent::Dealt { card_count });
    }
}

impl Extend<GameEvent> for EventLog {
    fn extend<T: IntoIterator<Item = GameEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}
