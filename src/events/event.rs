//! Events emitted by the engine for the presentation layer.
//!
//! The engine never renders anything. Every observable change is queued as
//! a [`GameEvent`] in emission order; the caller drains the queue and either
//! matches on the events directly or hands them to a
//! [`Presenter`](super::Presenter) via [`GameEvent::dispatch`].

use serde::{Deserialize, Serialize};

use super::presenter::Presenter;
use crate::cards::{CardIndex, CardState};

/// An observable change in a game session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A card changed face state.
    CardStateChanged {
        /// The card.
        index: CardIndex,
        /// Its new state.
        state: CardState,
    },

    /// The move counter changed.
    MovesChanged {
        /// Moves so far.
        moves: u32,
    },

    /// The first flip started the session clock.
    SessionStarted,

    /// One tick of elapsed time.
    TimerTick {
        /// Elapsed seconds so far.
        seconds: u32,
    },

    /// Every pair was found.
    Won {
        /// Final move count.
        moves: u32,
        /// Final elapsed seconds.
        seconds: u32,
    },

    /// A new deck was dealt; every card is face down and counters are zero.
    Dealt {
        /// Cards on the new board.
        card_count: usize,
    },
}

impl GameEvent {
    /// Forward this event to the matching presenter callback.
    pub fn dispatch<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        match *self {
            GameEvent::CardStateChanged { index, state } => {
                presenter.on_card_state_changed(index, state);
            }
            GameEvent::MovesChanged { moves } => presenter.on_moves_changed(moves),
            GameEvent::SessionStarted => presenter.on_session_started(),
            GameEvent::TimerTick { seconds } => presenter.on_timer_tick(seconds),
            GameEvent::Won { moves, seconds } => presenter.on_win(moves, seconds),
            GameEvent::Dealt { card_count } => presenter.on_dealt(card_count),
        }
    }

    /// Is this the terminal win event?
    #[must_use]
    pub fn is_win(&self) -> bool {
        matches!(self, GameEvent::Won { .. })
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::CardStateChanged { index, state } => write!(f, "{index} -> {state:?}"),
            GameEvent::MovesChanged { moves } => write!(f, "moves: {moves}"),
            GameEvent::SessionStarted => write!(f, "session started"),
            GameEvent::TimerTick { seconds } => write!(f, "time: {seconds}s"),
            GameEvent::Won { moves, seconds } => {
                write!(f, "won in {moves} moves and {seconds}s")
            }
            GameEvent::Dealt { card_count } => write!(f, "dealt {card_count} cards"),
        }
    }
}
