//! The game engine and its input seam.
//!
//! - `GameEngine`: the synchronous state machine
//! - `GameInput`: what an input adapter may ask of a session
//! - `FlipOutcome` / `Evaluation`: results of an accepted flip
//! - `GameSnapshot`: renderer-facing view

mod game;
mod outcome;
mod session;
mod snapshot;

pub use game::GameEngine;
pub use outcome::{Evaluation, FlipOutcome};
pub use session::{ResetToken, SessionState};
pub use snapshot::{CardView, GameSnapshot};

use crate::cards::CardIndex;
use crate::core::FlipError;

/// Input adapter capability: flip a card, restart the game.
///
/// Implemented by the bare engine and by both timer drivers, so a UI's
/// click handler can be wired to whichever one owns the session.
///
/// ## Implementation Notes
///
/// - `flip` is authoritative and synchronous: when it returns, the buffer
///   and counters already reflect the flip.
/// - `restart` must leave no timer callback able to touch the new session.
pub trait GameInput {
    /// Flip the card at `index`.
    fn flip(&mut self, index: CardIndex) -> Result<FlipOutcome, FlipError>;

    /// Discard the session and deal a new one with the same configuration.
    fn restart(&mut self);
}

impl GameInput for GameEngine {
    fn flip(&mut self, index: CardIndex) -> Result<FlipOutcome, FlipError> {
        GameEngine::flip(self, index)
    }

    fn restart(&mut self) {
        GameEngine::restart(self);
    }
}
