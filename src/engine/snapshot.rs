//! Serializable view of a session for renderers.
//!
//! A snapshot never leaks face-down symbols: hidden cards carry
//! `symbol: None`.

use serde::{Deserialize, Serialize};

use super::session::SessionState;
use crate::cards::{Card, CardIndex, CardState};
use crate::core::Symbol;

/// What a player can see of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    /// Position.
    pub index: CardIndex,
    /// Face state.
    pub state: CardState,
    /// Symbol, only when face up.
    pub symbol: Option<Symbol>,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            index: card.index,
            state: card.state,
            symbol: card.visible_symbol().cloned(),
        }
    }
}

/// Point-in-time view of a game session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Session generation (bumped on every deal).
    pub generation: u64,
    /// Lifecycle state.
    pub session: SessionState,
    /// Cards in position order.
    pub cards: Vec<CardView>,
    /// Face-up, unmatched cards awaiting evaluation or reset.
    pub selection: Vec<CardIndex>,
    /// Completed pair evaluations.
    pub moves: u32,
    /// Elapsed seconds.
    pub elapsed_seconds: u32,
    /// Pairs found.
    pub matched_pairs: usize,
    /// Pairs on the board.
    pub pair_count: usize,
}

impl GameSnapshot {
    /// Pairs still hidden.
    #[must_use]
    pub fn remaining_pairs(&self) -> usize {
        self.pair_count - self.matched_pairs
    }
}
