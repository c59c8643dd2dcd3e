//! Cards: position, symbol and face state.
//!
//! A card's position and symbol are fixed when the deck is dealt. Only its
//! [`CardState`] changes during play:
//!
//! ```text
//! Hidden --flip--> Flipped --match--> Matched (terminal)
//!    ^                |
//!    +---mismatch-----+
//! ```

use serde::{Deserialize, Serialize};

use crate::core::Symbol;

/// Position of a card in the deck.
///
/// Indices are 0-based and unique within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardIndex(pub usize);

impl CardIndex {
    /// Create a new card index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw position.
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl From<usize> for CardIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for CardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Face state of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardState {
    /// Face down.
    #[default]
    Hidden,
    /// Face up, waiting for evaluation or for the mismatch reset.
    Flipped,
    /// Part of a found pair. Terminal.
    Matched,
}

impl CardState {
    /// Is the symbol visible?
    #[must_use]
    pub const fn is_face_up(self) -> bool {
        matches!(self, CardState::Flipped | CardState::Matched)
    }
}

/// A card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Position in the deck.
    pub index: CardIndex,

    /// Face symbol.
    pub symbol: Symbol,

    /// Current face state.
    pub state: CardState,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub fn new(index: CardIndex, symbol: Symbol) -> Self {
        Self {
            index,
            symbol,
            state: CardState::Hidden,
        }
    }

    /// Does this card pair with `other`?
    ///
    /// Two distinct positions with equal symbols.
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.index != other.index && self.symbol == other.symbol
    }

    /// The symbol if the card is face up.
    #[must_use]
    pub fn visible_symbol(&self) -> Option<&Symbol> {
        self.state.is_face_up().then_some(&self.symbol)
    }
}
