//! Cards and the dealt deck.
//!
//! ## Key Types
//!
//! - `CardIndex`: Position of a card in the deck
//! - `CardState`: Hidden, Flipped or Matched
//! - `Card`: Index, symbol and face state
//! - `Deck`: The shuffled layout for one session

pub mod card;
pub mod deck;

pub use card::{Card, CardIndex, CardState};
pub use deck::Deck;
