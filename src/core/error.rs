//! Error taxonomy.
//!
//! - [`ConfigError`]: the configuration cannot produce a valid deck. Fatal to
//!   that initialize call.
//! - [`FlipError`]: a flip request was rejected. Recoverable; the engine
//!   state is untouched, so callers may log it or ignore it outright (rapid
//!   and duplicate taps are expected).

use derive_more::{Display, Error};

use super::symbol::Symbol;
use crate::cards::CardIndex;

/// Invalid game configuration.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A game needs at least one pair.
    #[display("pair count must be at least 1")]
    ZeroPairs,

    /// Fewer candidate symbols than requested pairs.
    #[display("alphabet has {available} symbols but {required} pairs were requested")]
    AlphabetTooSmall {
        /// Requested pair count.
        required: usize,
        /// Symbols supplied.
        available: usize,
    },

    /// The symbols drawn for the deck are not distinct.
    #[display("symbol {symbol} appears more than once in the dealt alphabet")]
    DuplicateSymbol {
        /// The repeated symbol.
        symbol: Symbol,
    },

    /// A fixed layout holds a symbol some number of times other than two.
    #[display("symbol {symbol} appears {count} times; every symbol needs exactly two cards")]
    UnpairedSymbol {
        /// The offending symbol.
        symbol: Symbol,
        /// Occurrences in the layout.
        count: usize,
    },

    /// A fixed layout does not deal exactly the configured symbols.
    #[display("layout does not match the configured {pair_count} pairs")]
    LayoutMismatch {
        /// Configured pair count.
        pair_count: usize,
    },

    /// The tick timer cannot run with a zero period.
    #[display("tick interval must be non-zero")]
    ZeroTickInterval,
}

/// Rejected flip request. The engine state is unchanged.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
pub enum FlipError {
    /// Index past the end of the deck.
    #[display("{index} is out of range for a deck of {len} cards")]
    OutOfRange {
        /// Requested index.
        index: CardIndex,
        /// Deck size.
        len: usize,
    },

    /// The card is already face up and awaiting evaluation.
    #[display("{index} is already flipped")]
    AlreadyFlipped {
        /// Requested index.
        index: CardIndex,
    },

    /// The card belongs to a found pair.
    #[display("{index} is already matched")]
    AlreadyMatched {
        /// Requested index.
        index: CardIndex,
    },

    /// Two cards are pending evaluation.
    #[display("two cards are already pending evaluation")]
    BufferFull,
}
