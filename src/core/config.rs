//! Game configuration.
//!
//! The only configuration a game takes is in-memory:
//! - `pair_count`: number of matching pairs on the board
//! - `alphabet`: ordered candidate symbols; the first `pair_count` are dealt
//! - `mismatch_delay`: how long a mismatched pair stays face up
//! - `tick_interval`: period of the elapsed-time timer
//! - `seed`: optional RNG seed for a reproducible deck
//!
//! There is no config file and no environment lookup.

use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::symbol::Symbol;

/// Symbols of the classic 4x4 board.
pub const CLASSIC_ALPHABET: [&str; 8] = ["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼"];

/// Pairs on the classic board.
pub const CLASSIC_PAIR_COUNT: usize = 8;

/// Default time a mismatched pair stays face up.
pub const DEFAULT_MISMATCH_DELAY: Duration = Duration::from_secs(1);

/// Default elapsed-time tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of matching pairs.
    pub pair_count: usize,

    /// Ordered candidate symbols.
    pub alphabet: Vec<Symbol>,

    /// Delay before a mismatched pair turns back face down.
    pub mismatch_delay: Duration,

    /// Elapsed-time tick period.
    pub tick_interval: Duration,

    /// RNG seed. `None` draws a seed from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(
            CLASSIC_PAIR_COUNT,
            CLASSIC_ALPHABET.iter().copied().map(Symbol::from),
        )
    }
}

impl GameConfig {
    /// Create a configuration with default timings and no seed.
    pub fn new<I, S>(pair_count: usize, alphabet: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self {
            pair_count,
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            mismatch_delay: DEFAULT_MISMATCH_DELAY,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        }
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the mismatch reset delay.
    #[must_use]
    pub fn with_mismatch_delay(mut self, delay: Duration) -> Self {
        self.mismatch_delay = delay;
        self
    }

    /// Set the tick period.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Number of cards on the board.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.pair_count * 2
    }

    /// The symbols actually dealt: the first `pair_count` of the alphabet.
    #[must_use]
    pub fn dealt_symbols(&self) -> &[Symbol] {
        let end = self.pair_count.min(self.alphabet.len());
        &self.alphabet[..end]
    }

    /// Check that this configuration can produce a valid deck.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pair_count == 0 {
            return Err(ConfigError::ZeroPairs);
        }
        if self.alphabet.len() < self.pair_count {
            return Err(ConfigError::AlphabetTooSmall {
                required: self.pair_count,
                available: self.alphabet.len(),
            });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }

        let mut seen = FxHashSet::default();
        for symbol in self.dealt_symbols() {
            if !seen.insert(symbol) {
                return Err(ConfigError::DuplicateSymbol {
                    symbol: symbol.clone(),
                });
            }
        }

        Ok(())
    }
}
