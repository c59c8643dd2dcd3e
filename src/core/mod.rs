//! Core building blocks: symbols, configuration, errors, RNG.
//!
//! Nothing in here knows about card state or timers; the engine builds on
//! these types.

pub mod config;
pub mod error;
pub mod rng;
pub mod symbol;

pub use config::{
    GameConfig, CLASSIC_ALPHABET, CLASSIC_PAIR_COUNT, DEFAULT_MISMATCH_DELAY, DEFAULT_TICK_INTERVAL,
};
pub use error::{ConfigError, FlipError};
pub use rng::{GameRng, GameRngState};
pub use symbol::Symbol;
