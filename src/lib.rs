//! # memory-match
//!
//! A memory-matching (card pairs) game engine. A player flips face-down
//! cards two at a time; equal symbols stay face up, different ones turn back
//! after a short delay, and the game is won once every pair is found.
//!
//! ## Design Principles
//!
//! 1. **Explicit instances**: No global game. Construct as many independent
//!    `GameEngine`s as you like.
//!
//! 2. **Clock-free core**: The engine never sleeps or spawns. The elapsed-time
//!    tick and the delayed mismatch reset are explicit calls made by a driver.
//!
//! 3. **Stale callbacks are harmless**: Every deal bumps a generation counter;
//!    timer callbacks carry the generation (or reset token) they were issued
//!    for and do nothing once it is outdated.
//!
//! 4. **Rendering is someone else's job**: The engine queues `GameEvent`s and
//!    exposes `GameSnapshot`s; a `Presenter` turns them into pixels.
//!
//! ## Modules
//!
//! - `core`: Symbols, configuration, errors, RNG
//! - `cards`: Card state and the dealt deck
//! - `engine`: The game-state machine and the input seam
//! - `events`: Engine-to-presentation events
//! - `schedule`: Deterministic virtual-time driver
//! - `runtime`: Tokio wall-clock driver (feature `runtime`)

pub mod cards;
pub mod core;
pub mod engine;
pub mod events;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod schedule;

// Re-export commonly used types
pub use crate::core::{ConfigError, FlipError, GameConfig, GameRng, GameRngState, Symbol};

pub use crate::cards::{Card, CardIndex, CardState, Deck};

pub use crate::engine::{
    CardView, Evaluation, FlipOutcome, GameEngine, GameInput, GameSnapshot, ResetToken,
    SessionState,
};

pub use crate::events::{EventLog, GameEvent, Presenter};

pub use crate::schedule::{ScheduledTask, Scheduler, TaskId, TaskKind};

#[cfg(feature = "runtime")]
pub use crate::runtime::{LiveSession, SessionError};
