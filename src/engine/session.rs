//! Session lifecycle and mismatch-reset tokens.

use serde::{Deserialize, Serialize};

/// Lifecycle of one play-through.
///
/// ```text
/// NotStarted --first flip--> Active --last pair--> Won (terminal)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Dealt, no card flipped yet. The clock is stopped.
    #[default]
    NotStarted,
    /// In play. The clock ticks.
    Active,
    /// Every pair found. The clock is stopped for good.
    Won,
}

impl SessionState {
    /// Does the tick timer run in this state?
    #[must_use]
    pub const fn is_clock_running(self) -> bool {
        matches!(self, SessionState::Active)
    }

    /// Is the session over?
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, SessionState::Won)
    }
}

/// Handle for one pending mismatch reset.
///
/// Issued when two flipped cards differ. The reset only applies while the
/// token is still the engine's pending token: a restart moves the engine to a
/// new generation and every older token goes stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResetToken {
    generation: u64,
    ticket: u64,
}

impl ResetToken {
    pub(crate) const fn new(generation: u64, ticket: u64) -> Self {
        Self { generation, ticket }
    }

    /// Session generation this reset belongs to.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }

    /// Sequence number within the generation.
    #[must_use]
    pub const fn ticket(self) -> u64 {
        self.ticket
    }
}

impl std::fmt::Display for ResetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reset({}#{})", self.generation, self.ticket)
    }
}
