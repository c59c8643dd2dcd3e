//! Results of an accepted flip.

use serde::{Deserialize, Serialize};

use super::session::ResetToken;
use crate::cards::{Card, CardIndex};

/// Result of comparing the two buffered cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Same symbol; both cards are now matched.
    Match {
        /// The pair, in flip order.
        pair: [CardIndex; 2],
        /// Was this the last pair?
        won: bool,
    },
    /// Different symbols; both stay face up until `reset` resolves.
    Mismatch {
        /// The pair, in flip order.
        pair: [CardIndex; 2],
        /// Token to pass to `resolve_mismatch` once the delay elapses.
        reset: ResetToken,
    },
}

impl Evaluation {
    /// The two evaluated cards.
    #[must_use]
    pub fn pair(&self) -> [CardIndex; 2] {
        match *self {
            Evaluation::Match { pair, .. } | Evaluation::Mismatch { pair, .. } => pair,
        }
    }

    /// Did the pair match?
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Evaluation::Match { .. })
    }
}

/// An accepted flip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipOutcome {
    /// The flipped card after the flip (and after evaluation, if any).
    pub card: Card,

    /// Present when this flip completed a pair.
    pub evaluation: Option<Evaluation>,
}

impl FlipOutcome {
    /// Reset token if this flip produced a mismatch.
    #[must_use]
    pub fn pending_reset(&self) -> Option<ResetToken> {
        match self.evaluation {
            Some(Evaluation::Mismatch { reset, .. }) => Some(reset),
            _ => None,
        }
    }

    /// Did this flip find the last pair?
    #[must_use]
    pub fn won(&self) -> bool {
        matches!(self.evaluation, Some(Evaluation::Match { won: true, .. }))
    }
}
