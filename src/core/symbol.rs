//! Symbol tokens printed on card faces.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// An opaque symbol token.
///
/// The engine never interprets symbols; two cards form a pair exactly when
/// their symbols compare equal.
#[derive(Clone, Debug, Display, From, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    /// Create a symbol from anything string-like.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the underlying token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<char> for Symbol {
    fn from(token: char) -> Self {
        Self(token.to_string())
    }
}
