//! The dealt deck.
//!
//! A deck is dealt once per session: the first `pair_count` symbols of the
//! alphabet are duplicated and shuffled. Positions never move afterwards;
//! the engine only mutates card state through [`Deck::set_state`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::card::{Card, CardIndex, CardState};
use crate::core::{ConfigError, GameConfig, GameRng, Symbol};

/// An ordered, shuffled deck of paired cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Deal a fresh deck for `config`.
    ///
    /// Fails if the configuration cannot produce a valid deck.
    pub fn deal(config: &GameConfig, rng: &mut GameRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::shuffled_pairs(config.dealt_symbols(), rng))
    }

    /// Duplicate `symbols` and shuffle. Callers guarantee the symbols are
    /// distinct and non-empty.
    pub(crate) fn shuffled_pairs(symbols: &[Symbol], rng: &mut GameRng) -> Self {
        let mut doubled: Vec<Symbol> = symbols.iter().chain(symbols.iter()).cloned().collect();
        rng.shuffle(&mut doubled);

        let cards = doubled
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| Card::new(CardIndex::new(i), symbol))
            .collect();

        debug!(pairs = symbols.len(), "dealt deck");
        Self { cards }
    }

    /// Build a deck with a fixed layout, all cards face down.
    ///
    /// Useful for scripted boards; fails unless every symbol appears exactly
    /// twice.
    pub fn from_symbols<I, S>(symbols: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let cards: Vec<Card> = symbols
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| Card::new(CardIndex::new(i), symbol.into()))
            .collect();

        let deck = Self { cards };
        if deck.is_empty() {
            return Err(ConfigError::ZeroPairs);
        }
        for (symbol, count) in deck.symbol_counts() {
            if count != 2 {
                return Err(ConfigError::UnpairedSymbol {
                    symbol: symbol.clone(),
                    count,
                });
            }
        }
        Ok(deck)
    }

    /// Distinct symbols in first-appearance order.
    #[must_use]
    pub fn distinct_symbols(&self) -> Vec<Symbol> {
        let mut seen = Vec::with_capacity(self.pair_count());
        for card in &self.cards {
            if !seen.contains(&card.symbol) {
                seen.push(card.symbol.clone());
            }
        }
        seen
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the deck empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Get a card by index.
    #[must_use]
    pub fn get(&self, index: CardIndex) -> Option<&Card> {
        self.cards.get(index.raw())
    }

    /// All cards in position order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Iterate over cards.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Change a card's face state. Returns `false` for an unknown index.
    pub(crate) fn set_state(&mut self, index: CardIndex, state: CardState) -> bool {
        match self.cards.get_mut(index.raw()) {
            Some(card) => {
                card.state = state;
                true
            }
            None => false,
        }
    }

    /// Occurrences of each symbol.
    #[must_use]
    pub fn symbol_counts(&self) -> FxHashMap<&Symbol, usize> {
        let mut counts = FxHashMap::default();
        for card in &self.cards {
            *counts.entry(&card.symbol).or_insert(0) += 1;
        }
        counts
    }

    /// Count cards in a given state.
    #[must_use]
    pub fn count_in_state(&self, state: CardState) -> usize {
        self.cards.iter().filter(|c| c.state == state).count()
    }

    /// Index of the other card carrying `index`'s symbol.
    #[must_use]
    pub fn partner_of(&self, index: CardIndex) -> Option<CardIndex> {
        let card = self.get(index)?;
        self.cards
            .iter()
            .find(|other| card.pairs_with(other))
            .map(|other| other.index)
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
