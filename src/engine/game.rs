//! The game-state machine.
//!
//! `GameEngine` owns the deck, the selection buffer, the counters and the
//! session lifecycle. It is synchronous and clock-free: the elapsed-time tick
//! and the delayed mismatch reset arrive as explicit calls ([`GameEngine::tick`]
//! and [`GameEngine::resolve_mismatch`]) from a timer driver.
//!
//! ## Invariants
//!
//! - At most two non-matched cards are face up, and the selection buffer
//!   never holds more than two cards.
//! - `moves` grows by exactly one each time the buffer reaches two cards.
//! - The session is `Won` iff every pair is matched.
//! - A rejected flip changes nothing.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, info, instrument, trace};

use super::outcome::{Evaluation, FlipOutcome};
use super::session::{ResetToken, SessionState};
use super::snapshot::{CardView, GameSnapshot};
use crate::cards::{Card, CardIndex, CardState, Deck};
use crate::core::{ConfigError, FlipError, GameConfig, GameRng, GameRngState};
use crate::events::{GameEvent, Presenter};

/// A single-player memory-matching session.
///
/// ```
/// use memory_match::{GameConfig, GameEngine, SessionState};
///
/// let mut engine = GameEngine::new(GameConfig::default().with_seed(42)).unwrap();
/// assert_eq!(engine.session_state(), SessionState::NotStarted);
///
/// engine.flip(0).unwrap();
/// assert_eq!(engine.session_state(), SessionState::Active);
/// ```
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    rng: GameRng,
    deck: Deck,

    /// Face-up, unmatched cards in flip order.
    selection: SmallVec<[CardIndex; 2]>,
    pending_reset: Option<ResetToken>,

    moves: u32,
    elapsed_seconds: u32,
    matched_pairs: usize,
    session: SessionState,

    generation: u64,
    next_ticket: u64,

    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Create an engine and deal the first deck.
    ///
    /// Seeds the RNG from `config.seed`, or from OS entropy when absent.
    #[instrument(skip_all, fields(pairs = config.pair_count))]
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let mut rng = Self::rng_for(&config);
        let deck = Deck::deal(&config, &mut rng)?;
        Ok(Self::assemble(config, rng, deck))
    }

    /// Create an engine with a fixed first layout.
    ///
    /// The layout must deal exactly the configured symbols, each on two
    /// cards. Only the symbol order of `deck` is used: every card starts
    /// face down at its position. Restarts shuffle normally.
    pub fn from_layout(config: GameConfig, deck: Deck) -> Result<Self, ConfigError> {
        config.validate()?;
        let deck = Deck::from_symbols(deck.iter().map(|card| card.symbol.clone()))?;

        let expected: FxHashSet<_> = config.dealt_symbols().iter().collect();
        let distinct = deck.distinct_symbols();
        let actual: FxHashSet<_> = distinct.iter().collect();
        if deck.len() != config.card_count() || expected != actual {
            return Err(ConfigError::LayoutMismatch {
                pair_count: config.pair_count,
            });
        }

        let rng = Self::rng_for(&config);
        Ok(Self::assemble(config, rng, deck))
    }

    fn rng_for(config: &GameConfig) -> GameRng {
        config.seed.map_or_else(GameRng::from_entropy, GameRng::new)
    }

    fn assemble(config: GameConfig, rng: GameRng, deck: Deck) -> Self {
        let mut engine = Self {
            config,
            rng,
            deck: Deck::default(),
            selection: SmallVec::new(),
            pending_reset: None,
            moves: 0,
            elapsed_seconds: 0,
            matched_pairs: 0,
            session: SessionState::NotStarted,
            generation: 0,
            next_ticket: 0,
            events: Vec::new(),
        };
        engine.install(deck);
        engine
    }

    /// Replace the configuration and deal a fresh session.
    ///
    /// The RNG is reseeded from the new configuration. On error the current
    /// session is left untouched.
    #[instrument(skip_all, fields(pairs = config.pair_count))]
    pub fn initialize(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        let mut rng = Self::rng_for(&config);
        let deck = Deck::deal(&config, &mut rng)?;
        self.rng = rng;
        self.config = config;
        self.install(deck);
        Ok(())
    }

    /// Deal a fresh session with the same configuration.
    ///
    /// Any pending mismatch reset goes stale and the clock stops. The RNG
    /// stream continues, so successive restarts deal different decks.
    #[instrument(skip_all, fields(generation = self.generation))]
    pub fn restart(&mut self) {
        let deck = Deck::shuffled_pairs(self.config.dealt_symbols(), &mut self.rng);
        self.install(deck);
    }

    /// Reset all session state around a new deck.
    fn install(&mut self, deck: Deck) {
        self.deck = deck;
        self.selection.clear();
        self.pending_reset = None;
        self.moves = 0;
        self.elapsed_seconds = 0;
        self.matched_pairs = 0;
        self.session = SessionState::NotStarted;
        self.generation += 1;
        self.next_ticket = 0;

        info!(
            generation = self.generation,
            cards = self.deck.len(),
            "session dealt"
        );
        self.events.push(GameEvent::Dealt {
            card_count: self.deck.len(),
        });
    }

    // === Input ===

    /// Flip the card at `index`.
    ///
    /// Rejections leave every card and counter untouched:
    /// - out of range
    /// - two cards already pending evaluation
    /// - card already flipped or matched
    pub fn flip(&mut self, index: impl Into<CardIndex>) -> Result<FlipOutcome, FlipError> {
        let index = index.into();
        let result = self.try_flip(index);
        if let Err(err) = &result {
            debug!(%index, %err, "flip rejected");
        }
        result
    }

    fn try_flip(&mut self, index: CardIndex) -> Result<FlipOutcome, FlipError> {
        let state = self
            .deck
            .get(index)
            .map(|card| card.state)
            .ok_or(FlipError::OutOfRange {
                index,
                len: self.deck.len(),
            })?;

        if self.selection.len() >= 2 {
            return Err(FlipError::BufferFull);
        }

        match state {
            CardState::Hidden => {}
            CardState::Flipped => return Err(FlipError::AlreadyFlipped { index }),
            CardState::Matched => return Err(FlipError::AlreadyMatched { index }),
        }

        if self.session == SessionState::NotStarted {
            self.session = SessionState::Active;
            info!(generation = self.generation, "session started");
            self.events.push(GameEvent::SessionStarted);
        }

        self.set_card_state(index, CardState::Flipped);
        self.selection.push(index);
        debug!(%index, selected = self.selection.len(), "card flipped");

        let evaluation = if self.selection.len() == 2 {
            self.moves += 1;
            self.events.push(GameEvent::MovesChanged { moves: self.moves });
            Some(self.evaluate())
        } else {
            None
        };

        let card = self.deck.cards()[index.raw()].clone();
        Ok(FlipOutcome { card, evaluation })
    }

    /// Compare the two buffered cards.
    fn evaluate(&mut self) -> Evaluation {
        let pair = [self.selection[0], self.selection[1]];
        let is_match = match (self.deck.get(pair[0]), self.deck.get(pair[1])) {
            (Some(first), Some(second)) => first.pairs_with(second),
            _ => false,
        };

        if is_match {
            for index in pair {
                self.set_card_state(index, CardState::Matched);
            }
            self.selection.clear();
            self.matched_pairs += 1;
            debug!(first = %pair[0], second = %pair[1], matched = self.matched_pairs, "pair matched");

            let won = self.matched_pairs == self.deck.pair_count();
            if won {
                self.session = SessionState::Won;
                info!(
                    moves = self.moves,
                    seconds = self.elapsed_seconds,
                    "session won"
                );
                self.events.push(GameEvent::Won {
                    moves: self.moves,
                    seconds: self.elapsed_seconds,
                });
            }
            Evaluation::Match { pair, won }
        } else {
            self.next_ticket += 1;
            let reset = ResetToken::new(self.generation, self.next_ticket);
            self.pending_reset = Some(reset);
            debug!(first = %pair[0], second = %pair[1], %reset, "pair mismatched");
            Evaluation::Mismatch { pair, reset }
        }
    }

    // === Timer callbacks ===

    /// Turn a mismatched pair back face down.
    ///
    /// Returns `false` and does nothing when `token` is not the pending reset
    /// (already resolved, or issued before a restart).
    pub fn resolve_mismatch(&mut self, token: ResetToken) -> bool {
        if self.pending_reset != Some(token) {
            debug!(%token, "stale mismatch reset ignored");
            return false;
        }

        self.pending_reset = None;
        let selection = std::mem::take(&mut self.selection);
        for index in selection {
            if self.deck.get(index).map(|c| c.state) == Some(CardState::Flipped) {
                self.set_card_state(index, CardState::Hidden);
            }
        }
        debug!(%token, "mismatch reset");
        true
    }

    /// Advance the elapsed-time counter by one tick.
    ///
    /// Only counts while the session is active; returns the new elapsed
    /// seconds, or `None` when the clock is stopped.
    pub fn tick(&mut self) -> Option<u32> {
        if !self.session.is_clock_running() {
            return None;
        }
        self.elapsed_seconds += 1;
        trace!(seconds = self.elapsed_seconds, "tick");
        self.events.push(GameEvent::TimerTick {
            seconds: self.elapsed_seconds,
        });
        Some(self.elapsed_seconds)
    }

    fn set_card_state(&mut self, index: CardIndex, state: CardState) {
        if self.deck.set_state(index, state) {
            self.events.push(GameEvent::CardStateChanged { index, state });
        }
    }

    // === Events ===

    /// Take all queued events in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queued events not yet drained.
    #[must_use]
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain queued events into a presenter.
    pub fn present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        for event in self.drain_events() {
            event.dispatch(presenter);
        }
    }

    // === Queries ===

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The dealt deck.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// A card by index.
    #[must_use]
    pub fn card(&self, index: impl Into<CardIndex>) -> Option<&Card> {
        self.deck.get(index.into())
    }

    /// Cards awaiting evaluation or reset, in flip order.
    #[must_use]
    pub fn selection(&self) -> &[CardIndex] {
        &self.selection
    }

    /// The outstanding mismatch reset, if any.
    #[must_use]
    pub fn pending_reset(&self) -> Option<ResetToken> {
        self.pending_reset
    }

    /// Completed pair evaluations.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Ticks counted while active.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Pairs found.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    /// Pairs on the board.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.deck.pair_count()
    }

    /// Session lifecycle state.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session
    }

    /// Has every pair been found?
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.session == SessionState::Won
    }

    /// Should the tick timer be running?
    #[must_use]
    pub fn is_clock_running(&self) -> bool {
        self.session.is_clock_running()
    }

    /// Session generation, bumped on every deal.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// RNG checkpoint for replaying future deals.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Renderer-facing view of the session.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            generation: self.generation,
            session: self.session,
            cards: self.deck.iter().map(CardView::from).collect(),
            selection: self.selection.to_vec(),
            moves: self.moves,
            elapsed_seconds: self.elapsed_seconds,
            matched_pairs: self.matched_pairs,
            pair_count: self.deck.pair_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abba() -> GameEngine {
        let config = GameConfig::new(2, ["A", "B"]).with_seed(1);
        let deck = Deck::from_symbols(["A", "B", "B", "A"]).unwrap();
        GameEngine::from_layout(config, deck).unwrap()
    }

    #[test]
    fn test_new_engine_is_fresh() {
        let engine = GameEngine::new(GameConfig::default().with_seed(3)).unwrap();

        assert_eq!(engine.deck().len(), 16);
        assert_eq!(engine.deck().count_in_state(CardState::Hidden), 16);
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.elapsed_seconds(), 0);
        assert_eq!(engine.matched_pairs(), 0);
        assert_eq!(engine.session_state(), SessionState::NotStarted);
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.pending_events(), &[GameEvent::Dealt { card_count: 16 }]);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert_eq!(
            GameEngine::new(GameConfig::new(0, ["A"])).unwrap_err(),
            ConfigError::ZeroPairs
        );
        assert_eq!(
            GameEngine::new(GameConfig::new(4, ["A"])).unwrap_err(),
            ConfigError::AlphabetTooSmall { required: 4, available: 1 }
        );
    }

    #[test]
    fn test_from_layout_rejects_wrong_symbols() {
        let config = GameConfig::new(2, ["A", "B"]);
        let deck = Deck::from_symbols(["A", "C", "C", "A"]).unwrap();
        assert_eq!(
            GameEngine::from_layout(config.clone(), deck).unwrap_err(),
            ConfigError::LayoutMismatch { pair_count: 2 }
        );

        let short = Deck::from_symbols(["A", "A"]).unwrap();
        assert!(GameEngine::from_layout(config, short).is_err());
    }

    #[test]
    fn test_from_layout_rejects_unpaired_cards() {
        let deck: Deck = serde_json::from_value(serde_json::json!({
            "cards": [
                { "index": 0, "symbol": "A", "state": "Hidden" },
                { "index": 1, "symbol": "A", "state": "Hidden" },
                { "index": 2, "symbol": "A", "state": "Hidden" },
                { "index": 3, "symbol": "B", "state": "Hidden" },
            ]
        }))
        .unwrap();

        let err = GameEngine::from_layout(GameConfig::new(2, ["A", "B"]), deck).unwrap_err();
        assert!(matches!(err, ConfigError::UnpairedSymbol { .. }));
    }

    #[test]
    fn test_from_layout_deals_face_down() {
        let deck: Deck = serde_json::from_value(serde_json::json!({
            "cards": [
                { "index": 7, "symbol": "A", "state": "Matched" },
                { "index": 7, "symbol": "B", "state": "Flipped" },
                { "index": 7, "symbol": "B", "state": "Flipped" },
                { "index": 7, "symbol": "A", "state": "Flipped" },
            ]
        }))
        .unwrap();

        let mut engine = GameEngine::from_layout(GameConfig::new(2, ["A", "B"]), deck).unwrap();

        assert_eq!(engine.deck().count_in_state(CardState::Hidden), 4);
        for (position, card) in engine.deck().iter().enumerate() {
            assert_eq!(card.index, CardIndex::new(position));
        }
        assert_eq!(engine.deck().partner_of(CardIndex::new(0)), Some(CardIndex::new(3)));

        for i in [0, 3, 1, 2] {
            engine.flip(i).unwrap();
        }
        assert!(engine.is_won());
    }

    #[test]
    fn test_first_flip_starts_session() {
        let mut engine = abba();
        engine.drain_events();

        let outcome = engine.flip(0).unwrap();

        assert_eq!(outcome.card.state, CardState::Flipped);
        assert_eq!(outcome.evaluation, None);
        assert_eq!(engine.session_state(), SessionState::Active);
        assert_eq!(engine.moves(), 0);
        assert_eq!(
            engine.drain_events(),
            vec![
                GameEvent::SessionStarted,
                GameEvent::CardStateChanged {
                    index: CardIndex::new(0),
                    state: CardState::Flipped
                },
            ]
        );
    }

    #[test]
    fn test_match_marks_both_cards() {
        let mut engine = abba();
        engine.flip(0).unwrap();
        let outcome = engine.flip(3).unwrap();

        assert_eq!(outcome.card.state, CardState::Matched);
        assert_eq!(
            outcome.evaluation,
            Some(Evaluation::Match {
                pair: [CardIndex::new(0), CardIndex::new(3)],
                won: false
            })
        );
        assert_eq!(engine.matched_pairs(), 1);
        assert_eq!(engine.moves(), 1);
        assert!(engine.selection().is_empty());
        assert_eq!(engine.pending_reset(), None);
    }

    #[test]
    fn test_mismatch_holds_buffer_until_reset() {
        let mut engine = abba();
        engine.flip(0).unwrap();
        let outcome = engine.flip(1).unwrap();
        let token = outcome.pending_reset().unwrap();

        assert_eq!(engine.selection(), &[CardIndex::new(0), CardIndex::new(1)]);
        assert_eq!(engine.flip(2), Err(FlipError::BufferFull));

        assert!(engine.resolve_mismatch(token));
        assert!(engine.selection().is_empty());
        assert_eq!(engine.card(0).unwrap().state, CardState::Hidden);
        assert_eq!(engine.card(1).unwrap().state, CardState::Hidden);

        // Second resolution is a no-op.
        assert!(!engine.resolve_mismatch(token));
    }

    #[test]
    fn test_rejections_change_nothing() {
        let mut engine = abba();
        engine.flip(0).unwrap();
        let before = engine.snapshot();

        assert_eq!(
            engine.flip(4),
            Err(FlipError::OutOfRange { index: CardIndex::new(4), len: 4 })
        );
        assert_eq!(
            engine.flip(0),
            Err(FlipError::AlreadyFlipped { index: CardIndex::new(0) })
        );

        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_tick_only_while_active() {
        let mut engine = abba();
        assert_eq!(engine.tick(), None);

        engine.flip(0).unwrap();
        assert_eq!(engine.tick(), Some(1));
        assert_eq!(engine.tick(), Some(2));

        engine.flip(3).unwrap();
        engine.flip(1).unwrap();
        engine.flip(2).unwrap();
        assert!(engine.is_won());
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.elapsed_seconds(), 2);
    }

    #[test]
    fn test_restart_stales_pending_reset() {
        let mut engine = abba();
        engine.flip(0).unwrap();
        let token = engine.flip(1).unwrap().pending_reset().unwrap();

        engine.restart();

        assert_eq!(engine.generation(), 2);
        assert_eq!(engine.pending_reset(), None);
        assert!(!engine.resolve_mismatch(token));
        assert_eq!(engine.deck().count_in_state(CardState::Hidden), 4);
    }

    #[test]
    fn test_initialize_switches_config() {
        let mut engine = abba();
        engine.flip(0).unwrap();

        engine
            .initialize(GameConfig::new(3, ["X", "Y", "Z"]).with_seed(9))
            .unwrap();

        assert_eq!(engine.deck().len(), 6);
        assert_eq!(engine.pair_count(), 3);
        assert_eq!(engine.session_state(), SessionState::NotStarted);

        let err = engine.initialize(GameConfig::new(0, ["X"])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroPairs);
        assert_eq!(engine.deck().len(), 6);
    }

    #[test]
    fn test_snapshot_hides_face_down_symbols() {
        let mut engine = abba();
        engine.flip(1).unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.cards[0].symbol, None);
        assert_eq!(snapshot.cards[1].symbol, Some(crate::core::Symbol::new("B")));
        assert_eq!(snapshot.selection, vec![CardIndex::new(1)]);
        assert_eq!(snapshot.remaining_pairs(), 2);
    }
}
