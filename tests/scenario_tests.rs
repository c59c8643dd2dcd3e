//! Scripted play-through tests.
//!
//! These tests drive complete sessions through the public API:
//! - The fixed [A, B, B, A] board from flip to win
//! - Restart mid-game
//! - A full classic board cleared by a perfect-memory player

use std::time::Duration;

use memory_match::{
    CardIndex, CardState, Deck, EventLog, Evaluation, FlipError, GameConfig, GameEngine, GameEvent,
    Scheduler, SessionState,
};

fn abba_engine() -> GameEngine {
    let config = GameConfig::new(2, ["A", "B"]).with_seed(42);
    let deck = Deck::from_symbols(["A", "B", "B", "A"]).unwrap();
    GameEngine::from_layout(config, deck).unwrap()
}

fn changed(index: usize, state: CardState) -> GameEvent {
    GameEvent::CardStateChanged {
        index: CardIndex::new(index),
        state,
    }
}

// =============================================================================
// Fixed board
// =============================================================================

/// Mismatch, then two matches: won in three moves.
#[test]
fn test_abba_walkthrough() {
    let mut engine = abba_engine();

    // flip(0), flip(1): A vs B, mismatch.
    assert_eq!(engine.flip(0).unwrap().card.state, CardState::Flipped);
    let outcome = engine.flip(1).unwrap();
    assert_eq!(outcome.card.state, CardState::Flipped);
    assert_eq!(engine.moves(), 1);
    let token = outcome.pending_reset().expect("mismatch should schedule a reset");

    assert!(engine.resolve_mismatch(token));
    assert_eq!(engine.card(0).unwrap().state, CardState::Hidden);
    assert_eq!(engine.card(1).unwrap().state, CardState::Hidden);

    // flip(0), flip(3): A vs A, match.
    engine.flip(0).unwrap();
    let outcome = engine.flip(3).unwrap();
    assert_eq!(engine.moves(), 2);
    assert_eq!(engine.matched_pairs(), 1);
    assert!(matches!(outcome.evaluation, Some(Evaluation::Match { won: false, .. })));

    // flip(1), flip(2): B vs B, match and win.
    engine.flip(1).unwrap();
    let outcome = engine.flip(2).unwrap();
    assert!(outcome.won());
    assert_eq!(engine.moves(), 3);
    assert_eq!(engine.matched_pairs(), 2);
    assert_eq!(engine.session_state(), SessionState::Won);
}

/// The event stream of the walkthrough, in order.
#[test]
fn test_abba_event_stream() {
    let mut engine = abba_engine();
    engine.flip(0).unwrap();
    let token = engine.flip(1).unwrap().pending_reset().unwrap();
    engine.resolve_mismatch(token);
    engine.flip(0).unwrap();
    engine.flip(3).unwrap();
    engine.flip(1).unwrap();
    engine.flip(2).unwrap();

    let expected = vec![
        GameEvent::Dealt { card_count: 4 },
        GameEvent::SessionStarted,
        changed(0, CardState::Flipped),
        changed(1, CardState::Flipped),
        GameEvent::MovesChanged { moves: 1 },
        changed(0, CardState::Hidden),
        changed(1, CardState::Hidden),
        changed(0, CardState::Flipped),
        changed(3, CardState::Flipped),
        GameEvent::MovesChanged { moves: 2 },
        changed(0, CardState::Matched),
        changed(3, CardState::Matched),
        changed(1, CardState::Flipped),
        changed(2, CardState::Flipped),
        GameEvent::MovesChanged { moves: 3 },
        changed(1, CardState::Matched),
        changed(2, CardState::Matched),
        GameEvent::Won { moves: 3, seconds: 0 },
    ];

    assert_eq!(engine.drain_events(), expected);
    assert!(engine.pending_events().is_empty());
}

/// Presenter dispatch sees the same final state as the engine.
#[test]
fn test_presenter_tracks_engine() {
    let mut engine = abba_engine();
    let mut log = EventLog::new();

    engine.flip(0).unwrap();
    engine.flip(3).unwrap();
    engine.present(&mut log);

    assert_eq!(log.last_state_of(CardIndex::new(0)), Some(CardState::Matched));
    assert_eq!(log.last_state_of(CardIndex::new(3)), Some(CardState::Matched));
    assert_eq!(log.last_state_of(CardIndex::new(1)), None);
}

/// Once won, nothing moves.
#[test]
fn test_won_session_is_frozen() {
    let mut engine = abba_engine();
    for i in [0, 3, 1, 2] {
        engine.flip(i).unwrap();
    }
    assert!(engine.is_won());
    let before = engine.snapshot();

    for i in 0..4 {
        assert_eq!(
            engine.flip(i),
            Err(FlipError::AlreadyMatched { index: CardIndex::new(i) })
        );
    }
    assert_eq!(engine.tick(), None);
    assert_eq!(engine.snapshot(), before);
}

/// Rapid taps during a pending mismatch never open a third card.
#[test]
fn test_rapid_taps_during_mismatch() {
    let mut engine = abba_engine();
    engine.flip(0).unwrap();
    engine.flip(1).unwrap();

    for _ in 0..10 {
        for i in 0..4 {
            let _ = engine.flip(i);
        }
        assert_eq!(engine.deck().count_in_state(CardState::Flipped), 2);
        assert_eq!(engine.selection().len(), 2);
    }
    assert_eq!(engine.moves(), 1);
}

// =============================================================================
// Restart
// =============================================================================

/// Restart wipes counters and cancels timers.
#[test]
fn test_restart_after_partial_game() {
    let mut scheduler = Scheduler::new(abba_engine());
    scheduler.flip(0usize).unwrap();
    scheduler.flip(1usize).unwrap();
    scheduler.advance(Duration::from_millis(1500));
    scheduler.flip(0usize).unwrap();
    scheduler.flip(2usize).unwrap();
    assert_eq!(scheduler.engine().moves(), 2);
    assert_eq!(scheduler.engine().elapsed_seconds(), 1);

    scheduler.restart();

    let engine = scheduler.engine();
    assert_eq!(engine.moves(), 0);
    assert_eq!(engine.elapsed_seconds(), 0);
    assert_eq!(engine.matched_pairs(), 0);
    assert_eq!(engine.session_state(), SessionState::NotStarted);
    assert_eq!(engine.pending_reset(), None);
    assert_eq!(engine.deck().count_in_state(CardState::Hidden), 4);
    assert!(scheduler.pending_tasks().is_empty());

    scheduler.advance(Duration::from_secs(10));
    assert_eq!(scheduler.engine().elapsed_seconds(), 0);
    assert_eq!(scheduler.engine().deck().count_in_state(CardState::Hidden), 4);
}

/// A token from before a restart cannot touch the new session.
#[test]
fn test_late_reset_after_restart_is_ignored() {
    let mut engine = abba_engine();
    engine.flip(0).unwrap();
    let token = engine.flip(1).unwrap().pending_reset().unwrap();

    engine.restart();
    let first = engine.deck().cards()[0].index;
    engine.flip(first).unwrap();

    assert!(!engine.resolve_mismatch(token));
    assert_eq!(engine.card(first).unwrap().state, CardState::Flipped);
    assert_eq!(engine.selection(), &[first]);
}

/// Seeded engines replay the same sequence of decks across restarts.
#[test]
fn test_seeded_restarts_replay() {
    let config = GameConfig::default().with_seed(2024);
    let mut a = GameEngine::new(config.clone()).unwrap();
    let mut b = GameEngine::new(config).unwrap();

    for _ in 0..5 {
        assert_eq!(a.deck(), b.deck());
        a.restart();
        b.restart();
    }
}

// =============================================================================
// Full game
// =============================================================================

/// A player who remembers every symbol clears the classic board in exactly
/// `pair_count` moves when it flips partners directly.
#[test]
fn test_perfect_player_classic_board() {
    let mut scheduler = Scheduler::from_config(GameConfig::default().with_seed(7)).unwrap();
    let deck = scheduler.engine().deck().clone();

    let mut done = vec![false; deck.len()];
    for card in deck.iter() {
        let i = card.index.raw();
        if done[i] {
            continue;
        }
        let partner = deck.partner_of(card.index).unwrap();
        scheduler.flip(card.index).unwrap();
        scheduler.advance(Duration::from_millis(400));
        scheduler.flip(partner).unwrap();
        scheduler.advance(Duration::from_millis(400));
        done[i] = true;
        done[partner.raw()] = true;
    }

    let engine = scheduler.engine();
    assert!(engine.is_won());
    assert_eq!(engine.moves(), 8);
    assert_eq!(engine.matched_pairs(), 8);
    // Sixteen flips 400ms apart: the winning flip lands at 6.0s.
    assert_eq!(engine.elapsed_seconds(), 6);
}

/// A player with no memory still finishes: it always keeps the first
/// face-down card and cycles through candidates for the second.
#[test]
fn test_forgetful_player_finishes() {
    let config = GameConfig::new(4, ["W", "X", "Y", "Z"]).with_seed(3);
    let mut scheduler = Scheduler::from_config(config).unwrap();
    let mut evaluations = 0u32;

    for attempt in 0..1000usize {
        if scheduler.engine().is_won() {
            break;
        }
        let hidden: Vec<CardIndex> = scheduler
            .engine()
            .deck()
            .iter()
            .filter(|c| c.state == CardState::Hidden)
            .map(|c| c.index)
            .collect();
        let first = hidden[0];
        let second = hidden[1 + attempt % (hidden.len() - 1)];

        scheduler.flip(first).unwrap();
        scheduler.flip(second).unwrap();
        evaluations += 1;
        scheduler.advance(Duration::from_secs(1));
    }

    let engine = scheduler.engine();
    assert!(engine.is_won());
    assert_eq!(engine.moves(), evaluations);
    assert_eq!(engine.deck().count_in_state(CardState::Matched), 8);
    assert_eq!(engine.elapsed_seconds(), evaluations - 1);
}
