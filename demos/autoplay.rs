//! Plays a seeded classic game with a perfect-memory bot and prints every
//! engine event.
//!
//! Time is virtual, so the whole game runs instantly.
//!
//! ```text
//! cargo run --example autoplay -- 42
//! RUST_LOG=memory_match=debug cargo run --example autoplay
//! ```

use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

use memory_match::{CardIndex, CardState, GameConfig, Presenter, Scheduler, Symbol};

/// Thinking time between two flips.
const THINK: Duration = Duration::from_millis(600);

struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn on_card_state_changed(&mut self, index: CardIndex, state: CardState) {
        println!("  {index} -> {state:?}");
    }

    fn on_moves_changed(&mut self, moves: u32) {
        println!("moves: {moves}");
    }

    fn on_timer_tick(&mut self, seconds: u32) {
        println!("  [{seconds}s]");
    }

    fn on_win(&mut self, moves: u32, seconds: u32) {
        println!("won in {moves} moves and {seconds}s");
    }

    fn on_dealt(&mut self, card_count: usize) {
        println!("dealt {card_count} cards");
    }
}

/// Remembers every symbol it has seen.
#[derive(Default)]
struct Bot {
    seen: FxHashMap<CardIndex, Symbol>,
}

impl Bot {
    /// Remembered cards that are still face down.
    fn remembered(&self, scheduler: &Scheduler) -> Vec<(CardIndex, Symbol)> {
        let mut cards: Vec<(CardIndex, Symbol)> = self
            .seen
            .iter()
            .filter(|(index, _)| {
                scheduler
                    .engine()
                    .card(**index)
                    .is_some_and(|card| card.state == CardState::Hidden)
            })
            .map(|(index, symbol)| (*index, symbol.clone()))
            .collect();
        cards.sort();
        cards
    }

    /// A remembered pair of face-down cards.
    fn known_pair(&self, scheduler: &Scheduler) -> Option<(CardIndex, CardIndex)> {
        let cards = self.remembered(scheduler);
        cards.iter().enumerate().find_map(|(n, (a, symbol))| {
            cards[n + 1..]
                .iter()
                .find(|(_, other)| other == symbol)
                .map(|(b, _)| (*a, *b))
        })
    }

    /// A remembered face-down card showing `symbol`, other than `index`.
    fn partner_of(
        &self,
        scheduler: &Scheduler,
        index: CardIndex,
        symbol: &Symbol,
    ) -> Option<CardIndex> {
        self.remembered(scheduler)
            .into_iter()
            .find(|(other, s)| *other != index && s == symbol)
            .map(|(other, _)| other)
    }

    fn unseen(&self, scheduler: &Scheduler, except: Option<CardIndex>) -> Option<CardIndex> {
        scheduler
            .engine()
            .deck()
            .iter()
            .filter(|card| card.state == CardState::Hidden)
            .map(|card| card.index)
            .find(|index| Some(*index) != except && !self.seen.contains_key(index))
    }

    /// Flip one card and learn its symbol.
    fn flip(&mut self, scheduler: &mut Scheduler, index: CardIndex) -> Option<Symbol> {
        let outcome = scheduler.flip(index).ok()?;
        let symbol = outcome.card.symbol;
        self.seen.insert(index, symbol.clone());
        scheduler.advance(THINK);
        Some(symbol)
    }

    /// Play one move: two flips.
    fn play_move(&mut self, scheduler: &mut Scheduler) -> Option<()> {
        if let Some((a, b)) = self.known_pair(scheduler) {
            self.flip(scheduler, a)?;
            self.flip(scheduler, b)?;
            return Some(());
        }

        let first = self.unseen(scheduler, None)?;
        let symbol = self.flip(scheduler, first)?;
        let second = self
            .partner_of(scheduler, first, &symbol)
            .or_else(|| self.unseen(scheduler, Some(first)))?;
        self.flip(scheduler, second)?;
        Some(())
    }
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);

    let mut scheduler = match Scheduler::from_config(GameConfig::default().with_seed(seed)) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            eprintln!("bad configuration: {err}");
            return;
        }
    };
    info!(seed, "autoplay started");

    let mut presenter = ConsolePresenter;
    let mut bot = Bot::default();
    while !scheduler.engine().is_won() {
        scheduler.present(&mut presenter);
        if bot.play_move(&mut scheduler).is_none() {
            break;
        }
        // Let a mismatch turn back before the next move.
        let delay = scheduler.engine().config().mismatch_delay;
        scheduler.advance(delay);
    }
    scheduler.present(&mut presenter);
}
