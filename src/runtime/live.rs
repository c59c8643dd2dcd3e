//! Wall-clock timer driver on tokio.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use derive_more::{Display, Error, From};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

use crate::cards::CardIndex;
use crate::core::{ConfigError, FlipError, GameConfig};
use crate::engine::{FlipOutcome, GameEngine, GameInput, GameSnapshot, ResetToken};
use crate::events::GameEvent;

/// Failure to start a live session.
#[derive(Clone, Debug, Display, Error, From, PartialEq, Eq)]
pub enum SessionError {
    /// The configuration was rejected.
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),

    /// Started outside a tokio runtime.
    #[display("a live session must be started inside a tokio runtime")]
    #[from(ignore)]
    NoRuntime,
}

/// Engine plus the channel its events are forwarded to.
struct Shared {
    engine: Mutex<GameEngine>,
    events: UnboundedSender<GameEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, GameEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push every queued engine event to the channel.
    fn forward(&self, engine: &mut GameEngine) {
        for event in engine.drain_events() {
            // A dropped receiver only means nobody is rendering.
            let _ = self.events.send(event);
        }
    }
}

/// Timer-relevant engine state, read under the lock.
#[derive(Clone, Copy, Debug)]
struct TimerState {
    generation: u64,
    running: bool,
    pending: Option<ResetToken>,
    tick_interval: Duration,
    mismatch_delay: Duration,
}

impl TimerState {
    fn of(engine: &GameEngine) -> Self {
        Self {
            generation: engine.generation(),
            running: engine.is_clock_running(),
            pending: engine.pending_reset(),
            tick_interval: engine.config().tick_interval,
            mismatch_delay: engine.config().mismatch_delay,
        }
    }
}

/// A game session driven by real time.
///
/// All mutations are serialized behind one mutex. The tick runs as a spawned
/// interval task and each mismatch reset as a spawned sleep; both re-check
/// the session generation or reset token under the lock before touching the
/// engine, and `restart` aborts them outright.
pub struct LiveSession {
    shared: Arc<Shared>,
    runtime: Handle,
    ticker: Option<JoinHandle<()>>,
    reset: Option<(ResetToken, JoinHandle<()>)>,
}

impl LiveSession {
    /// Start a session on the current tokio runtime.
    ///
    /// Returns the session and the receiving end of its event stream. The
    /// initial `Dealt` event is already in the channel.
    #[instrument(skip_all, fields(pairs = config.pair_count))]
    pub fn start(config: GameConfig) -> Result<(Self, UnboundedReceiver<GameEvent>), SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let engine = GameEngine::new(config)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            engine: Mutex::new(engine),
            events: tx,
        });
        {
            let mut engine = shared.lock();
            shared.forward(&mut engine);
        }

        info!("live session started");
        let session = Self {
            shared,
            runtime,
            ticker: None,
            reset: None,
        };
        Ok((session, rx))
    }

    /// Flip a card. Synchronous and authoritative.
    pub fn flip(&mut self, index: impl Into<CardIndex>) -> Result<FlipOutcome, FlipError> {
        let (outcome, timers) = {
            let mut engine = self.shared.lock();
            let outcome = engine.flip(index)?;
            self.shared.forward(&mut engine);
            (outcome, TimerState::of(&engine))
        };
        self.sync_timers(timers);
        Ok(outcome)
    }

    /// Deal a new session, cancelling the tick and any pending reset.
    pub fn restart(&mut self) {
        self.cancel_timers();
        let timers = {
            let mut engine = self.shared.lock();
            engine.restart();
            self.shared.forward(&mut engine);
            TimerState::of(&engine)
        };
        self.sync_timers(timers);
    }

    /// Renderer-facing view of the session.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.shared.lock().snapshot()
    }

    /// Run a read-only query against the engine.
    pub fn with_engine<R>(&self, query: impl FnOnce(&GameEngine) -> R) -> R {
        let engine = self.shared.lock();
        query(&*engine)
    }

    /// Is the tick task alive?
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn sync_timers(&mut self, timers: TimerState) {
        if timers.running {
            if !self.is_ticking() {
                self.spawn_ticker(timers.generation, timers.tick_interval);
            }
        } else if let Some(task) = self.ticker.take() {
            debug!("tick timer stopped");
            task.abort();
        }

        match timers.pending {
            Some(token) if self.reset.as_ref().map(|(t, _)| *t) != Some(token) => {
                self.spawn_reset(token, timers.mismatch_delay);
            }
            Some(_) => {}
            None => self.reset = None,
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(task) = self.ticker.take() {
            task.abort();
        }
        if let Some((_, task)) = self.reset.take() {
            task.abort();
        }
    }

    fn spawn_ticker(&mut self, generation: u64, period: Duration) {
        let Some(start) = Instant::now().checked_add(period) else {
            debug!(generation, ?period, "tick period out of range, clock not started");
            return;
        };
        debug!(generation, ?period, "tick timer started");
        let shared = Arc::clone(&self.shared);
        let task = self.runtime.spawn(async move {
            let mut interval = time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let ticked = {
                    let mut engine = shared.lock();
                    let ticked = engine.generation() == generation && engine.tick().is_some();
                    shared.forward(&mut engine);
                    ticked
                };
                if !ticked {
                    break;
                }
            }
        });
        self.ticker = Some(task);
    }

    fn spawn_reset(&mut self, token: ResetToken, delay: Duration) {
        debug!(%token, ?delay, "mismatch reset scheduled");
        let shared = Arc::clone(&self.shared);
        let task = self.runtime.spawn(async move {
            time::sleep(delay).await;
            let mut engine = shared.lock();
            if engine.resolve_mismatch(token) {
                shared.forward(&mut engine);
            }
        });
        self.reset = Some((token, task));
    }
}

impl GameInput for LiveSession {
    fn flip(&mut self, index: CardIndex) -> Result<FlipOutcome, FlipError> {
        LiveSession::flip(self, index)
    }

    fn restart(&mut self) {
        LiveSession::restart(self);
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

impl std::fmt::Debug for LiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSession")
            .field("ticking", &self.is_ticking())
            .field("pending_reset", &self.reset.as_ref().map(|(t, _)| *t))
            .finish_non_exhaustive()
    }
}
