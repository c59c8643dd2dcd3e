//! Logical-time timer driver.
//!
//! `Scheduler` owns an engine and a virtual clock. It schedules the two
//! suspension points of a session:
//! 1. The elapsed-time tick, every `tick_interval` while the session is active
//! 2. The mismatch reset, `mismatch_delay` after a mismatched pair
//!
//! Time only moves on [`Scheduler::advance`], so every interleaving of flips,
//! ticks and resets is reproducible.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cards::CardIndex;
use crate::core::{ConfigError, FlipError, GameConfig};
use crate::engine::{FlipOutcome, GameEngine, GameInput, ResetToken};
use crate::events::{GameEvent, Presenter};

/// Unique identifier for a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// What a task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Mismatch reset for the given token.
    Reset(ResetToken),
    /// One elapsed-time tick.
    Tick,
}

impl TaskKind {
    /// Resets fire before ticks due at the same instant.
    const fn order(self) -> u8 {
        match self {
            TaskKind::Reset(_) => 0,
            TaskKind::Tick => 1,
        }
    }
}

/// A task waiting for its due time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Unique identifier, increasing in scheduling order.
    pub id: TaskId,
    /// Virtual time at which the task fires.
    pub due: Duration,
    /// Session generation the task was scheduled for.
    pub generation: u64,
    /// Action to perform.
    pub kind: TaskKind,
}

impl ScheduledTask {
    fn sort_key(&self) -> (Duration, u8, TaskId) {
        (self.due, self.kind.order(), self.id)
    }
}

/// Deterministic timer driver around a [`GameEngine`].
///
/// ```
/// use std::time::Duration;
/// use memory_match::{GameConfig, Scheduler};
///
/// let mut scheduler = Scheduler::from_config(GameConfig::default().with_seed(1)).unwrap();
/// scheduler.flip(0usize).unwrap();
///
/// scheduler.advance(Duration::from_secs(3));
/// assert_eq!(scheduler.engine().elapsed_seconds(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Scheduler {
    engine: GameEngine,
    now: Duration,
    tasks: Vec<ScheduledTask>,
    next_id: u64,
}

impl Scheduler {
    /// Drive an existing engine. Scheduling starts from the engine's current
    /// state at virtual time zero.
    pub fn new(engine: GameEngine) -> Self {
        let mut scheduler = Self {
            engine,
            now: Duration::ZERO,
            tasks: Vec::new(),
            next_id: 0,
        };
        scheduler.sync();
        scheduler
    }

    /// Build an engine from `config` and drive it.
    pub fn from_config(config: GameConfig) -> Result<Self, ConfigError> {
        GameEngine::new(config).map(Self::new)
    }

    /// The driven engine.
    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Stop driving and hand the engine back.
    #[must_use]
    pub fn into_engine(self) -> GameEngine {
        self.engine
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Tasks waiting to fire, in firing order.
    #[must_use]
    pub fn pending_tasks(&self) -> Vec<ScheduledTask> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by_key(ScheduledTask::sort_key);
        tasks
    }

    /// Virtual time of the next task, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Flip a card and schedule whatever timers the flip started.
    pub fn flip(&mut self, index: impl Into<CardIndex>) -> Result<FlipOutcome, FlipError> {
        let outcome = self.engine.flip(index)?;
        self.sync();
        Ok(outcome)
    }

    /// Deal a new session and cancel every scheduled task.
    pub fn restart(&mut self) {
        self.engine.restart();
        self.tasks.clear();
        self.sync();
    }

    /// Replace the configuration; cancels every scheduled task on success.
    pub fn initialize(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        self.engine.initialize(config)?;
        self.tasks.clear();
        self.sync();
        Ok(())
    }

    /// Move virtual time forward by `delta`, firing every task due on the
    /// way in due order. Returns the number of tasks that changed the engine.
    pub fn advance(&mut self, delta: Duration) -> usize {
        let target = self.now.saturating_add(delta);
        let mut applied = 0;

        while let Some(task) = self.pop_due(target) {
            self.now = task.due;
            if self.fire(task) {
                applied += 1;
            }
            self.sync();
        }

        self.now = target;
        applied
    }

    /// Advance straight to the next scheduled task and fire it.
    ///
    /// Returns `false` when nothing is scheduled.
    pub fn advance_to_next(&mut self) -> bool {
        match self.next_due() {
            Some(due) => {
                self.advance(due.saturating_sub(self.now));
                true
            }
            None => false,
        }
    }

    /// Take the engine's queued events.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.engine.drain_events()
    }

    /// Drain the engine's queued events into a presenter.
    pub fn present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        self.engine.present(presenter);
    }

    fn pop_due(&mut self, target: Duration) -> Option<ScheduledTask> {
        let (position, _) = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= target)
            .min_by_key(|(_, task)| task.sort_key())?;
        Some(self.tasks.remove(position))
    }

    fn fire(&mut self, task: ScheduledTask) -> bool {
        trace!(id = %task.id, due = ?task.due, kind = ?task.kind, "task fired");
        if task.generation != self.engine.generation() {
            return false;
        }
        match task.kind {
            TaskKind::Tick => self.engine.tick().is_some(),
            TaskKind::Reset(token) => self.engine.resolve_mismatch(token),
        }
    }

    /// Reconcile scheduled tasks with the engine state.
    fn sync(&mut self) {
        let generation = self.engine.generation();
        let running = self.engine.is_clock_running();
        let pending = self.engine.pending_reset();

        self.tasks.retain(|task| {
            task.generation == generation
                && match task.kind {
                    TaskKind::Tick => running,
                    TaskKind::Reset(token) => pending == Some(token),
                }
        });

        if running && !self.tasks.iter().any(|t| t.kind == TaskKind::Tick) {
            self.schedule(self.engine.config().tick_interval, TaskKind::Tick);
        }

        if let Some(token) = pending {
            let kind = TaskKind::Reset(token);
            if !self.tasks.iter().any(|t| t.kind == kind) {
                self.schedule(self.engine.config().mismatch_delay, kind);
            }
        }
    }

    /// Schedule `kind` to fire `delay` from now. A due time past the end of
    /// the virtual clock is never reached, so nothing is scheduled.
    fn schedule(&mut self, delay: Duration, kind: TaskKind) {
        let Some(due) = self.now.checked_add(delay) else {
            trace!(?delay, ?kind, "task beyond clock range dropped");
            return;
        };
        self.next_id += 1;
        let task = ScheduledTask {
            id: TaskId(self.next_id),
            due,
            generation: self.engine.generation(),
            kind,
        };
        trace!(id = %task.id, ?due, ?kind, "task scheduled");
        self.tasks.push(task);
    }
}

impl GameInput for Scheduler {
    fn flip(&mut self, index: CardIndex) -> Result<FlipOutcome, FlipError> {
        Scheduler::flip(self, index)
    }

    fn restart(&mut self) {
        Scheduler::restart(self);
    }
}
