//! Deterministic timer driving.
//!
//! Games choose a driver by wrapping the engine: [`Scheduler`] for virtual
//! time (tests, replays, headless play) or, with the `runtime` feature,
//! [`LiveSession`](crate::runtime::LiveSession) for wall-clock time on tokio.

mod scheduler;

pub use scheduler::{ScheduledTask, Scheduler, TaskId, TaskKind};
