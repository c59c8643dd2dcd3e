//! Engine-to-presentation events.
//!
//! The engine only queues facts; deciding how to show them is the
//! presenter's job.

pub mod event;
pub mod presenter;

pub use event::GameEvent;
pub use presenter::{EventLog, Presenter};
