//! Real-time session driver (feature `runtime`).
//!
//! ```no_run
//! use memory_match::{GameConfig, runtime::LiveSession};
//!
//! # async fn run() -> Result<(), memory_match::runtime::SessionError> {
//! let (mut session, mut events) = LiveSession::start(GameConfig::default())?;
//! session.flip(0usize).ok();
//! while let Some(event) = events.recv().await {
//!     println!("{event}");
//! }
//! # Ok(())
//! # }
//! ```

mod live;

pub use live::{LiveSession, SessionError};
