//! Session engine: one ordered command path over game, inventory and tasks
//!
//! The host never touches [`focusblocks_core`] state directly. Key presses,
//! timer ticks and task edits all become a [`Command`] applied through
//! [`Session::apply`], which returns an [`Outcome`] or a [`CommandError`]
//! with a stable code.

pub mod command;
pub mod session;

pub use command::{Command, CommandError, Outcome, TaskDraft, TaskField};
pub use session::{Profile, Session, SessionConfig};
