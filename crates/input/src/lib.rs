//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events onto session commands and host-side task
//! navigation. Holds no state: selection and title entry live in the host.

pub mod map;

pub use focusblocks_engine as engine;
pub use focusblocks_types as types;

pub use map::{handle_entry_key, handle_key_event, should_quit, EntryKey, HostCommand};
