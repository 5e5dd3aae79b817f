//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget/layout libraries and instead renders into a simple
//! framebuffer; [`Screen`] writes only what changed between frames.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Show the board and the ranked task list in one frame
//! - Allow precise control over aspect ratio (e.g. 2 chars wide per cell)

pub mod fb;
pub mod game_view;
pub mod screen;

pub use focusblocks_core as core;
pub use focusblocks_engine as engine;
pub use focusblocks_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, ViewState, Viewport};
pub use screen::{Painted, Screen};
