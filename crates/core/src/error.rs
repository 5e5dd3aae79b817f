//! Error types for the game core.
//!
//! Ordinary game conditions (empty inventory, blocked moves, rotations into a
//! wall) are not errors; they resolve to no-ops or idle transitions. Only
//! contract violations surface here.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoreError {
    /// `merge` was called with a placement that `can_place` rejects.
    #[error("shape does not fit at ({x}, {y}): out of bounds or overlapping")]
    InvalidPlacement { x: i16, y: i16 },
    /// A board needs at least one row and one column.
    #[error("board must be at least 1x1, got {height} rows by {width} columns")]
    InvalidDimensions { height: u8, width: u8 },
}
