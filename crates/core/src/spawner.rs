//! Spawner - turns inventory stock into a falling piece
//!
//! A spawn draws uniformly among the kinds that still have stock, takes one
//! of that kind and positions it at rotation 0, horizontally centered on the
//! top row. An empty inventory is not an error: the spawn simply yields no
//! piece and the game idles until the next grant.

use tracing::debug;

use crate::game_state::ActivePiece;
use crate::inventory::Inventory;
use crate::rng::RandomSource;
use crate::types::PieceKind;

/// Result of a spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    /// The new piece, or `None` when the inventory had nothing to give.
    pub piece: Option<ActivePiece>,
    /// Kind taken from the inventory.
    pub consumed: Option<PieceKind>,
    /// Inventory after the spawn; equal to the input when nothing was taken.
    pub inventory: Inventory,
}

/// Draw a random available piece from `inventory`.
pub fn spawn<R: RandomSource>(inventory: &Inventory, board_width: u8, rng: &mut R) -> Spawn {
    let mut available = [PieceKind::I; PieceKind::COUNT];
    let mut len = 0usize;
    for kind in inventory.available() {
        available[len] = kind;
        len += 1;
    }

    if len == 0 {
        debug!("spawn skipped: inventory empty");
        return Spawn {
            piece: None,
            consumed: None,
            inventory: *inventory,
        };
    }

    let kind = available[rng.next_range(len as u32) as usize];
    let Some(next) = inventory.taken(kind) else {
        // `available` only lists kinds with stock.
        return Spawn {
            piece: None,
            consumed: None,
            inventory: *inventory,
        };
    };

    let piece = ActivePiece::spawn(kind, board_width);
    debug!(kind = kind.as_str(), x = piece.x, left = next.count(kind), "spawned piece");

    Spawn {
        piece: Some(piece),
        consumed: Some(kind),
        inventory: next,
    }
}
