//! Game state module - the falling-piece state machine
//!
//! Ties together board, geometry, inventory and spawner. The game is either
//! **falling** (an active piece exists) or **idle** (no active piece, waiting
//! for the next tick to spawn, or stalled because nothing can be spawned).
//!
//! Every transition is a pure function `&GameState -> GameState`: the input
//! snapshot is never modified, so callers can keep, compare or discard old
//! states freely.
//!
//! There is no game-over. Running out of inventory only stalls the game until
//! a grant refills it; a blocked spawn area stalls it until a restart.

use tracing::{debug, trace, warn};

use crate::board::{fill_garbage, Board};
use crate::inventory::Inventory;
use crate::pieces::{get_shape, next_rotation, Shape};
use crate::rng::RandomSource;
use crate::spawner::spawn;
use crate::types::{Direction, GameAction, PieceKind, LINE_CLEAR_POINTS};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Index into the kind's rotation states (wrapped on lookup).
    pub rotation: u8,
    /// Anchor column of the shape's top-left corner.
    pub x: i16,
    /// Anchor row of the shape's top-left corner.
    pub y: i16,
}

impl ActivePiece {
    /// Create a piece at the spawn position for a board of `board_width` columns:
    /// rotation 0, `x = floor((board_width - shape_width) / 2)`, `y = 0`.
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        let shape = get_shape(kind, 0);
        let x = (board_width as i16 - shape.width() as i16).div_euclid(2);
        Self {
            kind,
            rotation: 0,
            x,
            y: 0,
        }
    }

    /// Get the occupancy matrix for the current rotation
    pub fn shape(&self) -> Shape {
        get_shape(self.kind, self.rotation)
    }

    /// Check if the piece fits the board where it stands
    pub fn fits(&self, board: &Board) -> bool {
        board.can_place(self.shape(), self.x, self.y)
    }

    /// Check if the piece is resting on the stack or the floor
    pub fn is_grounded(&self, board: &Board) -> bool {
        !board.can_place(self.shape(), self.x, self.y + 1)
    }

    fn shifted(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    fn rotated(self) -> Self {
        Self {
            rotation: next_rotation(self.kind, self.rotation),
            ..self
        }
    }

    /// Absolute board cells covered by the piece
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> {
        let (x, y) = (self.x, self.y);
        self.shape().cells().map(move |(dx, dy)| (x + dx, y + dy))
    }
}

/// Why an idle game could not spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stall {
    /// Every inventory count is zero. Cleared by any grant.
    OutOfPieces,
    /// The drawn piece overlaps the stack at its spawn position. The piece
    /// goes back to the inventory. Cleared by a restart (or a later draw that fits).
    SpawnBlocked,
}

impl Stall {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stall::OutOfPieces => "out of pieces",
            Stall::SpawnBlocked => "spawn blocked",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    active: Option<ActivePiece>,
    stall: Option<Stall>,
    score: u32,
    lines: u32,
    pieces_placed: u32,
}

impl GameState {
    /// Create an idle game on the given board
    pub fn new(board: Board) -> Self {
        Self {
            board,
            active: None,
            stall: None,
            score: 0,
            lines: 0,
            pieces_placed: 0,
        }
    }

    /// Create an idle 10x20 game whose bottom `rows` rows are garbage
    pub fn with_garbage<R: RandomSource>(rows: u8, rng: &mut R) -> Self {
        Self::new(fill_garbage(Board::new(), rows, rng))
    }

    /// Fresh round on a new board, keeping nothing from this one
    pub fn restart(&self, board: Board) -> Self {
        debug!(score = self.score, lines = self.lines, "round restarted");
        Self::new(board)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    /// Reason the last spawn attempt failed, if the game is stalled
    pub fn stall(&self) -> Option<Stall> {
        self.stall
    }

    /// True while a piece is falling
    pub fn is_falling(&self) -> bool {
        self.active.is_some()
    }

    /// Terminal flag: idle and the last spawn attempt produced nothing
    pub fn is_stalled(&self) -> bool {
        self.active.is_none() && self.stall.is_some()
    }

    /// Advance one gravity step.
    ///
    /// Falling: move the piece down one row, or land it when it cannot move.
    /// Idle: spawn from `inventory`; if nothing can be spawned the game stays
    /// idle and records why.
    pub fn tick<R: RandomSource>(&self, inventory: &Inventory, rng: &mut R) -> (GameState, Inventory) {
        match self.active {
            Some(piece) => {
                let below = piece.shifted(0, 1);
                if below.fits(&self.board) {
                    let mut next = self.clone();
                    next.active = Some(below);
                    (next, *inventory)
                } else {
                    (self.land(piece), *inventory)
                }
            }
            None => self.spawn_from(inventory, rng),
        }
    }

    /// Shift the falling piece one column. Blocked moves leave the state unchanged.
    pub fn move_piece(&self, direction: Direction) -> GameState {
        self.try_replace(|piece| piece.shifted(direction.dx(), 0))
    }

    /// Turn the falling piece to its next rotation state in place (no kicks).
    /// Blocked rotations leave the state unchanged.
    pub fn rotate(&self) -> GameState {
        self.try_replace(ActivePiece::rotated)
    }

    /// Drop the falling piece as far as it goes and land it immediately.
    ///
    /// The game is idle afterwards; the next tick spawns.
    pub fn hard_drop(&self) -> GameState {
        let Some(piece) = self.active else {
            return self.clone();
        };
        let Some(ghost_y) = self.ghost_y() else {
            return self.clone();
        };
        self.land(ActivePiece { y: ghost_y, ..piece })
    }

    /// Apply a player action
    pub fn apply_action(&self, action: GameAction) -> GameState {
        match action {
            GameAction::MoveLeft => self.move_piece(Direction::Left),
            GameAction::MoveRight => self.move_piece(Direction::Right),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => self.hard_drop(),
        }
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i16> {
        let mut piece = self.active?;
        while piece.shifted(0, 1).fits(&self.board) {
            piece = piece.shifted(0, 1);
        }
        Some(piece.y)
    }

    fn try_replace(&self, f: impl FnOnce(ActivePiece) -> ActivePiece) -> GameState {
        let Some(piece) = self.active else {
            return self.clone();
        };
        let candidate = f(piece);
        if !candidate.fits(&self.board) {
            trace!(kind = piece.kind.as_str(), "move rejected");
            return self.clone();
        }
        let mut next = self.clone();
        next.active = Some(candidate);
        next
    }

    /// Merge the piece, clear lines, score them and go idle.
    fn land(&self, piece: ActivePiece) -> GameState {
        let merged = match self.board.merge(piece.shape(), piece.x, piece.y) {
            Ok(board) => board,
            Err(err) => {
                // The active piece is only ever moved onto valid cells.
                warn!(%err, "dropping piece that no longer fits");
                let mut next = self.clone();
                next.active = None;
                return next;
            }
        };

        let (board, cleared) = merged.clear_lines();
        let cleared = cleared as u32;
        let mut next = self.clone();
        next.board = board;
        next.active = None;
        next.stall = None;
        next.lines = self.lines.saturating_add(cleared);
        next.score = self
            .score
            .saturating_add(cleared.saturating_mul(LINE_CLEAR_POINTS));
        next.pieces_placed = self.pieces_placed.saturating_add(1);

        debug!(
            kind = piece.kind.as_str(),
            x = piece.x,
            y = piece.y,
            cleared,
            score = next.score,
            "piece landed"
        );
        next
    }

    fn spawn_from<R: RandomSource>(&self, inventory: &Inventory, rng: &mut R) -> (GameState, Inventory) {
        let result = spawn(inventory, self.board.width(), rng);
        let mut next = self.clone();

        let Some(piece) = result.piece else {
            next.stall = Some(Stall::OutOfPieces);
            return (next, *inventory);
        };

        if !piece.fits(&self.board) {
            debug!(kind = piece.kind.as_str(), "spawn blocked by stack");
            next.stall = Some(Stall::SpawnBlocked);
            return (next, *inventory);
        }

        next.active = Some(piece);
        next.stall = None;
        (next, result.inventory)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Board::new())
    }
}
