//! Pieces module - piece geometry table
//!
//! Every kind owns an ordered list of rotation states. A state is a small
//! rectangular occupancy matrix anchored at its top-left corner. The lists
//! have different lengths per kind (O has one state, I has two, the rest
//! four), and rotation indices are always taken modulo the list length, so
//! any index is valid.
//!
//! Rotation index `n + 1` is the clockwise turn of state `n`.

use crate::types::PieceKind;

/// Offset of a single occupied cell relative to the shape anchor: (dx, dy)
pub type MinoOffset = (i16, i16);

/// Rectangular occupancy matrix. Rows run top to bottom, non-zero means filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: &'static [&'static [u8]],
}

impl Shape {
    /// Build a shape from static rows. All rows are expected to share one width.
    pub const fn new(rows: &'static [&'static [u8]]) -> Self {
        Self { rows }
    }

    /// Matrix width in cells
    pub fn width(&self) -> u8 {
        self.rows.first().map_or(0, |row| row.len() as u8)
    }

    /// Matrix height in cells
    pub fn height(&self) -> u8 {
        self.rows.len() as u8
    }

    /// Check whether the matrix cell at (col, row) is filled
    pub fn is_filled(&self, col: u8, row: u8) -> bool {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .is_some_and(|&v| v != 0)
    }

    /// Iterate the occupied offsets, row-major.
    pub fn cells(self) -> impl Iterator<Item = MinoOffset> {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0)
                .map(move |(dx, _)| (dx as i16, dy as i16))
        })
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&v| v != 0).count())
            .sum()
    }
}

const I_STATES: [Shape; 2] = [
    Shape::new(&[&[1, 1, 1, 1]]),
    Shape::new(&[&[1], &[1], &[1], &[1]]),
];

const O_STATES: [Shape; 1] = [Shape::new(&[&[1, 1], &[1, 1]])];

const T_STATES: [Shape; 4] = [
    Shape::new(&[&[0, 1, 0], &[1, 1, 1]]),
    Shape::new(&[&[1, 0], &[1, 1], &[1, 0]]),
    Shape::new(&[&[1, 1, 1], &[0, 1, 0]]),
    Shape::new(&[&[0, 1], &[1, 1], &[0, 1]]),
];

const S_STATES: [Shape; 4] = [
    Shape::new(&[&[0, 1, 1], &[1, 1, 0]]),
    Shape::new(&[&[1, 0], &[1, 1], &[0, 1]]),
    Shape::new(&[&[0, 1, 1], &[1, 1, 0]]),
    Shape::new(&[&[1, 0], &[1, 1], &[0, 1]]),
];

const Z_STATES: [Shape; 4] = [
    Shape::new(&[&[1, 1, 0], &[0, 1, 1]]),
    Shape::new(&[&[0, 1], &[1, 1], &[1, 0]]),
    Shape::new(&[&[1, 1, 0], &[0, 1, 1]]),
    Shape::new(&[&[0, 1], &[1, 1], &[1, 0]]),
];

const J_STATES: [Shape; 4] = [
    Shape::new(&[&[1, 0, 0], &[1, 1, 1]]),
    Shape::new(&[&[1, 1], &[1, 0], &[1, 0]]),
    Shape::new(&[&[1, 1, 1], &[0, 0, 1]]),
    Shape::new(&[&[0, 1], &[0, 1], &[1, 1]]),
];

const L_STATES: [Shape; 4] = [
    Shape::new(&[&[0, 0, 1], &[1, 1, 1]]),
    Shape::new(&[&[1, 0], &[1, 0], &[1, 1]]),
    Shape::new(&[&[1, 1, 1], &[1, 0, 0]]),
    Shape::new(&[&[1, 1], &[0, 1], &[0, 1]]),
];

/// All rotation states of a kind, in clockwise order.
pub fn rotation_states(kind: PieceKind) -> &'static [Shape] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
    }
}

/// Number of rotation states for a kind
pub fn rotation_count(kind: PieceKind) -> u8 {
    rotation_states(kind).len() as u8
}

/// Get the occupancy matrix for a kind and rotation (wraps modulo state count)
pub fn get_shape(kind: PieceKind, rotation: u8) -> Shape {
    let states = rotation_states(kind);
    states[rotation as usize % states.len()]
}

/// Rotation index after one clockwise turn, already wrapped.
pub fn next_rotation(kind: PieceKind, rotation: u8) -> u8 {
    let count = rotation_count(kind);
    ((rotation % count) + 1) % count
}

/// Get initial shape for a new piece
pub fn get_spawn_shape(kind: PieceKind) -> Shape {
    get_shape(kind, 0)
}
