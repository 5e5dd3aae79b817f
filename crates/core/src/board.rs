//! Board module - manages the game grid
//!
//! The board is a rectangular grid of binary occupancy flags, 10 columns by
//! 20 rows by default. Uses a flat array (row-major, `y * width + x`) for
//! cache locality.
//! Coordinates: (x, y) where x is the column (left to right) and y the row
//! (top to bottom). Nothing outside `[0, width) x [0, height)` is addressable.
//!
//! Board operations never mutate in place from the game's point of view:
//! `merge` and `clear_lines` return a new board and leave the input untouched.

use tracing::debug;

use crate::error::CoreError;
use crate::pieces::Shape;
use crate::rng::RandomSource;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, GARBAGE_FILL_PERCENT, MAX_BOARD_DIM};

/// The game board - flat occupancy storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<bool>,
}

impl Board {
    /// Create a new empty 10x20 board
    pub fn new() -> Self {
        Self::empty(BOARD_HEIGHT, BOARD_WIDTH)
    }

    /// Create an empty board of exactly `height` rows by `width` columns.
    ///
    /// Zero in either dimension is [`CoreError::InvalidDimensions`].
    pub fn with_size(height: u8, width: u8) -> Result<Self, CoreError> {
        if height == 0 || width == 0 {
            return Err(CoreError::InvalidDimensions { height, width });
        }
        Ok(Self::empty(height, width))
    }

    fn empty(height: u8, width: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Build a board from text rows, `#` for filled and anything else empty.
    ///
    /// Returns `None` for an empty pattern, ragged rows or rows wider/taller
    /// than `MAX_BOARD_DIM`.
    ///
    /// ```
    /// use focusblocks_core::Board;
    ///
    /// let board = Board::from_pattern(&["....", "##.#"]).unwrap();
    /// assert_eq!(board.height(), 2);
    /// assert!(board.is_occupied(3, 1));
    /// ```
    pub fn from_pattern(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.chars().count();
        if width == 0 || width > MAX_BOARD_DIM as usize || height > MAX_BOARD_DIM as usize {
            return None;
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.chars().count() != width {
                return None;
            }
            cells.extend(row.chars().map(|ch| ch == '#'));
        }

        Some(Self {
            width: width as u8,
            height: height as u8,
            cells,
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<bool> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, filled: bool) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = filled;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(false))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(true))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i16, y: i16) -> bool {
        self.index(x, y).is_none()
    }

    /// Cells of row `y`, or `None` past the bottom
    pub fn row(&self, y: usize) -> Option<&[bool]> {
        if y >= self.height as usize {
            return None;
        }
        let width = self.width as usize;
        let start = y * width;
        Some(&self.cells[start..start + width])
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).is_some_and(|row| row.iter().all(|&c| c))
    }

    /// Check if a row has no filled cell
    pub fn is_row_empty(&self, y: usize) -> bool {
        self.row(y).is_some_and(|row| row.iter().all(|&c| !c))
    }

    /// Number of filled cells on the board
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Check that every occupied cell of `shape`, anchored at (x, y), lands
    /// inside the board on an empty cell.
    pub fn can_place(&self, shape: Shape, x: i16, y: i16) -> bool {
        shape
            .cells()
            .all(|(dx, dy)| self.is_valid(x + dx, y + dy))
    }

    /// Return a new board with `shape` written at (x, y).
    ///
    /// The placement is re-validated: a shape that `can_place` rejects yields
    /// [`CoreError::InvalidPlacement`] and no board.
    pub fn merge(&self, shape: Shape, x: i16, y: i16) -> Result<Board, CoreError> {
        if !self.can_place(shape, x, y) {
            return Err(CoreError::InvalidPlacement { x, y });
        }

        let mut next = self.clone();
        for (dx, dy) in shape.cells() {
            next.set(x + dx, y + dy, true);
        }
        Ok(next)
    }

    /// Return a board with every full row removed and the same number of
    /// empty rows inserted at the top, plus the number of rows removed.
    ///
    /// Remaining rows keep their relative order and the dimensions never change.
    pub fn clear_lines(&self) -> (Board, usize) {
        let mut next = self.clone();
        let cleared = next.clear_full_rows();
        if cleared > 0 {
            debug!(cleared, "cleared full rows");
        }
        (next, cleared)
    }

    /// Two-pointer compaction, in place
    fn clear_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut cleared = 0;
        let mut write_y = height;

        // Scan from bottom to top
        for read_y in (0..height).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                // This row is not full, move it down to the write position
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        self.cells[..write_y * width].fill(false);

        cleared
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Produce an otherwise empty `height` x `width` board whose bottom `rows`
/// rows are garbage.
///
/// Each garbage row gets one random gap column; every other cell is filled
/// with `GARBAGE_FILL_PERCENT` probability. No garbage row is ever full.
/// `rows` is clamped to the board height. Zero dimensions are rejected like
/// in [`Board::with_size`].
pub fn generate_garbage<R: RandomSource>(
    height: u8,
    width: u8,
    rows: u8,
    rng: &mut R,
) -> Result<Board, CoreError> {
    Ok(fill_garbage(Board::with_size(height, width)?, rows, rng))
}

/// Replace the bottom `rows` rows of `board` with garbage, as [`generate_garbage`] does.
pub fn fill_garbage<R: RandomSource>(mut board: Board, rows: u8, rng: &mut R) -> Board {
    let height = board.height();
    let width = board.width();
    let rows = rows.min(height);

    for y in (height - rows)..height {
        for x in 0..width {
            board.set(x as i16, y as i16, false);
        }
        let gap = rng.next_range(width as u32) as u8;
        for x in 0..width {
            if x != gap && rng.chance_percent(GARBAGE_FILL_PERCENT) {
                board.set(x as i16, y as i16, true);
            }
        }

        if board.is_row_full(y as usize) {
            // Unreachable while the gap column is skipped; kept so a row can never
            // arrive pre-cleared.
            let x = rng.next_range(width as u32) as i16;
            board.set(x, y as i16, false);
        }
    }

    debug!(height, width, rows, "generated garbage board");
    board
}
