use arrayvec::ArrayVec;
use serde::{Serialize, Serializer};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::Piece,
    shape::{PieceKind, Shape},
};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Cell {
    /// Nothing locked here.
    #[default]
    Empty,
    /// Locked block, tagged with the colour of the piece it came from.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// Result of a line-clear pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearedLines {
    /// Indices of the removed rows as they were before removal, bottom row first.
    rows: ArrayVec<usize, BOARD_HEIGHT>,
}

impl ClearedLines {
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cleared row indices in descending order.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }
}

/// The fixed 10×20 playfield.
///
/// Row 0 is the top of the visible field. The board never grows or shrinks:
/// clearing rows injects empty rows at the top.
///
/// # Example
///
/// ```
/// use laserfall_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::O).moved(0, 18);
/// assert!(!board.is_piece_colliding(&piece));
///
/// let cleared = board.place(&piece);
/// assert_eq!(cleared.count(), 0);
/// assert_eq!(board.occupied_count(), 4);
/// assert!(board.is_piece_colliding(&piece));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

// Serialized as one string per row, e.g. `"..TTT....."`.
impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows.iter().map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Empty => '.',
                    Cell::Piece(kind) => kind.as_char(),
                })
                .collect::<String>()
        }))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Returns the cell at column `x`, row `y`, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y)?.get(x).copied()
    }

    /// Overwrites a single cell. Positions outside the board are ignored.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| !cell.is_empty()))
    }

    /// Returns the number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Tests whether `shape` anchored at `(x, y)` overlaps a locked cell or
    /// leaves the board through the left, right or bottom edge.
    ///
    /// Cells above the top edge (`y < 0`) are never considered occupied, so a
    /// piece may spawn partially off-grid.
    #[must_use]
    pub fn is_colliding(&self, x: i32, y: i32, shape: &Shape) -> bool {
        shape.filled_cells().any(|(dx, dy)| {
            let (Ok(dx), Ok(dy)) = (i32::try_from(dx), i32::try_from(dy)) else {
                return true;
            };
            self.is_blocked(x + dx, y + dy)
        })
    }

    /// Like [`Self::is_colliding`], using the piece's own shape and anchor.
    #[must_use]
    pub fn is_piece_colliding(&self, piece: &Piece) -> bool {
        let position = piece.position();
        self.is_colliding(position.x(), position.y(), piece.shape())
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        let Ok(x) = usize::try_from(x) else {
            return true;
        };
        if x >= BOARD_WIDTH {
            return true;
        }
        let Ok(y) = usize::try_from(y) else {
            // Above the visible top.
            return false;
        };
        y >= BOARD_HEIGHT || !self.rows[y][x].is_empty()
    }

    /// Writes the piece's kind into every footprint cell on the board.
    ///
    /// Cells above the top edge are dropped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.occupied_positions() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                self.set_cell(x, y, Cell::Piece(piece.kind()));
            }
        }
    }

    /// Locks `piece` into the board and clears any rows it completed.
    pub fn place(&mut self, piece: &Piece) -> ClearedLines {
        self.fill_piece(piece);
        self.clear_full_lines()
    }

    /// Removes every full row at once and compacts the rest downward.
    ///
    /// All full rows are identified before anything moves, so simultaneous
    /// multi-line clears are handled atomically. Surviving rows keep their
    /// relative order and empty rows are injected at the top.
    pub fn clear_full_lines(&mut self) -> ClearedLines {
        let mut cleared = ClearedLines::default();
        for y in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(y) {
                cleared.rows.push(y);
            }
        }
        if cleared.is_empty() {
            return cleared;
        }

        let mut write_y = BOARD_HEIGHT;
        for read_y in (0..BOARD_HEIGHT).rev() {
            if cleared.rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                self.rows[write_y] = self.rows[read_y];
            }
        }
        self.rows[..write_y].fill(EMPTY_ROW);

        log::debug!("cleared rows {:?}", cleared.rows());
        cleared
    }
}
