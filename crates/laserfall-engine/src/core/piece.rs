use serde::Serialize;

use super::{BOARD_WIDTH, board::Board, shape::PieceKind, shape::Shape};

/// A falling piece: a shape, its kind and a board-relative anchor.
///
/// Pieces are immutable values; movement and rotation return new pieces
/// and leave collision checks to the caller (see [`Board::is_piece_colliding`]).
///
/// # Coordinate System
///
/// - The anchor is the board position of the shape's top-left cell
/// - X increases rightward (columns), Y increases downward (rows)
/// - Y may be negative while part of the piece sits above the visible top
///
/// # Example
///
/// ```
/// use laserfall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::T);
/// assert_eq!((piece.position().x(), piece.position().y()), (4, 0));
///
/// let moved = piece.right();
/// assert!(!board.is_piece_colliding(&moved));
/// let rotated = moved.rotated_within(&board).unwrap();
/// assert_eq!(rotated.shape().rows(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece of the given kind at its spawn position.
    ///
    /// The piece is horizontally centred (`x = W/2 - cols/2`) on the top row.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        let shape = kind.shape();
        let x = BOARD_WIDTH / 2 - shape.cols() / 2;
        Self {
            kind,
            shape,
            position: PiecePosition::new(i32::try_from(x).unwrap_or_default(), 0),
        }
    }

    /// Creates a piece with an arbitrary shape and anchor.
    #[must_use]
    pub const fn with_shape(kind: PieceKind, shape: Shape, position: PiecePosition) -> Self {
        Self {
            kind,
            shape,
            position,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// Returns the board coordinates of every filled cell of the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| offset(self.position, dx, dy))
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: PiecePosition::new(self.position.x + dx, self.position.y + dy),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.moved(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.moved(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.moved(0, 1)
    }

    /// Returns the piece with its shape turned clockwise around the same anchor.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..*self
        }
    }

    /// Rotates the piece clockwise if the result fits on `board`.
    ///
    /// There is no wall kick: a rotation that collides at the current anchor
    /// is rejected with `None`.
    #[must_use]
    pub fn rotated_within(&self, board: &Board) -> Option<Self> {
        let piece = self.rotated();
        (!board.is_piece_colliding(&piece)).then_some(piece)
    }
}

fn offset(position: PiecePosition, dx: usize, dy: usize) -> (i32, i32) {
    // Shape offsets are bounded by MAX_SHAPE_SIZE, so the conversion cannot fail.
    let dx = i32::try_from(dx).unwrap_or(i32::MAX);
    let dy = i32::try_from(dy).unwrap_or(i32::MAX);
    (position.x + dx, position.y + dy)
}

/// Anchor of a piece on the board.
///
/// Unlike board cells, anchors are signed: a piece may stick out past any
/// edge while a move is being tested, and may sit above row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_positions_are_centred() {
        let expected = [
            (PieceKind::I, 3),
            (PieceKind::O, 4),
            (PieceKind::T, 4),
            (PieceKind::S, 4),
            (PieceKind::Z, 4),
            (PieceKind::J, 4),
            (PieceKind::L, 4),
        ];
        for (kind, x) in expected {
            let piece = Piece::new(kind);
            assert_eq!(piece.position(), PiecePosition::new(x, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_occupied_positions_follow_anchor() {
        let piece = Piece::new(PieceKind::T).moved(-2, 5);
        let cells = piece.occupied_positions().collect::<Vec<_>>();
        assert_eq!(cells, vec![(3, 5), (2, 6), (3, 6), (4, 6)]);
    }

    #[test]
    fn test_moves_do_not_change_shape() {
        let piece = Piece::new(PieceKind::L);
        assert_eq!(piece.left().shape(), piece.shape());
        assert_eq!(piece.down().position(), PiecePosition::new(4, 1));
        assert_eq!(piece.right().left(), piece);
    }

    #[test]
    fn test_rotated_within_rejects_collision() {
        // A vertical I piece hugging the right wall cannot turn horizontal.
        let vertical = Piece::with_shape(
            PieceKind::I,
            PieceKind::I.shape().rotated(),
            PiecePosition::new(9, 5),
        );
        assert!(vertical.rotated_within(&Board::EMPTY).is_none());

        let free = vertical.moved(-5, 0);
        let rotated = free.rotated_within(&Board::EMPTY).unwrap();
        assert_eq!(rotated.shape().cols(), 4);
        assert_eq!(rotated.position(), free.position());
    }
}
