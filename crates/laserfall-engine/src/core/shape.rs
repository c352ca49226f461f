use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize, Serializer};

/// Largest number of rows or columns a shape may span.
pub const MAX_SHAPE_SIZE: usize = 4;

/// A small boolean matrix describing which cells a piece occupies.
///
/// Shapes are stored row-major with the top row first. They need not be
/// square: the I piece spawns as a single 1×4 row and becomes a 4×1 column
/// after one rotation.
///
/// # Example
///
/// ```
/// use laserfall_engine::{PieceKind, Shape};
///
/// let t = PieceKind::T.shape();
/// assert_eq!((t.rows(), t.cols()), (2, 3));
///
/// let rotated = t.rotated();
/// assert_eq!((rotated.rows(), rotated.cols()), (3, 2));
/// assert_eq!(rotated.rotated().rotated().rotated(), t);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    #[expect(clippy::cast_possible_truncation)]
    const fn from_bits(
        rows: usize,
        cols: usize,
        bits: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
    ) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < rows {
            let mut x = 0;
            while x < cols {
                cells[y][x] = bits[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            rows: rows as u8,
            cols: cols as u8,
            cells,
        }
    }

    /// Builds a shape from rows of booleans.
    ///
    /// Returns `None` if there are no rows, the rows differ in length, or the
    /// shape is larger than [`MAX_SHAPE_SIZE`] in either direction.
    #[must_use]
    pub fn from_rows<R>(rows: &[R]) -> Option<Self>
    where
        R: AsRef<[bool]>,
    {
        let height = rows.len();
        let width = rows.first()?.as_ref().len();
        if height > MAX_SHAPE_SIZE || width == 0 || width > MAX_SHAPE_SIZE {
            return None;
        }
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return None;
            }
            cells[y][..width].copy_from_slice(row);
        }
        Some(Self {
            rows: u8::try_from(height).ok()?,
            cols: u8::try_from(width).ok()?,
            cells,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        usize::from(self.rows)
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        usize::from(self.cols)
    }

    /// Returns whether the cell at column `x`, row `y` is filled.
    ///
    /// Positions outside the shape are reported as empty.
    #[must_use]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.cols() && y < self.rows() && self.cells[y][x]
    }

    /// Returns the `(x, y)` offsets of every filled cell, row by row.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows()).flat_map(move |y| {
            (0..self.cols()).filter_map(move |x| self.cells[y][x].then_some((x, y)))
        })
    }

    /// Returns the shape turned 90° clockwise.
    ///
    /// The new shape has `cols` rows and `rows` columns, and
    /// `rotated[i][j] == self[rows - 1 - j][i]`.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let rows = self.rows();
        let cols = self.cols();
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (i, new_row) in cells.iter_mut().enumerate().take(cols) {
            for (j, cell) in new_row.iter_mut().enumerate().take(rows) {
                *cell = self.cells[rows - 1 - j][i];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.row_strings()).finish()
    }
}

impl Shape {
    fn row_strings(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.rows()).map(move |y| {
            (0..self.cols())
                .map(|x| if self.cells[y][x] { '#' } else { '.' })
                .collect()
        })
    }
}

// Serialized as one string per row, e.g. `[".#.", "###"]` for the T piece.
impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.row_strings())
    }
}

/// The seven canonical piece kinds.
///
/// Each kind has one fixed shape and doubles as the colour tag stored in the
/// board cells it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// Straight bar.
    I = 0,
    /// 2×2 square.
    O = 1,
    T = 2,
    S = 3,
    Z = 4,
    J = 5,
    L = 6,
}

/// Picks one of the seven kinds uniformly at random.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

const SHAPES: [Shape; PieceKind::LEN] = [
    Shape::from_bits(1, 4, [[1, 1, 1, 1], [0; 4], [0; 4], [0; 4]]),
    Shape::from_bits(2, 2, [[1, 1, 0, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
    Shape::from_bits(2, 3, [[0, 1, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
    Shape::from_bits(2, 3, [[0, 1, 1, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
    Shape::from_bits(2, 3, [[1, 1, 0, 0], [0, 1, 1, 0], [0; 4], [0; 4]]),
    Shape::from_bits(2, 3, [[1, 0, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
    Shape::from_bits(2, 3, [[0, 0, 1, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
];

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the spawn orientation of this kind.
    #[must_use]
    pub const fn shape(self) -> Shape {
        SHAPES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use laserfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::L.as_char(), 'L');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn shape(rows: &[&str]) -> Shape {
        let rows = rows
            .iter()
            .map(|row| row.chars().map(|c| c == '#').collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Shape::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_canonical_shapes() {
        assert_eq!(PieceKind::I.shape(), shape(&["####"]));
        assert_eq!(PieceKind::O.shape(), shape(&["##", "##"]));
        assert_eq!(PieceKind::T.shape(), shape(&[".#.", "###"]));
        assert_eq!(PieceKind::S.shape(), shape(&[".##", "##."]));
        assert_eq!(PieceKind::Z.shape(), shape(&["##.", ".##"]));
        assert_eq!(PieceKind::J.shape(), shape(&["#..", "###"]));
        assert_eq!(PieceKind::L.shape(), shape(&["..#", "###"]));
    }

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.shape().filled_cells().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_swaps_dimensions() {
        let rotated = PieceKind::I.shape().rotated();
        assert_eq!(rotated, shape(&["#", "#", "#", "#"]));
    }

    #[test]
    fn test_rotate_is_clockwise() {
        // .#.      #.
        // ###  ->  ##
        //          #.
        let rotated = PieceKind::T.shape().rotated();
        assert_eq!(rotated, shape(&["#.", "##", "#."]));

        // #..      ##
        // ###  ->  #.
        //          #.
        let rotated = PieceKind::J.shape().rotated();
        assert_eq!(rotated, shape(&["##", "#.", "#."]));
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in PieceKind::ALL {
            let original = kind.shape();
            let mut shape = original;
            for _ in 0..4 {
                shape = shape.rotated();
            }
            assert_eq!(shape, original, "{kind:?}");
        }
    }

    #[test]
    fn test_from_rows_rejects_invalid_input() {
        let empty: [&[bool]; 0] = [];
        assert!(Shape::from_rows(&empty).is_none());
        assert!(Shape::from_rows(&[&[true, true][..], &[true][..]]).is_none());
        assert!(Shape::from_rows(&[[true; 5]]).is_none());
        assert!(Shape::from_rows(&[[true]; 5]).is_none());
    }

    #[test]
    fn test_is_filled_outside_shape() {
        let o = PieceKind::O.shape();
        assert!(o.is_filled(1, 1));
        assert!(!o.is_filled(2, 0));
        assert!(!o.is_filled(0, 2));
    }

    #[test]
    fn test_serialize_shape_as_rows() {
        let json = serde_json::to_value(PieceKind::S.shape()).unwrap();
        assert_eq!(json, serde_json::json!([".##", "##."]));
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..200 {
            let kind: PieceKind = rng.random();
            seen[kind as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
