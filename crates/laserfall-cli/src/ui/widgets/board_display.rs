use laserfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{CellPaint, cell_grid};

#[expect(clippy::cast_possible_truncation)]
const COLS: u16 = BOARD_WIDTH as u16;
#[expect(clippy::cast_possible_truncation)]
const ROWS: u16 = BOARD_HEIGHT as u16;

/// The playfield with the falling piece drawn on top of the locked cells.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a Piece>,
    flash_rows: &'a [usize],
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            flash_rows: &[],
            block: None,
        }
    }

    pub fn falling_piece(self, falling_piece: Option<&'a Piece>) -> Self {
        Self {
            falling_piece,
            ..self
        }
    }

    /// Rows painted solid white, as reported by the last line clear.
    pub fn flash_rows(self, flash_rows: &'a [usize]) -> Self {
        Self { flash_rows, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        COLS * CellPaint::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        ROWS * CellPaint::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mut board = self.board.clone();
        if let Some(piece) = self.falling_piece {
            board.fill_piece(piece);
        }

        for (x, y, rect) in cell_grid(area, COLS, ROWS) {
            let (x, y) = (usize::from(x), usize::from(y));
            let paint = if self.flash_rows.contains(&y) {
                CellPaint::FLASH
            } else {
                board.cell(x, y).map_or(CellPaint::BLANK, CellPaint::for_cell)
            };
            paint.paint(rect, buf);
        }
    }
}
