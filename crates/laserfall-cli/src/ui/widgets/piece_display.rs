use laserfall_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{CellPaint, cell_grid};

/// Preview of a single piece kind in its spawn orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(piece: Option<PieceKind>) -> Self {
        Self { piece, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    // Wide enough for the I piece, tall enough for the rest.
    pub fn width(&self) -> u16 {
        4 * CellPaint::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellPaint::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.shape();
        #[expect(clippy::cast_possible_truncation)]
        let grid = cell_grid(area, shape.cols() as u16, shape.rows() as u16);
        let filled = CellPaint::for_kind(piece);
        for (x, y, rect) in grid {
            if shape.is_filled(usize::from(x), usize::from(y)) {
                filled.paint(rect, buf);
            } else {
                CellPaint::BLANK.paint(rect, buf);
            }
        }
    }
}
