use laserfall_engine::{Cell, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Style,
};

use crate::ui::widgets::style;

/// How one board cell is painted: a background style and a symbol centred
/// in its two terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPaint {
    style: Style,
    symbol: &'static str,
}

impl CellPaint {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const BLANK: Self = Self::new(style::EMPTY, "");
    pub const DOT: Self = Self::new(style::EMPTY_DOT, ".");
    pub const FLASH: Self = Self::new(style::FLASH, "");

    const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn for_cell(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::DOT,
            Cell::Piece(kind) => Self::for_kind(kind),
        }
    }

    pub fn for_kind(kind: PieceKind) -> Self {
        let style = match kind {
            PieceKind::I => style::I_BLOCK,
            PieceKind::O => style::O_BLOCK,
            PieceKind::T => style::T_BLOCK,
            PieceKind::S => style::S_BLOCK,
            PieceKind::Z => style::Z_BLOCK,
            PieceKind::J => style::J_BLOCK,
            PieceKind::L => style::L_BLOCK,
        };
        Self::new(style, "")
    }

    pub fn paint(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.style);
        #[expect(clippy::cast_possible_truncation)]
        let symbol_width = self.symbol.len() as u16;
        let x = area.x + area.width.saturating_sub(symbol_width).div_ceil(2);
        buf.set_stringn(x, area.y, self.symbol, usize::from(area.width), self.style);
    }
}

/// Lays out a `cols`×`rows` grid of cells centred in `area`.
///
/// Yields `(x, y, rect)` row by row; cells that fall outside `area` get an
/// empty rect.
pub fn cell_grid(area: Rect, cols: u16, rows: u16) -> impl Iterator<Item = (u16, u16, Rect)> {
    let grid = area.centered(
        Constraint::Length(cols * CellPaint::WIDTH),
        Constraint::Length(rows * CellPaint::HEIGHT),
    );
    (0..rows).flat_map(move |y| {
        (0..cols).map(move |x| {
            let rect = Rect::new(
                grid.x + x * CellPaint::WIDTH,
                grid.y + y * CellPaint::HEIGHT,
                CellPaint::WIDTH,
                CellPaint::HEIGHT,
            )
            .intersection(grid);
            (x, y, rect)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_centred() {
        let cells: Vec<_> = cell_grid(Rect::new(0, 0, 10, 4), 2, 2).collect();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], (0, 0, Rect::new(3, 1, 2, 1)));
        assert_eq!(cells[3], (1, 1, Rect::new(5, 2, 2, 1)));
    }

    #[test]
    fn test_paint_dot() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        CellPaint::DOT.paint(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(1, 0)].symbol(), ".");
        assert_eq!(buf[(0, 0)].style().bg, style::EMPTY_DOT.bg);
    }

    #[test]
    fn test_kinds_have_distinct_colours() {
        let mut styles: Vec<_> = PieceKind::ALL
            .iter()
            .map(|&kind| format!("{:?}", CellPaint::for_kind(kind).style))
            .collect();
        styles.sort();
        styles.dedup();
        assert_eq!(styles.len(), PieceKind::LEN);
    }
}
