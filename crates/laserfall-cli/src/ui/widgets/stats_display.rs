use std::iter;

use laserfall_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS.len() as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameSession) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameSession) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|session| session.score().to_string()),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|session| session.level().to_string()),
    Row::LabelValue("LINES:", &|session| session.lines().to_string()),
    Row::LabelValue("COMBO:", &|session| format_combo(session.combo())),
    Row::LabelValue("DIFFICULTY:", &|session| {
        format_difficulty(session.difficulty_multiplier())
    }),
    Row::LabelValue("MODE:", &|session| {
        format_special_mode(session.special_mode_remaining_secs())
    }),
    Row::Empty,
    Row::LabelValue("PIECES:", &|session| session.pieces_placed().to_string()),
    Row::LabelValue("MAX COMBO:", &|session| session.max_combo().to_string()),
    Row::LabelValue("TETRIS:", &|session| {
        session.stats().line_cleared_counter()[4].to_string()
    }),
];

pub fn format_combo(combo: u32) -> String {
    format!("{combo}x")
}

pub fn format_difficulty(multiplier: f64) -> String {
    format!("{multiplier:.1}")
}

pub fn format_special_mode(remaining_secs: Option<u64>) -> String {
    match remaining_secs {
        Some(secs) => format!("LASER {secs}s"),
        None => "normal".to_owned(),
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let value_style = if self.session.is_special_mode() {
            style::SPECIAL
        } else {
            style
        };

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), value_style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    render_label_value(label, &value(self.session), style, area, buf);
                }
            }
        }
    }
}

fn render_label_value(label: &str, value: &str, style: Style, area: Rect, buf: &mut Buffer) {
    let [label_area, value_area] = area.layout(&Layout::horizontal([
        Constraint::Length(11),
        Constraint::Fill(1),
    ]));
    Line::styled(label, style)
        .left_aligned()
        .render(label_area, buf);
    Line::styled(value, style)
        .right_aligned()
        .render(value_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_values() {
        assert_eq!(format_combo(0), "0x");
        assert_eq!(format_combo(3), "3x");
        assert_eq!(format_difficulty(1.0), "1.0");
        assert_eq!(format_difficulty(1.0 + 3.0 * 0.1), "1.3");
        assert_eq!(format_special_mode(Some(7)), "LASER 7s");
        assert_eq!(format_special_mode(None), "normal");
    }

    #[test]
    fn test_render_fresh_session() {
        let mut session = GameSession::new();
        let _ = session.new_game();
        let widget = StatsDisplay::new(&session);
        let area = Rect::new(0, 0, widget.width(), widget.height());
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let first_row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_owned())
            .collect();
        assert!(first_row.starts_with("SCORE:"));
        let combo_row: String = (0..area.width)
            .map(|x| buf[(x, 5)].symbol().to_owned())
            .collect();
        assert!(combo_row.starts_with("COMBO:"));
        assert!(combo_row.trim_end().ends_with("0x"));
    }
}
