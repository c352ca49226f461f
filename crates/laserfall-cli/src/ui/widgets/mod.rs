use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_paint::*, piece_display::*, session_display::*, stats_display::*,
};

mod board_display;
mod cell_paint;
mod piece_display;
mod session_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    // One shade of red per piece kind, brightest first
    pub const LASER_0: Color = Color::Rgb(0xff, 0x00, 0x00);
    pub const LASER_1: Color = Color::Rgb(0xff, 0x44, 0x44);
    pub const LASER_2: Color = Color::Rgb(0xff, 0x66, 0x66);
    pub const LASER_3: Color = Color::Rgb(0xff, 0x88, 0x88);
    pub const LASER_4: Color = Color::Rgb(0xff, 0xaa, 0xaa);
    pub const LASER_5: Color = Color::Rgb(0xff, 0xcc, 0xcc);
    pub const LASER_6: Color = Color::Rgb(0xff, 0xee, 0xee);

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const FLASH: Style = bg_only(color::WHITE);
    pub const SPECIAL: Style = fg_bg(color::MAGENTA, color::BLACK);

    pub const I_BLOCK: Style = bg_only(color::LASER_0);
    pub const O_BLOCK: Style = bg_only(color::LASER_1);
    pub const T_BLOCK: Style = bg_only(color::LASER_2);
    pub const S_BLOCK: Style = bg_only(color::LASER_3);
    pub const Z_BLOCK: Style = bg_only(color::LASER_4);
    pub const J_BLOCK: Style = bg_only(color::LASER_5);
    pub const L_BLOCK: Style = bg_only(color::LASER_6);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
