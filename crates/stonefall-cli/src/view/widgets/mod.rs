use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, evaluation_display::*, key_binding_display::*,
    piece_display::*, session_display::*, session_stats_display::*,
};

mod block_display;
mod board_display;
mod evaluation_display;
mod key_binding_display;
mod piece_display;
mod session_display;
mod session_stats_display;

pub mod color {
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(35, 35, 35);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    // Piece colors, indexed by the cell value they leave on the board.
    // Only fill colors: a terminal cell has no separate outline to draw.
    pub const T: Color = Color::Rgb(80, 0, 160);
    pub const S: Color = Color::Rgb(50, 200, 50);
    pub const Z: Color = Color::Rgb(200, 0, 0);
    pub const J: Color = Color::Rgb(0, 0, 200);
    pub const L: Color = Color::Rgb(200, 80, 0);
    pub const I: Color = Color::Rgb(0, 100, 200);
    pub const O: Color = Color::Rgb(200, 200, 0);

    /// Halves each RGB channel; other colors are returned unchanged.
    pub const fn dimmed(color: Color) -> Color {
        match color {
            Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
            other => other,
        }
    }
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::view::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const UNKNOWN: Style = bg_only(color::GRAY);

    pub const fn block(color: Color) -> Style {
        bg_only(color)
    }

    pub const fn ghost(color: Color) -> Style {
        bg_only(color::dimmed(color))
    }
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
