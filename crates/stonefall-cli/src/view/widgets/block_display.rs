use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};
use stonefall_engine::{Cell, EMPTY, PieceKind};

use crate::view::widgets::{color, style};

/// One board or piece cell, two terminal columns wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::T => color::T,
        PieceKind::S => color::S,
        PieceKind::Z => color::Z,
        PieceKind::J => color::J,
        PieceKind::L => color::L,
        PieceKind::I => color::I,
        PieceKind::O => color::O,
    }
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    /// Displays a cell value: empty, a piece color, or gray for anything else.
    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        if cell == EMPTY {
            return if show_dots {
                Self::new(style::EMPTY_DOT, " .")
            } else {
                Self::new(style::EMPTY, "")
            };
        }
        match PieceKind::from_color(cell) {
            Some(kind) => Self::new(style::block(piece_color(kind)), ""),
            None => Self::new(style::UNKNOWN, ""),
        }
    }

    /// Displays the landing preview of a piece cell in a dimmed color.
    pub fn ghost(cell: Cell) -> Self {
        match PieceKind::from_color(cell) {
            Some(kind) => Self::new(style::ghost(piece_color(kind)), ""),
            None => Self::new(style::ghost(color::GRAY), ""),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol).style(self.style).render(area, buf);
    }
}
