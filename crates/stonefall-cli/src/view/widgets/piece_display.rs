use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stonefall_engine::{EMPTY, MAX_SHAPE_SIZE, Shape};

use crate::view::widgets::BlockDisplay;

/// Preview panel for a single piece shape, centered in a fixed-size box.
///
/// The box fits any shape in any rotation.
#[derive(Debug, Default)]
pub struct PieceDisplay<'a> {
    shape: Option<Shape>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            shape: None,
            block: None,
        }
    }

    pub fn shape(self, shape: Option<Shape>) -> Self {
        Self { shape, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        MAX_SHAPE_SIZE as u16 * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        MAX_SHAPE_SIZE as u16 * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        BlockDisplay::from_cell(EMPTY, false).render(area, buf);

        let Some(shape) = self.shape else {
            return;
        };
        let (w, h) = (shape.width() as u16, shape.height() as u16);
        let piece_area = area.centered(
            Constraint::Length(w * BlockDisplay::width()),
            Constraint::Length(h * BlockDisplay::height()),
        );

        let col_constraints = (0..w).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..h).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                let cell = shape.get(x, y);
                if cell != EMPTY {
                    Widget::render(&BlockDisplay::from_cell(cell, false), grid_cell, buf);
                }
            }
        }
    }
}
