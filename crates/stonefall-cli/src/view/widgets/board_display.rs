use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use stonefall_engine::{Board, COLS, Cell, Piece, ROWS};

use crate::view::widgets::BlockDisplay;

#[derive(Debug, Clone, Copy)]
enum Overlay {
    Board(Cell),
    Ghost(Cell),
    Piece(Cell),
}

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    active_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            active_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn active_piece(self, piece: Option<Piece>) -> Self {
        Self {
            active_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        COLS as u16 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS as u16 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn cells(&self) -> [[Overlay; COLS]; ROWS] {
        let mut cells = [[Overlay::Board(0); COLS]; ROWS];
        for (row, board_row) in iter::zip(&mut cells, self.board.playable_rows()) {
            for (cell, value) in iter::zip(row, board_row) {
                *cell = Overlay::Board(*value);
            }
        }

        if let Some(ghost) = self.ghost {
            paint_piece(&mut cells, &ghost, Overlay::Ghost);
        }
        if let Some(piece) = self.active_piece {
            paint_piece(&mut cells, &piece, Overlay::Piece);
        }
        cells
    }
}

fn paint_piece(cells: &mut [[Overlay; COLS]; ROWS], piece: &Piece, overlay: fn(Cell) -> Overlay) {
    for (x, y, value) in piece.occupied_positions() {
        // Grid column 0 is the wall
        let (Ok(col), Ok(row)) = (usize::try_from(x - 1), usize::try_from(y)) else {
            continue;
        };
        if let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = overlay(value);
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..COLS).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..ROWS).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<ROWS>(&vertical)
            .into_iter()
            .map(|row| row.layout::<COLS>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.cells()) {
            for (grid_cell, overlay) in iter::zip(grid_row, row) {
                let block_display = match overlay {
                    Overlay::Board(value) | Overlay::Piece(value) => {
                        BlockDisplay::from_cell(value, true)
                    }
                    Overlay::Ghost(value) => BlockDisplay::ghost(value),
                };
                block_display.render(grid_cell, buf);
            }
        }
    }
}
