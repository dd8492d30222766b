use std::str::FromStr;

use arrayvec::ArrayVec;

use super::{
    COLS, Cell, EMPTY, FLOOR, ROWS, TOTAL_HEIGHT, TOTAL_WIDTH, WALL,
    piece::{Piece, PieceKind},
};

type Row = [Cell; TOTAL_WIDTH];

const EMPTY_ROW: Row = {
    let mut row = [EMPTY; TOTAL_WIDTH];
    row[0] = WALL;
    row
};
const FLOOR_ROW: Row = [FLOOR; TOTAL_WIDTH];

/// Cell value used for `#` in ASCII boards.
const ASCII_BLOCK: Cell = PieceKind::T.color();

/// The playfield grid of locked cells plus its permanent border.
///
/// # Layout
///
/// - **Grid dimensions**: 23×11 ([`TOTAL_HEIGHT`]×[`TOTAL_WIDTH`])
/// - **Column 0**: left wall ([`WALL`]) in every playable row
/// - **Row 22**: floor ([`FLOOR`]) across the whole width
/// - **Playable area**: rows `0..22`, columns `1..=10`
///
/// Locking adds a piece's color values into the grid. Line clears delete a
/// row and insert an empty one on top, so rows above the cleared one move
/// down by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; TOTAL_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const INITIAL: Self = {
        let mut rows = [EMPTY_ROW; TOTAL_HEIGHT];
        rows[ROWS] = FLOOR_ROW;
        Self { rows }
    };

    #[must_use]
    pub const fn new() -> Self {
        Self::INITIAL
    }

    /// Returns the cell at grid position `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get_mut(y)?.get_mut(x)
    }

    /// Returns every grid row, including the floor.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; TOTAL_WIDTH]> {
        self.rows.iter()
    }

    /// Returns the playable cells of each playable row, top to bottom.
    pub fn playable_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows[..ROWS].iter().map(|row| &row[1..])
    }

    /// Returns `true` if the playable row `y` has no empty cell.
    #[must_use]
    pub fn is_row_filled(&self, y: usize) -> bool {
        y < ROWS && !self.rows[y].contains(&EMPTY)
    }

    /// Returns the topmost filled playable row.
    #[must_use]
    pub fn first_filled_row(&self) -> Option<usize> {
        (0..ROWS).find(|y| self.is_row_filled(*y))
    }

    /// Returns the indices of all filled playable rows, top to bottom.
    #[must_use]
    pub fn filled_rows(&self) -> ArrayVec<usize, ROWS> {
        (0..ROWS).filter(|y| self.is_row_filled(*y)).collect()
    }

    /// Deletes row `y` and prepends an empty row at the top.
    ///
    /// The floor row cannot be removed; such calls are ignored.
    pub fn remove_row(&mut self, y: usize) {
        if y >= ROWS {
            return;
        }
        self.rows.copy_within(0..y, 1);
        self.rows[0] = EMPTY_ROW;
    }

    /// Removes filled rows until none remain and returns how many were removed.
    ///
    /// The scan restarts from the top after each removal because removing a
    /// row shifts the indices of every row above it.
    pub fn clear_filled_rows(&mut self) -> usize {
        let mut cleared = 0;
        while let Some(y) = self.first_filled_row() {
            self.remove_row(y);
            cleared += 1;
        }
        cleared
    }

    /// Merges a piece into the grid by adding its color values.
    ///
    /// The piece is expected at the position where it was first found
    /// colliding after moving down, so its cells are written one row above
    /// that position. Cells that fall outside the grid are skipped.
    pub fn join_piece(&mut self, piece: &Piece) {
        for (x, y, color) in piece.occupied_positions() {
            if let Some(cell) = self.cell_mut(x, y - 1) {
                *cell += color;
            }
        }
    }

    /// Parses an ASCII-art board, panicking on malformed input.
    ///
    /// See the [`FromStr`] implementation for the format.
    ///
    /// # Panics
    ///
    /// Panics if `art` is not a valid board.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        match art.parse() {
            Ok(board) => board,
            Err(e) => panic!("invalid board art: {e}"),
        }
    }
}

/// Errors returned when parsing an ASCII-art board.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has {rows} rows, more than the playable height")]
    TooManyRows { rows: usize },
    #[display("row {row} has {width} cells, not one per playable column")]
    RowWidth { row: usize, width: usize },
    #[display("invalid cell {ch:?} at row {row}, column {column}")]
    InvalidCell { row: usize, column: usize, ch: char },
}

/// Parses playable rows written as ASCII art.
///
/// Blank lines and surrounding whitespace are ignored. Each remaining line is
/// one row of exactly [`COLS`] cells: `.` is empty, `#` is a locked block and a
/// piece letter (`T`, `S`, `Z`, `J`, `L`, `I`, `O`) is a block of that color.
/// Rows are aligned to the bottom of the board, so short art describes the
/// lowest rows only.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(art: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > ROWS {
            return Err(ParseBoardError::TooManyRows { rows: lines.len() });
        }

        let mut board = Self::INITIAL;
        let top = ROWS - lines.len();
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != COLS {
                return Err(ParseBoardError::RowWidth { row, width });
            }
            for (column, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '.' => EMPTY,
                    '#' => ASCII_BLOCK,
                    _ => PieceKind::from_char(ch)
                        .map(PieceKind::color)
                        .ok_or(ParseBoardError::InvalidCell { row, column, ch })?,
                };
                board.rows[top + row][column + 1] = cell;
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PiecePosition;

    fn filled_row(color: Cell) -> Row {
        let mut row = [color; TOTAL_WIDTH];
        row[0] = WALL;
        row
    }

    #[test]
    fn test_initial_board() {
        let board = Board::new();
        assert_eq!(board.rows().count(), TOTAL_HEIGHT);
        for (y, row) in board.rows().enumerate() {
            if y == ROWS {
                assert!(row.iter().all(|c| *c == FLOOR), "floor row must be border");
                continue;
            }
            assert_eq!(row[0], WALL, "column 0 of row {y} must be the wall");
            assert!(row[1..].iter().all(|c| *c == EMPTY));
        }
        assert!(board.first_filled_row().is_none());
    }

    #[test]
    fn test_cell_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.cell(0, 0), Some(WALL));
        assert_eq!(board.cell(1, 0), Some(EMPTY));
        assert_eq!(board.cell(1, 22), Some(FLOOR));
        assert_eq!(board.cell(-1, 0), None);
        assert_eq!(board.cell(0, -1), None);
        assert_eq!(board.cell(11, 0), None);
        assert_eq!(board.cell(0, 23), None);
    }

    #[test]
    fn test_remove_row_shifts_rows_above() {
        let mut board = Board::from_ascii(
            "
            T.........
            ##########
            .S........
            ",
        );
        board.remove_row(ROWS - 2);

        assert_eq!(board.rows().count(), TOTAL_HEIGHT);
        assert_eq!(board.rows[0], EMPTY_ROW);
        assert_eq!(board.cell(1, 21), Some(EMPTY));
        assert_eq!(board.cell(2, 21), Some(PieceKind::S.color()));
        assert_eq!(board.cell(1, 20), Some(PieceKind::T.color()));
        assert_eq!(board.rows[ROWS], FLOOR_ROW);
    }

    #[test]
    fn test_remove_top_row() {
        let mut board = Board::new();
        board.rows[0] = filled_row(4);
        board.remove_row(0);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_remove_floor_row_is_ignored() {
        let mut board = Board::new();
        board.remove_row(ROWS);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_filled_rows() {
        let board = Board::from_ascii(
            "
            ##########
            #########.
            IIIIIIIIII
            ",
        );
        assert_eq!(board.filled_rows().as_slice(), &[ROWS - 3, ROWS - 1]);
        assert_eq!(board.first_filled_row(), Some(ROWS - 3));
        assert!(!board.is_row_filled(ROWS));
    }

    #[test]
    fn test_clear_filled_rows_rescans_after_each_removal() {
        let mut board = Board::from_ascii(
            "
            ....O.....
            ##########
            .J........
            ##########
            ",
        );
        assert_eq!(board.clear_filled_rows(), 2);
        assert_eq!(
            board,
            Board::from_ascii(
                "
                ....O.....
                .J........
                "
            )
        );
        assert_eq!(board.clear_filled_rows(), 0);
    }

    #[test]
    fn test_join_piece_adds_one_row_above() {
        let mut board = Board::new();
        // Collision position on an empty board: one row too deep
        let piece = Piece::new(PieceKind::O).moved_to(PiecePosition::new(0, 21));
        assert!(piece.check_collision(&board));

        let before = board.clone();
        board.join_piece(&piece);
        for (x, y, _) in piece.occupied_positions() {
            let (old, new) = (before.cell(x, y - 1), board.cell(x, y - 1));
            assert!(new > old, "cell ({x}, {}) must increase", y - 1);
        }
        assert_eq!(
            board,
            Board::from_ascii(
                "
                OO........
                OO........
                "
            )
        );
    }

    #[test]
    fn test_join_piece_is_additive() {
        let mut board = Board::new();
        board.rows[5][3] = 1;
        let piece = Piece::new(PieceKind::T).moved_to(PiecePosition::new(1, 5));
        board.join_piece(&piece);
        // Top cell of the T at grid (3, 4), bottom row at grid (2..=4, 5)
        assert_eq!(board.cell(3, 4), Some(PieceKind::T.color()));
        assert_eq!(board.cell(3, 5), Some(1 + PieceKind::T.color()));
        assert_eq!(board.cell(2, 5), Some(PieceKind::T.color()));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "....".parse::<Board>(),
            Err(ParseBoardError::RowWidth { row: 0, width: 4 })
        );
        assert_eq!(
            "...x......".parse::<Board>(),
            Err(ParseBoardError::InvalidCell {
                row: 0,
                column: 3,
                ch: 'x'
            })
        );
        let art = "..........\n".repeat(ROWS + 1);
        assert_eq!(
            art.parse::<Board>(),
            Err(ParseBoardError::TooManyRows { rows: ROWS + 1 })
        );
    }
}
