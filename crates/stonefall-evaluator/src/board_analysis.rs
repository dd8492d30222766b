use std::cell::OnceCell;

use serde::Serialize;
use stonefall_engine::{Board, COLS, Cell, EMPTY, ROWS};

/// Smallest cell value that counts as a block when measuring heights.
///
/// The wall column holds `1`; every locked piece cell holds a color index of
/// at least `2`.
const MIN_BLOCK_VALUE: Cell = 2;

/// The four board metrics fed into the heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoardMetrics {
    pub height_sum: usize,
    pub completed_lines: usize,
    pub holes: usize,
    pub bumpiness: usize,
}

/// Lazily evaluated metrics of a board snapshot.
///
/// Each metric is computed on first access and cached.
///
/// # Example
///
/// ```
/// use stonefall_engine::Board;
/// use stonefall_evaluator::board_analysis::BoardAnalysis;
///
/// let board = Board::from_ascii(
///     "
///     #.........
///     ###......##
///     ",
/// );
/// let analysis = BoardAnalysis::from_board(&board);
/// assert_eq!(analysis.column_heights()[0], 2);
/// assert_eq!(analysis.height_sum(), 5);
/// ```
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<[usize; COLS]>,
    height_sum: OnceCell<usize>,
    completed_lines: OnceCell<usize>,
    holes: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let board = board.clone();
        Self {
            board,
            column_heights: OnceCell::new(),
            height_sum: OnceCell::new(),
            completed_lines: OnceCell::new(),
            holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Height of each playable column: `ROWS - y` of its topmost block, or 0.
    #[must_use]
    pub fn column_heights(&self) -> &[usize; COLS] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; COLS];
            for (x, h) in column_heights.iter_mut().enumerate() {
                let top = self
                    .board
                    .playable_rows()
                    .position(|row| row[x] >= MIN_BLOCK_VALUE);
                if let Some(y) = top {
                    *h = ROWS - y;
                }
            }
            column_heights
        })
    }

    #[must_use]
    pub fn height_sum(&self) -> usize {
        *self
            .height_sum
            .get_or_init(|| self.column_heights().iter().sum())
    }

    /// Number of filled playable rows.
    #[must_use]
    pub fn completed_lines(&self) -> usize {
        *self
            .completed_lines
            .get_or_init(|| self.board.filled_rows().len())
    }

    /// Number of columns that contain an empty cell directly below a filled one.
    ///
    /// A column counts once no matter how many such cells it has.
    #[must_use]
    pub fn holes(&self) -> usize {
        *self.holes.get_or_init(|| {
            let rows: Vec<&[Cell]> = self.board.playable_rows().collect();
            (0..COLS)
                .filter(|&x| {
                    rows.windows(2)
                        .any(|pair| pair[0][x] != EMPTY && pair[1][x] == EMPTY)
                })
                .count()
        })
    }

    /// Sum of height differences between neighboring columns.
    ///
    /// Scanning left to right, a column that follows an empty column (or the
    /// wall) contributes nothing and only sets the reference height. So
    /// `[0, 5, 0, 3]` scores 5 and `[2, 5, 0]` scores 3 + 5.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            let mut bumpiness = 0;
            let mut prev = 0;
            for &h in self.column_heights() {
                if prev == 0 {
                    prev = h;
                }
                bumpiness += h.abs_diff(prev);
                prev = h;
            }
            bumpiness
        })
    }

    #[must_use]
    pub fn metrics(&self) -> BoardMetrics {
        BoardMetrics {
            height_sum: self.height_sum(),
            completed_lines: self.completed_lines(),
            holes: self.holes(),
            bumpiness: self.bumpiness(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heights(art: &str) -> [usize; COLS] {
        *BoardAnalysis::from_board(&Board::from_ascii(art)).column_heights()
    }

    #[test]
    fn test_empty_board() {
        let analysis = BoardAnalysis::from_board(&Board::new());
        assert_eq!(analysis.column_heights(), &[0; COLS]);
        assert_eq!(analysis.metrics(), BoardMetrics::default());
    }

    #[test]
    fn test_column_heights_use_topmost_block() {
        let h = heights(
            "
            .O........
            .O.......T
            ##.#.....T
            ",
        );
        assert_eq!(h, [1, 3, 0, 1, 0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn test_height_sum() {
        let board = Board::from_ascii(
            "
            ...I......
            ...I......
            ...I......
            ...I....Z.
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.height_sum(), 4 + 1);
    }

    #[test]
    fn test_completed_lines() {
        let board = Board::from_ascii(
            "
            ##########
            #.########
            LLLLLLLLLL
            ",
        );
        assert_eq!(BoardAnalysis::from_board(&board).completed_lines(), 2);
    }

    #[test]
    fn test_holes_count_columns_once() {
        let board = Board::from_ascii(
            "
            #...#.....
            ....#.....
            #.........
            ..#.......
            ",
        );
        // Column 0 has two gaps but counts once; column 2 rests on the floor
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.holes(), 2);
    }

    #[test]
    fn test_bumpiness_skips_after_empty_column() {
        let board = Board::from_ascii(
            "
            .....#....
            .#...#....
            .#...#..#.
            .#.#.#..##
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights(), &[0, 3, 0, 1, 0, 4, 0, 0, 2, 1]);
        // Rises out of an empty column are free, drops into one are not
        assert_eq!(analysis.bumpiness(), 3 + 1 + 4 + 1);
    }

    #[test]
    fn test_bumpiness_adjacent_columns() {
        let board = Board::from_ascii(
            "
            .#........
            ##........
            ###.......
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights()[..3], [2, 3, 1]);
        // |3 - 2| + |1 - 3|, then the empty column 3 adds |0 - 1|
        assert_eq!(analysis.bumpiness(), 1 + 2 + 1);
    }

    #[test]
    fn test_metrics_serialize() {
        let metrics = BoardMetrics {
            height_sum: 1,
            completed_lines: 2,
            holes: 3,
            bumpiness: 4,
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["height_sum"], 1);
        assert_eq!(json["bumpiness"], 4);
    }
}
