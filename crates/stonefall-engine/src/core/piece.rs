use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{COLS, Cell, EMPTY, board::Board};

/// Largest side length of any shape in the catalog.
pub const MAX_SHAPE_SIZE: usize = 4;

/// A piece (stone) at a specific location on the board.
///
/// The shape matrix carries both occupancy and color: every nonzero cell is
/// filled and its value is the color index that ends up on the board when
/// the piece locks. Movement and rotation return new `Piece` values, so a
/// rejected move never leaves a piece in an intermediate state.
///
/// # Example
///
/// ```
/// use stonefall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::new();
/// let piece = Piece::new(PieceKind::T).spawned();
/// assert!(!piece.check_collision(&board));
///
/// let rotated = piece.rotated();
/// assert_eq!(rotated.rotated().rotated().rotated(), piece);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    shape: Shape,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece of the given kind, parked in the preview slot.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self::from_shape(kind.shape())
    }

    /// Creates a piece from an arbitrary shape, parked in the preview slot.
    #[must_use]
    pub fn from_shape(shape: Shape) -> Self {
        Self {
            shape,
            position: PiecePosition::PREVIEW_SLOT,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.position.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// Returns the kind whose color the shape carries, if any.
    #[must_use]
    pub fn kind(&self) -> Option<PieceKind> {
        self.shape
            .filled_cells()
            .find_map(|(_, _, cell)| PieceKind::from_color(cell))
    }

    #[must_use]
    pub fn moved_to(self, position: PiecePosition) -> Self {
        Self { position, ..self }
    }

    /// Returns the piece centered horizontally at the top of the board.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn spawned(self) -> Self {
        let x = COLS.saturating_sub(self.shape.width()) / 2;
        self.moved_to(PiecePosition::new(x as i32, 0))
    }

    #[must_use]
    pub fn shifted(self, dx: i32) -> Self {
        self.moved_to(PiecePosition::new(self.position.x + dx, self.position.y))
    }

    #[must_use]
    pub fn down(self) -> Self {
        self.moved_to(PiecePosition::new(self.position.x, self.position.y + 1))
    }

    #[must_use]
    pub fn up(self) -> Self {
        self.moved_to(PiecePosition::new(self.position.x, self.position.y - 1))
    }

    /// Returns the piece rotated by 90 degrees, keeping its position.
    #[must_use]
    pub fn rotated(self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..self
        }
    }

    pub fn rotate(&mut self) {
        self.shape = self.shape.rotated();
    }

    /// Iterates over the filled cells as `(grid_x, grid_y, color)`.
    ///
    /// Grid coordinates include the wall column, so they may be negative or
    /// beyond the grid for pieces that are off the board.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.shape.filled_cells().map(move |(cx, cy, cell)| {
            (
                cx as i32 + self.position.x + 1,
                cy as i32 + self.position.y,
                cell,
            )
        })
    }

    /// Returns `true` if any filled cell lies outside the grid or on a nonzero
    /// board cell.
    #[must_use]
    pub fn check_collision(&self, board: &Board) -> bool {
        self.occupied_positions()
            .any(|(x, y, _)| board.cell(x, y).is_none_or(|cell| cell != EMPTY))
    }

    /// Returns the lowest position reachable by falling straight down.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while !dropped.down().check_collision(board) {
            dropped = dropped.down();
        }
        dropped
    }
}

/// Position of a piece's bounding box in board coordinates.
///
/// `x` counts playable columns (the wall column sits at `x = -1`), `y` counts
/// rows from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    pub x: i32,
    pub y: i32,
}

impl PiecePosition {
    /// Off-board slot where newly generated pieces wait.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const PREVIEW_SLOT: Self = Self::new(COLS as i32 + 1, 1);
    /// Off-board slot where the held piece waits.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const HOLD_SLOT: Self = Self::new(COLS as i32 + 1, 5);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A well-formed cell matrix of up to [`MAX_SHAPE_SIZE`]×[`MAX_SHAPE_SIZE`].
///
/// Only the top-left `width`×`height` region is meaningful; the rest stays
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    cells: [[Cell; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
    width: usize,
    height: usize,
}

impl Shape {
    /// Builds a shape from a row-major matrix.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or exceeds [`MAX_SHAPE_SIZE`].
    #[must_use]
    pub const fn from_rows<const W: usize, const H: usize>(rows: &[[Cell; W]; H]) -> Self {
        assert!(W > 0 && W <= MAX_SHAPE_SIZE);
        assert!(H > 0 && H <= MAX_SHAPE_SIZE);
        let mut cells = [[EMPTY; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = rows[y][x];
                x += 1;
            }
            y += 1;
        }
        Self {
            cells,
            width: W,
            height: H,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `(x, y)`, or [`EMPTY`] outside the matrix.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y][x]
        } else {
            EMPTY
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells[..self.height]
            .iter()
            .map(|row| &row[..self.width])
    }

    /// Iterates over nonzero cells as `(x, y, color)`.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell != EMPTY)
                .map(move |(x, &cell)| (x, y, cell))
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled_cells().next().is_none()
    }

    /// Rotates the matrix by 90 degrees.
    ///
    /// Columns become rows, read from the rightmost column, so a `w`×`h`
    /// matrix becomes `h`×`w`.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        let mut cells = [[EMPTY; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < self.width {
            let mut x = 0;
            while x < self.height {
                cells[y][x] = self.cells[x][self.width - 1 - y];
                x += 1;
            }
            y += 1;
        }
        Self {
            cells,
            width: self.height,
            height: self.width,
        }
    }
}

/// The seven pieces of the catalog.
///
/// The discriminant is the color index the piece leaves on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    T = 2,
    S = 4,
    Z = 6,
    J = 8,
    L = 10,
    I = 12,
    O = 14,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
        Self::I,
        Self::O,
    ];

    #[must_use]
    pub const fn color(self) -> Cell {
        self as Cell
    }

    #[must_use]
    pub const fn from_color(color: Cell) -> Option<Self> {
        match color {
            2 => Some(Self::T),
            4 => Some(Self::S),
            6 => Some(Self::Z),
            8 => Some(Self::J),
            10 => Some(Self::L),
            12 => Some(Self::I),
            14 => Some(Self::O),
            _ => None,
        }
    }

    /// Returns the spawn orientation of this kind.
    #[must_use]
    pub const fn shape(self) -> Shape {
        PIECE_SHAPES[self.index()]
    }

    const fn index(self) -> usize {
        match self {
            Self::T => 0,
            Self::S => 1,
            Self::Z => 2,
            Self::J => 3,
            Self::L => 4,
            Self::I => 5,
            Self::O => 6,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::T => 'T',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::J => 'J',
            Self::L => 'L',
            Self::I => 'I',
            Self::O => 'O',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'T' => Some(Self::T),
            'S' => Some(Self::S),
            'Z' => Some(Self::Z),
            'J' => Some(Self::J),
            'L' => Some(Self::L),
            'I' => Some(Self::I),
            'O' => Some(Self::O),
            _ => None,
        }
    }
}

const PIECE_SHAPES: [Shape; PieceKind::LEN] = {
    const T: Cell = PieceKind::T.color();
    const S: Cell = PieceKind::S.color();
    const Z: Cell = PieceKind::Z.color();
    const J: Cell = PieceKind::J.color();
    const L: Cell = PieceKind::L.color();
    const I: Cell = PieceKind::I.color();
    const O: Cell = PieceKind::O.color();
    const E: Cell = EMPTY;
    [
        Shape::from_rows(&[[E, T, E], [T, T, T], [E, E, E]]),
        Shape::from_rows(&[[E, S, S], [S, S, E], [E, E, E]]),
        Shape::from_rows(&[[Z, Z, E], [E, Z, Z], [E, E, E]]),
        Shape::from_rows(&[[J, E, E], [J, J, J], [E, E, E]]),
        Shape::from_rows(&[[E, E, L], [L, L, L], [E, E, E]]),
        Shape::from_rows(&[[E, E, E, E], [I, I, I, I], [E, E, E, E], [E, E, E, E]]),
        Shape::from_rows(&[[O, O], [O, O]]),
    ]
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::ROWS;

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    const ROWS_I32: i32 = ROWS as i32;

    #[test]
    fn test_rotation_cycle_closure() {
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind).spawned();
            let mut rotated = piece;
            for _ in 0..4 {
                rotated.rotate();
            }
            assert_eq!(rotated, piece, "{kind:?} should return after 4 rotations");
        }
    }

    #[test]
    fn test_rotate_t_piece() {
        let rotated = PieceKind::T.shape().rotated();
        let rows: Vec<Vec<Cell>> = rotated.rows().map(<[Cell]>::to_vec).collect();
        assert_eq!(rows, vec![vec![0, 2, 0], vec![2, 2, 0], vec![0, 2, 0]]);
    }

    #[test]
    fn test_rotate_non_square_swaps_dimensions() {
        let shape = Shape::from_rows(&[[1, 2, 3]]);
        let rotated = shape.rotated();
        assert_eq!((rotated.width(), rotated.height()), (1, 3));
        let rows: Vec<Vec<Cell>> = rotated.rows().map(<[Cell]>::to_vec).collect();
        assert_eq!(rows, vec![vec![3], vec![2], vec![1]]);

        let back = rotated.rotated().rotated().rotated();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_shapes_use_own_color() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            assert_eq!(shape.filled_cells().count(), 4);
            assert!(shape.filled_cells().all(|(_, _, c)| c == kind.color()));
            assert_eq!(PieceKind::from_color(kind.color()), Some(kind));
            assert_eq!(Piece::new(kind).kind(), Some(kind));
        }
        assert_eq!(PieceKind::from_color(1), None);
    }

    #[test]
    fn test_spawn_position_is_centered() {
        assert_eq!(Piece::new(PieceKind::T).spawned().position(), PiecePosition::new(3, 0));
        assert_eq!(Piece::new(PieceKind::I).spawned().position(), PiecePosition::new(3, 0));
        assert_eq!(Piece::new(PieceKind::O).spawned().position(), PiecePosition::new(4, 0));
    }

    #[test]
    fn test_new_piece_waits_in_preview_slot() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::S);
        assert_eq!(piece.position(), PiecePosition::PREVIEW_SLOT);
        assert!(piece.check_collision(&board));
    }

    #[test]
    fn test_collision_with_walls_and_floor() {
        let board = Board::new();
        let t = Piece::new(PieceKind::T);

        assert!(!t.moved_to(PiecePosition::new(0, 0)).check_collision(&board));
        // Column 0 of the T shape lands on the wall column
        assert!(t.moved_to(PiecePosition::new(-1, 0)).check_collision(&board));
        assert!(!t.moved_to(PiecePosition::new(7, 0)).check_collision(&board));
        // Column 2 of the T shape lands beyond the grid
        assert!(t.moved_to(PiecePosition::new(8, 0)).check_collision(&board));

        assert!(!t.moved_to(PiecePosition::new(3, ROWS_I32 - 2)).check_collision(&board));
        assert!(t.moved_to(PiecePosition::new(3, ROWS_I32 - 1)).check_collision(&board));
    }

    #[test]
    fn test_collision_ignores_empty_shape_cells() {
        let board = Board::new();
        // The top row of the I shape is empty, so it may hang above the grid
        let i = Piece::new(PieceKind::I).moved_to(PiecePosition::new(0, -1));
        assert!(!i.check_collision(&board));
        assert!(i.up().check_collision(&board));
    }

    #[test]
    fn test_collision_with_locked_cells() {
        let board = Board::from_ascii(
            "
            ..........
            ....#.....
            ",
        );
        let t = Piece::new(PieceKind::T);
        // Row 1 of the T lands on the bottom row
        let y = ROWS_I32 - 2;
        assert!(t.moved_to(PiecePosition::new(3, y)).check_collision(&board));
        assert!(!t.moved_to(PiecePosition::new(5, y)).check_collision(&board));
    }

    #[test]
    fn test_simulate_drop_position() {
        let board = Board::new();
        let t = Piece::new(PieceKind::T).spawned();
        let dropped = t.simulate_drop_position(&board);
        assert_eq!(dropped.position(), PiecePosition::new(3, ROWS_I32 - 2));
        assert!(!dropped.check_collision(&board));
        assert!(dropped.down().check_collision(&board));
    }

    #[test]
    fn test_uniform_distribution_covers_catalog() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            let kind: PieceKind = rng.random();
            seen[kind.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
