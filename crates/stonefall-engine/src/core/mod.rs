//! Board and piece primitives.
//!
//! Both types share one coordinate system: the board grid is
//! [`TOTAL_HEIGHT`]×[`TOTAL_WIDTH`] cells, where grid column 0 is the left
//! wall and the last grid row is the floor. A piece at `(x, y)` maps its local
//! cell `(cx, cy)` to grid cell `(cx + x + 1, cy + y)`.

pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of playable columns.
pub const COLS: usize = 10;
/// Number of playable rows.
pub const ROWS: usize = 22;

/// Grid width including the left wall column.
pub const TOTAL_WIDTH: usize = COLS + 1;
/// Grid height including the floor row.
pub const TOTAL_HEIGHT: usize = ROWS + 1;

/// Board cell value.
///
/// `0` is empty, [`WALL`] and [`FLOOR`] mark the border, and locked blocks
/// hold the color index of the piece they came from.
pub type Cell = u8;

pub const EMPTY: Cell = 0;
pub const WALL: Cell = 1;
pub const FLOOR: Cell = 2;
