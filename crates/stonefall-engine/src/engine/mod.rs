//! Game engine logic and state management.
//!
//! This module orchestrates the [core](crate::core) primitives into gameplay:
//!
//! - [`GameSession`] - The play state machine (board, active/next/held piece)
//! - [`GameStats`] - Score, level, cleared lines and gravity interval
//! - [`PieceSource`] - Injectable piece generation, with
//!   [`RandomPieceSource`] as the uniform random default
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. [`GameSession::start`] resets the board and spawns the first piece
//! 2. The player moves, rotates and holds the active piece
//! 3. Gravity ticks or player drops move it down until it locks
//! 4. The next piece spawns, filled rows are cleared and the lock is scored
//! 5. Repeat until a freshly spawned piece collides (game over)

pub use self::{game_session::*, game_stats::*, piece_generator::*};

mod game_session;
mod game_stats;
mod piece_generator;
