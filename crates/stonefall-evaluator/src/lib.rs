//! Static board evaluation for stonefall.
//!
//! - [`board_analysis`] - Lazily computed board metrics (column heights, height
//!   sum, completed lines, holes, bumpiness)
//! - [`heuristic`] - Weighted sum of those metrics, with serde-loadable weights
//!
//! Evaluation is a diagnostic: it rates the board as it is and never searches
//! for placements.
//!
//! # Example
//!
//! ```
//! use stonefall_engine::Board;
//! use stonefall_evaluator::heuristic::HeuristicEvaluator;
//!
//! let board = Board::from_ascii(
//!     "
//!     ....#.....
//!     #####.#####
//!     ",
//! );
//! let evaluation = HeuristicEvaluator::default().evaluate(&board);
//! assert_eq!(evaluation.metrics.holes, 1);
//! assert!(evaluation.score < 0.0);
//! ```

pub mod board_analysis;
pub mod heuristic;
