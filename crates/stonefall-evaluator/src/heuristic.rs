//! Weighted heuristic scoring of board states.
//!
//! The score is a linear combination of the four [`BoardMetrics`]:
//!
//! ```text
//! score = -0.510066·height_sum + 0.760666·completed_lines
//!         - 0.35663·holes - 0.184483·bumpiness
//! ```
//!
//! The score is diagnostic only. Nothing in the engine selects moves with it;
//! the CLI shows it after every spawn and prints it for board files.

use std::fmt;

use serde::{Deserialize, Serialize};
use stonefall_engine::Board;

use crate::board_analysis::{BoardAnalysis, BoardMetrics};

pub const HEIGHT_SUM_WEIGHT: f32 = -0.510_066;
pub const COMPLETED_LINES_WEIGHT: f32 = 0.760_666;
pub const HOLES_WEIGHT: f32 = -0.356_63;
pub const BUMPINESS_WEIGHT: f32 = -0.184_483;

/// Scores a board snapshot (higher is better).
pub trait BoardEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_board(&self, analysis: &BoardAnalysis) -> f32;
}

/// One weight per board metric.
///
/// Loadable from JSON; missing fields fall back to the default weights.
///
/// ```
/// use stonefall_evaluator::heuristic::{HOLES_WEIGHT, HeuristicWeights};
///
/// let weights: HeuristicWeights = serde_json::from_str(r#"{ "bumpiness": -1.0 }"#).unwrap();
/// assert_eq!(weights.bumpiness, -1.0);
/// assert_eq!(weights.holes, HOLES_WEIGHT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicWeights {
    pub height_sum: f32,
    pub completed_lines: f32,
    pub holes: f32,
    pub bumpiness: f32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            height_sum: HEIGHT_SUM_WEIGHT,
            completed_lines: COMPLETED_LINES_WEIGHT,
            holes: HOLES_WEIGHT,
            bumpiness: BUMPINESS_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("weight `{name}` is not a finite number")]
pub struct InvalidWeightError {
    name: &'static str,
}

impl HeuristicWeights {
    /// Rejects weights that would make every score meaningless.
    ///
    /// JSON has no NaN or infinity, but values beyond the `f32` range
    /// deserialize as infinity.
    pub fn validate(&self) -> Result<(), InvalidWeightError> {
        let weights = [
            ("height_sum", self.height_sum),
            ("completed_lines", self.completed_lines),
            ("holes", self.holes),
            ("bumpiness", self.bumpiness),
        ];
        match weights.into_iter().find(|(_, w)| !w.is_finite()) {
            Some((name, _)) => Err(InvalidWeightError { name }),
            None => Ok(()),
        }
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score(&self, metrics: &BoardMetrics) -> f32 {
        self.height_sum * metrics.height_sum as f32
            + self.completed_lines * metrics.completed_lines as f32
            + self.holes * metrics.holes as f32
            + self.bumpiness * metrics.bumpiness as f32
    }
}

/// Metrics and score of one board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoardEvaluation {
    pub metrics: BoardMetrics,
    pub score: f32,
}

/// Heuristic evaluator with a fixed weight set.
///
/// # Example
///
/// ```
/// use stonefall_engine::Board;
/// use stonefall_evaluator::heuristic::HeuristicEvaluator;
///
/// let evaluator = HeuristicEvaluator::default();
/// let evaluation = evaluator.evaluate(&Board::new());
/// assert_eq!(evaluation.score, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    #[must_use]
    pub fn evaluate(&self, board: &Board) -> BoardEvaluation {
        let analysis = BoardAnalysis::from_board(board);
        BoardEvaluation {
            metrics: analysis.metrics(),
            score: self.evaluate_board(&analysis),
        }
    }
}

impl BoardEvaluator for HeuristicEvaluator {
    fn evaluate_board(&self, analysis: &BoardAnalysis) -> f32 {
        self.weights.score(&analysis.metrics())
    }
}
