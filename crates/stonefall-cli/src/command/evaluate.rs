use std::path::PathBuf;

use serde::Serialize;
use stonefall_evaluator::heuristic::{BoardEvaluation, HeuristicEvaluator, HeuristicWeights};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Path to an ASCII-art board file (`.` empty, `#` or a piece letter filled)
    pub(super) board_path: PathBuf,
    /// Path to a heuristic weights file (JSON format)
    #[clap(long)]
    pub(super) weights: Option<PathBuf>,
    /// Output file path (defaults to stdout)
    #[clap(long)]
    pub(super) output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    board: PathBuf,
    weights: HeuristicWeights,
    evaluation: BoardEvaluation,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        board_path,
        weights,
        output,
    } = arg;

    let weights = match weights {
        Some(path) => util::read_weights_file(path)?,
        None => HeuristicWeights::default(),
    };
    let board = util::read_board_file(board_path)?;

    let evaluator = HeuristicEvaluator::new(weights);
    let report = EvaluationReport {
        board: board_path.clone(),
        weights,
        evaluation: evaluator.evaluate(&board),
    };

    Output::save_json(&report, output.clone())?;
    if let Some(path) = output {
        eprintln!("Evaluation written to {}", path.display());
    }
    Ok(())
}
