use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use stonefall_engine::{GameStats, PieceSeed};
use stonefall_evaluator::heuristic::BoardEvaluation;

use crate::util::Output;

/// Summary of an interactive play session, written when the program exits.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Timestamp when the summary was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Random seed of the piece stream for the whole session
    ///
    /// Restarts continue the same stream, so replaying every game of the
    /// session in order reproduces `final_stats`.
    pub seed: PieceSeed,
    /// Number of games started during the session
    pub games_played: usize,
    /// Statistics of the last game
    pub final_stats: GameStats,
    /// Heuristic evaluation of the board at the last spawn
    pub final_evaluation: Option<BoardEvaluation>,
}

impl SessionSummary {
    /// Writes the summary as `session_<timestamp>.json` into `dir`, creating
    /// the directory if needed. Returns the path of the written file.
    pub fn save(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let filename = format!("session_{}.json", self.recorded_at.format("%Y%m%d_%H%M%S"));
        let path = dir.join(filename);
        let mut output = Output::open(path.clone())?;
        output.write_json(self)?;
        Ok(path)
    }
}
