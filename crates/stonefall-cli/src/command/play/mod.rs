use std::path::PathBuf;

use chrono::Utc;
use rand::Rng as _;
use stonefall_engine::PieceSeed;
use stonefall_evaluator::heuristic::{HeuristicEvaluator, HeuristicWeights};

use crate::{command::play::app::PlayApp, tui::Tui, util};

mod app;

pub(super) const DEFAULT_SUMMARY_DIR: &str = "./data/summaries/";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece generator, as 32 hexadecimal digits (random if omitted)
    #[clap(long)]
    pub(super) seed: Option<PieceSeed>,
    /// Path to a heuristic weights file (JSON format)
    #[clap(long)]
    pub(super) weights: Option<PathBuf>,
    /// Save a session summary to a file when the program exits
    #[clap(long)]
    pub(super) save_summary: bool,
    /// Directory to save summary files
    #[clap(long, default_value = DEFAULT_SUMMARY_DIR)]
    pub(super) summary_dir: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            weights: None,
            save_summary: false,
            summary_dir: PathBuf::from(DEFAULT_SUMMARY_DIR),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        weights,
        save_summary,
        summary_dir,
    } = arg;

    let weights = match weights {
        Some(path) => util::read_weights_file(path)?,
        None => HeuristicWeights::default(),
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    let mut app = PlayApp::new(seed, HeuristicEvaluator::new(weights));
    Tui::new().run(&mut app)?;

    if *save_summary {
        let path = app.summary(Utc::now()).save(summary_dir)?;
        eprintln!("Session summary saved to {}", path.display());
    }

    Ok(())
}
