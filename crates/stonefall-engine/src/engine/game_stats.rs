use std::time::Duration;

use serde::Serialize;

/// Base score values for line clears, multiplied by the current level.
///
/// Index corresponds to number of lines cleared by a single lock:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
const SCORE_TABLE: [usize; 5] = [0, 40, 100, 300, 1200];

/// Lines needed per level before the next level-up check passes.
const LINES_PER_LEVEL: usize = 6;

const BASE_DROP_MILLIS: u64 = 1000;
const DROP_MILLIS_STEP: u64 = 50;
const MIN_DROP_MILLIS: u64 = 100;

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// # Scoring
///
/// - Each lock scores `SCORE_TABLE[lines] × level`
/// - Each manual drop step scores 1 point
///
/// # Leveling
///
/// After scoring a lock, if the total cleared lines reach `level × 6` the
/// level goes up by exactly one. The gravity interval follows the level:
/// `max(1000 − 50 × (level − 1), 100)` milliseconds.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use stonefall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// assert_eq!(stats.drop_interval(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    cleared_lines: usize,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates statistics for a fresh game: level 1, everything else zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            cleared_lines: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by the number of lines they cleared.
    ///
    /// Index 0 counts locks that cleared nothing.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Returns the gravity interval for the current level.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        let steps = u64::try_from(self.level.saturating_sub(1)).unwrap_or(u64::MAX);
        let millis = BASE_DROP_MILLIS
            .saturating_sub(steps.saturating_mul(DROP_MILLIS_STEP))
            .max(MIN_DROP_MILLIS);
        Duration::from_millis(millis)
    }

    /// Awards the point for one manual drop step.
    pub const fn add_soft_drop_point(&mut self) {
        self.score += 1;
    }

    /// Updates statistics after a piece lock that cleared `cleared_lines` rows.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let index = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.cleared_lines += cleared_lines;
        self.line_cleared_counter[index] += 1;
        self.score += SCORE_TABLE[index] * self.level;
        if self.cleared_lines >= self.level * LINES_PER_LEVEL {
            self.level += 1;
        }
    }
}
