use serde::Serialize;

use crate::GameConfig;

/// Points per cleared line at level 1.
const POINTS_PER_LINE: u64 = 100;
/// Fraction of the base score added per combo step beyond the first.
const COMBO_BONUS_RATE: f64 = 0.5;
/// Fraction of the base score added per unit of difficulty above 1.0.
const DIFFICULTY_BONUS_RATE: f64 = 0.3;
const SPECIAL_BONUS_RATE: f64 = 0.5;
const TETRIS_BONUS_RATE: f64 = 2.0;

/// Points awarded by one clearing placement, split by source.
///
/// All bonuses are fractions of `base = lines * 100 * level`, where `level`
/// is the level before the cleared lines are counted. The total is the floor
/// of the sum.
///
/// # Example
///
/// ```
/// use laserfall_engine::ScoreBreakdown;
///
/// // A tetris at level 1 with no combo, no difficulty and no special mode.
/// let tetris = ScoreBreakdown::compute(4, 1, 1, 1.0, false);
/// assert_eq!(tetris.base, 400.0);
/// assert_eq!(tetris.tetris_bonus, 800.0);
/// assert_eq!(tetris.total, 1200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub combo_bonus: f64,
    pub difficulty_bonus: f64,
    pub special_bonus: f64,
    pub tetris_bonus: f64,
    pub total: u64,
}

impl ScoreBreakdown {
    #[expect(clippy::cast_precision_loss)]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn compute(
        lines: usize,
        level: u32,
        combo: u32,
        difficulty_multiplier: f64,
        special_mode: bool,
    ) -> Self {
        let base = lines as f64 * POINTS_PER_LINE as f64 * f64::from(level);
        let combo_bonus = if combo > 1 {
            base * f64::from(combo - 1) * COMBO_BONUS_RATE
        } else {
            0.0
        };
        let difficulty_bonus = base * (difficulty_multiplier - 1.0) * DIFFICULTY_BONUS_RATE;
        let special_bonus = if special_mode {
            base * SPECIAL_BONUS_RATE
        } else {
            0.0
        };
        let tetris_bonus = if lines == 4 {
            base * TETRIS_BONUS_RATE
        } else {
            0.0
        };
        let sum = base + combo_bonus + difficulty_bonus + special_bonus + tetris_bonus;
        Self {
            base,
            combo_bonus,
            difficulty_bonus,
            special_bonus,
            tetris_bonus,
            total: sum.floor().max(0.0) as u64,
        }
    }
}

/// Score, progression and combo tracking for one session.
///
/// Tracks:
///
/// - **Score**: sum of every [`ScoreBreakdown::total`]
/// - **Level**: `floor(lines / lines_per_level) + 1`, never decreasing
/// - **Combo**: consecutive clearing placements within the combo timeout
/// - **Difficulty**: one step per `difficulty_period` placements
/// - **Line clear distribution**: placements by number of lines cleared
///
/// Timestamps are milliseconds on the session's logical clock.
#[derive(Debug, Clone, Serialize)]
pub struct GameStats {
    score: u64,
    level: u32,
    total_cleared_lines: u64,
    completed_pieces: u64,
    line_cleared_counter: [u64; 5],
    combo: u32,
    max_combo: u32,
    difficulty_steps: u32,
    last_clear_at_ms: Option<u64>,
    last_score: Option<ScoreBreakdown>,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a tracker at level 1 with every counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            total_cleared_lines: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
            combo: 0,
            max_combo: 0,
            difficulty_steps: 0,
            last_clear_at_ms: None,
            last_score: None,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> u64 {
        self.total_cleared_lines
    }

    /// Returns the number of pieces locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    /// Returns a histogram of placements by cleared lines.
    ///
    /// Index `n` counts placements that cleared `n` lines; the last bucket
    /// also holds anything above 4.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u64; 5] {
        &self.line_cleared_counter
    }

    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.combo
    }

    #[must_use]
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    #[must_use]
    pub const fn difficulty_steps(&self) -> u32 {
        self.difficulty_steps
    }

    /// Returns `1.0 + steps * difficulty_step`.
    #[must_use]
    pub fn difficulty_multiplier(&self, config: &GameConfig) -> f64 {
        1.0 + f64::from(self.difficulty_steps) * config.difficulty_step
    }

    #[must_use]
    pub const fn last_clear_at_ms(&self) -> Option<u64> {
        self.last_clear_at_ms
    }

    /// Returns the breakdown of the most recent clearing placement.
    #[must_use]
    pub const fn last_score(&self) -> Option<&ScoreBreakdown> {
        self.last_score.as_ref()
    }

    /// Counts a locked piece. Returns `true` if the difficulty increased.
    pub fn record_placement(&mut self, config: &GameConfig) -> bool {
        self.completed_pieces += 1;
        if self.completed_pieces % config.difficulty_period == 0 {
            self.difficulty_steps += 1;
            return true;
        }
        false
    }

    /// Advances the combo for a clearing placement at `now_ms` and returns the new value.
    ///
    /// The combo grows if the previous clear happened less than
    /// `combo_timeout_ms` ago, and restarts at 1 otherwise. Only a growing
    /// combo counts towards [`max_combo`](Self::max_combo).
    pub fn register_clear(&mut self, now_ms: u64, config: &GameConfig) -> u32 {
        let within_window = self
            .last_clear_at_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < config.combo_timeout_ms);
        if within_window {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.combo = 1;
        }
        self.last_clear_at_ms = Some(now_ms);
        self.combo
    }

    /// Resets the combo to 0. Returns `true` if it was non-zero.
    pub fn reset_combo(&mut self) -> bool {
        let changed = self.combo != 0;
        self.combo = 0;
        changed
    }

    /// Returns `true` if a running combo has outlived the timeout at `now_ms`.
    #[must_use]
    pub fn is_combo_expired(&self, now_ms: u64, config: &GameConfig) -> bool {
        self.combo > 0
            && self
                .last_clear_at_ms
                .is_some_and(|last| now_ms.saturating_sub(last) > config.combo_timeout_ms)
    }

    /// Counts a placement that cleared nothing.
    pub fn record_no_clear(&mut self) {
        self.line_cleared_counter[0] += 1;
    }

    /// Adds a clearing placement's points and lines. Returns `true` on level up.
    pub fn apply_clear(
        &mut self,
        cleared_lines: usize,
        breakdown: ScoreBreakdown,
        config: &GameConfig,
    ) -> bool {
        self.score += breakdown.total;
        self.last_score = Some(breakdown);
        self.total_cleared_lines += cleared_lines as u64;
        self.line_cleared_counter[cleared_lines.min(4)] += 1;

        let level = config.level_for_lines(self.total_cleared_lines);
        let level_up = level > self.level;
        self.level = self.level.max(level);
        level_up
    }
}
