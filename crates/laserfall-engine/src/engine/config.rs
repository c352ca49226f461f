use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tunable constants of the ruleset.
///
/// The defaults reproduce the classic laserfall rules: a 16 ms logical step,
/// a 1000 ms drop interval shrinking by 80 ms per level, combos that expire
/// after 5 s, a +0.1 difficulty multiplier every 10 placements and a 10 %
/// chance of a 10 s special mode every 50 placements.
///
/// Every field has a default, so a JSON config only needs the values it
/// changes:
///
/// ```
/// use laserfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "combo_timeout_ms": 8000 }"#).unwrap();
/// assert_eq!(config.combo_timeout_ms, 8000);
/// assert_eq!(config.special_mode_period, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Length of one logical step.
    pub tick_ms: u64,
    /// Host time beyond this is dropped instead of replayed in a single `tick` call.
    pub max_catch_up_ms: u64,
    /// Drop interval at level 1.
    pub initial_drop_interval_ms: u64,
    /// Reduction of the drop interval per level.
    pub drop_interval_step_ms: u64,
    /// Floor of the level and difficulty adjusted drop interval.
    pub min_drop_interval_ms: u64,
    /// Floor of the drop interval while special mode is active.
    pub special_min_drop_interval_ms: u64,
    /// Speed factor applied while special mode is active.
    pub special_speedup: f64,
    pub lines_per_level: u64,
    /// Maximum gap between two clearing placements that keeps a combo alive.
    pub combo_timeout_ms: u64,
    /// Number of placements between difficulty increases.
    pub difficulty_period: u64,
    /// Amount added to the difficulty multiplier at each increase.
    pub difficulty_step: f64,
    /// Number of placements between special mode rolls.
    pub special_mode_period: u64,
    /// Probability that a roll enters special mode.
    pub special_mode_chance: f64,
    pub special_mode_duration_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            max_catch_up_ms: 250,
            initial_drop_interval_ms: 1000,
            drop_interval_step_ms: 80,
            min_drop_interval_ms: 50,
            special_min_drop_interval_ms: 30,
            special_speedup: 3.0,
            lines_per_level: 10,
            combo_timeout_ms: 5000,
            difficulty_period: 10,
            difficulty_step: 0.1,
            special_mode_period: 50,
            special_mode_chance: 0.1,
            special_mode_duration_ms: 10_000,
        }
    }
}

impl GameConfig {
    /// Checks that every value is usable by the session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive_integers = [
            ("tick_ms", self.tick_ms),
            ("initial_drop_interval_ms", self.initial_drop_interval_ms),
            ("min_drop_interval_ms", self.min_drop_interval_ms),
            (
                "special_min_drop_interval_ms",
                self.special_min_drop_interval_ms,
            ),
            ("lines_per_level", self.lines_per_level),
            ("difficulty_period", self.difficulty_period),
            ("special_mode_period", self.special_mode_period),
            ("special_mode_duration_ms", self.special_mode_duration_ms),
        ];
        for (name, value) in positive_integers {
            if value == 0 {
                return Err(ConfigError::NotPositive { name });
            }
        }
        for (name, value) in [
            ("special_speedup", self.special_speedup),
            ("difficulty_step", self.difficulty_step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name });
            }
        }
        if !(0.0..=1.0).contains(&self.special_mode_chance) {
            return Err(ConfigError::ProbabilityOutOfRange {
                name: "special_mode_chance",
                value: self.special_mode_chance,
            });
        }
        if self.min_drop_interval_ms > self.initial_drop_interval_ms {
            return Err(ConfigError::DropIntervalRange {
                min: self.min_drop_interval_ms,
                initial: self.initial_drop_interval_ms,
            });
        }
        if self.max_catch_up_ms < self.tick_ms {
            return Err(ConfigError::CatchUpBelowTick {
                tick: self.tick_ms,
                max: self.max_catch_up_ms,
            });
        }
        Ok(())
    }

    /// Returns the level-based drop interval: `max(min, initial - (level - 1) * step)`.
    #[must_use]
    pub fn base_drop_interval_ms(&self, level: u32) -> u64 {
        let reduction = u64::from(level.saturating_sub(1)).saturating_mul(self.drop_interval_step_ms);
        self.initial_drop_interval_ms
            .saturating_sub(reduction)
            .max(self.min_drop_interval_ms)
    }

    /// Returns the drop interval after applying the difficulty multiplier and special mode.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn effective_drop_interval_ms(
        &self,
        base_interval_ms: u64,
        difficulty_multiplier: f64,
        special_mode: bool,
    ) -> f64 {
        let interval =
            (base_interval_ms as f64 / difficulty_multiplier).max(self.min_drop_interval_ms as f64);
        if special_mode {
            (interval / self.special_speedup).max(self.special_min_drop_interval_ms as f64)
        } else {
            interval
        }
    }

    /// Returns the level reached after `total_lines` cleared lines.
    #[must_use]
    pub fn level_for_lines(&self, total_lines: u64) -> u32 {
        let level = total_lines / self.lines_per_level + 1;
        u32::try_from(level).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let config = GameConfig {
            tick_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "tick_ms" })
        );

        let config = GameConfig {
            difficulty_step: f64::NAN,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "difficulty_step"
            })
        );

        let config = GameConfig {
            special_mode_chance: 1.5,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { .. })
        ));

        let config = GameConfig {
            min_drop_interval_ms: 2000,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DropIntervalRange { .. })
        ));

        let config = GameConfig {
            max_catch_up_ms: 10,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CatchUpBelowTick { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result = serde_json::from_str::<GameConfig>(r#"{ "combo_timeout": 1 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_drop_interval_curve() {
        let config = GameConfig::default();
        assert_eq!(config.base_drop_interval_ms(1), 1000);
        assert_eq!(config.base_drop_interval_ms(2), 920);
        assert_eq!(config.base_drop_interval_ms(12), 120);
        assert_eq!(config.base_drop_interval_ms(13), 50);
        assert_eq!(config.base_drop_interval_ms(100), 50);
    }

    #[test]
    fn test_effective_drop_interval() {
        let config = GameConfig::default();
        assert!((config.effective_drop_interval_ms(1000, 1.0, false) - 1000.0).abs() < 1e-9);
        assert!((config.effective_drop_interval_ms(1000, 2.0, false) - 500.0).abs() < 1e-9);
        assert!((config.effective_drop_interval_ms(60, 2.0, false) - 50.0).abs() < 1e-9);
        assert!((config.effective_drop_interval_ms(900, 1.0, true) - 300.0).abs() < 1e-9);
        assert!((config.effective_drop_interval_ms(60, 1.0, true) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_level_for_lines() {
        let config = GameConfig::default();
        assert_eq!(config.level_for_lines(0), 1);
        assert_eq!(config.level_for_lines(9), 1);
        assert_eq!(config.level_for_lines(10), 2);
        assert_eq!(config.level_for_lines(35), 4);
    }
}
