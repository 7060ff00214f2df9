use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tunable parameters of a game session.
///
/// All fields have defaults, so partial configuration files are accepted:
///
/// ```
/// use herdfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "rows": 13 }"#).unwrap();
/// assert_eq!(config, EngineConfig::compact());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Board width in cells.
    pub cols: usize,
    /// Board height in cells.
    pub rows: usize,
    /// Minimum region size that clears.
    pub clear_threshold: usize,
    /// Fall interval at level 1.
    pub base_fall_ms: u64,
    /// Lower bound of the fall interval.
    pub min_fall_ms: u64,
    /// Per-level multiplier applied to the fall interval.
    pub speed_decay: f64,
    /// Locks needed to advance one level.
    pub locks_per_level: usize,
    /// Probability that a spawned piece is a wolves pack.
    pub wolves_weight: f64,
    /// Probability that a spawned piece is a black sheep.
    pub black_sheep_weight: f64,
    /// Eggs sprinkled on reset.
    pub egg_count: usize,
    /// Turds sprinkled on reset.
    pub turd_count: usize,
    /// Height of the bottom band that receives overlay marks.
    pub overlay_band_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cols: 10,
            rows: 16,
            clear_threshold: 10,
            base_fall_ms: 650,
            min_fall_ms: 120,
            speed_decay: 0.88,
            locks_per_level: 12,
            wolves_weight: 0.04,
            black_sheep_weight: 0.08,
            egg_count: 10,
            turd_count: 10,
            overlay_band_rows: 7,
        }
    }
}

impl EngineConfig {
    /// The shorter 13-row board layout.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            rows: 13,
            ..Self::default()
        }
    }

    /// Probability that a spawned piece is a normal tetromino.
    #[must_use]
    pub fn normal_weight(&self) -> f64 {
        1.0 - self.wolves_weight - self.black_sheep_weight
    }

    /// Largest accepted board width and height.
    pub const MAX_BOARD_SIDE: usize = 256;

    /// Number of cells that can receive overlay marks.
    #[must_use]
    pub fn overlay_cells(&self) -> usize {
        self.cols.saturating_mul(self.overlay_band_rows.min(self.rows))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < 4 || self.rows < 2 {
            return Err(ConfigError::BoardTooSmall {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.cols > Self::MAX_BOARD_SIDE || self.rows > Self::MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.clear_threshold == 0 {
            return Err(ConfigError::ZeroClearThreshold);
        }
        let weight_ok = |w: f64| w.is_finite() && w >= 0.0;
        if !weight_ok(self.wolves_weight)
            || !weight_ok(self.black_sheep_weight)
            || self.wolves_weight + self.black_sheep_weight > 1.0
        {
            return Err(ConfigError::InvalidSpawnWeights {
                wolves: self.wolves_weight,
                black_sheep: self.black_sheep_weight,
            });
        }
        if self.base_fall_ms == 0
            || self.min_fall_ms > self.base_fall_ms
            || !(self.speed_decay > 0.0 && self.speed_decay <= 1.0)
        {
            return Err(ConfigError::InvalidSpeedCurve {
                base_fall_ms: self.base_fall_ms,
                min_fall_ms: self.min_fall_ms,
                speed_decay: self.speed_decay,
            });
        }
        if self.locks_per_level == 0 {
            return Err(ConfigError::ZeroLocksPerLevel);
        }
        let marks = self.egg_count.saturating_add(self.turd_count);
        if marks > self.overlay_cells() {
            return Err(ConfigError::OverlayOverflow {
                marks,
                cells: self.overlay_cells(),
            });
        }
        Ok(())
    }
}
