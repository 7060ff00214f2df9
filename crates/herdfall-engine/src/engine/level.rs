use std::time::Duration;

use crate::EngineConfig;

/// Maps the lock count to a level and the level to a fall interval.
///
/// `level = 1 + locks / locks_per_level` and
/// `fall = max(min_fall_ms, floor(base_fall_ms * speed_decay^(level - 1)))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelCurve {
    locks_per_level: usize,
    base_fall_ms: u64,
    min_fall_ms: u64,
    speed_decay: f64,
}

impl LevelCurve {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            locks_per_level: config.locks_per_level.max(1),
            base_fall_ms: config.base_fall_ms,
            min_fall_ms: config.min_fall_ms,
            speed_decay: config.speed_decay,
        }
    }

    #[must_use]
    pub fn level(&self, locks: usize) -> usize {
        1 + locks / self.locks_per_level
    }

    /// Fall interval in milliseconds at `level`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn fall_interval_ms(&self, level: usize) -> u64 {
        let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        let decayed = (self.base_fall_ms as f64 * self.speed_decay.powi(exponent)).floor();
        // `as` saturates, and a tiny decayed value collapses to 0 here.
        (decayed as u64).max(self.min_fall_ms)
    }

    #[must_use]
    pub fn fall_interval(&self, level: usize) -> Duration {
        Duration::from_millis(self.fall_interval_ms(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_locks() {
        let curve = LevelCurve::new(&EngineConfig::default());
        assert_eq!(curve.level(0), 1);
        assert_eq!(curve.level(11), 1);
        assert_eq!(curve.level(12), 2);
        assert_eq!(curve.level(25), 3);
    }

    #[test]
    fn test_fall_interval_decays_to_floor() {
        let curve = LevelCurve::new(&EngineConfig::default());
        assert_eq!(curve.fall_interval_ms(1), 650);
        assert_eq!(curve.fall_interval_ms(2), 572);
        // 650 * 0.88^2 = 503.36
        assert_eq!(curve.fall_interval_ms(3), 503);
        assert_eq!(curve.fall_interval_ms(50), 120);
        assert_eq!(curve.fall_interval_ms(usize::MAX), 120);

        let mut previous = u64::MAX;
        for level in 1..40 {
            let interval = curve.fall_interval_ms(level);
            assert!(interval <= previous);
            assert!(interval >= 120);
            previous = interval;
        }
    }

    #[test]
    fn test_fall_interval_duration() {
        let curve = LevelCurve::new(&EngineConfig::default());
        assert_eq!(curve.fall_interval(1), Duration::from_millis(650));
    }
}
