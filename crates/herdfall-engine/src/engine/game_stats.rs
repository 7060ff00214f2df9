use std::time::Duration;

use serde::Serialize;

use super::level::LevelCurve;

/// Game statistics tracking score, level, locks and cleared regions.
///
/// - **Score**: grows by region clears; eggs double and turds halve it
/// - **Level**: `1 + locks / locks_per_level`, never decreases
/// - **Locks**: every piece that landed, specials included
/// - **Regions cleared**: one per cleared region regardless of its size
///
/// The fall interval is cached and only recomputed when a piece locks.
///
/// # Example
///
/// ```
/// use herdfall_engine::{EngineConfig, GameStats, LevelCurve};
///
/// let curve = LevelCurve::new(&EngineConfig::default());
/// let mut stats = GameStats::new(&curve);
/// for _ in 0..12 {
///     stats.complete_lock(&curve);
/// }
/// assert_eq!(stats.locks(), 12);
/// assert_eq!(stats.level(), 2);
/// assert_eq!(stats.fall_interval_ms(), 572);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    level: usize,
    locks: usize,
    regions_cleared: usize,
    fall_interval_ms: u64,
}

impl GameStats {
    #[must_use]
    pub fn new(curve: &LevelCurve) -> Self {
        Self {
            score: 0,
            level: 1,
            locks: 0,
            regions_cleared: 0,
            fall_interval_ms: curve.fall_interval_ms(1),
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn locks(&self) -> usize {
        self.locks
    }

    #[must_use]
    pub const fn regions_cleared(&self) -> usize {
        self.regions_cleared
    }

    #[must_use]
    pub const fn fall_interval_ms(&self) -> u64 {
        self.fall_interval_ms
    }

    #[must_use]
    pub const fn fall_interval(&self) -> Duration {
        Duration::from_millis(self.fall_interval_ms)
    }

    pub(crate) fn score_mut(&mut self) -> &mut u64 {
        &mut self.score
    }

    pub(crate) fn add_regions_cleared(&mut self, count: usize) {
        self.regions_cleared += count;
    }

    /// Counts one lock and re-derives level and fall interval.
    ///
    /// Returns the new level if it changed.
    pub fn complete_lock(&mut self, curve: &LevelCurve) -> Option<usize> {
        self.locks += 1;
        let level = curve.level(self.locks).max(self.level);
        self.fall_interval_ms = curve.fall_interval_ms(level);
        if level == self.level {
            return None;
        }
        self.level = level;
        Some(level)
    }
}
