pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting current piece")]
pub struct PieceCollisionError;

/// Ways a lock can end the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TopOutError {
    #[display("piece locked above the top row")]
    LockedAboveTop,
    #[display("new piece collides at its spawn position")]
    NewPieceCollision,
}

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least 4x2 cells, got {cols}x{rows}")]
    BoardTooSmall { cols: usize, rows: usize },
    #[display(
        "board must be at most {max}x{max} cells, got {cols}x{rows}",
        max = crate::EngineConfig::MAX_BOARD_SIDE
    )]
    BoardTooLarge { cols: usize, rows: usize },
    #[display("clear threshold must be at least 1")]
    ZeroClearThreshold,
    #[display(
        "spawn weights must be finite, non-negative and sum to at most 1 (wolves {wolves}, black sheep {black_sheep})"
    )]
    InvalidSpawnWeights { wolves: f64, black_sheep: f64 },
    #[display(
        "invalid speed curve: base {base_fall_ms}ms, min {min_fall_ms}ms, decay {speed_decay}"
    )]
    InvalidSpeedCurve {
        base_fall_ms: u64,
        min_fall_ms: u64,
        speed_decay: f64,
    },
    #[display("locks per level must be at least 1")]
    ZeroLocksPerLevel,
    #[display("{marks} overlay marks do not fit in {cells} overlay cells")]
    OverlayOverflow { marks: usize, cells: usize },
}
