use serde::Serialize;

use crate::{Animal, PieceKind, PoppedCell};

/// One region removed by the clear resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCleared {
    pub animal: Animal,
    /// Cells of the region in row-major order.
    pub cells: Vec<(usize, usize)>,
    pub eggs: usize,
    pub turds: usize,
    /// Running score just before this region was scored.
    pub score_before: u64,
    /// Running score after this region. Lower than `score_before` when turds
    /// halve more than the region adds.
    pub score_after: u64,
}

impl RegionCleared {
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Signed score change caused by this clear.
    #[must_use]
    pub fn score_change(&self) -> i128 {
        i128::from(self.score_after) - i128::from(self.score_before)
    }

    /// Short description such as `Cleared 12 🐑 (flock) 🥚x1`.
    #[must_use]
    pub fn banner(&self) -> String {
        let mut banner = format!(
            "Cleared {} {} ({})",
            self.size(),
            self.animal.label(),
            self.animal.group_name()
        );
        if self.eggs > 0 {
            banner.push_str(&format!(" 🥚x{}", self.eggs));
        }
        if self.turds > 0 {
            banner.push_str(&format!(" 💩x{}", self.turds));
        }
        banner
    }
}

/// Facts emitted by a session for presentation collaborators.
///
/// Events are queued in the order they happen and drained with
/// [`GameSession::drain_events`](crate::GameSession::drain_events).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum GameEvent {
    /// A horizontal move or rotation was rejected.
    MoveBlocked,
    /// The current piece locked.
    PieceLocked { kind: PieceKind },
    /// A wolves pack cleared at least one tile.
    WolvesBlast { popped: Vec<PoppedCell> },
    /// A black sheep turned into `animal`.
    BlackSheepConverted {
        animal: Animal,
        cells: Vec<(usize, usize)>,
    },
    RegionCleared(RegionCleared),
    LevelUp { level: usize },
    /// Terminal signal; no further events follow until a restart.
    GameOver,
}
