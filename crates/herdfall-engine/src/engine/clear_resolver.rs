//! Region detection and cascade clearing.
//!
//! Regions are maximal 4-connected groups of cells holding the same animal.
//! Wolf and black sheep tiles never belong to a region.

use log::debug;

use crate::{Animal, Board, Overlay, OverlayMark, Tile, scoring};

use super::events::RegionCleared;

const NEIGHBOURS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A maximal connected group of same-animal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub animal: Animal,
    /// Cells in row-major order.
    pub cells: Vec<(usize, usize)>,
}

impl Region {
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Flood-fills from `(x, y)` and marks every reached cell in `visited`.
///
/// Returns `None` when the start cell holds no animal or was already visited.
fn flood(board: &Board, x: usize, y: usize, visited: &mut [bool]) -> Option<Region> {
    let cols = board.cols();
    let animal = board.get(x, y).animal()?;
    if visited[y * cols + x] {
        return None;
    }
    visited[y * cols + x] = true;

    let mut cells = vec![];
    let mut stack = vec![(x, y)];
    while let Some((cx, cy)) = stack.pop() {
        cells.push((cx, cy));
        for (dx, dy) in NEIGHBOURS {
            let Some((nx, ny)) = board.neighbour(cx, cy, dx, dy) else {
                continue;
            };
            if visited[ny * cols + nx] || board.get(nx, ny).animal() != Some(animal) {
                continue;
            }
            visited[ny * cols + nx] = true;
            stack.push((nx, ny));
        }
    }
    cells.sort_unstable_by_key(|&(x, y)| (y, x));
    Some(Region { animal, cells })
}

/// The region containing `(x, y)`, or `None` if that cell holds no animal.
#[must_use]
pub fn flood_region(board: &Board, x: usize, y: usize) -> Option<Region> {
    let mut visited = vec![false; board.cols() * board.rows()];
    flood(board, x, y, &mut visited)
}

/// All regions on the board, in row-major order of their first cell.
#[must_use]
pub fn find_regions(board: &Board) -> Vec<Region> {
    let mut visited = vec![false; board.cols() * board.rows()];
    board
        .cells()
        .filter_map(|(x, y, _)| flood(board, x, y, &mut visited))
        .collect()
}

/// The largest live region as `(animal, size)`.
///
/// Ties keep the region found first in row-major order.
#[must_use]
pub fn best_group(board: &Board) -> Option<(Animal, usize)> {
    find_regions(board)
        .into_iter()
        .fold(None, |best: Option<Region>, region| match best {
            Some(best) if best.size() >= region.size() => Some(best),
            _ => Some(region),
        })
        .map(|region| (region.animal, region.size()))
}

/// Clears qualifying regions, applies gravity and repeats until stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearResolver {
    threshold: usize,
}

impl ClearResolver {
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Regions of at least `threshold` cells.
    #[must_use]
    pub fn qualifying_regions(&self, board: &Board) -> Vec<Region> {
        find_regions(board)
            .into_iter()
            .filter(|region| region.size() >= self.threshold)
            .collect()
    }

    /// Runs the cascade to its fixpoint.
    ///
    /// Each pass scores and clears every qualifying region (board tiles and
    /// overlay marks alike), then applies gravity to the board only. `score`
    /// is updated region by region, so egg and turd modifiers act on the
    /// running total.
    ///
    /// Returns the cleared regions in the order they were scored.
    pub fn resolve(&self, board: &mut Board, overlay: &mut Overlay, score: &mut u64) -> Vec<RegionCleared> {
        let mut cleared = vec![];
        let mut passes = 0;
        loop {
            let regions = self.qualifying_regions(board);
            if regions.is_empty() {
                break;
            }
            passes += 1;
            for region in regions {
                cleared.push(clear_region(board, overlay, score, region));
            }
            board.apply_gravity();
        }
        if passes > 0 {
            debug!("cascade finished after {passes} pass(es), {} region(s)", cleared.len());
        }
        cleared
    }
}

fn clear_region(board: &mut Board, overlay: &mut Overlay, score: &mut u64, region: Region) -> RegionCleared {
    let mut eggs = 0;
    let mut turds = 0;
    for &(x, y) in &region.cells {
        match overlay.get(x, y) {
            OverlayMark::Egg => eggs += 1,
            OverlayMark::Turd => turds += 1,
            OverlayMark::None => {}
        }
    }

    let before = *score;
    *score = scoring::apply_region(before, region.size(), eggs, turds);
    for &(x, y) in &region.cells {
        board.set(x, y, Tile::Empty);
        overlay.set(x, y, OverlayMark::None);
    }
    debug!(
        "cleared {} {:?} (eggs {eggs}, turds {turds}), score {before} -> {}",
        region.size(),
        region.animal,
        *score
    );

    RegionCleared {
        animal: region.animal,
        cells: region.cells,
        eggs,
        turds,
        score_before: before,
        score_after: *score,
    }
}
