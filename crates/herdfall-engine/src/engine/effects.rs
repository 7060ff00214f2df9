//! Area effects triggered by the two special piece kinds when they lock.

use arrayvec::ArrayVec;
use rand::Rng;
use serde::Serialize;

use crate::{Animal, Board, Overlay, OverlayMark, Piece, Tile};

const MOORE_NEIGHBOURHOOD: [(i32, i32); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const VON_NEUMANN_NEIGHBOURS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A tile removed by a wolves blast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoppedCell {
    pub x: usize,
    pub y: usize,
    pub tile: Tile,
}

/// Clears everything within one cell (diagonals included) of the piece.
///
/// The piece itself is never written to the board. Every non-empty board cell
/// in the blast area becomes empty and is reported, in row-major order.
/// Overlay marks in the blast area are removed whether or not a tile sat on
/// them.
pub fn wolves_blast(board: &mut Board, overlay: &mut Overlay, piece: &Piece) -> Vec<PoppedCell> {
    let cols = board.cols();
    let mut in_blast = vec![false; cols * board.rows()];
    for (x, y, _) in piece.occupied_positions() {
        for (dx, dy) in MOORE_NEIGHBOURHOOD {
            if let Some((nx, ny)) = board.checked_index(x + dx, y + dy) {
                in_blast[ny * cols + nx] = true;
            }
        }
    }

    let mut popped = vec![];
    for (i, _) in in_blast.iter().enumerate().filter(|(_, hit)| **hit) {
        let (x, y) = (i % cols, i / cols);
        let tile = board.get(x, y);
        if !tile.is_empty() {
            popped.push(PoppedCell { x, y, tile });
            board.set(x, y, Tile::Empty);
        }
        overlay.set(x, y, OverlayMark::None);
    }
    popped
}

/// Tallies, per animal, the 4-neighbours of the piece's on-board cells.
#[must_use]
pub fn neighbour_tally(board: &Board, piece: &Piece) -> [usize; Animal::LEN] {
    let mut counts = [0; Animal::LEN];
    for (x, y) in piece.footprint(board) {
        for (dx, dy) in VON_NEUMANN_NEIGHBOURS {
            let Some((nx, ny)) = board.neighbour(x, y, dx, dy) else {
                continue;
            };
            if let Some(animal) = board.get(nx, ny).animal() {
                counts[animal.index()] += 1;
            }
        }
    }
    counts
}

/// Picks the animal a black sheep turns into.
///
/// The most frequent 4-neighbour animal wins; ties are broken uniformly at
/// random among the tied animals. With no animal neighbour at all, any of the
/// five animals is picked uniformly.
pub fn choose_conversion_animal<R: Rng + ?Sized>(board: &Board, piece: &Piece, rng: &mut R) -> Animal {
    let counts = neighbour_tally(board, piece);
    let best = counts.iter().copied().max().unwrap_or(0);
    if best == 0 {
        return rng.random();
    }
    let tied: ArrayVec<Animal, { Animal::LEN }> = Animal::ALL
        .into_iter()
        .filter(|animal| counts[animal.index()] == best)
        .collect();
    tied[rng.random_range(0..tied.len())]
}

/// Converts a black sheep that has already been written to the board.
///
/// Every footprint cell becomes the same chosen animal. Returns the animal
/// and the converted cells.
pub fn convert_black_sheep<R: Rng + ?Sized>(
    board: &mut Board,
    piece: &Piece,
    rng: &mut R,
) -> (Animal, ArrayVec<(usize, usize), 16>) {
    let animal = choose_conversion_animal(board, piece, rng);
    let footprint = piece.footprint(board);
    for &(x, y) in &footprint {
        board.set(x, y, Tile::Animal(animal));
    }
    (animal, footprint)
}
