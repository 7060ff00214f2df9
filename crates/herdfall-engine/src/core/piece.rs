use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{
    grid::Board,
    tile::{Animal, Tile},
};

/// Horizontal kick offsets tried in order when a rotation collides.
///
/// The first offset at which the rotated matrix fits is taken; if none fits
/// the rotation is rejected.
pub const KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];

/// Largest matrix side length used by any piece.
pub const MAX_MATRIX_SIZE: usize = 4;

/// One of the seven tetromino-like shapes used by normal pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    I = 0,
    O = 1,
    T = 2,
    S = 3,
    Z = 4,
    J = 5,
    L = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shapes (7).
    pub const LEN: usize = 7;

    pub const ALL: [ShapeKind; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    const fn mask(self) -> [[bool; 4]; 4] {
        SHAPE_MASKS[self as usize]
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
        }
    }
}

// Spawn orientation of every shape in its 4×4 box.
const SHAPE_MASKS: [[[bool; 4]; 4]; ShapeKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I
        [EEEE, [C, C, C, C], EEEE, EEEE],
        // O
        [[E, C, C, E], [E, C, C, E], EEEE, EEEE],
        // T
        [[E, C, E, E], [C, C, C, E], EEEE, EEEE],
        // S
        [[E, C, C, E], [C, C, E, E], EEEE, EEEE],
        // Z
        [[C, C, E, E], [E, C, C, E], EEEE, EEEE],
        // J
        [[C, E, E, E], [C, C, C, E], EEEE, EEEE],
        // L
        [[E, E, C, E], [C, C, C, E], EEEE, EEEE],
    ]
};

/// What a falling piece does when it locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum PieceKind {
    /// A rotating tetromino of a single animal kind, placed normally.
    Normal(ShapeKind),
    /// A 2×2 pack that blasts its 3×3 neighbourhood instead of being placed.
    Wolves,
    /// A 2×2 block that converts to the dominant neighbouring animal.
    BlackSheep,
}

impl PieceKind {
    #[must_use]
    pub fn rotates(self) -> bool {
        self.is_normal()
    }
}

/// Rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Square matrix of per-cell tiles describing a piece's shape.
///
/// `Tile::Empty` marks a cell that is not part of the piece. Rotation keeps
/// the matrix size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceMatrix {
    size: usize,
    cells: [[Tile; MAX_MATRIX_SIZE]; MAX_MATRIX_SIZE],
}

impl PieceMatrix {
    /// Fills the 4×4 spawn mask of `shape` with `animal`.
    #[must_use]
    pub fn shape(shape: ShapeKind, animal: Animal) -> Self {
        let mask = shape.mask();
        let mut cells = [[Tile::Empty; MAX_MATRIX_SIZE]; MAX_MATRIX_SIZE];
        for (row, mask_row) in cells.iter_mut().zip(mask) {
            for (cell, filled) in row.iter_mut().zip(mask_row) {
                if filled {
                    *cell = Tile::Animal(animal);
                }
            }
        }
        Self {
            size: MAX_MATRIX_SIZE,
            cells,
        }
    }

    /// A fully filled `size`×`size` matrix of `tile`.
    #[must_use]
    pub fn square(size: usize, tile: Tile) -> Self {
        assert!((1..=MAX_MATRIX_SIZE).contains(&size));
        let mut cells = [[Tile::Empty; MAX_MATRIX_SIZE]; MAX_MATRIX_SIZE];
        for row in &mut cells[..size] {
            row[..size].fill(tile);
        }
        Self { size, cells }
    }

    /// Builds a matrix from explicit rows. Rows must form a square.
    #[must_use]
    pub fn from_rows<const N: usize>(rows: [[Tile; N]; N]) -> Self {
        assert!(N <= MAX_MATRIX_SIZE);
        let mut cells = [[Tile::Empty; MAX_MATRIX_SIZE]; MAX_MATRIX_SIZE];
        for (dst, src) in cells.iter_mut().zip(rows) {
            dst[..N].copy_from_slice(&src);
        }
        Self { size: N, cells }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Tile {
        assert!(x < self.size && y < self.size);
        self.cells[y][x]
    }

    /// Returns `(dx, dy, tile)` for every non-empty cell, row by row.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        self.cells[..self.size]
            .iter()
            .zip(0..)
            .flat_map(move |(row, dy)| {
                row[..self.size]
                    .iter()
                    .zip(0..)
                    .filter(|(tile, _)| !tile.is_empty())
                    .map(move |(tile, dx)| (dx, dy, *tile))
            })
    }

    /// Rotates the whole bounding box by 90°.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let n = self.size;
        let mut cells = [[Tile::Empty; MAX_MATRIX_SIZE]; MAX_MATRIX_SIZE];
        for (r, row) in self.cells[..n].iter().enumerate() {
            for (c, tile) in row[..n].iter().enumerate() {
                match rotation {
                    Rotation::Clockwise => cells[c][n - 1 - r] = *tile,
                    Rotation::CounterClockwise => cells[n - 1 - c][r] = *tile,
                }
            }
        }
        Self { size: n, cells }
    }
}

/// A falling piece: matrix, kind and the board position of the matrix's
/// top-left corner.
///
/// Pieces are immutable values: movement and rotation return new `Piece`s.
///
/// # Example
///
/// ```
/// use herdfall_engine::{Animal, Board, Piece, Rotation, ShapeKind};
///
/// let board = Board::new(10, 16);
/// let piece = Piece::normal(ShapeKind::T, Animal::Pig, 3, 0);
/// let moved = piece.right(&board).unwrap();
/// let rotated = moved.rotated(&board, Rotation::Clockwise).unwrap();
/// assert_eq!(rotated.col(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    matrix: PieceMatrix,
    col: i32,
    row: i32,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind, matrix: PieceMatrix, col: i32, row: i32) -> Self {
        Self {
            kind,
            matrix,
            col,
            row,
        }
    }

    #[must_use]
    pub fn normal(shape: ShapeKind, animal: Animal, col: i32, row: i32) -> Self {
        Self::new(
            PieceKind::Normal(shape),
            PieceMatrix::shape(shape, animal),
            col,
            row,
        )
    }

    #[must_use]
    pub fn wolves(col: i32, row: i32) -> Self {
        Self::new(PieceKind::Wolves, PieceMatrix::square(2, Tile::Wolf), col, row)
    }

    #[must_use]
    pub fn black_sheep(col: i32, row: i32) -> Self {
        Self::new(
            PieceKind::BlackSheep,
            PieceMatrix::square(2, Tile::BlackSheep),
            col,
            row,
        )
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn matrix(&self) -> &PieceMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn col(&self) -> i32 {
        self.col
    }

    #[must_use]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub fn rotates(&self) -> bool {
        self.kind.rotates()
    }

    /// The animal a normal piece is made of.
    #[must_use]
    pub fn animal(&self) -> Option<Animal> {
        self.matrix
            .occupied_offsets()
            .find_map(|(_, _, tile)| tile.animal())
    }

    /// Returns `(x, y, tile)` in board coordinates for every cell of the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        self.matrix
            .occupied_offsets()
            .map(move |(dx, dy, tile)| (self.col + dx, self.row + dy, tile))
    }

    /// Board cells covered by the piece, dropping any that lie outside the board.
    #[must_use]
    pub fn footprint(&self, board: &Board) -> ArrayVec<(usize, usize), 16> {
        self.occupied_positions()
            .filter_map(|(x, y, _)| board.checked_index(x, y))
            .collect()
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            col: self.col + dx,
            row: self.row + dy,
            ..*self
        }
    }

    /// Moves by `(dx, dy)` if the target position is free.
    #[must_use]
    pub fn moved(&self, board: &Board, dx: i32, dy: i32) -> Option<Self> {
        (!board.collides(self, dx, dy, None)).then(|| self.shifted(dx, dy))
    }

    #[must_use]
    pub fn left(&self, board: &Board) -> Option<Self> {
        self.moved(board, -1, 0)
    }

    #[must_use]
    pub fn right(&self, board: &Board) -> Option<Self> {
        self.moved(board, 1, 0)
    }

    #[must_use]
    pub fn down(&self, board: &Board) -> Option<Self> {
        self.moved(board, 0, 1)
    }

    /// Rotates the piece, trying each of [`KICK_OFFSETS`] in order.
    ///
    /// Returns `None` if the piece does not rotate or no offset fits.
    #[must_use]
    pub fn rotated(&self, board: &Board, rotation: Rotation) -> Option<Self> {
        if !self.rotates() {
            return None;
        }
        let matrix = self.matrix.rotated(rotation);
        KICK_OFFSETS
            .into_iter()
            .find(|&dx| !board.collides(self, dx, 0, Some(&matrix)))
            .map(|dx| Self {
                matrix,
                col: self.col + dx,
                ..*self
            })
    }

    /// Row the piece would rest on if dropped straight down.
    #[must_use]
    pub fn ghost_row(&self, board: &Board) -> i32 {
        let mut row = self.row;
        while !board.collides(self, 0, row - self.row + 1, None) {
            row += 1;
        }
        row
    }

    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        Self {
            row: self.ghost_row(board),
            ..*self
        }
    }
}
