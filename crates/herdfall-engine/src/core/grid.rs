use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    piece::{Piece, PieceMatrix},
    tile::{OverlayMark, Tile},
};

/// Cell values that have a single-character ASCII form.
///
/// Used for test fixtures and for the string-row serialization of grids.
pub trait CellChar: Copy + Default + PartialEq {
    fn as_char(self) -> char;
    fn from_char(c: char) -> Option<Self>;
}

impl CellChar for Tile {
    fn as_char(self) -> char {
        Tile::as_char(self)
    }

    fn from_char(c: char) -> Option<Self> {
        Tile::from_char(c)
    }
}

impl CellChar for OverlayMark {
    fn as_char(self) -> char {
        OverlayMark::as_char(self)
    }

    fn from_char(c: char) -> Option<Self> {
        OverlayMark::from_char(c)
    }
}

/// Fixed-size rectangular grid, row 0 at the top.
///
/// Every cell always holds exactly one value. Accessors take `usize`
/// coordinates and panic when they are out of range: callers are expected to
/// bounds-check with [`Grid::in_bounds`] or [`Grid::checked_index`] first, the
/// grid never clips silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    cols: usize,
    rows: usize,
    cells: Vec<T>,
}

/// The placed-tile board.
pub type Board = Grid<Tile>;

/// The terrain overlay. It is independent of the board and unaffected by gravity.
pub type Overlay = Grid<OverlayMark>;

impl<T: Copy + Default> Grid<T> {
    /// Creates a grid with every cell set to `T::default()`.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![T::default(); cols * rows],
        }
    }

    /// Resets every cell to `T::default()`.
    pub fn clear(&mut self) {
        self.cells.fill(T::default());
    }
}

impl<T: Copy> Grid<T> {
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.checked_index(x, y).is_some()
    }

    /// Converts signed coordinates to grid indices if they lie inside the grid.
    #[must_use]
    pub fn checked_index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.cols && y < self.rows).then_some((x, y))
    }

    /// The cell at `(x + dx, y + dy)`, if it lies inside the grid.
    #[must_use]
    pub fn neighbour(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let x = x.checked_add_signed(dx)?;
        let y = y.checked_add_signed(dy)?;
        (x < self.cols && y < self.rows).then_some((x, y))
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> T {
        assert!(x < self.cols && y < self.rows, "({x}, {y}) out of bounds");
        self.cells[y * self.cols + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        assert!(x < self.cols && y < self.rows, "({x}, {y}) out of bounds");
        self.cells[y * self.cols + x] = value;
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.cols)
    }

    /// Returns an iterator over `(x, y, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (i % cols, i / cols, *value))
    }
}

impl<T: CellChar> Grid<T> {
    /// Creates a grid from ASCII art, one line per row, top to bottom.
    ///
    /// Blank lines and whitespace are ignored. All rows must have the same width.
    ///
    /// # Example
    ///
    /// ```
    /// use herdfall_engine::{Animal, Board, Tile};
    ///
    /// let board = Board::from_ascii(
    ///     "
    ///     ....
    ///     .SS.
    ///     WGGB
    ///     ",
    /// );
    /// assert_eq!(board.cols(), 4);
    /// assert_eq!(board.rows(), 3);
    /// assert_eq!(board.get(1, 1), Tile::Animal(Animal::Sheep));
    /// assert_eq!(board.get(0, 2), Tile::Wolf);
    /// ```
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let rows: Vec<Vec<T>> = art
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(y, line)| {
                line.into_iter()
                    .map(|c| {
                        T::from_char(c)
                            .unwrap_or_else(|| panic!("invalid cell character {c:?} at row {y}"))
                    })
                    .collect()
            })
            .collect();
        let cols = rows.first().map_or(0, Vec::len);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(
                row.len(),
                cols,
                "Each row must have exactly {cols} cells, got {} at row {y}",
                row.len()
            );
        }
        Self {
            cols,
            rows: rows.len(),
            cells: rows.into_iter().flatten().collect(),
        }
    }

    /// Returns the grid as one string per row.
    #[must_use]
    pub fn to_ascii_rows(&self) -> Vec<String> {
        self.rows_iter()
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
            .collect()
    }
}

impl<T: CellChar> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_ascii_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl<T: CellChar> Serialize for Grid<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["....", ".SS.", "WGGB"]
        self.to_ascii_rows().serialize(serializer)
    }
}

impl<'de, T: CellChar> Deserialize<'de> for Grid<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let lines = Vec::<String>::deserialize(deserializer)?;
        let cols = lines.first().map_or(0, |line| line.chars().count());
        let mut cells = Vec::with_capacity(cols * lines.len());
        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(serde::de::Error::custom(format!(
                    "row {y} has {} cells, expected {cols}",
                    line.chars().count()
                )));
            }
            for c in line.chars() {
                let cell = T::from_char(c).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid cell {c:?} at row {y}"))
                })?;
                cells.push(cell);
            }
        }
        Ok(Self {
            cols,
            rows: lines.len(),
            cells,
        })
    }
}

impl Board {
    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|tile| !tile.is_empty()).count()
    }

    /// Checks whether `piece`, offset by `(dx, dy)` and optionally using
    /// `matrix` instead of its own matrix, would leave the board or overlap a
    /// non-empty cell.
    ///
    /// Only non-empty matrix cells are tested. Overlay marks never collide.
    #[must_use]
    pub fn collides(&self, piece: &Piece, dx: i32, dy: i32, matrix: Option<&PieceMatrix>) -> bool {
        let matrix = matrix.unwrap_or(piece.matrix());
        matrix.occupied_offsets().any(|(mx, my, _)| {
            let x = piece.col() + mx + dx;
            let y = piece.row() + my + dy;
            self.checked_index(x, y)
                .is_none_or(|(x, y)| !self.get(x, y).is_empty())
        })
    }

    /// Checks if the piece overlaps the walls, floor or placed tiles where it stands.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        self.collides(piece, 0, 0, None)
    }

    /// Compacts every column downward, keeping the top-to-bottom order of tiles.
    ///
    /// Returns `true` if any tile moved.
    pub fn apply_gravity(&mut self) -> bool {
        let mut moved = false;
        for x in 0..self.cols {
            let mut write = self.rows;
            for y in (0..self.rows).rev() {
                let tile = self.get(x, y);
                if tile.is_empty() {
                    continue;
                }
                write -= 1;
                if write != y {
                    self.set(x, write, tile);
                    self.set(x, y, Tile::Empty);
                    moved = true;
                }
            }
        }
        moved
    }
}
