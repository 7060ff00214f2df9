use herdfall_engine::{OverlayMark, Piece, PieceMatrix, Tile};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::TileDisplay;

/// Preview of a single piece, trimmed to its occupied cells and centered.
#[derive(Debug, Default)]
pub struct PieceDisplay<'a> {
    piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn piece(self, piece: Piece) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * TileDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        4 * TileDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Rows of the smallest box holding every occupied cell of `matrix`.
fn trimmed_rows(matrix: &PieceMatrix) -> Vec<Vec<Tile>> {
    let size = matrix.size();
    let occupied = |x: usize, y: usize| !matrix.get(x, y).is_empty();
    let cols: Vec<usize> = (0..size)
        .filter(|&x| (0..size).any(|y| occupied(x, y)))
        .collect();
    (0..size)
        .filter(|&y| (0..size).any(|x| occupied(x, y)))
        .map(|y| match (cols.first(), cols.last()) {
            (Some(&first), Some(&last)) => (first..=last).map(|x| matrix.get(x, y)).collect(),
            _ => Vec::new(),
        })
        .collect()
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows = self
            .piece
            .map(|piece| trimmed_rows(piece.matrix()))
            .unwrap_or_default();
        let piece_cols = super::cell_count(rows.first().map_or(0, Vec::len));
        let piece_rows = super::cell_count(rows.len());
        let piece_area = area.centered(
            Constraint::Length(piece_cols * TileDisplay::width()),
            Constraint::Length(piece_rows * TileDisplay::height()),
        );

        let col_constraints = (0..piece_cols).map(|_| Constraint::Length(TileDisplay::width()));
        let row_constraints = (0..piece_rows).map(|_| Constraint::Length(TileDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in grid_rows.zip(rows) {
            for (grid_cell, tile) in grid_row.into_iter().zip(row) {
                TileDisplay::from_cell(tile, OverlayMark::None, false).render(grid_cell, buf);
            }
        }
    }
}
