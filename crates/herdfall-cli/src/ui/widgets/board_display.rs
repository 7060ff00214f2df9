use std::iter;

use herdfall_engine::{Board, Overlay, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::TileDisplay;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    overlay: &'a Overlay,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board, overlay: &'a Overlay) -> Self {
        Self {
            board,
            overlay,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
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
        super::cell_count(self.board.cols()) * TileDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cell_count(self.board.rows()) * TileDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Display for every cell, row by row: falling piece over board tiles,
    /// ghost only where the board is empty.
    fn tiles(&self) -> Vec<Vec<TileDisplay>> {
        let mut board = self.board.clone();
        if let Some(piece) = self.falling_piece {
            for (x, y, tile) in piece.occupied_positions() {
                if let Some((x, y)) = board.checked_index(x, y) {
                    board.set(x, y, tile);
                }
            }
        }
        let ghost_cells = self
            .ghost
            .map(|ghost| ghost.footprint(self.board))
            .unwrap_or_default();

        (0..board.rows())
            .map(|y| {
                (0..board.cols())
                    .map(|x| {
                        let tile = board.get(x, y);
                        if tile.is_empty() && ghost_cells.contains(&(x, y)) {
                            TileDisplay::GHOST
                        } else {
                            TileDisplay::from_cell(tile, self.overlay.get(x, y), true)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.board.cols()).map(|_| Constraint::Length(TileDisplay::width()));
        let row_constraints =
            (0..self.board.rows()).map(|_| Constraint::Length(TileDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.tiles()) {
            for (grid_cell, tile) in iter::zip(grid_row, row) {
                tile.render(grid_cell, buf);
            }
        }
    }
}
