use herdfall_engine::{OverlayMark, Tile};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::style;

/// One board cell, two terminal columns wide so an emoji fits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDisplay {
    style: Style,
    symbol: &'static str,
}

impl TileDisplay {
    pub const GHOST: Self = Self::new(style::GHOST, "[]");

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    /// Builds the display for a tile drawn over the overlay mark beneath it.
    ///
    /// Empty cells show the mark itself; occupied cells keep their emoji and
    /// take a tinted background instead.
    pub fn from_cell(tile: Tile, mark: OverlayMark, show_dots: bool) -> Self {
        let style = match tile {
            Tile::Empty => {
                return match mark {
                    OverlayMark::None if show_dots => Self::new(style::EMPTY_DOT, "."),
                    OverlayMark::None => Self::new(style::EMPTY, ""),
                    mark => Self::new(style::EMPTY_DOT, mark.label()),
                };
            }
            Tile::Animal(animal) => style::animal(animal),
            Tile::Wolf => style::WOLF,
            Tile::BlackSheep => style::BLACK_SHEEP,
        };
        Self::new(style::marked(style, mark), tile.label())
    }
}

impl Widget for TileDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &TileDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // A Paragraph fills the whole area, not just the cells under the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
