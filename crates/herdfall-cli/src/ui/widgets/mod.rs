use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, piece_display::*, session_display::*, session_stats_display::*,
    tile_display::*,
};

mod board_display;
mod piece_display;
mod session_display;
mod session_stats_display;
mod tile_display;

mod color {
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    // Cell backgrounds, dark enough to keep the emoji readable
    pub const SHEEP: Color = Color::Rgb(70, 70, 90);
    pub const GOAT: Color = Color::Rgb(60, 80, 40);
    pub const CHICKEN: Color = Color::Rgb(110, 60, 20);
    pub const COW: Color = Color::Rgb(30, 60, 100);
    pub const PIG: Color = Color::Rgb(120, 50, 80);
    pub const WOLF: Color = Color::Rgb(45, 45, 45);
    pub const BLACK_SHEEP: Color = Color::Rgb(25, 25, 25);

    pub const EGG: Color = Color::Rgb(200, 170, 60);
    pub const TURD: Color = Color::Rgb(100, 65, 30);
}

pub mod style {
    use herdfall_engine::{Animal, OverlayMark};
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = fg_bg(color::BLACK, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::WHITE, color::BLACK);
    pub const BANNER: Style = fg_bg(color::YELLOW, color::BLACK);

    pub const WOLF: Style = fg_bg(color::WHITE, color::WOLF);
    pub const BLACK_SHEEP: Style = fg_bg(color::WHITE, color::BLACK_SHEEP);

    pub const fn animal(animal: Animal) -> Style {
        let bg = match animal {
            Animal::Sheep => color::SHEEP,
            Animal::Goat => color::GOAT,
            Animal::Chicken => color::CHICKEN,
            Animal::Cow => color::COW,
            Animal::Pig => color::PIG,
        };
        fg_bg(color::WHITE, bg)
    }

    /// Tints the background of a cell that sits on an overlay mark.
    pub const fn marked(style: Style, mark: OverlayMark) -> Style {
        match mark {
            OverlayMark::None => style,
            OverlayMark::Egg => style.bg(color::EGG),
            OverlayMark::Turd => style.bg(color::TURD),
        }
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

fn cell_count(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
