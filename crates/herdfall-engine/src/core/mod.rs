pub use self::{grid::*, piece::*, tile::*};

pub(crate) mod grid;
pub(crate) mod piece;
pub(crate) mod tile;
