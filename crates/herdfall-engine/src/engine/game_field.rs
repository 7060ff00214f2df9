use arrayvec::ArrayVec;
use log::trace;
use rand::Rng;

use crate::{
    Animal, Board, ConfigError, EngineConfig, Overlay, OverlayMark, Piece, PieceCollisionError,
    TopOutError,
};

use super::{
    clear_resolver::{self, ClearResolver},
    effects::{self, PoppedCell},
    events::RegionCleared,
    piece_generator::PieceGenerator,
};

const OVERLAY_PLACEMENT_TRIES: usize = 8000;

/// What happened to the board when the current piece locked.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Placement {
    /// The piece was written to the board.
    Placed,
    /// A wolves pack cleared its surroundings. Empty if nothing was there.
    Blasted(Vec<PoppedCell>),
    /// A black sheep was written and converted to `animal`.
    Converted {
        animal: Animal,
        cells: ArrayVec<(usize, usize), 16>,
    },
}

/// Single-board game state: board, overlay, current and next piece.
///
/// The field owns the random number generator so that piece generation,
/// overlay layout and black sheep tie-breaks share one reproducible stream.
#[derive(Debug, Clone)]
pub struct GameField<R> {
    config: EngineConfig,
    board: Board,
    overlay: Overlay,
    current: Piece,
    next: Piece,
    generator: PieceGenerator,
    resolver: ClearResolver,
    rng: R,
}

impl<R: Rng> GameField<R> {
    /// Creates a field with an empty board, a fresh overlay and a new piece pair.
    pub fn new(config: EngineConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = PieceGenerator::new(&config);
        let current = generator.spawn(&mut rng);
        let next = generator.spawn(&mut rng);
        let mut field = Self {
            board: Board::new(config.cols, config.rows),
            overlay: Overlay::new(config.cols, config.rows),
            current,
            next,
            generator,
            resolver: ClearResolver::new(config.clear_threshold),
            config,
            rng,
        };
        field.sprinkle_overlay();
        Ok(field)
    }

    /// Empties the board, draws a new piece pair and re-sprinkles the overlay.
    ///
    /// Draws from the generator in the same order as [`GameField::new`].
    pub fn reset(&mut self) {
        self.board.clear();
        self.current = self.generator.spawn(&mut self.rng);
        self.next = self.generator.spawn(&mut self.rng);
        self.sprinkle_overlay();
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.current
    }

    #[must_use]
    pub fn next_piece(&self) -> Piece {
        self.next
    }

    pub fn set_current_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.current = piece;
        Ok(())
    }

    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.current.simulate_drop_position(&self.board)
    }

    #[must_use]
    pub fn best_group(&self) -> Option<(Animal, usize)> {
        clear_resolver::best_group(&self.board)
    }

    /// Scatters eggs, then turds, over the bottom band of the overlay.
    ///
    /// Cells are drawn uniformly from the band and skipped if already marked.
    /// Each mark kind gives up after a fixed number of draws, so a crowded
    /// band may end up with fewer marks than configured.
    pub fn sprinkle_overlay(&mut self) {
        self.overlay.clear();
        let rows = self.overlay.rows();
        let start_row = rows.saturating_sub(self.config.overlay_band_rows);
        let counts = [
            (OverlayMark::Egg, self.config.egg_count),
            (OverlayMark::Turd, self.config.turd_count),
        ];
        for (mark, mut remaining) in counts {
            let mut tries = 0;
            while remaining > 0 && tries < OVERLAY_PLACEMENT_TRIES {
                tries += 1;
                let x = self.rng.random_range(0..self.overlay.cols());
                let y = self.rng.random_range(start_row..rows);
                if self.overlay.get(x, y).is_none() {
                    self.overlay.set(x, y, mark);
                    remaining -= 1;
                }
            }
        }
    }

    /// Commits the current piece to the board according to its kind.
    ///
    /// Normal pieces and black sheep are rejected without touching the board
    /// if any of their cells is still above the top row.
    pub fn place_current(&mut self) -> Result<Placement, TopOutError> {
        let piece = self.current;
        if piece.kind().is_wolves() {
            let popped = effects::wolves_blast(&mut self.board, &mut self.overlay, &piece);
            return Ok(Placement::Blasted(popped));
        }

        if piece.occupied_positions().any(|(_, y, _)| y < 0) {
            return Err(TopOutError::LockedAboveTop);
        }
        for (x, y, tile) in piece.occupied_positions() {
            let (x, y) = self
                .board
                .checked_index(x, y)
                .ok_or(TopOutError::LockedAboveTop)?;
            self.board.set(x, y, tile);
        }

        if piece.kind().is_black_sheep() {
            let (animal, cells) = effects::convert_black_sheep(&mut self.board, &piece, &mut self.rng);
            return Ok(Placement::Converted { animal, cells });
        }
        Ok(Placement::Placed)
    }

    /// Runs the clear cascade, updating `score` region by region.
    pub fn resolve(&mut self, score: &mut u64) -> Vec<RegionCleared> {
        self.resolver.resolve(&mut self.board, &mut self.overlay, score)
    }

    /// Promotes the next piece to current and draws a new next piece.
    pub fn spawn_next(&mut self) -> Result<(), TopOutError> {
        self.current = self.next;
        self.next = self.generator.spawn(&mut self.rng);
        trace!("spawned {:?}, next {:?}", self.current.kind(), self.next.kind());
        if self.board.is_colliding(&self.current) {
            return Err(TopOutError::NewPieceCollision);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    #[cfg(test)]
    pub(crate) fn set_pieces(&mut self, current: Piece, next: Piece) {
        self.current = current;
        self.next = next;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use crate::{ShapeKind, Tile};

    use super::*;

    fn field(config: EngineConfig, seed: u64) -> GameField<Pcg32> {
        GameField::new(config, Pcg32::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_new_field() {
        let field = field(EngineConfig::default(), 1);
        assert_eq!(field.board().occupied_count(), 0);
        assert_eq!(field.current_piece().row(), 0);
        assert!(!field.board().is_colliding(&field.current_piece()));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            clear_threshold: 0,
            ..EngineConfig::default()
        };
        let err = GameField::new(config, Pcg32::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroClearThreshold);
    }

    #[test]
    fn test_sprinkle_overlay_fills_bottom_band() {
        for seed in 0..20 {
            let field = field(EngineConfig::default(), seed);
            let overlay = field.overlay();
            let marks: Vec<_> = overlay.cells().filter(|(_, _, m)| !m.is_none()).collect();
            let eggs = marks.iter().filter(|(_, _, m)| *m == OverlayMark::Egg).count();
            let turds = marks.iter().filter(|(_, _, m)| *m == OverlayMark::Turd).count();
            assert_eq!((eggs, turds), (10, 10));
            // Rows 9..16 form the band on a 16-row board.
            assert!(marks.iter().all(|(_, y, _)| *y >= 9));
        }
    }

    #[test]
    fn test_sprinkle_overlay_band_taller_than_board() {
        let config = EngineConfig {
            rows: 4,
            overlay_band_rows: 7,
            egg_count: 3,
            turd_count: 3,
            ..EngineConfig::default()
        };
        let field = field(config, 9);
        let marks = field.overlay().cells().filter(|(_, _, m)| !m.is_none()).count();
        assert_eq!(marks, 6);
    }

    #[test]
    fn test_sprinkle_overlay_fills_full_band() {
        let config = EngineConfig {
            cols: 4,
            rows: 4,
            overlay_band_rows: 1,
            egg_count: 2,
            turd_count: 2,
            ..EngineConfig::default()
        };
        let field = field(config, 3);
        assert_eq!(field.overlay().to_ascii_rows()[..3], ["....", "....", "...."]);
        let bottom = &field.overlay().to_ascii_rows()[3];
        assert_eq!(bottom.matches('e').count(), 2);
        assert_eq!(bottom.matches('t').count(), 2);
    }

    #[test]
    fn test_place_normal_piece() {
        let mut field = field(EngineConfig::default(), 2);
        let piece = Piece::normal(ShapeKind::O, Animal::Cow, 0, 14);
        field.set_pieces(piece, field.next_piece());
        assert_eq!(field.place_current(), Ok(Placement::Placed));
        let board = field.board();
        assert_eq!(board.occupied_count(), 4);
        assert_eq!(board.get(1, 14), Tile::Animal(Animal::Cow));
        assert_eq!(board.get(2, 15), Tile::Animal(Animal::Cow));
    }

    #[test]
    fn test_place_above_top_leaves_board_untouched() {
        let mut field = field(EngineConfig::default(), 2);
        let piece = Piece::normal(ShapeKind::T, Animal::Cow, 3, -1);
        field.set_pieces(piece, field.next_piece());
        assert_eq!(field.place_current(), Err(TopOutError::LockedAboveTop));
        assert_eq!(field.board().occupied_count(), 0);

        let piece = Piece::black_sheep(3, -1);
        field.set_pieces(piece, field.next_piece());
        assert_eq!(field.place_current(), Err(TopOutError::LockedAboveTop));
        assert_eq!(field.board().occupied_count(), 0);
    }

    #[test]
    fn test_place_wolves_does_not_write_itself() {
        let mut field = field(EngineConfig::default(), 2);
        field.board_mut().set(5, 15, Tile::Animal(Animal::Pig));
        field.overlay_mut().clear();
        field.set_pieces(Piece::wolves(3, 14), field.next_piece());
        let placement = field.place_current().unwrap();
        assert_eq!(
            placement,
            Placement::Blasted(vec![PoppedCell {
                x: 5,
                y: 15,
                tile: Tile::Animal(Animal::Pig)
            }])
        );
        assert_eq!(field.board().occupied_count(), 0);
    }

    #[test]
    fn test_place_black_sheep_converts() {
        let mut field = field(EngineConfig::default(), 2);
        field.board_mut().set(2, 15, Tile::Animal(Animal::Goat));
        field.set_pieces(Piece::black_sheep(3, 14), field.next_piece());
        let placement = field.place_current().unwrap();
        let Placement::Converted { animal, cells } = placement else {
            panic!("expected conversion, got {placement:?}");
        };
        assert_eq!(animal, Animal::Goat);
        assert_eq!(cells.len(), 4);
        assert!(field.board().cells().all(|(_, _, t)| t.is_empty() || t == Tile::Animal(Animal::Goat)));
        assert_eq!(field.board().occupied_count(), 5);
    }

    #[test]
    fn test_spawn_next_promotes_next_piece() {
        let mut field = field(EngineConfig::default(), 4);
        let next = field.next_piece();
        assert_eq!(field.spawn_next(), Ok(()));
        assert_eq!(field.current_piece(), next);
    }

    #[test]
    fn test_spawn_next_detects_collision() {
        let mut field = field(EngineConfig::default(), 4);
        for x in 0..10 {
            for y in 0..2 {
                field.board_mut().set(x, y, Tile::Wolf);
            }
        }
        assert_eq!(field.spawn_next(), Err(TopOutError::NewPieceCollision));
    }

    #[test]
    fn test_set_current_piece_rejects_collision() {
        let mut field = field(EngineConfig::default(), 4);
        let piece = field.current_piece().shifted(-10, 0);
        assert_eq!(field.set_current_piece(piece), Err(PieceCollisionError));
    }
}
