use log::{debug, info};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::{
    Animal, Board, ConfigError, EngineConfig, Overlay, Piece, PieceCollisionError, Rotation,
    TopOutError,
};

use super::{
    events::GameEvent,
    game_field::{GameField, Placement},
    game_stats::GameStats,
    level::LevelCurve,
    piece_generator::SessionSeed,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Result of a downward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved down one row.
    Moved,
    /// The piece could not move and was locked.
    Locked,
    /// Nothing happened: paused, game over, or the fall timer has not elapsed.
    Ignored,
}

/// A single game, driven by discrete commands.
///
/// Every command is total: blocked moves return `false` (and queue
/// [`GameEvent::MoveBlocked`]), and all mutating commands are ignored while
/// paused or after game over. Reads stay valid in every state.
///
/// The session owns no clock. The driver reports elapsed time through
/// [`GameSession::tick`], and a gravity step fires once the accumulated time
/// reaches the current fall interval.
///
/// # Example
///
/// ```
/// use herdfall_engine::{EngineConfig, GameSession, SessionSeed};
///
/// let seed = SessionSeed::from_bytes([7; 16]);
/// let mut session = GameSession::with_seed(EngineConfig::default(), seed).unwrap();
/// session.move_left();
/// session.rotate_cw();
/// while session.stats().locks() == 0 {
///     session.soft_drop();
/// }
/// for event in session.drain_events() {
///     println!("{event:?}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GameSession<R = Pcg32> {
    field: GameField<R>,
    stats: GameStats,
    curve: LevelCurve,
    session_state: SessionState,
    fall_accumulator_ms: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Starts a session seeded from the thread-local generator.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Starts a reproducible session.
    pub fn with_seed(config: EngineConfig, seed: SessionSeed) -> Result<Self, ConfigError> {
        debug!("session seed {seed}");
        Self::with_rng(config, seed.to_rng())
    }
}

impl<R: Rng> GameSession<R> {
    /// Starts a session drawing all randomness from `rng`.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        let curve = LevelCurve::new(&config);
        let field = GameField::new(config, rng)?;
        info!(
            "new session on {}x{} board",
            field.board().cols(),
            field.board().rows()
        );
        Ok(Self {
            field,
            stats: GameStats::new(&curve),
            curve,
            session_state: SessionState::Playing,
            fall_accumulator_ms: 0,
            events: vec![],
        })
    }

    /// Replaces the whole game state with a fresh one.
    ///
    /// The configuration is kept and the random stream continues, so the new
    /// game differs from the previous one.
    pub fn restart(&mut self) {
        self.field.reset();
        self.stats = GameStats::new(&self.curve);
        self.session_state = SessionState::Playing;
        self.fall_accumulator_ms = 0;
        self.events.clear();
        info!("session restarted");
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        self.field.config()
    }

    #[must_use]
    pub fn field(&self) -> &GameField<R> {
        &self.field
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        self.field.overlay()
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.field.current_piece()
    }

    #[must_use]
    pub fn next_piece(&self) -> Piece {
        self.field.next_piece()
    }

    /// The current piece moved down to where it would come to rest.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.field.ghost_piece()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Largest connected animal region currently on the board.
    #[must_use]
    pub fn best_group(&self) -> Option<(Animal, usize)> {
        self.field.best_group()
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.session_state.is_paused()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session_state.is_game_over()
    }

    #[must_use]
    pub fn fall_accumulator_ms(&self) -> u64 {
        self.fall_accumulator_ms
    }

    /// Events queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.session_state = match (&self.session_state, paused) {
            (SessionState::GameOver, _) => SessionState::GameOver,
            (_, true) => SessionState::Paused,
            (_, false) => SessionState::Playing,
        };
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(self.session_state.is_playing());
    }

    pub fn move_left(&mut self) -> bool {
        self.command(|piece, board| piece.left(board))
    }

    pub fn move_right(&mut self) -> bool {
        self.command(|piece, board| piece.right(board))
    }

    /// Rotates clockwise with kicks. Always `false` for non-rotating pieces.
    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(Rotation::Clockwise)
    }

    /// Rotates counter-clockwise with kicks. Always `false` for non-rotating pieces.
    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(Rotation::CounterClockwise)
    }

    /// Moves the piece down one row, locking it if it cannot move.
    ///
    /// Does not touch the fall timer.
    pub fn soft_drop(&mut self) -> DropOutcome {
        if !self.session_state.is_playing() {
            return DropOutcome::Ignored;
        }
        self.drop_or_lock()
    }

    /// One gravity step: moves down or locks, and resets the fall timer.
    pub fn step(&mut self) -> DropOutcome {
        if !self.session_state.is_playing() {
            return DropOutcome::Ignored;
        }
        self.fall_accumulator_ms = 0;
        self.drop_or_lock()
    }

    /// Advances the fall timer by `elapsed_ms` and steps once it reaches the
    /// fall interval. Time beyond the interval is discarded.
    pub fn tick(&mut self, elapsed_ms: u64) -> DropOutcome {
        if !self.session_state.is_playing() {
            return DropOutcome::Ignored;
        }
        self.fall_accumulator_ms = self.fall_accumulator_ms.saturating_add(elapsed_ms);
        if self.fall_accumulator_ms < self.stats.fall_interval_ms() {
            return DropOutcome::Ignored;
        }
        self.step()
    }

    fn rotate(&mut self, rotation: Rotation) -> bool {
        if !self.field.current_piece().rotates() {
            return false;
        }
        self.command(|piece, board| piece.rotated(board, rotation))
    }

    fn command(&mut self, f: impl FnOnce(&Piece, &Board) -> Option<Piece>) -> bool {
        if !self.session_state.is_playing() {
            return false;
        }
        if self.try_update_piece(f).is_ok() {
            return true;
        }
        self.events.push(GameEvent::MoveBlocked);
        false
    }

    fn try_update_piece(
        &mut self,
        f: impl FnOnce(&Piece, &Board) -> Option<Piece>,
    ) -> Result<(), PieceCollisionError> {
        let piece = f(&self.field.current_piece(), self.field.board()).ok_or(PieceCollisionError)?;
        self.field.set_current_piece(piece)
    }

    fn drop_or_lock(&mut self) -> DropOutcome {
        if self.try_update_piece(|piece, board| piece.down(board)).is_ok() {
            return DropOutcome::Moved;
        }
        self.lock();
        DropOutcome::Locked
    }

    fn lock(&mut self) {
        let piece = self.field.current_piece();
        let kind = piece.kind();
        debug!("lock {kind:?} at ({}, {})", piece.col(), piece.row());

        let placement = match self.field.place_current() {
            Ok(placement) => placement,
            Err(reason) => {
                self.game_over(reason);
                return;
            }
        };
        self.events.push(GameEvent::PieceLocked { kind });
        match placement {
            Placement::Placed => {}
            Placement::Blasted(popped) => {
                debug!("wolves popped {} tile(s)", popped.len());
                if !popped.is_empty() {
                    self.events.push(GameEvent::WolvesBlast { popped });
                }
            }
            Placement::Converted { animal, cells } => {
                debug!("black sheep converted to {animal:?}");
                self.events.push(GameEvent::BlackSheepConverted {
                    animal,
                    cells: cells.to_vec(),
                });
            }
        }

        if let Some(level) = self.stats.complete_lock(&self.curve) {
            debug!(
                "level {level}, fall interval {}ms",
                self.stats.fall_interval_ms()
            );
            self.events.push(GameEvent::LevelUp { level });
        }

        let cleared = self.field.resolve(self.stats.score_mut());
        self.stats.add_regions_cleared(cleared.len());
        self.events
            .extend(cleared.into_iter().map(GameEvent::RegionCleared));

        if let Err(reason) = self.field.spawn_next() {
            self.game_over(reason);
        }
    }

    fn game_over(&mut self, reason: TopOutError) {
        info!(
            "game over ({reason}): score {}, level {}, locks {}, regions {}",
            self.stats.score(),
            self.stats.level(),
            self.stats.locks(),
            self.stats.regions_cleared()
        );
        self.session_state = SessionState::GameOver;
        self.events.push(GameEvent::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use crate::{PieceKind, ShapeKind, Tile};

    use super::*;

    fn quiet_config() -> EngineConfig {
        EngineConfig {
            egg_count: 0,
            turd_count: 0,
            ..EngineConfig::default()
        }
    }

    fn session(config: EngineConfig) -> GameSession {
        GameSession::with_seed(config, SessionSeed::from_bytes([42; 16])).unwrap()
    }

    fn set_current(session: &mut GameSession, piece: Piece) {
        let next = session.field.next_piece();
        session.field.set_pieces(piece, next);
    }

    fn drop_until_locked(session: &mut GameSession) {
        for _ in 0..100 {
            if session.soft_drop().is_locked() {
                return;
            }
        }
        panic!("piece never locked");
    }

    #[test]
    fn test_new_session() {
        let session = session(EngineConfig::default());
        assert!(session.session_state().is_playing());
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().level(), 1);
        assert_eq!(session.board().occupied_count(), 0);
        let marks = session.overlay().cells().filter(|(_, _, m)| !m.is_none()).count();
        assert_eq!(marks, 20);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            locks_per_level: 0,
            ..EngineConfig::default()
        };
        let err = GameSession::new(config).unwrap_err();
        assert_eq!(err, ConfigError::ZeroLocksPerLevel);
    }

    #[test]
    fn test_same_seed_same_game() {
        let seed = SessionSeed::from_bytes([3; 16]);
        let mut a = GameSession::with_seed(EngineConfig::default(), seed).unwrap();
        let mut b = GameSession::with_seed(EngineConfig::default(), seed).unwrap();
        for i in 0..400 {
            for session in [&mut a, &mut b] {
                match i % 5 {
                    0 => _ = session.move_left(),
                    1 => _ = session.rotate_cw(),
                    2 => _ = session.move_right(),
                    _ => _ = session.soft_drop(),
                }
            }
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.overlay(), b.overlay());
        assert_eq!(a.stats(), b.stats());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_blocked_move_emits_event() {
        let mut session = session(quiet_config());
        set_current(&mut session, Piece::wolves(0, 0));
        assert!(!session.move_left());
        assert_eq!(session.drain_events(), vec![GameEvent::MoveBlocked]);
        assert!(session.move_right());
        assert_eq!(session.current_piece().col(), 1);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_special_pieces_do_not_rotate() {
        let mut session = session(quiet_config());
        set_current(&mut session, Piece::black_sheep(4, 0));
        assert!(!session.rotate_cw());
        assert!(!session.rotate_ccw());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_rotation_kicks_off_the_wall() {
        let mut session = session(quiet_config());
        // Vertical I in the rightmost column rotates back to horizontal.
        let piece = Piece::normal(ShapeKind::I, Animal::Goat, 4, 0)
            .rotated(&Board::new(10, 16), Rotation::Clockwise)
            .unwrap()
            .shifted(3, 0);
        set_current(&mut session, piece);
        assert!(session.rotate_ccw());
        assert_eq!(session.current_piece().col(), 6);
        let positions: Vec<_> = session
            .current_piece()
            .occupied_positions()
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(positions.iter().all(|&(x, _)| (0..10).contains(&x)));
        assert!(positions.windows(2).all(|w| w[0].1 == w[1].1));
    }

    #[test]
    fn test_lock_clears_region_and_scores() {
        let mut session = session(quiet_config());
        for x in 0..6 {
            session.field.board_mut().set(x, 15, Tile::Animal(Animal::Sheep));
        }
        set_current(&mut session, Piece::normal(ShapeKind::O, Animal::Sheep, 5, 10));
        drop_until_locked(&mut session);

        assert_eq!(session.board().occupied_count(), 0);
        assert_eq!(session.stats().score(), 10);
        assert_eq!(session.stats().locks(), 1);
        assert_eq!(session.stats().regions_cleared(), 1);

        let events = session.drain_events();
        assert_eq!(
            events[0],
            GameEvent::PieceLocked {
                kind: PieceKind::Normal(ShapeKind::O)
            }
        );
        let GameEvent::RegionCleared(region) = &events[1] else {
            panic!("expected a cleared region, got {events:?}");
        };
        assert_eq!(region.animal, Animal::Sheep);
        assert_eq!(region.size(), 10);
        assert_eq!((region.eggs, region.turds), (0, 0));
        assert_eq!((region.score_before, region.score_after), (0, 10));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_threshold_one_below_does_not_clear() {
        let mut session = session(quiet_config());
        for x in 0..5 {
            session.field.board_mut().set(x, 15, Tile::Animal(Animal::Sheep));
        }
        set_current(&mut session, Piece::normal(ShapeKind::O, Animal::Sheep, 4, 10));
        drop_until_locked(&mut session);
        assert_eq!(session.board().occupied_count(), 9);
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.best_group(), Some((Animal::Sheep, 9)));
    }

    #[test]
    fn test_egg_under_region_doubles_score() {
        let mut session = session(quiet_config());
        for x in 0..6 {
            session.field.board_mut().set(x, 15, Tile::Animal(Animal::Cow));
        }
        session.field.overlay_mut().set(0, 15, crate::OverlayMark::Egg);
        set_current(&mut session, Piece::normal(ShapeKind::O, Animal::Cow, 5, 10));
        drop_until_locked(&mut session);
        assert_eq!(session.stats().score(), 20);
        assert!(session.overlay().get(0, 15).is_none());
    }

    #[test]
    fn test_wolves_lock_blasts_and_counts() {
        let mut session = session(quiet_config());
        session.field.board_mut().set(2, 15, Tile::Animal(Animal::Pig));
        session.field.board_mut().set(0, 15, Tile::Animal(Animal::Pig));
        set_current(&mut session, Piece::wolves(3, 10));
        drop_until_locked(&mut session);

        assert_eq!(session.stats().locks(), 1);
        let board = session.board();
        assert_eq!(board.get(2, 15), Tile::Empty);
        assert_eq!(board.get(0, 15), Tile::Animal(Animal::Pig));
        assert_eq!(board.occupied_count(), 1);

        let events = session.drain_events();
        assert_eq!(events[0], GameEvent::PieceLocked { kind: PieceKind::Wolves });
        let GameEvent::WolvesBlast { popped } = &events[1] else {
            panic!("expected a blast, got {events:?}");
        };
        assert_eq!(popped.len(), 1);
        assert_eq!((popped[0].x, popped[0].y), (2, 15));
    }

    #[test]
    fn test_empty_wolves_blast_is_silent() {
        let mut session = session(quiet_config());
        set_current(&mut session, Piece::wolves(3, 10));
        drop_until_locked(&mut session);
        let events = session.drain_events();
        assert_eq!(events, vec![GameEvent::PieceLocked { kind: PieceKind::Wolves }]);
    }

    #[test]
    fn test_black_sheep_lock_converts() {
        let mut session = session(quiet_config());
        session.field.board_mut().set(2, 15, Tile::Animal(Animal::Chicken));
        set_current(&mut session, Piece::black_sheep(3, 10));
        drop_until_locked(&mut session);
        let events = session.drain_events();
        assert_eq!(
            events[1],
            GameEvent::BlackSheepConverted {
                animal: Animal::Chicken,
                cells: vec![(3, 14), (4, 14), (3, 15), (4, 15)],
            }
        );
        assert_eq!(session.best_group(), Some((Animal::Chicken, 5)));
    }

    #[test]
    fn test_level_up_event() {
        let mut session = session(EngineConfig {
            locks_per_level: 1,
            ..quiet_config()
        });
        set_current(&mut session, Piece::normal(ShapeKind::T, Animal::Goat, 0, 10));
        drop_until_locked(&mut session);
        assert_eq!(session.stats().level(), 2);
        assert_eq!(session.stats().fall_interval_ms(), 572);
        assert!(session.drain_events().contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_game_over_on_blocked_spawn_and_restart() {
        let mut session = session(EngineConfig::default());
        for x in 0..10 {
            for y in 0..2 {
                session.field.board_mut().set(x, y, Tile::Wolf);
            }
        }
        set_current(&mut session, Piece::normal(ShapeKind::O, Animal::Pig, 0, 10));
        drop_until_locked(&mut session);

        assert!(session.is_game_over());
        assert_eq!(session.drain_events().last(), Some(&GameEvent::GameOver));

        // Frozen.
        let board = session.board().clone();
        let piece = session.current_piece();
        assert!(!session.move_left());
        assert!(!session.rotate_cw());
        assert!(session.soft_drop().is_ignored());
        assert!(session.step().is_ignored());
        assert!(session.tick(10_000).is_ignored());
        session.set_paused(true);
        assert!(session.is_game_over());
        assert_eq!(session.board(), &board);
        assert_eq!(session.current_piece(), piece);
        assert!(session.drain_events().is_empty());

        session.restart();
        assert!(session.session_state().is_playing());
        assert_eq!(session.board().occupied_count(), 0);
        assert_eq!(session.stats(), &GameStats::new(&LevelCurve::new(session.config())));
        let marks = session.overlay().cells().filter(|(_, _, m)| !m.is_none()).count();
        assert_eq!(marks, 20);
        assert_eq!(session.fall_accumulator_ms(), 0);
    }

    #[test]
    fn test_lock_above_top_is_game_over() {
        let mut session = session(quiet_config());
        session.field.board_mut().set(3, 1, Tile::Wolf);
        set_current(&mut session, Piece::normal(ShapeKind::T, Animal::Pig, 3, -1));
        assert!(session.soft_drop().is_locked());
        assert!(session.is_game_over());
        assert_eq!(session.board().occupied_count(), 1);
        assert_eq!(session.stats().locks(), 0);
    }

    #[test]
    fn test_pause_blocks_commands_but_not_reads() {
        let mut session = session(quiet_config());
        let piece = session.current_piece();
        session.set_paused(true);
        assert!(session.is_paused());
        assert!(!session.move_right());
        assert!(session.soft_drop().is_ignored());
        assert!(session.tick(5_000).is_ignored());
        assert_eq!(session.current_piece(), piece);
        assert_eq!(session.fall_accumulator_ms(), 0);
        assert!(session.drain_events().is_empty());

        session.toggle_pause();
        assert!(session.session_state().is_playing());
        assert!(session.move_right());
    }

    #[test]
    fn test_tick_accumulates_until_interval() {
        let mut session = session(quiet_config());
        let row = session.current_piece().row();
        assert!(session.tick(600).is_ignored());
        assert_eq!(session.fall_accumulator_ms(), 600);
        assert!(session.tick(100).is_moved());
        assert_eq!(session.fall_accumulator_ms(), 0);
        assert_eq!(session.current_piece().row(), row + 1);
    }

    #[test]
    fn test_soft_drop_keeps_fall_timer() {
        let mut session = session(quiet_config());
        session.tick(300);
        assert!(session.soft_drop().is_moved());
        assert_eq!(session.fall_accumulator_ms(), 300);
    }

    #[test]
    fn test_ghost_piece() {
        let mut session = session(quiet_config());
        set_current(&mut session, Piece::normal(ShapeKind::O, Animal::Pig, 0, 0));
        let ghost = session.ghost_piece();
        assert_eq!(ghost.col(), 0);
        assert_eq!(ghost.row(), 14);
    }

    #[test]
    fn test_custom_rng() {
        let session =
            GameSession::with_rng(EngineConfig::compact(), rand_pcg::Pcg64::seed_from_u64(1)).unwrap();
        assert_eq!(session.board().rows(), 13);
    }
}
