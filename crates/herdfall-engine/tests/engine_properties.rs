//! Property tests over generated boards and seeded sessions.
//!
//! - Flood fill finds the unique maximal region from any member cell.
//! - Regions partition the animal cells of a board.
//! - Gravity is idempotent and keeps each column's order.
//! - The clear cascade always reaches a board with no qualifying region.
//! - Seeded rollouts keep counters monotonic and the current piece legal.

use herdfall_engine::{
    Animal, Board, ClearResolver, DropOutcome, EngineConfig, GameSession, Overlay, SessionSeed,
    Tile, find_regions, flood_region,
};
use proptest::prelude::*;

fn tile_from_code(code: u8) -> Tile {
    match code {
        0..=3 => Tile::Empty,
        4 => Tile::Wolf,
        5 => Tile::BlackSheep,
        n => Tile::Animal(Animal::ALL[usize::from(n - 6) % Animal::LEN]),
    }
}

fn board_strategy() -> impl Strategy<Value = Board> {
    (4usize..10, 2usize..10).prop_flat_map(|(cols, rows)| {
        prop::collection::vec(0u8..11, cols * rows).prop_map(move |codes| {
            let mut board = Board::new(cols, rows);
            for (i, code) in codes.into_iter().enumerate() {
                board.set(i % cols, i / cols, tile_from_code(code));
            }
            board
        })
    })
}

fn column(board: &Board, x: usize) -> Vec<Tile> {
    (0..board.rows())
        .map(|y| board.get(x, y))
        .filter(|tile| !tile.is_empty())
        .collect()
}

proptest! {
    #[test]
    fn flood_region_is_maximal_and_stable(board in board_strategy()) {
        for (x, y, tile) in board.cells() {
            let Some(animal) = tile.animal() else {
                prop_assert_eq!(flood_region(&board, x, y), None);
                continue;
            };
            let region = flood_region(&board, x, y).unwrap();
            prop_assert_eq!(region.animal, animal);
            prop_assert!(region.cells.contains(&(x, y)));

            for &(cx, cy) in &region.cells {
                prop_assert_eq!(board.get(cx, cy), tile);
                for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                    if let Some((nx, ny)) = board.neighbour(cx, cy, dx, dy)
                        && board.get(nx, ny) == tile
                    {
                        prop_assert!(region.cells.contains(&(nx, ny)));
                    }
                }
                prop_assert_eq!(&flood_region(&board, cx, cy).unwrap(), &region);
            }
        }
    }

    #[test]
    fn regions_partition_animal_cells(board in board_strategy()) {
        let regions = find_regions(&board);
        let total: usize = regions.iter().map(|r| r.size()).sum();
        let animal_cells = board.cells().filter(|(_, _, t)| t.animal().is_some()).count();
        prop_assert_eq!(total, animal_cells);

        let mut seen = vec![false; board.cols() * board.rows()];
        for region in &regions {
            for &(x, y) in &region.cells {
                prop_assert!(!seen[y * board.cols() + x]);
                seen[y * board.cols() + x] = true;
            }
        }
    }

    #[test]
    fn gravity_is_idempotent(board in board_strategy()) {
        let mut once = board.clone();
        once.apply_gravity();
        let mut twice = once.clone();
        prop_assert!(!twice.apply_gravity());
        prop_assert_eq!(&once, &twice);

        prop_assert_eq!(once.occupied_count(), board.occupied_count());
        for x in 0..board.cols() {
            prop_assert_eq!(column(&once, x), column(&board, x));
            // Compacted: no tile sits above an empty cell.
            let first = (0..once.rows()).find(|&y| !once.get(x, y).is_empty());
            if let Some(first) = first {
                prop_assert!((first..once.rows()).all(|y| !once.get(x, y).is_empty()));
            }
        }
    }

    #[test]
    fn cascade_reaches_fixpoint(board in board_strategy(), threshold in 1usize..12) {
        let mut after = board.clone();
        let mut overlay = Overlay::new(board.cols(), board.rows());
        let resolver = ClearResolver::new(threshold);
        let mut score = 0;
        let cleared = resolver.resolve(&mut after, &mut overlay, &mut score);

        prop_assert!(resolver.qualifying_regions(&after).is_empty());
        let removed: usize = cleared.iter().map(|r| r.size()).sum();
        prop_assert_eq!(after.occupied_count() + removed, board.occupied_count());
        prop_assert!(cleared.len() <= board.cols() * board.rows());
        prop_assert!(cleared.iter().all(|r| r.size() >= threshold));
        if !cleared.is_empty() {
            let mut settled = after.clone();
            prop_assert!(!settled.apply_gravity());
        }
    }

    #[test]
    fn seeded_rollout_respects_invariants(
        seed in any::<[u8; 16]>(),
        commands in prop::collection::vec(0u8..6, 1..400),
        compact in any::<bool>(),
    ) {
        let config = if compact { EngineConfig::compact() } else { EngineConfig::default() };
        let locks_per_level = config.locks_per_level;
        let mut session = GameSession::with_seed(config, SessionSeed::from_bytes(seed)).unwrap();

        for command in commands {
            let before = session.stats().clone();
            let was_over = session.is_game_over();
            let board = session.board().clone();

            let outcome = match command {
                0 => { session.move_left(); None }
                1 => { session.move_right(); None }
                2 => { session.rotate_cw(); None }
                3 => { session.rotate_ccw(); None }
                4 => Some(session.soft_drop()),
                _ => Some(session.tick(200)),
            };

            let stats = session.stats();
            prop_assert!(stats.locks() >= before.locks());
            prop_assert!(stats.locks() <= before.locks() + 1);
            prop_assert!(stats.regions_cleared() >= before.regions_cleared());
            prop_assert!(stats.level() >= before.level());
            prop_assert_eq!(stats.level(), 1 + stats.locks() / locks_per_level);
            prop_assert!(stats.fall_interval_ms() >= session.config().min_fall_ms);

            if was_over {
                prop_assert!(session.is_game_over());
                prop_assert_eq!(session.board(), &board);
                prop_assert_eq!(stats, &before);
                if let Some(outcome) = outcome {
                    prop_assert_eq!(outcome, DropOutcome::Ignored);
                }
                continue;
            }

            if !session.is_game_over() {
                let piece = session.current_piece();
                prop_assert!(!session.board().is_colliding(&piece));
                let ghost = session.ghost_piece();
                prop_assert!(ghost.row() >= piece.row());
                prop_assert!(ghost.down(session.board()).is_none());
            }
        }
    }
}

#[test]
fn restart_after_rollout_resets_everything() {
    let seed = SessionSeed::from_bytes([0x5a; 16]);
    let mut session = GameSession::with_seed(EngineConfig::default(), seed).unwrap();
    for i in 0..3000 {
        if session.is_game_over() {
            break;
        }
        if i % 7 == 0 {
            session.move_left();
        }
        session.soft_drop();
    }
    assert_fresh_after_restart(&mut session);
}

fn assert_fresh_after_restart(session: &mut GameSession) {
    session.restart();
    assert!(session.session_state().is_playing());
    assert_eq!(session.board().occupied_count(), 0);
    assert_eq!(session.stats().score(), 0);
    assert_eq!(session.stats().level(), 1);
    assert_eq!(session.stats().locks(), 0);
    assert_eq!(session.stats().regions_cleared(), 0);
    assert!(session.drain_events().is_empty());
}
