//! Game engine logic and state management.
//!
//! This module orchestrates the core data structures into the falling-herd
//! game:
//!
//! - [`GameSession`] - The command surface: moves, rotations, drops, the fall
//!   timer, pause and restart
//! - [`GameField`] - Board, overlay, current and next piece, and the lock paths
//! - [`GameStats`] - Score, level, locks and cleared regions
//! - [`PieceGenerator`] - Weighted random piece selection
//! - [`ClearResolver`] - Flood fill and cascade clearing
//! - [`GameEvent`] - Facts emitted for renderers, particles and audio
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] from an [`EngineConfig`](crate::EngineConfig)
//! 2. Move and rotate the current piece; feed elapsed time with
//!    [`GameSession::tick`]
//! 3. When the piece can no longer fall it locks: normal pieces are written,
//!    wolves blast their surroundings, black sheep convert
//! 4. Qualifying regions clear and the board settles, possibly cascading
//! 5. The next piece spawns; the game ends when it cannot
//!
//! # Example
//!
//! ```
//! use herdfall_engine::{EngineConfig, GameEvent, GameSession};
//!
//! let mut session = GameSession::new(EngineConfig::default()).unwrap();
//!
//! for _ in 0..1000 {
//!     if session.is_game_over() {
//!         break;
//!     }
//!     session.tick(16);
//!     for event in session.drain_events() {
//!         if let GameEvent::RegionCleared(region) = event {
//!             println!("{}", region.banner());
//!         }
//!     }
//! }
//! ```

pub use self::{
    clear_resolver::{ClearResolver, Region, best_group, find_regions, flood_region},
    config::*,
    effects::PoppedCell,
    events::*,
    game_field::*,
    game_session::*,
    game_stats::*,
    level::*,
    piece_generator::*,
};

pub mod clear_resolver;
mod config;
pub mod effects;
mod events;
mod game_field;
mod game_session;
mod game_stats;
mod level;
mod piece_generator;
pub mod scoring;
