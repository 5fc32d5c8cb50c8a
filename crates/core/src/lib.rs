//! Core game logic - pure, deterministic, and testable
//!
//! Everything needed to run a battle round lives here, with no dependency on
//! a terminal or any other I/O. Time is passed in by the caller as a
//! [`Duration`](std::time::Duration) since a fixed origin, so a round can be
//! driven from a real clock or stepped by hand in tests.
//!
//! # Module Structure
//!
//! - [`shapes`]: the seven 5x5 templates and their rotation states
//! - [`piece`]: positioned pieces and the seeded [`PieceFactory`]
//! - [`board`]: the cell grid, placement and line clearing
//! - [`collision`]: placement validity checks
//! - [`scoring`]: level and fall-interval formulas
//! - [`session`]: one player's state and per-tick behaviour
//! - [`round`]: the sessions sharing one piece sequence
//! - [`config`]: round configuration loaded from TOML
//! - [`snapshot`]: read-only views for renderers
//!
//! # Rules
//!
//! - A completed row earns 1 point; a completed row whose cells all share
//!   one color earns 5. Rows are re-examined after every removal.
//! - `level = score / 10 + 1`; pieces fall every `270 - 20 * level` ms,
//!   never faster than the configured floor.
//! - Every player receives the same piece on the same turn, regardless of
//!   who reaches that turn first.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use battle_tetro_core::{GameConfig, GameRound, RoundStatus};
//!
//! let mut round = GameRound::new(GameConfig::for_players(2).with_seed(7), Duration::ZERO).unwrap();
//! assert_eq!(round.step(Duration::from_millis(40), &[]), RoundStatus::Running);
//! assert_eq!(round.sessions().len(), 2);
//! ```

pub mod board;
pub mod collision;
pub mod config;
pub mod error;
pub mod piece;
pub mod round;
pub mod scoring;
pub mod session;
pub mod shapes;
pub mod snapshot;

pub use battle_tetro_types as types;

pub use board::{Board, RowState};
pub use collision::{drop_distance, is_valid};
pub use config::GameConfig;
pub use error::ConfigError;
pub use piece::{Piece, PieceFactory};
pub use round::{GameRound, RoundStatus, RoutedEvent};
pub use scoring::{fall_interval, level_for_score};
pub use session::{Landing, PlayerSession};
pub use snapshot::{RoundSnapshot, SessionSnapshot};
