//! Read-only views of round state for renderers.

use crate::board::Board;
use crate::piece::Piece;
use crate::types::ShapeId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub index: usize,
    pub board: Board,
    pub falling: Option<Piece>,
    pub next: Piece,
    pub score: u32,
    pub level: u32,
    pub turn: u32,
    pub game_over: bool,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            index: 0,
            board: Board::default(),
            falling: None,
            next: Piece::new(ShapeId::O, 0, 0, 0, 0),
            score: 0,
            level: 1,
            turn: 0,
            game_over: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RoundSnapshot {
    pub sessions: Vec<SessionSnapshot>,
    pub paused: bool,
    pub over: bool,
}

impl RoundSnapshot {
    pub fn playable(&self) -> bool {
        !self.over && !self.paused
    }
}
