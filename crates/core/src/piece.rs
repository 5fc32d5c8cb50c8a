//! Falling pieces and the per-round piece factory
//!
//! The factory draws uniformly random pieces and remembers every piece it
//! hands out for a given turn, so sessions that reach the same turn receive
//! the same piece regardless of the order they ask in.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shapes;
use crate::types::{Cell, ShapeId, TEMPLATE_SIZE};

/// A piece on (or above) a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub shape: ShapeId,
    /// Index into `shapes::rotations(shape)`.
    pub rotation: u8,
    /// Board column of the template's left edge.
    pub x: i32,
    /// Board row of the template's top edge; negative while spawning.
    pub y: i32,
    /// Palette index.
    pub color: u8,
}

impl Piece {
    pub fn new(shape: ShapeId, rotation: u8, x: i32, y: i32, color: u8) -> Self {
        Self {
            shape,
            rotation: rotation % shapes::rotation_count(shape),
            x,
            y,
            color,
        }
    }

    /// Template marker at local `(lx, ly)` for the current rotation.
    pub fn cell(&self, lx: usize, ly: usize) -> Cell {
        shapes::cell(self.shape, self.rotation, lx, ly)
    }

    /// Absolute board coordinates of every filled cell, offset by `(dx, dy)`.
    pub fn cells_at(&self, dx: i32, dy: i32) -> impl Iterator<Item = (i32, i32)> {
        let (x, y) = (self.x + dx, self.y + dy);
        shapes::filled_cells(self.shape, self.rotation)
            .map(move |(lx, ly)| (x + lx as i32, y + ly as i32))
    }

    /// Lowest template row holding a filled cell.
    pub fn bottom_row(&self) -> usize {
        shapes::filled_cells(self.shape, self.rotation)
            .map(|(_, ly)| ly)
            .max()
            .unwrap_or(TEMPLATE_SIZE - 1)
    }

    pub fn rotated_cw(&self) -> Self {
        Self {
            rotation: shapes::next_rotation(self.shape, self.rotation),
            ..*self
        }
    }

    pub fn rotated_ccw(&self) -> Self {
        Self {
            rotation: shapes::prev_rotation(self.shape, self.rotation),
            ..*self
        }
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Random piece source with a per-turn replay cache.
///
/// One factory is owned by each round; its cache lives and dies with it.
#[derive(Debug, Clone)]
pub struct PieceFactory {
    rng: StdRng,
    seed: u64,
    by_turn: HashMap<u32, Piece>,
    board_width: u8,
    palette_size: u8,
    spawn_y: i32,
}

impl PieceFactory {
    /// Create a factory for boards `board_width` columns wide.
    pub fn new(seed: u64, board_width: u8, palette_size: u8, spawn_y: i32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            by_turn: HashMap::new(),
            board_width,
            palette_size: palette_size.max(1),
            spawn_y,
        }
    }

    /// Seed the factory was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of turns with a recorded piece.
    pub fn recorded_turns(&self) -> usize {
        self.by_turn.len()
    }

    /// Produce a piece for `turn`, or a fresh unrecorded piece for `None`.
    ///
    /// Asking twice for the same turn returns the same piece.
    pub fn spawn(&mut self, turn: Option<u32>) -> Piece {
        if let Some(turn) = turn {
            if let Some(piece) = self.by_turn.get(&turn) {
                return *piece;
            }
        }

        let piece = self.random_piece();
        if let Some(turn) = turn {
            self.by_turn.insert(turn, piece);
            tracing::trace!(
                turn,
                shape = piece.shape.as_str(),
                x = piece.x,
                "recorded piece for turn"
            );
        }
        piece
    }

    fn random_piece(&mut self) -> Piece {
        let shape = ShapeId::ALL[self.rng.random_range(0..ShapeId::ALL.len())];
        let rotation = self.rng.random_range(0..shapes::rotation_count(shape));
        let max_x = (self.board_width as i32 - TEMPLATE_SIZE as i32).max(0);
        let x = self.rng.random_range(0..=max_x);
        let color = self.rng.random_range(0..self.palette_size);
        Piece::new(shape, rotation, x, self.spawn_y, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_is_within_board_and_palette() {
        let mut factory = PieceFactory::new(7, 10, 4, -2);
        for _ in 0..500 {
            let p = factory.spawn(None);
            assert!((0..=5).contains(&p.x));
            assert_eq!(p.y, -2);
            assert!(p.color < 4);
            assert!(p.rotation < shapes::rotation_count(p.shape));
        }
    }

    #[test]
    fn unkeyed_spawns_are_not_recorded() {
        let mut factory = PieceFactory::new(7, 10, 4, -2);
        factory.spawn(None);
        factory.spawn(None);
        assert_eq!(factory.recorded_turns(), 0);
    }

    #[test]
    fn same_turn_replays_recorded_piece() {
        let mut factory = PieceFactory::new(99, 10, 4, -2);
        let first = factory.spawn(Some(3));
        // Draw a few unrelated pieces in between.
        factory.spawn(Some(4));
        factory.spawn(None);
        assert_eq!(factory.spawn(Some(3)), first);
        assert_eq!(factory.recorded_turns(), 2);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PieceFactory::new(12345, 10, 4, -2);
        let mut b = PieceFactory::new(12345, 10, 4, -2);
        for turn in 0..50 {
            assert_eq!(a.spawn(Some(turn)), b.spawn(Some(turn)));
        }
    }

    #[test]
    fn every_shape_eventually_appears() {
        let mut factory = PieceFactory::new(1, 10, 4, -2);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(factory.spawn(None).shape);
        }
        assert_eq!(seen.len(), ShapeId::ALL.len());
    }

    #[test]
    fn rotation_is_normalised_on_construction() {
        let p = Piece::new(ShapeId::S, 5, 0, 0, 0);
        assert_eq!(p.rotation, 1);
    }

    #[test]
    fn bottom_row_of_vertical_i() {
        let p = Piece::new(ShapeId::I, 0, 4, -2, 0);
        assert_eq!(p.bottom_row(), 3);
    }
}
