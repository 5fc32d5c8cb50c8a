//! Player session - one player's board, pieces, score and timers
//!
//! A session is driven by its round once per tick:
//!
//! 1. [`spawn_if_needed`](PlayerSession::spawn_if_needed) promotes the next
//!    piece once the previous one has landed;
//! 2. [`check_game_over`](PlayerSession::check_game_over) latches game over
//!    when the falling piece does not fit where it stands;
//! 3. [`handle_event`](PlayerSession::handle_event) applies key transitions;
//! 4. [`calculate_moves`](PlayerSession::calculate_moves) applies held-key
//!    repeats and gravity.
//!
//! Time is a [`Duration`] measured from any fixed monotonic origin; the round
//! passes the same `now` to every session in a tick.

use std::time::Duration;

use crate::board::Board;
use crate::collision::{drop_distance, is_valid};
use crate::config::GameConfig;
use crate::piece::{Piece, PieceFactory};
use crate::scoring::{fall_interval, level_for_score};
use crate::snapshot::SessionSnapshot;
use crate::types::{ControlScheme, InputEvent, PlayerKey};

/// Result of a piece landing during [`PlayerSession::calculate_moves`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    /// Line credit earned by the landing (0 when nothing was cleared).
    pub credit: u32,
    pub level_changed: bool,
}

/// State owned by one player for the length of a round.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    index: usize,
    controls: ControlScheme,
    board: Board,
    falling: Option<Piece>,
    next: Piece,
    score: u32,
    level: u32,
    fall_interval: Duration,
    min_fall_interval: Duration,
    sideways_repeat: Duration,
    down_repeat: Duration,
    last_fall: Duration,
    last_move_down: Duration,
    last_move_sideways: Duration,
    moving_left: bool,
    moving_right: bool,
    moving_down: bool,
    turn: u32,
    game_over: bool,
}

impl PlayerSession {
    /// Start a session with a blank board, a falling piece and a next piece.
    pub fn new(
        index: usize,
        controls: ControlScheme,
        config: &GameConfig,
        falling: Piece,
        next: Piece,
        now: Duration,
    ) -> Self {
        let min_fall_interval = config.min_fall_interval();
        let level = level_for_score(0);
        Self {
            index,
            controls,
            board: Board::new(config.board_width, config.board_height),
            falling: Some(falling),
            next,
            score: 0,
            level,
            fall_interval: fall_interval(level, min_fall_interval),
            min_fall_interval,
            sideways_repeat: config.sideways_repeat(),
            down_repeat: config.down_repeat(),
            last_fall: now,
            last_move_down: now,
            last_move_sideways: now,
            moving_left: false,
            moving_right: false,
            moving_down: false,
            turn: 1,
            game_over: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn controls(&self) -> ControlScheme {
        self.controls
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for setting up scenarios.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn falling(&self) -> Option<Piece> {
        self.falling
    }

    /// Replace the falling piece (tests and scripted setups).
    pub fn set_falling(&mut self, piece: Option<Piece>) {
        self.falling = piece;
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Held-direction flags as `(left, right, down)`.
    pub fn intents(&self) -> (bool, bool, bool) {
        (self.moving_left, self.moving_right, self.moving_down)
    }

    /// Promote the next piece if nothing is falling.
    ///
    /// The new next piece is the factory's piece for the new turn, so every
    /// session sharing the factory sees the same sequence.
    pub fn spawn_if_needed(&mut self, factory: &mut PieceFactory, now: Duration) -> bool {
        if self.falling.is_some() || self.game_over {
            return false;
        }
        self.falling = Some(self.next);
        self.turn += 1;
        self.next = factory.spawn(Some(self.turn));
        self.last_fall = now;
        tracing::trace!(player = self.index, turn = self.turn, "spawned piece");
        true
    }

    /// Latch game over if the falling piece does not fit where it stands.
    pub fn check_game_over(&mut self) -> bool {
        if !self.game_over {
            if let Some(piece) = self.falling {
                if !is_valid(&self.board, &piece, 0, 0) {
                    self.mark_game_over("spawn blocked");
                }
            }
        }
        self.game_over
    }

    fn mark_game_over(&mut self, reason: &'static str) {
        self.game_over = true;
        self.moving_left = false;
        self.moving_right = false;
        self.moving_down = false;
        tracing::info!(
            player = self.index,
            score = self.score,
            level = self.level,
            turn = self.turn,
            reason,
            "player game over"
        );
    }

    /// The falling piece.
    ///
    /// # Panics
    ///
    /// Panics if nothing is falling; callers check before moving a piece.
    fn piece(&self) -> Piece {
        match self.falling {
            Some(piece) => piece,
            None => panic!("player {} has no falling piece", self.index),
        }
    }

    fn can_move(&self, dx: i32, dy: i32) -> bool {
        is_valid(&self.board, &self.piece(), dx, dy)
    }

    /// Move the falling piece by `(dx, dy)` if the target is valid.
    ///
    /// # Panics
    ///
    /// Panics if there is no falling piece.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let moved = self.piece().shifted(dx, dy);
        if !is_valid(&self.board, &moved, 0, 0) {
            return false;
        }
        self.falling = Some(moved);
        true
    }

    /// Rotate the falling piece one step; a rotation that collides is dropped.
    ///
    /// # Panics
    ///
    /// Panics if there is no falling piece.
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        let piece = self.piece();
        let rotated = if clockwise {
            piece.rotated_cw()
        } else {
            piece.rotated_ccw()
        };
        if !is_valid(&self.board, &rotated, 0, 0) {
            return false;
        }
        self.falling = Some(rotated);
        true
    }

    /// Drop the falling piece to the lowest valid row and return the rows
    /// travelled. Held directions are released.
    ///
    /// # Panics
    ///
    /// Panics if there is no falling piece.
    pub fn hard_drop(&mut self) -> u32 {
        let piece = self.piece();
        self.moving_left = false;
        self.moving_right = false;
        self.moving_down = false;

        let distance = drop_distance(&self.board, &piece).unwrap_or(0);
        if distance > 0 {
            self.falling = Some(piece.shifted(0, distance));
        }
        distance as u32
    }

    /// Apply a decoded key transition. Returns whether anything changed.
    ///
    /// Game-over sessions and sessions without a falling piece ignore input.
    /// `Pause` is handled by the round.
    pub fn handle_event(&mut self, event: InputEvent, now: Duration) -> bool {
        if self.game_over || self.falling.is_none() {
            return false;
        }

        match event {
            InputEvent::KeyUp(key) => match key {
                PlayerKey::Left => std::mem::replace(&mut self.moving_left, false),
                PlayerKey::Right => std::mem::replace(&mut self.moving_right, false),
                PlayerKey::SoftDrop => std::mem::replace(&mut self.moving_down, false),
                _ => false,
            },
            InputEvent::KeyDown(key) => match key {
                PlayerKey::Left => self.start_sideways(-1, now),
                PlayerKey::Right => self.start_sideways(1, now),
                PlayerKey::RotateCw => self.try_rotate(true),
                PlayerKey::RotateCcw => self.try_rotate(false),
                PlayerKey::SoftDrop => {
                    self.moving_down = true;
                    self.try_move(0, 1);
                    self.last_move_down = now;
                    true
                }
                PlayerKey::HardDrop => {
                    self.hard_drop();
                    true
                }
                PlayerKey::Pause => false,
            },
        }
    }

    fn start_sideways(&mut self, dx: i32, now: Duration) -> bool {
        if !self.try_move(dx, 0) {
            return false;
        }
        self.moving_left = dx < 0;
        self.moving_right = dx > 0;
        self.last_move_sideways = now;
        true
    }

    /// Apply held-key repeats and gravity for this tick.
    ///
    /// Returns the landing when the falling piece could not fall any further
    /// and was merged into the board.
    pub fn calculate_moves(&mut self, now: Duration) -> Option<Landing> {
        if self.game_over || self.falling.is_none() {
            return None;
        }

        if (self.moving_left || self.moving_right)
            && now.saturating_sub(self.last_move_sideways) > self.sideways_repeat
        {
            if self.moving_left && self.can_move(-1, 0) {
                self.try_move(-1, 0);
            } else if self.moving_right && self.can_move(1, 0) {
                self.try_move(1, 0);
            }
            self.last_move_sideways = now;
        }

        if self.moving_down
            && now.saturating_sub(self.last_move_down) > self.down_repeat
            && self.try_move(0, 1)
        {
            self.last_move_down = now;
        }

        if now.saturating_sub(self.last_fall) > self.fall_interval {
            if !self.can_move(0, 1) {
                return self.land();
            }
            self.try_move(0, 1);
            self.last_fall = now;
        }

        None
    }

    /// Merge the falling piece into the board and clear completed rows.
    fn land(&mut self) -> Option<Landing> {
        let piece = self.falling?;

        // A piece resting with cells above the top edge has nowhere to go.
        if piece.cells_at(0, 0).any(|(_, y)| y < 0) {
            self.mark_game_over("topped out");
            return None;
        }

        self.board.place(&piece);
        self.falling = None;

        let credit = self.board.scan_and_clear();
        let level_changed = self.add_score(credit);
        tracing::debug!(
            player = self.index,
            shape = piece.shape.as_str(),
            x = piece.x,
            y = piece.y,
            credit,
            score = self.score,
            "piece landed"
        );
        Some(Landing {
            credit,
            level_changed,
        })
    }

    /// Add line credit to the score; returns true when the level changed.
    fn add_score(&mut self, credit: u32) -> bool {
        if credit == 0 {
            return false;
        }
        self.score = self.score.saturating_add(credit);
        let level = level_for_score(self.score);
        if level == self.level {
            return false;
        }
        self.level = level;
        self.fall_interval = fall_interval(level, self.min_fall_interval);
        tracing::info!(
            player = self.index,
            level,
            fall_ms = self.fall_interval.as_millis() as u64,
            "level up"
        );
        true
    }

    /// Restart every timer at `now` (after a pause).
    pub fn reset_timers(&mut self, now: Duration) {
        self.last_fall = now;
        self.last_move_down = now;
        self.last_move_sideways = now;
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.index = self.index;
        out.board.clone_from(&self.board);
        out.falling = self.falling;
        out.next = self.next;
        out.score = self.score;
        out.level = self.level;
        out.turn = self.turn;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            index: self.index,
            board: self.board.clone(),
            falling: self.falling,
            next: self.next,
            score: self.score,
            level: self.level,
            turn: self.turn,
            game_over: self.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, ShapeId};

    const T0: Duration = Duration::ZERO;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn session_with(piece: Piece) -> PlayerSession {
        let config = GameConfig::for_players(1);
        let next = Piece::new(ShapeId::O, 0, 3, -2, 1);
        PlayerSession::new(0, ControlScheme::Both, &config, piece, next, T0)
    }

    fn o_piece(x: i32, y: i32) -> Piece {
        Piece::new(ShapeId::O, 0, x, y, 0)
    }

    #[test]
    #[should_panic(expected = "no falling piece")]
    fn moving_without_a_piece_panics() {
        let mut s = session_with(o_piece(3, 0));
        s.set_falling(None);
        s.try_move(1, 0);
    }

    #[test]
    #[should_panic(expected = "no falling piece")]
    fn rotating_without_a_piece_panics() {
        let mut s = session_with(o_piece(3, 0));
        s.set_falling(None);
        s.try_rotate(true);
    }

    #[test]
    #[should_panic(expected = "no falling piece")]
    fn hard_drop_without_a_piece_panics() {
        let mut s = session_with(o_piece(3, 0));
        s.set_falling(None);
        s.hard_drop();
    }

    #[test]
    fn input_without_a_piece_is_ignored() {
        let mut s = session_with(o_piece(3, 0));
        s.set_falling(None);
        assert!(!s.handle_event(InputEvent::KeyDown(PlayerKey::HardDrop), ms(10)));
        assert_eq!(s.calculate_moves(ms(1_000)), None);
    }

    #[test]
    fn new_session_state() {
        let s = session_with(o_piece(3, -2));
        assert_eq!(s.score(), 0);
        assert_eq!(s.level(), 1);
        assert_eq!(s.turn(), 1);
        assert_eq!(s.fall_interval(), ms(250));
        assert!(!s.game_over());
        assert_eq!(s.intents(), (false, false, false));
        assert!(s.board().cells().iter().all(|c| c.is_blank()));
    }

    #[test]
    fn key_down_left_moves_and_sets_intent() {
        let mut s = session_with(o_piece(3, 0));
        assert!(s.handle_event(InputEvent::KeyDown(PlayerKey::Left), ms(10)));
        assert_eq!(s.falling().unwrap().x, 2);
        assert_eq!(s.intents(), (true, false, false));

        assert!(s.handle_event(InputEvent::KeyDown(PlayerKey::Right), ms(20)));
        assert_eq!(s.falling().unwrap().x, 3);
        assert_eq!(s.intents(), (false, true, false));

        assert!(s.handle_event(InputEvent::KeyUp(PlayerKey::Right), ms(30)));
        assert_eq!(s.intents(), (false, false, false));
    }

    #[test]
    fn blocked_sideways_move_keeps_flags() {
        // O template occupies columns 1..=2, so x = -1 is flush with the wall.
        let mut s = session_with(o_piece(-1, 0));
        assert!(!s.handle_event(InputEvent::KeyDown(PlayerKey::Left), ms(10)));
        assert_eq!(s.falling().unwrap().x, -1);
        assert_eq!(s.intents(), (false, false, false));
    }

    #[test]
    fn held_left_repeats_after_threshold() {
        let mut s = session_with(o_piece(5, 0));
        s.handle_event(InputEvent::KeyDown(PlayerKey::Left), T0);
        assert_eq!(s.falling().unwrap().x, 4);

        // Exactly at the threshold nothing happens (strictly greater).
        s.calculate_moves(ms(150));
        assert_eq!(s.falling().unwrap().x, 4);

        s.calculate_moves(ms(151));
        assert_eq!(s.falling().unwrap().x, 3);
    }

    #[test]
    fn soft_drop_moves_and_repeats() {
        let mut s = session_with(o_piece(3, 0));
        s.handle_event(InputEvent::KeyDown(PlayerKey::SoftDrop), T0);
        assert_eq!(s.falling().unwrap().y, 1);
        assert!(s.intents().2);

        s.calculate_moves(ms(101));
        assert_eq!(s.falling().unwrap().y, 2);

        s.handle_event(InputEvent::KeyUp(PlayerKey::SoftDrop), ms(110));
        s.calculate_moves(ms(230));
        assert_eq!(s.falling().unwrap().y, 2);
    }

    #[test]
    fn rotation_cycles_and_rejects_collisions() {
        let mut s = session_with(Piece::new(ShapeId::T, 0, 3, 5, 0));
        for _ in 0..4 {
            assert!(s.handle_event(InputEvent::KeyDown(PlayerKey::RotateCw), T0));
        }
        assert_eq!(s.falling().unwrap().rotation, 0);

        assert!(s.handle_event(InputEvent::KeyDown(PlayerKey::RotateCcw), T0));
        assert_eq!(s.falling().unwrap().rotation, 3);

        // Rotation 3 -> 0 fills template cell (3, 2); block it.
        s.board_mut().set(3 + 3, 5 + 2, Cell::Filled(1));
        assert!(!s.handle_event(InputEvent::KeyDown(PlayerKey::RotateCw), T0));
        assert_eq!(s.falling().unwrap().rotation, 3);
    }

    #[test]
    fn hard_drop_reaches_floor_and_is_idempotent() {
        let mut s = session_with(o_piece(3, -2));
        s.handle_event(InputEvent::KeyDown(PlayerKey::Left), T0);
        assert_eq!(s.hard_drop(), 18);
        let landed = s.falling().unwrap();
        // O template bottom row is 3: 19 - 3 = 16.
        assert_eq!(landed.y, 16);
        assert_eq!(s.intents(), (false, false, false));
        assert_eq!(s.hard_drop(), 0);
        assert_eq!(s.falling().unwrap(), landed);
    }

    #[test]
    fn gravity_moves_then_lands() {
        let mut s = session_with(o_piece(3, 15));
        assert!(s.calculate_moves(ms(251)).is_none());
        assert_eq!(s.falling().unwrap().y, 16);

        // Resting on the floor: the next fall lands the piece.
        let landing = s.calculate_moves(ms(502)).expect("landed");
        assert_eq!(landing.credit, 0);
        assert!(s.falling().is_none());
        assert_eq!(s.board().cells().iter().filter(|c| c.is_filled()).count(), 4);
    }

    #[test]
    fn landing_clears_rows_and_scores() {
        let mut s = session_with(o_piece(-1, 16));
        // Fill rows 18 and 19 except the two columns the O covers.
        for y in 18..20 {
            for x in 2..10 {
                s.board_mut().set(x, y, Cell::Filled(0));
            }
        }
        let landing = s.calculate_moves(ms(300)).expect("landed");
        // Both rows are single-colored: 5 + 5.
        assert_eq!(landing.credit, 10);
        assert!(landing.level_changed);
        assert_eq!(s.score(), 10);
        assert_eq!(s.level(), 2);
        assert_eq!(s.fall_interval(), ms(230));
        assert!(s.board().cells().iter().all(|c| c.is_blank()));
    }

    #[test]
    fn spawn_promotes_next_and_advances_turn() {
        let mut factory = PieceFactory::new(5, 10, 4, -2);
        let mut s = session_with(o_piece(3, -2));
        let next = s.next();
        assert!(!s.spawn_if_needed(&mut factory, T0));

        s.set_falling(None);
        assert!(s.spawn_if_needed(&mut factory, ms(40)));
        assert_eq!(s.falling(), Some(next));
        assert_eq!(s.turn(), 2);
        assert_eq!(s.next(), factory.spawn(Some(2)));
    }

    #[test]
    fn blocked_spawn_is_game_over_and_ignores_input() {
        let mut s = session_with(o_piece(3, 0));
        s.board_mut().set(4, 2, Cell::Filled(2));
        assert!(s.check_game_over());
        assert!(!s.handle_event(InputEvent::KeyDown(PlayerKey::Left), T0));
        assert!(s.calculate_moves(ms(1000)).is_none());
        assert_eq!(s.board().get(4, 2), Some(Cell::Filled(2)));
    }

    #[test]
    fn landing_above_the_top_edge_tops_out() {
        // Vertical I at y = -2 resting on a filled row 2.
        let mut s = session_with(Piece::new(ShapeId::I, 0, 0, -2, 0));
        s.board_mut().set(2, 2, Cell::Filled(1));
        assert!(!s.check_game_over());
        assert!(s.calculate_moves(ms(300)).is_none());
        assert!(s.game_over());
        assert!(s.falling().is_some());
    }

    #[test]
    fn reset_timers_delays_gravity() {
        let mut s = session_with(o_piece(3, 0));
        s.reset_timers(ms(1000));
        s.calculate_moves(ms(1100));
        assert_eq!(s.falling().unwrap().y, 0);
        s.calculate_moves(ms(1251));
        assert_eq!(s.falling().unwrap().y, 1);
    }
}
