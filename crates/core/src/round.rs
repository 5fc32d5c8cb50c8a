//! Game round - the set of player sessions sharing one piece sequence
//!
//! The round owns the [`PieceFactory`], so the per-turn piece cache lives
//! exactly as long as the round. A round is over once every session is over;
//! until then sessions that have topped out simply stop moving while the
//! others keep playing.

use std::time::Duration;

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::piece::PieceFactory;
use crate::session::PlayerSession;
use crate::snapshot::RoundSnapshot;
use crate::types::{ControlScheme, InputEvent, PlayerKey};

/// Where a round stands after a [`GameRound::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Running,
    Paused,
    Over,
}

/// A key transition addressed to one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedEvent {
    pub player: usize,
    pub event: InputEvent,
}

impl RoutedEvent {
    pub fn new(player: usize, event: InputEvent) -> Self {
        Self { player, event }
    }
}

#[derive(Debug, Clone)]
pub struct GameRound {
    config: GameConfig,
    factory: PieceFactory,
    sessions: Vec<PlayerSession>,
    paused: bool,
    over: bool,
    /// Increments on every restart.
    round_id: u32,
}

impl GameRound {
    /// Start a round with `config.players` sessions.
    pub fn new(config: GameConfig, now: Duration) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let factory = PieceFactory::new(
            seed,
            config.board_width,
            config.palette_size,
            config.spawn_y,
        );
        let mut round = Self {
            config,
            factory,
            sessions: Vec::new(),
            paused: false,
            over: false,
            round_id: 0,
        };
        round.deal(now);
        Ok(round)
    }

    /// Create the sessions, all starting from the same two pieces.
    fn deal(&mut self, now: Duration) {
        let falling = self.factory.spawn(None);
        let next = self.factory.spawn(None);
        let players = self.config.players;
        self.sessions = (0..players)
            .map(|i| {
                PlayerSession::new(
                    i,
                    ControlScheme::for_player(i, players),
                    &self.config,
                    falling,
                    next,
                    now,
                )
            })
            .collect();
        tracing::info!(
            round = self.round_id,
            players,
            seed = self.factory.seed(),
            "round started"
        );
    }

    /// Begin a fresh round with the same configuration and a new piece cache.
    ///
    /// A fixed seed in the configuration replays the same sequence.
    pub fn restart(&mut self, now: Duration) {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.factory = PieceFactory::new(
            seed,
            self.config.board_width,
            self.config.palette_size,
            self.config.spawn_y,
        );
        self.paused = false;
        self.over = false;
        self.round_id = self.round_id.wrapping_add(1);
        self.deal(now);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn factory(&self) -> &PieceFactory {
        &self.factory
    }

    pub fn sessions(&self) -> &[PlayerSession] {
        &self.sessions
    }

    pub fn session(&self, player: usize) -> Option<&PlayerSession> {
        self.sessions.get(player)
    }

    pub fn session_mut(&mut self, player: usize) -> Option<&mut PlayerSession> {
        self.sessions.get_mut(player)
    }

    pub fn round_id(&self) -> u32 {
        self.round_id
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_single_player(&self) -> bool {
        self.sessions.len() == 1
    }

    /// Spawn pieces where needed and re-evaluate game over.
    ///
    /// Returns true once every session is over.
    pub fn begin_tick(&mut self, now: Duration) -> bool {
        if self.over {
            return true;
        }
        let mut all_over = true;
        for session in &mut self.sessions {
            session.spawn_if_needed(&mut self.factory, now);
            all_over &= session.check_game_over();
        }
        if all_over {
            self.over = true;
            tracing::info!(
                round = self.round_id,
                scores = ?self.sessions.iter().map(|s| s.score()).collect::<Vec<_>>(),
                "round over"
            );
        }
        self.over
    }

    /// Deliver a key transition to one player.
    ///
    /// `Pause` key-downs pause the round instead of reaching the session.
    pub fn apply_input(&mut self, player: usize, event: InputEvent, now: Duration) -> bool {
        if self.over || self.paused {
            return false;
        }
        if event == InputEvent::KeyDown(PlayerKey::Pause) {
            return self.pause();
        }
        match self.sessions.get_mut(player) {
            Some(session) => session.handle_event(event, now),
            None => {
                tracing::warn!(
                    player,
                    key = event.key().as_str(),
                    "input for unknown player dropped"
                );
                false
            }
        }
    }

    /// Run held-key repeats and gravity for every session; returns the
    /// number of pieces that landed.
    pub fn calculate_moves(&mut self, now: Duration) -> usize {
        if self.over || self.paused {
            return 0;
        }
        self.sessions
            .iter_mut()
            .filter_map(|s| s.calculate_moves(now))
            .count()
    }

    /// One full simulation tick: spawn, game over, input, then movement.
    pub fn step(&mut self, now: Duration, events: &[RoutedEvent]) -> RoundStatus {
        if self.paused {
            return RoundStatus::Paused;
        }
        if self.begin_tick(now) {
            return RoundStatus::Over;
        }
        for routed in events {
            self.apply_input(routed.player, routed.event, now);
            if self.paused {
                return RoundStatus::Paused;
            }
        }
        self.calculate_moves(now);
        RoundStatus::Running
    }

    /// Pause the round. Only single-player rounds can pause.
    pub fn pause(&mut self) -> bool {
        if !self.is_single_player() || self.over {
            return false;
        }
        self.paused = true;
        tracing::debug!(round = self.round_id, "paused");
        true
    }

    /// Leave the pause; every session's timers restart at `now`.
    pub fn resume(&mut self, now: Duration) {
        if !self.paused {
            return;
        }
        self.paused = false;
        for session in &mut self.sessions {
            session.reset_timers(now);
        }
        tracing::debug!(round = self.round_id, "resumed");
    }

    pub fn snapshot_into(&self, out: &mut RoundSnapshot) {
        out.sessions.resize_with(self.sessions.len(), Default::default);
        for (session, snap) in self.sessions.iter().zip(out.sessions.iter_mut()) {
            session.snapshot_into(snap);
        }
        out.paused = self.paused;
        out.over = self.over;
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let mut snap = RoundSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}
