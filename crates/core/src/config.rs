//! Round configuration.
//!
//! All values have classic defaults; a config file only needs the keys it
//! wants to change.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{
    BOARD_HEIGHT, BOARD_WIDTH, DOWN_REPEAT_MS, MAX_PLAYERS, MIN_FALL_MS, PALETTE_SIZE,
    SIDEWAYS_REPEAT_MS, SPAWN_Y, TEMPLATE_SIZE,
};

/// Construction-time constants for a round.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: u8,
    pub board_height: u8,
    /// Held left/right repeat threshold in milliseconds.
    pub sideways_repeat_ms: u32,
    /// Held soft-drop repeat threshold in milliseconds.
    pub down_repeat_ms: u32,
    pub palette_size: u8,
    /// Origin row of freshly spawned pieces.
    pub spawn_y: i32,
    /// Lower bound on the fall interval in milliseconds.
    pub min_fall_ms: u32,
    pub players: usize,
    /// Fixed piece seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            sideways_repeat_ms: SIDEWAYS_REPEAT_MS,
            down_repeat_ms: DOWN_REPEAT_MS,
            palette_size: PALETTE_SIZE,
            spawn_y: SPAWN_Y,
            min_fall_ms: MIN_FALL_MS,
            players: 2,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default configuration for `players` players.
    pub fn for_players(players: usize) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sideways_repeat(&self) -> Duration {
        Duration::from_millis(self.sideways_repeat_ms as u64)
    }

    pub fn down_repeat(&self) -> Duration {
        Duration::from_millis(self.down_repeat_ms as u64)
    }

    pub fn min_fall_interval(&self) -> Duration {
        Duration::from_millis(self.min_fall_ms as u64)
    }

    /// Parse a TOML document and validate it. Missing keys keep their defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values a round cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (self.board_width as usize) < TEMPLATE_SIZE {
            return Err(ConfigError::BoardTooNarrow {
                width: self.board_width,
                min: TEMPLATE_SIZE as u8,
            });
        }
        if (self.board_height as usize) < TEMPLATE_SIZE {
            return Err(ConfigError::BoardTooShort {
                height: self.board_height,
                min: TEMPLATE_SIZE as u8,
            });
        }
        if self.palette_size == 0 {
            return Err(ConfigError::EmptyPalette);
        }
        if self.min_fall_ms == 0 {
            return Err(ConfigError::ZeroFallFloor);
        }
        if self.players == 0 || self.players > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount {
                players: self.players,
                max: MAX_PLAYERS,
            });
        }
        if self.spawn_y > 0 {
            tracing::warn!(spawn_y = self.spawn_y, "pieces will spawn inside the visible board");
        }
        Ok(())
    }
}
