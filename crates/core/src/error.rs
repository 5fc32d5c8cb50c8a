/// Reasons a [`GameConfig`](crate::GameConfig) cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BoardTooNarrow { width: u8, min: u8 },
    BoardTooShort { height: u8, min: u8 },
    EmptyPalette,
    ZeroFallFloor,
    PlayerCount { players: usize, max: usize },
    /// The TOML source could not be parsed.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BoardTooNarrow { width, min } => {
                write!(f, "board_width {width} is narrower than a piece template ({min})")
            }
            Self::BoardTooShort { height, min } => {
                write!(f, "board_height {height} is shorter than a piece template ({min})")
            }
            Self::EmptyPalette => write!(f, "palette_size must be at least 1"),
            Self::ZeroFallFloor => write!(f, "min_fall_ms must be greater than 0"),
            Self::PlayerCount { players, max } => {
                write!(f, "players must be between 1 and {max}, got {players}")
            }
            Self::Parse(msg) => write!(f, "invalid config file: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
