//! Shared types and constants for Battle Tetro.
//!
//! Everything here is plain data with no dependencies so it can be used by the
//! simulation core, the input mapping layer and the terminal renderer alike.
//!
//! # Board and template
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BOARD_WIDTH` | 10 | Default playfield columns |
//! | `BOARD_HEIGHT` | 20 | Default playfield rows |
//! | `TEMPLATE_SIZE` | 5 | Side of the square matrix every rotation is drawn in |
//! | `SPAWN_Y` | -2 | Origin row of a fresh piece (above the visible board) |
//! | `PALETTE_SIZE` | 4 | Number of piece colors |
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FPS` | 25 | Frames per second of the outer loop |
//! | `SIDEWAYS_REPEAT_MS` | 150 | Held left/right repeat threshold |
//! | `DOWN_REPEAT_MS` | 100 | Held soft-drop repeat threshold |
//! | `BASE_FALL_MS` | 270 | Fall interval before the level adjustment |
//! | `FALL_STEP_MS` | 20 | Fall interval reduction per level |
//! | `MIN_FALL_MS` | 50 | Fall interval floor |
//!
//! # Examples
//!
//! ```
//! use battle_tetro_types::{Cell, InputEvent, PlayerKey, ShapeId};
//!
//! assert_eq!(ShapeId::T.as_str(), "T");
//! assert!(Cell::Filled(2).is_filled());
//! assert!(!Cell::Poison.is_filled());
//! assert_eq!(InputEvent::KeyUp(PlayerKey::HardDrop).key().as_str(), "hardDrop");
//! ```

/// Default board width in cells.
pub const BOARD_WIDTH: u8 = 10;

/// Default board height in cells.
pub const BOARD_HEIGHT: u8 = 20;

/// Width and height of every shape's rotation matrix.
pub const TEMPLATE_SIZE: usize = 5;

/// Row a freshly spawned piece's template origin starts on.
pub const SPAWN_Y: i32 = -2;

/// Number of colors a piece can be drawn in.
pub const PALETTE_SIZE: u8 = 4;

/// Frames per second of the outer loop.
pub const FPS: u32 = 25;

/// Frame interval in milliseconds (1000 / FPS).
pub const TICK_MS: u32 = 1000 / FPS;

/// Held left/right keys repeat after this many milliseconds.
pub const SIDEWAYS_REPEAT_MS: u32 = 150;

/// Held soft drop repeats after this many milliseconds.
pub const DOWN_REPEAT_MS: u32 = 100;

/// Fall interval numerator: `BASE_FALL_MS - level * FALL_STEP_MS`.
pub const BASE_FALL_MS: u32 = 270;

/// Fall interval reduction per level.
pub const FALL_STEP_MS: u32 = 20;

/// Fall interval floor.
///
/// The level formula reaches zero at level 13; the floor keeps the
/// interval positive from level 11 on.
pub const MIN_FALL_MS: u32 = 50;

/// Score needed per level.
pub const POINTS_PER_LEVEL: u32 = 10;

/// Credit for a completed row.
pub const LINE_CREDIT: u32 = 1;

/// Extra credit for a completed row whose cells all share one color.
pub const BONUS_CREDIT: u32 = 4;

/// Upper bound on players in one round.
pub const MAX_PLAYERS: usize = 4;


/// The seven tetromino shapes, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeId {
    S,
    Z,
    I,
    O,
    J,
    L,
    T,
}

impl ShapeId {
    /// Every shape, in catalog order.
    pub const ALL: [ShapeId; 7] = [
        ShapeId::S,
        ShapeId::Z,
        ShapeId::I,
        ShapeId::O,
        ShapeId::J,
        ShapeId::L,
        ShapeId::T,
    ];

    /// Single uppercase letter, used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeId::S => "S",
            ShapeId::Z => "Z",
            ShapeId::I => "I",
            ShapeId::O => "O",
            ShapeId::J => "J",
            ShapeId::L => "L",
            ShapeId::T => "T",
        }
    }
}

/// A board or template cell.
///
/// `Poison` is a reserved marker: it never occupies space for collision
/// purposes and it never counts towards a completed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Blank,
    Poison,
    /// Filled with a palette color index.
    Filled(u8),
}

impl Cell {
    /// True for `Filled` cells only.
    #[inline]
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// True for `Blank` cells only (a `Poison` cell is not blank).
    #[inline]
    pub fn is_blank(self) -> bool {
        matches!(self, Cell::Blank)
    }

    /// Palette index of a filled cell.
    #[inline]
    pub fn color(self) -> Option<u8> {
        match self {
            Cell::Filled(c) => Some(c),
            _ => None,
        }
    }
}

/// Semantic keys a player can press, after physical key decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerKey {
    /// Move one column left; held to repeat
    Left,
    /// Move one column right; held to repeat
    Right,
    /// Rotate to the next rotation state
    RotateCw,
    /// Rotate to the previous rotation state
    RotateCcw,
    /// Move one row down; held to repeat
    SoftDrop,
    /// Drop to the lowest legal row
    HardDrop,
    /// Pause (single-player rounds only)
    Pause,
}

impl PlayerKey {
    /// camelCase name, used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerKey::Left => "left",
            PlayerKey::Right => "right",
            PlayerKey::RotateCw => "rotateCw",
            PlayerKey::RotateCcw => "rotateCcw",
            PlayerKey::SoftDrop => "softDrop",
            PlayerKey::HardDrop => "hardDrop",
            PlayerKey::Pause => "pause",
        }
    }
}

/// A decoded key transition for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown(PlayerKey),
    KeyUp(PlayerKey),
}

impl InputEvent {
    /// The key that changed state.
    pub fn key(&self) -> PlayerKey {
        match *self {
            InputEvent::KeyDown(k) | InputEvent::KeyUp(k) => k,
        }
    }
}

/// Which physical key group a player's session listens to.
///
/// The core only stores the scheme; the input crate owns the key tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlScheme {
    /// Letter keys on the left of the keyboard.
    LeftHand,
    /// Arrow keys and the navigation block.
    RightHand,
    /// Both groups (single-player rounds).
    Both,
}

impl ControlScheme {
    /// Scheme for player `index` in a round of `players` players.
    ///
    /// ```
    /// use battle_tetro_types::ControlScheme;
    ///
    /// assert_eq!(ControlScheme::for_player(0, 1), ControlScheme::Both);
    /// assert_eq!(ControlScheme::for_player(0, 2), ControlScheme::LeftHand);
    /// assert_eq!(ControlScheme::for_player(1, 2), ControlScheme::RightHand);
    /// ```
    pub fn for_player(index: usize, players: usize) -> Self {
        if players <= 1 {
            return ControlScheme::Both;
        }
        if index % 2 == 0 {
            ControlScheme::LeftHand
        } else {
            ControlScheme::RightHand
        }
    }
}
