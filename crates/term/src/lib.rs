//! Terminal front end for battle rounds.
//!
//! A small game-oriented rendering layer: the round snapshot is drawn into a
//! plain framebuffer by [`BattleView`], and [`Terminal`] flushes the
//! framebuffer to the real terminal. Board cells are two columns wide to
//! compensate for typical glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use battle_tetro_core as core;
pub use battle_tetro_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{BattleView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, Terminal};
