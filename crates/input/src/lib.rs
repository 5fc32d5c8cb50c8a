//! Terminal input module.
//!
//! Maps `crossterm` key events onto per-player [`InputEvent`](crate::types::InputEvent)s
//! according to each session's [`ControlScheme`](crate::types::ControlScheme),
//! and synthesizes key releases for terminals that never report them.

pub mod map;
pub mod release;

pub use battle_tetro_types as types;

pub use map::{bindings, map_key, route_key, should_quit, Routed};
pub use release::ReleaseTracker;
