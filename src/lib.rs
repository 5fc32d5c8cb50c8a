//! Battle Tetro (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `battle_tetro::{core,input,term,types}`.

pub use battle_tetro_core as core;
pub use battle_tetro_input as input;
pub use battle_tetro_term as term;
pub use battle_tetro_types as types;
