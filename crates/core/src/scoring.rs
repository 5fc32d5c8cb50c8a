//! Scoring module - level and fall speed as functions of score
//!
//! Every completed row is worth one point (five when it is a single color),
//! every ten points is a level, and each level shortens the fall interval by
//! 20ms down to a configurable floor.

use std::time::Duration;

use crate::types::{BASE_FALL_MS, FALL_STEP_MS, MIN_FALL_MS, POINTS_PER_LEVEL};

/// Level for a score: `score / 10 + 1`.
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + 1
}

/// Time between automatic falls at `level`, never below `floor`.
pub fn fall_interval(level: u32, floor: Duration) -> Duration {
    let ms = BASE_FALL_MS.saturating_sub(level.saturating_mul(FALL_STEP_MS));
    Duration::from_millis(ms as u64).max(floor)
}

/// [`fall_interval`] with the default floor.
pub fn default_fall_interval(level: u32) -> Duration {
    fall_interval(level, Duration::from_millis(MIN_FALL_MS as u64))
}
