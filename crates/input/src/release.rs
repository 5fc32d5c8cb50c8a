//! Synthetic key releases for terminals without key-release events.
//!
//! Most terminals only report presses, repeating them while a key is held.
//! [`ReleaseTracker`] turns that stream into held/released transitions: the
//! first press of a held key passes through, repeats refresh it, and a key
//! not seen for the timeout is released.

use std::time::Duration;

use arrayvec::ArrayVec;

use crate::types::{InputEvent, PlayerKey, MAX_PLAYERS};

pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

const HOLDABLE: usize = 3;

/// Synthetic releases produced by one [`ReleaseTracker::expire`] call.
pub type Released = ArrayVec<(usize, InputEvent), { MAX_PLAYERS * HOLDABLE }>;

#[derive(Debug, Clone, Copy)]
struct Held {
    player: usize,
    key: PlayerKey,
    last_seen: Duration,
}

#[derive(Debug, Clone)]
pub struct ReleaseTracker {
    held: ArrayVec<Held, { MAX_PLAYERS * HOLDABLE }>,
    timeout: Duration,
}

fn is_holdable(key: PlayerKey) -> bool {
    matches!(key, PlayerKey::Left | PlayerKey::Right | PlayerKey::SoftDrop)
}

impl ReleaseTracker {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            held: ArrayVec::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_held(&self, player: usize, key: PlayerKey) -> bool {
        self.position(player, key).is_some()
    }

    fn position(&self, player: usize, key: PlayerKey) -> Option<usize> {
        self.held
            .iter()
            .position(|h| h.player == player && h.key == key)
    }

    /// Filter one routed event; returns the event to forward, if any.
    pub fn observe(&mut self, player: usize, event: InputEvent, now: Duration) -> Option<InputEvent> {
        match event {
            InputEvent::KeyDown(key) if is_holdable(key) => {
                if let Some(i) = self.position(player, key) {
                    self.held[i].last_seen = now;
                    return None;
                }
                // Full only with an out-of-range player; forward without tracking.
                let _ = self.held.try_push(Held {
                    player,
                    key,
                    last_seen: now,
                });
                Some(event)
            }
            InputEvent::KeyUp(key) => {
                if let Some(i) = self.position(player, key) {
                    self.held.swap_remove(i);
                }
                Some(event)
            }
            InputEvent::KeyDown(_) => Some(event),
        }
    }

    /// Release every key not seen for longer than the timeout.
    pub fn expire(&mut self, now: Duration) -> Released {
        let mut out = Released::new();
        let timeout = self.timeout;
        self.held.retain(|h| {
            let stale = now.saturating_sub(h.last_seen) > timeout;
            if stale {
                out.push((h.player, InputEvent::KeyUp(h.key)));
            }
            !stale
        });
        out
    }

    /// Forget every held key without producing releases.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

impl Default for ReleaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_press_passes_and_repeats_refresh() {
        let mut t = ReleaseTracker::with_timeout(ms(50));
        let down = InputEvent::KeyDown(PlayerKey::Left);

        assert_eq!(t.observe(0, down, ms(0)), Some(down));
        assert_eq!(t.observe(0, down, ms(40)), None);
        assert!(t.expire(ms(80)).is_empty());
        assert!(t.is_held(0, PlayerKey::Left));
    }

    #[test]
    fn stale_key_is_released() {
        let mut t = ReleaseTracker::with_timeout(ms(50));
        t.observe(1, InputEvent::KeyDown(PlayerKey::SoftDrop), ms(0));

        assert!(t.expire(ms(50)).is_empty());
        let released = t.expire(ms(51));
        assert_eq!(
            released.as_slice(),
            &[(1, InputEvent::KeyUp(PlayerKey::SoftDrop))]
        );
        assert!(!t.is_held(1, PlayerKey::SoftDrop));
    }

    #[test]
    fn other_keys_do_not_extend_held_keys() {
        let mut t = ReleaseTracker::with_timeout(ms(50));
        t.observe(0, InputEvent::KeyDown(PlayerKey::Left), ms(0));

        let rotate = InputEvent::KeyDown(PlayerKey::RotateCw);
        assert_eq!(t.observe(0, rotate, ms(45)), Some(rotate));
        assert_eq!(t.observe(0, rotate, ms(46)), Some(rotate));

        assert_eq!(t.expire(ms(60)).len(), 1);
    }

    #[test]
    fn explicit_release_stops_tracking() {
        let mut t = ReleaseTracker::new();
        t.observe(0, InputEvent::KeyDown(PlayerKey::Right), ms(0));
        let up = InputEvent::KeyUp(PlayerKey::Right);
        assert_eq!(t.observe(0, up, ms(10)), Some(up));
        assert!(t.expire(ms(10_000)).is_empty());
    }

    #[test]
    fn players_are_tracked_separately() {
        let mut t = ReleaseTracker::with_timeout(ms(50));
        let down = InputEvent::KeyDown(PlayerKey::Left);
        assert!(t.observe(0, down, ms(0)).is_some());
        assert!(t.observe(1, down, ms(0)).is_some());

        t.reset();
        assert!(!t.is_held(0, PlayerKey::Left));
        assert!(t.expire(ms(1_000)).is_empty());
    }
}
