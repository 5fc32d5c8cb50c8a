//! Key mapping from terminal events to per-player input events.

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::{ControlScheme, InputEvent, PlayerKey, MAX_PLAYERS};

/// Upper bound on bindings in one scheme's table.
pub const MAX_BINDINGS: usize = 12;

pub type Bindings = ArrayVec<(KeyCode, PlayerKey), MAX_BINDINGS>;

/// Events decoded from one terminal key event, addressed by player index.
pub type Routed = ArrayVec<(usize, InputEvent), MAX_PLAYERS>;

const LEFT_HAND: [(KeyCode, PlayerKey); 6] = [
    (KeyCode::Char('q'), PlayerKey::RotateCcw),
    (KeyCode::Char('w'), PlayerKey::RotateCw),
    (KeyCode::Char('a'), PlayerKey::Left),
    (KeyCode::Char('s'), PlayerKey::SoftDrop),
    (KeyCode::Char('d'), PlayerKey::Right),
    (KeyCode::Char(' '), PlayerKey::HardDrop),
];

const RIGHT_HAND: [(KeyCode, PlayerKey); 6] = [
    (KeyCode::Up, PlayerKey::RotateCw),
    (KeyCode::Down, PlayerKey::SoftDrop),
    (KeyCode::Left, PlayerKey::Left),
    (KeyCode::Right, PlayerKey::Right),
    (KeyCode::Insert, PlayerKey::RotateCcw),
    (KeyCode::Home, PlayerKey::HardDrop),
];

/// The key table for `scheme`.
pub fn bindings(scheme: ControlScheme) -> Bindings {
    let mut table = Bindings::new();
    if matches!(scheme, ControlScheme::LeftHand | ControlScheme::Both) {
        table.extend(LEFT_HAND);
    }
    if matches!(scheme, ControlScheme::RightHand | ControlScheme::Both) {
        table.extend(RIGHT_HAND);
    }
    table
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Look up `code` in `scheme`'s table. Letters match either case.
pub fn map_key(scheme: ControlScheme, code: KeyCode) -> Option<PlayerKey> {
    let code = normalize(code);
    let table = match scheme {
        ControlScheme::LeftHand => &LEFT_HAND[..],
        ControlScheme::RightHand => &RIGHT_HAND[..],
        ControlScheme::Both => {
            return map_key(ControlScheme::LeftHand, code)
                .or_else(|| map_key(ControlScheme::RightHand, code))
        }
    };
    table.iter().find(|(k, _)| *k == code).map(|&(_, key)| key)
}

fn is_pause(code: KeyCode) -> bool {
    normalize(code) == KeyCode::Char('p')
}

/// Decode a terminal key event for every session whose scheme binds it.
///
/// `schemes[i]` is the scheme of player `i`. Auto-repeat events are dropped;
/// the core does its own repeat timing. `P` is delivered to player 0 only.
pub fn route_key(key: KeyEvent, schemes: &[ControlScheme]) -> Routed {
    let mut out = Routed::new();
    let down = match key.kind {
        KeyEventKind::Press => true,
        KeyEventKind::Release => false,
        KeyEventKind::Repeat => return out,
    };

    if is_pause(key.code) {
        if down && !schemes.is_empty() {
            out.push((0, InputEvent::KeyDown(PlayerKey::Pause)));
        }
        return out;
    }

    for (player, &scheme) in schemes.iter().enumerate().take(MAX_PLAYERS) {
        if let Some(k) = map_key(scheme, key.code) {
            let event = if down {
                InputEvent::KeyDown(k)
            } else {
                InputEvent::KeyUp(k)
            };
            out.push((player, event));
        }
    }
    out
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && (key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}
