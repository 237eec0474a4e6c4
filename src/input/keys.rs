//! Mapping raw key identifiers to navigation intents.

use crate::movement::Direction;

/// Per-key movement intent. Arrow keys and WASD map to the cardinal axes;
/// the diagonal hotkeys contribute both axes at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl NavKey {
    /// Maps a raw key identifier (DOM-style `key` values) to its intent.
    /// Non-navigation keys map to `None`.
    pub fn from_key_id(key: &str) -> Option<NavKey> {
        match key {
            "ArrowUp" => Some(NavKey::Up),
            "ArrowDown" => Some(NavKey::Down),
            "ArrowLeft" => Some(NavKey::Left),
            "ArrowRight" => Some(NavKey::Right),
            _ => match key.to_ascii_lowercase().as_str() {
                "w" => Some(NavKey::Up),
                "s" => Some(NavKey::Down),
                "a" => Some(NavKey::Left),
                "d" => Some(NavKey::Right),
                "q" => Some(NavKey::UpLeft),
                "e" => Some(NavKey::UpRight),
                "z" => Some(NavKey::DownLeft),
                "c" => Some(NavKey::DownRight),
                _ => None,
            },
        }
    }

    /// Contribution to the (vertical, horizontal) movement axes.
    fn axes(self) -> (i8, i8) {
        match self {
            NavKey::Up => (1, 0),
            NavKey::Down => (-1, 0),
            NavKey::Left => (0, -1),
            NavKey::Right => (0, 1),
            NavKey::UpLeft => (1, -1),
            NavKey::UpRight => (1, 1),
            NavKey::DownLeft => (-1, -1),
            NavKey::DownRight => (-1, 1),
        }
    }
}

/// Combines the currently held keys into one heading. Opposite keys cancel
/// each other out; a fully canceled set yields no heading.
pub(crate) fn combine(keys: impl Iterator<Item = NavKey>) -> Option<Direction> {
    let (mut vertical, mut horizontal) = (0i32, 0i32);
    for key in keys {
        let (dv, dh) = key.axes();
        vertical += i32::from(dv);
        horizontal += i32::from(dh);
    }
    Direction::from_axes(vertical.clamp(-1, 1) as i8, horizontal.clamp(-1, 1) as i8)
}
