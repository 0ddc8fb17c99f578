//! Input commands delivered to a game

use glam::Vec2;

/// Logical keys the games react to (WASD folds into the arrows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
}

/// One input event in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMove(Vec2),
    Click(Vec2),
}

impl InputEvent {
    /// Click, Space or Enter: the "start/restart" gesture shared by every game
    pub fn is_start(&self) -> bool {
        matches!(
            self,
            InputEvent::Click(_) | InputEvent::KeyDown(Key::Space) | InputEvent::KeyDown(Key::Enter)
        )
    }
}

/// Currently held keys (for games that poll per tick)
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Track key down/up; returns true if the event was a tracked key
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        let (key, pressed) = match *event {
            InputEvent::KeyDown(k) => (k, true),
            InputEvent::KeyUp(k) => (k, false),
            _ => return false,
        };
        match key {
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            _ => return false,
        }
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state_tracks_press_and_release() {
        let mut keys = KeyState::default();
        assert!(keys.apply(&InputEvent::KeyDown(Key::Left)));
        assert!(keys.left);
        assert!(keys.apply(&InputEvent::KeyUp(Key::Left)));
        assert!(!keys.left);
        assert!(!keys.apply(&InputEvent::KeyDown(Key::Space)));
    }
}
