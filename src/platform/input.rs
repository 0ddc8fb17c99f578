//! DOM input translation
//!
//! Kept free of `web_sys` so the mapping is testable natively; the wasm host
//! passes `KeyboardEvent::key()` strings and bounding-rect numbers in.

use glam::Vec2;

use crate::sim::input::Key;

/// Map a `KeyboardEvent.key` value to a logical key (WASD aliases the arrows)
pub fn map_key(key: &str) -> Option<Key> {
    let key = match key {
        "ArrowUp" | "w" | "W" => Key::Up,
        "ArrowDown" | "s" | "S" => Key::Down,
        "ArrowLeft" | "a" | "A" => Key::Left,
        "ArrowRight" | "d" | "D" => Key::Right,
        " " | "Spacebar" => Key::Space,
        "Enter" => Key::Enter,
        "Escape" | "Esc" => Key::Escape,
        _ => return None,
    };
    Some(key)
}

/// Keys whose default browser action (scrolling) should be suppressed
pub fn should_prevent_default(key: Key) -> bool {
    !matches!(key, Key::Escape | Key::Enter)
}

/// Convert a client-space pointer position to canvas pixels, accounting for
/// CSS scaling of the canvas element
pub fn pointer_to_canvas(client: Vec2, rect_min: Vec2, rect_size: Vec2, canvas_size: Vec2) -> Vec2 {
    let local = client - rect_min;
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return local;
    }
    local * canvas_size / rect_size
}
