//! Scene painters
//!
//! One function per game that turns its state into draw commands. Painters
//! only read game state; the effect overlay is painted afterwards by the
//! caller.

pub mod breakout;
pub mod game2048;
pub mod maze;
pub mod memory;
pub mod racing;
pub mod snake;
pub mod whack;

use super::color::Rgba;
use super::draw::DrawList;
use crate::sim::GamePhase;

/// Translucent HUD panel behind score text
pub(crate) fn hud_panel(list: &mut DrawList, x: f32, y: f32, w: f32, h: f32) {
    list.fill_rect(x, y, w, h, Rgba::rgba8(0, 0, 0, 0.3));
}

/// Full-canvas dim with a centred title and hint lines
pub(crate) fn banner(list: &mut DrawList, dim: f32, title: &str, hints: &[&str]) {
    let (w, h) = (list.width(), list.height());
    list.fill_rect(0.0, 0.0, w, h, Rgba::rgba8(0, 0, 0, dim));
    list.text_centered(w / 2.0, h / 2.0 - 50.0, title, 44.0, Rgba::WHITE);
    for (i, hint) in hints.iter().enumerate() {
        list.text_centered(w / 2.0, h / 2.0 + 20.0 + i as f32 * 36.0, *hint, 22.0, Rgba::WHITE);
    }
}

/// Standard menu / paused / game-over banners
pub(crate) fn phase_banner(list: &mut DrawList, phase: GamePhase, title: &str, controls: &str, score: u64) {
    match phase {
        GamePhase::Menu => banner(list, 0.4, title, &[controls, "Click to start"]),
        GamePhase::Paused => banner(list, 0.3, "Paused", &["Press Space to resume"]),
        GamePhase::GameOver => {
            let line = format!("Final score: {score}");
            banner(list, 0.6, "Game Over", &[&line, "Click to play again"]);
        }
        GamePhase::Playing => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playing_has_no_banner() {
        let mut list = DrawList::new(100.0, 100.0);
        phase_banner(&mut list, GamePhase::Playing, "T", "c", 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_game_over_banner_reports_score() {
        let mut list = DrawList::new(100.0, 100.0);
        phase_banner(&mut list, GamePhase::GameOver, "T", "c", 42);
        assert!(list.texts().iter().any(|t| t.text == "Final score: 42"));
    }
}
