use glam::Vec2;

use super::{hud_panel, phase_banner};
use crate::renderer::color::Rgba;
use crate::renderer::draw::DrawList;
use crate::sim::whack::Whack;

const GRASS: Rgba = Rgba::hex(0x2e7d32);
const HOLE: Rgba = Rgba::hex(0x3e2723);
const MOLE: Rgba = Rgba::hex(0x8d6e63);

pub fn paint(game: &Whack, list: &mut DrawList) {
    let (w, h) = (list.width(), list.height());
    list.fill_rect(0.0, 0.0, w, h, GRASS);

    for i in 0..game.holes() {
        let rect = game.hole_rect(i);
        let c = rect.center();
        let r = rect.size.x.min(rect.size.y) * 0.35;
        list.fill_circle(c + Vec2::new(0.0, r * 0.3), r, HOLE);
        if game.active == Some(i) {
            list.fill_circle(c - Vec2::new(0.0, r * 0.2), r * 0.8, MOLE);
            // Eyes and nose
            list.fill_circle(c + Vec2::new(-r * 0.3, -r * 0.4), r * 0.1, Rgba::BLACK);
            list.fill_circle(c + Vec2::new(r * 0.3, -r * 0.4), r * 0.1, Rgba::BLACK);
            list.fill_circle(c - Vec2::new(0.0, r * 0.1), r * 0.15, Rgba::hex(0xf48fb1));
        }
    }

    hud_panel(list, 4.0, 4.0, 200.0, 18.0);
    list.text(
        10.0,
        18.0,
        format!("Score: {}  Time: {}s", game.score, game.seconds_left),
        14.0,
        Rgba::WHITE,
    );

    phase_banner(list, game.phase, "Whack-a-Mole", "Click the moles before time runs out", game.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::whack::consts::*;

    #[test]
    fn test_active_mole_is_drawn() {
        let mut game = Whack::new(8, Difficulty::Easy, 0);
        let mut list = DrawList::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        paint(&game, &mut list);
        let circles = |list: &DrawList| {
            list.foreground()
                .iter()
                .filter(|c| matches!(c.shape, crate::renderer::draw::Shape::Circle { .. }))
                .count()
        };
        assert_eq!(circles(&list), game.holes());

        game.start();
        assert!(game.active.is_some());
        list.reset(CANVAS_WIDTH, CANVAS_HEIGHT);
        paint(&game, &mut list);
        assert_eq!(circles(&list), game.holes() + 4);
        assert!(list.texts().iter().any(|t| t.text.contains("Time: 30s")));
    }
}
