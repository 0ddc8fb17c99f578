use glam::Vec2;

use super::{hud_panel, phase_banner};
use crate::renderer::color::{Rgba, palette};
use crate::renderer::draw::{DrawList, Paint};
use crate::sim::maze::Maze;

const WALL: Rgba = Rgba::hex(0x2d3561);
const FLOOR: Rgba = Rgba::hex(0x0f0f1e);

pub fn paint(game: &Maze, list: &mut DrawList) {
    let (w, h) = (list.width(), list.height());
    list.fill_rect(0.0, 0.0, w, h, FLOOR);

    let size = game.walls.size();
    let cell = w.min(h) / size as f32;
    for (y, row) in game.walls.rows().iter().enumerate() {
        for (x, &wall) in row.iter().enumerate() {
            if wall {
                list.fill_rect(x as f32 * cell, y as f32 * cell, cell, cell, WALL);
            }
        }
    }

    let center = |c: crate::sim::Cell| Vec2::new((c.x as f32 + 0.5) * cell, (c.y as f32 + 0.5) * cell);

    let exit = center(game.exit);
    let pulse = (game.engine.time * 4.0).sin() * 0.2 + 0.8;
    list.fill_circle(
        exit,
        cell * 1.2,
        Paint::Radial {
            center: exit,
            radius: cell * 1.2,
            inner: palette::ARCADE_GREEN.with_alpha(0.5 * pulse),
            outer: Rgba::TRANSPARENT,
        },
    );
    list.fill_rect(
        exit.x - cell * 0.4,
        exit.y - cell * 0.4,
        cell * 0.8,
        cell * 0.8,
        palette::ARCADE_GREEN,
    );

    let player = center(game.player);
    list.fill_circle(player, cell * 0.35, palette::ACCENT_ORANGE);

    hud_panel(list, 4.0, 4.0, 120.0, 18.0);
    list.text(10.0, 18.0, format!("Score: {}", game.score), 14.0, Rgba::WHITE);

    phase_banner(list, game.phase, "Maze", "Reach the green exit with the arrow keys", game.score);
}
