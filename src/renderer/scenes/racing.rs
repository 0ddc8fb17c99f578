use glam::Vec2;

use super::{hud_panel, phase_banner};
use crate::renderer::color::Rgba;
use crate::renderer::draw::DrawList;
use crate::sim::GamePhase;
use crate::sim::racing::consts::*;
use crate::sim::racing::{Racing, project};

const SKY: Rgba = Rgba::hex(0x102235);
const ROAD_DARK: Rgba = Rgba::hex(0x333333);
const ROAD_LIGHT: Rgba = Rgba::hex(0x444444);
const EDGE: Rgba = Rgba::hex(0xffff00);
const PLAYER: Rgba = Rgba::hex(0xff4444);
/// Player car sprite size in pixels
const PLAYER_SPRITE: Vec2 = Vec2::new(60.0, 40.0);

pub fn paint(game: &Racing, list: &mut DrawList) {
    let (w, h) = (list.width(), list.height());
    list.fill_rect(0.0, 0.0, w, h, SKY);

    if game.phase == GamePhase::Playing {
        paint_road(game, list);
        paint_traffic(game, list);
        paint_player(game, list);
    }

    hud_panel(list, 10.0, 10.0, 200.0, 70.0);
    list.text(20.0, 35.0, format!("Score: {}", game.score), 20.0, Rgba::WHITE);
    list.text(20.0, 60.0, format!("Speed: {} km/h", game.speed_kmh()), 20.0, Rgba::WHITE);

    phase_banner(list, game.phase, "Racing", "Use WASD or the arrow keys", game.score);
}

fn paint_road(game: &Racing, list: &mut DrawList) {
    let canvas = list.size();
    let count = game.road.len();

    // Far to near so nearer strips cover farther ones
    let mut order: Vec<(usize, f32)> = game
        .road
        .iter()
        .enumerate()
        .map(|(i, s)| (i, game.segment_depth(s)))
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (i, near_depth) in order {
        let near = &game.road[i];
        let far = &game.road[(i + 1) % count];
        let far_depth = near_depth + SEGMENT_LENGTH;
        let (Some(p1), Some(p2)) = (
            project(near.curve, near.elevation, near_depth, canvas),
            project(far.curve, far.elevation, far_depth, canvas),
        ) else {
            continue;
        };
        if p1.y < 0.0 && p2.y < 0.0 {
            continue;
        }

        let a = Vec2::new(p1.center_x - p1.half_width, p1.y);
        let b = Vec2::new(p1.center_x + p1.half_width, p1.y);
        let c = Vec2::new(p2.center_x + p2.half_width, p2.y);
        let d = Vec2::new(p2.center_x - p2.half_width, p2.y);
        let fill = if near.index % 2 == 0 { ROAD_DARK } else { ROAD_LIGHT };
        list.fill_polygon(vec![a, b, c, d], fill);
        list.line(a, d, 3.0, EDGE);
        list.line(b, c, 3.0, EDGE);
        if near.index % 4 == 0 {
            list.dashed_line(
                Vec2::new(p1.center_x, p1.y),
                Vec2::new(p2.center_x, p2.y),
                2.0,
                10.0,
                Rgba::WHITE,
            );
        }
    }
}

fn paint_traffic(game: &Racing, list: &mut DrawList) {
    let canvas = list.size();
    let mut cars: Vec<_> = game
        .traffic
        .iter()
        .map(|car| (car, car.z - game.camera_z))
        .filter(|(_, depth)| *depth > 0.0)
        .collect();
    cars.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (car, depth) in cars {
        let Some(p) = project(0.0, 0.0, depth, canvas) else {
            continue;
        };
        if p.y < 0.0 || p.y > canvas.y {
            continue;
        }
        let x = canvas.x / 2.0 + car.x * p.scale * 50.0;
        let width = car.width * p.scale * 50.0;
        let height = car.height * p.scale * 100.0;
        let (left, top) = (x - width / 2.0, p.y - height / 2.0);

        list.fill_rect(left + 2.0, top + 2.0, width, height, Rgba::BLACK.with_alpha(0.3));
        list.fill_rect(left, top, width, height, car.color);
        list.fill_rect(x - width / 4.0, p.y - height / 3.0, width / 2.0, height / 3.0, Rgba::hex(0x222222));
        let lamp = Rgba::hex(0xffff88);
        list.fill_rect(left - 2.0, p.y - height / 4.0, 4.0, height / 8.0, lamp);
        list.fill_rect(left - 2.0, p.y + height / 8.0, 4.0, height / 8.0, lamp);
    }
}

fn paint_player(game: &Racing, list: &mut DrawList) {
    let (cw, ch) = (PLAYER_SPRITE.x, PLAYER_SPRITE.y);
    let x = list.width() / 2.0 + game.player_x * 50.0;
    let y = list.height() * BASE_Y;
    let (left, top) = (x - cw / 2.0, y - ch / 2.0);

    list.fill_rect(left + 3.0, top + 3.0, cw, ch, Rgba::BLACK.with_alpha(0.3));
    list.fill_rect(left, top, cw, ch, PLAYER);
    list.fill_rect(x - cw / 3.0, top + 5.0, cw * 2.0 / 3.0, ch / 3.0, Rgba::hex(0x333333));
    // Headlights, then tail lights
    let head = Rgba::hex(0x88ff88);
    list.fill_rect(left + cw - 2.0, y - ch / 3.0, 4.0, ch / 6.0, head);
    list.fill_rect(left + cw - 2.0, y + ch / 6.0, 4.0, ch / 6.0, head);
    list.fill_rect(left - 1.0, y - ch / 4.0, 2.0, ch / 8.0, PLAYER);
    list.fill_rect(left - 1.0, y + ch / 8.0, 2.0, ch / 8.0, PLAYER);
}
