use glam::Vec2;

use super::{hud_panel, phase_banner};
use crate::renderer::color::{Rgba, palette};
use crate::renderer::draw::{DrawList, Paint};
use crate::sim::snake::consts::*;
use crate::sim::snake::{Snake, cell_center};

const HEAD: Rgba = Rgba::hex(0x88ff88);
const BODY: Rgba = Rgba::hex(0x44cc44);
const TRAIL: Rgba = Rgba::hex(0x44ff44);
const FOOD: Rgba = Rgba::hex(0xffaa00);
const FOOD_CORE: Rgba = Rgba::hex(0xffff88);
const OBSTACLE: Rgba = Rgba::hex(0xcc4444);

pub fn paint(game: &Snake, list: &mut DrawList) {
    let (w, h) = (list.width(), list.height());
    let time = game.engine.time;
    list.shake(game.screen_shake / 30.0, time);

    // Slowly cycling backdrop
    let hue = (time * 20.0) % 360.0;
    list.fill_rect(
        0.0,
        0.0,
        w,
        h,
        Paint::Linear {
            from: Vec2::ZERO,
            to: Vec2::new(w, h),
            start: Rgba::hsl(hue, 0.3, 0.1),
            end: Rgba::hsl(hue + 60.0, 0.3, 0.05),
        },
    );
    let grid_line = Rgba::WHITE.with_alpha(0.1);
    for col in 0..GRID.cols {
        let x = col as f32 * CELL_SIZE;
        list.line(Vec2::new(x, 0.0), Vec2::new(x, h), 1.0, grid_line);
    }
    for row in 0..GRID.rows {
        let y = row as f32 * CELL_SIZE;
        list.line(Vec2::new(0.0, y), Vec2::new(w, y), 1.0, grid_line);
    }
    list.stroke_rect(0.0, 0.0, w, h, 2.0, Rgba::WHITE);

    for &cell in &game.obstacles {
        let c = cell_center(cell);
        list.fill_circle(
            c,
            CELL_SIZE * 0.8,
            Paint::Radial {
                center: c,
                radius: CELL_SIZE * 0.8,
                inner: palette::DANGER_RED.with_alpha(0.35),
                outer: Rgba::TRANSPARENT,
            },
        );
        list.fill_rect(
            c.x - CELL_SIZE / 2.0 + 2.0,
            c.y - CELL_SIZE / 2.0 + 2.0,
            CELL_SIZE - 4.0,
            CELL_SIZE - 4.0,
            OBSTACLE,
        );
        list.text_centered(c.x, c.y + 5.0, "!", 16.0, Rgba::WHITE);
    }

    let trail_len = game.trail.len() as f32;
    for (i, &cell) in game.trail.iter().enumerate() {
        let alpha = (trail_len - i as f32) / trail_len * 0.3;
        let size = CELL_SIZE * alpha * 0.8;
        let c = cell_center(cell);
        list.fill_rect(c.x - size / 2.0, c.y - size / 2.0, size, size, TRAIL.with_alpha(alpha));
    }

    let body_len = game.body.len() as f32;
    for (i, &cell) in game.body.iter().enumerate() {
        let c = cell_center(cell);
        let (x, y) = (c.x - CELL_SIZE / 2.0, c.y - CELL_SIZE / 2.0);
        if i == 0 {
            list.fill_circle(
                c,
                CELL_SIZE,
                Paint::Radial {
                    center: c,
                    radius: CELL_SIZE,
                    inner: HEAD.with_alpha(0.4),
                    outer: Rgba::TRANSPARENT,
                },
            );
            list.fill_rect(x + 1.0, y + 1.0, CELL_SIZE - 2.0, CELL_SIZE - 2.0, HEAD);
            // Eyes
            list.fill_rect(x + 6.0, y + 6.0, 3.0, 3.0, Rgba::WHITE);
            list.fill_rect(x + 11.0, y + 6.0, 3.0, 3.0, Rgba::WHITE);
            list.fill_rect(x + 7.0, y + 7.0, 1.0, 1.0, Rgba::BLACK);
            list.fill_rect(x + 12.0, y + 7.0, 1.0, 1.0, Rgba::BLACK);
        } else {
            let brightness = 1.0 - (i as f32 / body_len) * 0.3;
            list.fill_rect(
                x + 1.0,
                y + 1.0,
                CELL_SIZE - 2.0,
                CELL_SIZE - 2.0,
                BODY.with_alpha(brightness),
            );
        }
    }

    // Pulsing food with a glow that flares after each bite
    let pulse = (time * 5.0).sin() * 0.5 + 0.5;
    let food = cell_center(game.food);
    let glow_radius = CELL_SIZE * (1.0 + game.food_glow * 0.5);
    list.fill_circle(
        food,
        glow_radius,
        Paint::Radial {
            center: food,
            radius: glow_radius,
            inner: FOOD_CORE.with_alpha(0.5),
            outer: Rgba::TRANSPARENT,
        },
    );
    let size = CELL_SIZE * (0.8 + pulse * 0.2);
    list.fill_rect(food.x - size / 2.0, food.y - size / 2.0, size, size, FOOD);
    list.fill_rect(food.x - size / 2.0 + 2.0, food.y - size / 2.0 + 2.0, 4.0, 4.0, Rgba::WHITE);

    list.set_offset(Vec2::ZERO);
    hud_panel(list, 10.0, 10.0, 250.0, 120.0);
    list.text(20.0, 35.0, format!("Score: {}", game.score), 20.0, Rgba::WHITE);
    list.text(20.0, 60.0, format!("Best: {}", game.high_score), 20.0, Rgba::WHITE);
    list.text(20.0, 85.0, format!("Length: {}", game.body.len()), 20.0, Rgba::WHITE);
    let speed = (START_STEP_MS - game.step_ms) / (START_STEP_MS - MIN_STEP_MS);
    list.fill_rect(20.0, 100.0, speed.clamp(0.0, 1.0) * 100.0 + 1.0, 10.0, TRAIL);
    list.text(w - 200.0, 30.0, "WASD / arrows: move", 14.0, Rgba::WHITE);
    list.text(w - 200.0, 50.0, "Space: pause", 14.0, Rgba::WHITE);

    phase_banner(list, game.phase, "Snake", "Use WASD or the arrow keys", game.score);
}
