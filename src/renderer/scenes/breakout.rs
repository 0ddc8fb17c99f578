use std::f32::consts::FRAC_PI_4;

use glam::Vec2;

use super::{hud_panel, phase_banner};
use crate::renderer::color::{Rgba, palette};
use crate::renderer::draw::{DrawList, Paint};
use crate::sim::breakout::Breakout;
use crate::sim::breakout::consts::*;

const STAR_COUNT: u32 = 60;

pub fn paint(game: &Breakout, list: &mut DrawList) {
    let (w, h) = (list.width(), list.height());
    let time = game.engine.time;
    list.shake(game.screen_shake / 20.0, time);

    list.fill_rect(
        0.0,
        0.0,
        w,
        h,
        Paint::Linear {
            from: Vec2::ZERO,
            to: Vec2::new(0.0, h),
            start: Rgba::hex(0x0b0b2a),
            end: Rgba::hex(0x000008),
        },
    );
    // Twinkling starfield on fixed pseudo-random positions
    for i in 0..STAR_COUNT {
        let x = (i.wrapping_mul(7919) % 800) as f32 / 800.0 * w;
        let y = (i.wrapping_mul(104_729) % 600) as f32 / 600.0 * h;
        let twinkle = ((time * 2.0 + i as f32).sin() * 0.5 + 0.5) * 0.8;
        list.fill_rect(x, y, 1.5, 1.5, Rgba::WHITE.with_alpha(twinkle));
    }

    for brick in game.bricks.iter().filter(|b| b.visible) {
        let damage = 1.0 - brick.hits as f32 / brick.max_hits.max(1) as f32;
        let color = brick.color.darken(damage * 0.5);
        if brick.glow > 0.0 {
            let c = brick.center();
            list.fill_circle(
                c,
                brick.size.x,
                Paint::Radial {
                    center: c,
                    radius: brick.size.x,
                    inner: brick.color.with_alpha(brick.glow * 0.6),
                    outer: Rgba::TRANSPARENT,
                },
            );
        }
        list.fill_rect(
            brick.pos.x,
            brick.pos.y,
            brick.size.x,
            brick.size.y,
            Paint::Linear {
                from: brick.pos,
                to: brick.pos + Vec2::new(0.0, brick.size.y),
                start: color,
                end: color.darken(0.3),
            },
        );
        list.stroke_rect(brick.pos.x, brick.pos.y, brick.size.x, brick.size.y, 1.0, Rgba::WHITE.with_alpha(0.3));
        if brick.max_hits > 1 {
            let c = brick.center();
            list.text_centered(c.x, c.y + 5.0, brick.hits.to_string(), 14.0, Rgba::WHITE);
        }
    }

    let trail_len = game.ball.trail.len() as f32;
    for (i, &p) in game.ball.trail.iter().enumerate() {
        let t = (i + 1) as f32 / trail_len;
        list.fill_circle(p, game.ball.radius * t, Rgba::hex(0x88ccff).with_alpha(t * 0.4));
    }
    let ball = game.ball.pos;
    list.fill_circle(
        ball,
        game.ball.radius,
        Paint::Radial {
            center: ball - Vec2::splat(game.ball.radius / 3.0),
            radius: game.ball.radius * 1.3,
            inner: Rgba::WHITE,
            outer: Rgba::hex(0x4488ff),
        },
    );

    let paddle = game.paddle.bounds();
    let paddle_color = if game.paddle.width > PADDLE_WIDTH {
        palette::ARCADE_GREEN
    } else {
        Rgba::hex(0x4ecdc4)
    };
    list.fill_rect(
        paddle.min.x,
        paddle.min.y,
        paddle.size.x,
        paddle.size.y,
        Paint::Linear {
            from: paddle.min,
            to: paddle.min + Vec2::new(0.0, paddle.size.y),
            start: paddle_color,
            end: paddle_color.darken(0.4),
        },
    );

    for power_up in &game.power_ups {
        let c = power_up.pos;
        let r = power_up.size;
        let diamond: Vec<Vec2> = (0..4)
            .map(|k| c + Vec2::from_angle(power_up.rotation + FRAC_PI_4 * 2.0 * k as f32) * r)
            .collect();
        list.fill_polygon(diamond, power_up.kind.color());
        list.text_centered(c.x, c.y + 4.0, &power_up.kind.label()[..1], 12.0, Rgba::BLACK);
    }

    list.set_offset(Vec2::ZERO);
    if game.flash > 0.0 {
        list.fill_rect(0.0, 0.0, w, h, Rgba::WHITE.with_alpha(game.flash / 5.0 * 0.3));
    }

    hud_panel(list, 10.0, 10.0, 200.0, 90.0);
    list.text(20.0, 35.0, format!("Score: {}", game.score), 20.0, Rgba::WHITE);
    list.text(20.0, 60.0, format!("Lives: {}", game.lives), 20.0, Rgba::WHITE);
    list.text(20.0, 85.0, format!("Level: {}", game.level), 20.0, Rgba::WHITE);
    for (i, (kind, ticks)) in game.active.iter().enumerate() {
        let secs = ticks.div_ceil(60);
        list.text(
            w - 200.0,
            35.0 + i as f32 * 25.0,
            format!("{}: {secs}s", kind.label()),
            16.0,
            kind.color(),
        );
    }
    if game.ball.is_resting() && game.phase == crate::sim::GamePhase::Playing {
        list.text_centered(w / 2.0, h / 2.0 + 100.0, "Click or press Space to launch", 20.0, Rgba::WHITE);
    }

    phase_banner(list, game.phase, "Breakout", "Move the mouse to steer the paddle", game.score);
}
