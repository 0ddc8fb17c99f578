//! Paints the shared effect layer on top of a game scene

use glam::Vec2;

use super::color::{Rgba, palette};
use super::draw::{DrawList, Paint, Shape};
use crate::consts::ENGINE_TIME_STEP;
use crate::sim::GameEngine;

impl GameEngine {
    /// Advance the effect clock and particles by one frame, then paint the
    /// backdrop gradient, pending lights (consumed) and live particles.
    pub fn render(&mut self, list: &mut DrawList) {
        self.time += ENGINE_TIME_STEP;
        self.step_particles();

        let size = list.size();
        list.push_background(
            Shape::Rect {
                min: Vec2::ZERO,
                size,
            },
            Paint::Linear {
                from: Vec2::ZERO,
                to: size,
                start: palette::ENGINE_GRADIENT_START,
                end: palette::ENGINE_GRADIENT_END,
            },
        );

        for light in self.take_lights() {
            list.fill_circle(
                light.pos,
                light.radius,
                Paint::Radial {
                    center: light.pos,
                    radius: light.radius,
                    inner: light.color.with_alpha(light.intensity),
                    outer: Rgba::TRANSPARENT,
                },
            );
        }

        for p in self.particles() {
            list.fill_circle(p.pos, p.size, p.color.fade(p.alpha()));
        }
    }
}
