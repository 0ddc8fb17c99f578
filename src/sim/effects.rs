//! Particle and light layer shared by every game
//!
//! Games fire effects at it and forget them; the layer advances and paints
//! itself once per rendered frame (see `renderer::overlay`).

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::color::{Rgba, palette};

/// Life lost by every particle per step
pub const LIFE_DECAY: f32 = 0.02;
pub const DEFAULT_GRAVITY: f32 = 0.1;
pub const DEFAULT_FRICTION: f32 = 0.98;
/// Default pool size when no quality preset has been applied
pub const DEFAULT_MAX_PARTICLES: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: Rgba,
    pub gravity: f32,
    pub friction: f32,
}

impl Particle {
    /// Remaining life as a fraction of the starting life
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    fn step(&mut self) {
        self.pos += self.vel;
        self.vel.y += self.gravity;
        self.vel *= self.friction;
        self.life -= LIFE_DECAY;
    }
}

/// One-shot light, consumed by the next render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgba,
    pub intensity: f32,
}

/// Optional overrides for a new particle; `None` takes the randomized default
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleOptions {
    pub vel: Option<Vec2>,
    pub life: Option<f32>,
    pub size: Option<f32>,
    pub color: Option<Rgba>,
    pub gravity: Option<f32>,
    pub friction: Option<f32>,
}

impl ParticleOptions {
    pub fn vel(mut self, vel: Vec2) -> Self {
        self.vel = Some(vel);
        self
    }

    pub fn life(mut self, life: f32) -> Self {
        self.life = Some(life);
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = Some(friction);
        self
    }
}

/// Particle pool plus pending lights for one canvas
#[derive(Debug, Clone)]
pub struct GameEngine {
    particles: VecDeque<Particle>,
    lights: Vec<Light>,
    /// Seconds of effect time (advanced per rendered frame)
    pub time: f32,
    max_particles: usize,
    rng: Pcg32,
}

impl GameEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: VecDeque::new(),
            lights: Vec::new(),
            time: 0.0,
            max_particles: DEFAULT_MAX_PARTICLES,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.set_max_particles(max);
        self
    }

    /// Cap the pool; excess oldest particles are dropped immediately
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        while self.particles.len() > max {
            self.particles.pop_front();
        }
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn particles(&self) -> impl ExactSizeIterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Hand the pending lights to the painter, leaving the list empty
    pub fn take_lights(&mut self) -> Vec<Light> {
        std::mem::take(&mut self.lights)
    }

    /// Enqueue one particle at (x, y)
    pub fn create_particle(&mut self, x: f32, y: f32, opts: ParticleOptions) {
        if self.max_particles == 0 {
            return;
        }
        let vel = opts.vel.unwrap_or_else(|| {
            Vec2::new(
                self.rng.random_range(-2.0..2.0),
                self.rng.random_range(-2.0..2.0),
            )
        });
        let life = opts.life.unwrap_or(1.0);
        let size = opts
            .size
            .unwrap_or_else(|| self.rng.random_range(1.0..4.0));
        let color = opts
            .color
            .unwrap_or_else(|| Rgba::hsl(self.rng.random_range(0.0..360.0), 0.7, 0.6));

        if self.particles.len() >= self.max_particles {
            self.particles.pop_front();
        }
        self.particles.push_back(Particle {
            pos: Vec2::new(x, y),
            vel,
            life,
            max_life: life,
            size,
            color,
            gravity: opts.gravity.unwrap_or(DEFAULT_GRAVITY),
            friction: opts.friction.unwrap_or(DEFAULT_FRICTION),
        });
    }

    /// Radial burst of `count` particles plus an orange flash
    pub fn explosion(&mut self, x: f32, y: f32, count: usize, color: Option<Rgba>) {
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let speed = self.rng.random_range(2.0..7.0);
            let life = self.rng.random_range(0.5..1.0);
            let size = self.rng.random_range(2.0..6.0);
            let color = color
                .unwrap_or_else(|| Rgba::hsl(self.rng.random_range(15.0..75.0), 1.0, 0.6));
            self.create_particle(
                x,
                y,
                ParticleOptions::default()
                    .vel(Vec2::from_angle(angle) * speed)
                    .life(life)
                    .size(size)
                    .color(color),
            );
        }
        self.add_light(x, y, 100.0, palette::ORANGE, 0.8);
    }

    pub fn add_light(&mut self, x: f32, y: f32, radius: f32, color: Rgba, intensity: f32) {
        self.lights.push(Light {
            pos: Vec2::new(x, y),
            radius,
            color,
            intensity,
        });
    }

    /// Advance every particle one step and drop the dead ones
    pub fn step_particles(&mut self) {
        for p in self.particles.iter_mut() {
            p.step();
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Drop all particles and lights (game restart)
    pub fn clear(&mut self) {
        self.particles.clear();
        self.lights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_unset_options() {
        let mut engine = GameEngine::new(1);
        engine.create_particle(10.0, 20.0, ParticleOptions::default());
        let p = engine.particles().next().unwrap();
        assert_eq!(p.pos, Vec2::new(10.0, 20.0));
        assert_eq!(p.life, 1.0);
        assert_eq!(p.max_life, 1.0);
        assert!(p.vel.x > -2.0 && p.vel.x < 2.0);
        assert!(p.size >= 1.0 && p.size < 4.0);
        assert_eq!(p.gravity, DEFAULT_GRAVITY);
        assert_eq!(p.friction, DEFAULT_FRICTION);
    }

    #[test]
    fn test_explicit_zero_gravity_is_kept() {
        let mut engine = GameEngine::new(1);
        engine.create_particle(0.0, 0.0, ParticleOptions::default().gravity(0.0).vel(Vec2::ZERO));
        engine.step_particles();
        let p = engine.particles().next().unwrap();
        assert_eq!(p.vel, Vec2::ZERO);
    }

    #[test]
    fn test_step_integrates_then_decays() {
        let mut engine = GameEngine::new(1);
        engine.create_particle(
            0.0,
            0.0,
            ParticleOptions::default().vel(Vec2::new(1.0, 0.0)).life(1.0),
        );
        engine.step_particles();
        let p = engine.particles().next().unwrap();
        assert_eq!(p.pos, Vec2::new(1.0, 0.0));
        assert!((p.vel.x - 0.98).abs() < 1e-6);
        assert!((p.vel.y - 0.1 * 0.98).abs() < 1e-6);
        assert!((p.life - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_particles_pruned_when_life_runs_out() {
        let mut engine = GameEngine::new(1);
        engine.create_particle(0.0, 0.0, ParticleOptions::default().life(0.25));
        for _ in 0..12 {
            engine.step_particles();
        }
        assert_eq!(engine.particle_count(), 1);
        engine.step_particles();
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn test_explosion_spawns_ring_and_light() {
        let mut engine = GameEngine::new(7);
        engine.explosion(100.0, 100.0, 12, None);
        assert_eq!(engine.particle_count(), 12);
        assert_eq!(engine.lights().len(), 1);
        assert_eq!(engine.lights()[0].radius, 100.0);
        assert_eq!(engine.lights()[0].intensity, 0.8);

        // First particle heads along +x
        let first = engine.particles().next().unwrap();
        assert!(first.vel.x >= 2.0 && first.vel.y.abs() < 1e-4);
        assert!(engine.particles().all(|p| p.life >= 0.5 && p.life < 1.0));
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut engine = GameEngine::new(3).with_max_particles(3);
        for i in 0..5 {
            engine.create_particle(i as f32, 0.0, ParticleOptions::default());
        }
        assert_eq!(engine.particle_count(), 3);
        let xs: Vec<f32> = engine.particles().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_cap_disables_particles() {
        let mut engine = GameEngine::new(3).with_max_particles(0);
        engine.explosion(0.0, 0.0, 10, None);
        assert_eq!(engine.particle_count(), 0);
        // Lights are unaffected
        assert_eq!(engine.lights().len(), 1);
    }

    #[test]
    fn test_take_lights_clears() {
        let mut engine = GameEngine::new(3);
        engine.add_light(1.0, 2.0, 50.0, Rgba::WHITE, 0.5);
        assert_eq!(engine.take_lights().len(), 1);
        assert!(engine.lights().is_empty());
    }
}
