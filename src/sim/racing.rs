//! Pseudo-3D racing
//!
//! The road is a looped strip of segments projected with a pinhole camera;
//! traffic moves relative to the player's speed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{lateral_overlap, within_depth};
use super::effects::{GameEngine, ParticleOptions};
use super::input::{InputEvent, KeyState};
use super::{GameEvent, GamePhase};
use crate::platform::LoopSlot;
use crate::renderer::color::Rgba;

pub mod consts {
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    pub const SEGMENT_COUNT: usize = 200;
    pub const SEGMENT_LENGTH: f32 = 200.0;
    pub const TRACK_LENGTH: f32 = SEGMENT_COUNT as f32 * SEGMENT_LENGTH;
    pub const ROAD_WIDTH: f32 = 8.0;
    /// Player may not get closer than this to the road edge
    pub const EDGE_MARGIN: f32 = 0.2;

    pub const CAMERA_HEIGHT: f32 = 1.0;
    pub const CAMERA_DEPTH: f32 = 0.8;
    /// Screen row of the horizon base (fraction of canvas height)
    pub const BASE_Y: f32 = 0.8;

    pub const MAX_SPEED: f32 = 12.0;
    pub const ACCELERATION: f32 = 0.2;
    /// Braking is twice the acceleration, reverse is capped at half speed
    pub const BRAKE: f32 = ACCELERATION * 2.0;
    pub const MAX_REVERSE: f32 = -MAX_SPEED * 0.5;
    pub const COAST_FACTOR: f32 = 0.9;
    pub const STEER: f32 = 0.15;
    /// Camera / traffic advance per unit of speed per tick
    pub const Z_PER_SPEED: f32 = 10.0;

    pub const PLAYER_WIDTH: f32 = 0.3;
    pub const CAR_WIDTH: f32 = 0.25;
    pub const CAR_HEIGHT: f32 = 0.15;
    pub const TRAFFIC_COUNT: usize = 5;
    pub const TRAFFIC_COLORS: [u32; 4] = [0x4444ff, 0x44ff44, 0xffff44, 0xff44ff];
    /// Cars further behind than this wrap forward by one lap
    pub const RECYCLE_BEHIND: f32 = 500.0;
    pub const COLLISION_DEPTH: f32 = 200.0;
    /// Fresh traffic never spawns closer than this ahead of the camera
    pub const SPAWN_CLEARANCE: f32 = 1000.0;

    pub const EXHAUST_SPEED: f32 = 5.0;
    pub const EXHAUST_CHANCE: f64 = 0.3;
}

use consts::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadSegment {
    pub index: usize,
    pub z: f32,
    pub curve: f32,
    pub elevation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficCar {
    /// Lateral offset from the road centre
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub color: Rgba,
}

/// Screen placement of a point on the road
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub center_x: f32,
    pub y: f32,
    pub half_width: f32,
    pub scale: f32,
}

/// Project a road point at depth `z` ahead of the camera; `None` when behind
pub fn project(curve: f32, elevation: f32, z: f32, canvas: Vec2) -> Option<Projection> {
    if z <= 0.0 {
        return None;
    }
    let scale = CAMERA_DEPTH / z;
    Some(Projection {
        center_x: canvas.x / 2.0 + curve * scale * 100.0,
        y: canvas.y * BASE_Y + (elevation - CAMERA_HEIGHT) * scale * 100.0,
        half_width: ROAD_WIDTH * scale * 50.0,
        scale,
    })
}

pub fn build_road() -> Vec<RoadSegment> {
    (0..SEGMENT_COUNT)
        .map(|i| RoadSegment {
            index: i,
            z: i as f32 * SEGMENT_LENGTH,
            curve: (i as f32 * 0.02).sin() * 2.0,
            elevation: (i as f32 * 0.01).sin() * 50.0,
        })
        .collect()
}

#[derive(Debug)]
pub struct Racing {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub speed: f32,
    /// Player lateral offset
    pub player_x: f32,
    pub camera_z: f32,
    pub road: Vec<RoadSegment>,
    pub traffic: Vec<TrafficCar>,
    pub keys: KeyState,
    pub engine: GameEngine,
    pub loop_slot: LoopSlot,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Racing {
    pub fn new(seed: u64, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = GameEngine::new(rng.random());
        let mut game = Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            speed: 0.0,
            player_x: 0.0,
            camera_z: 0.0,
            road: build_road(),
            traffic: Vec::with_capacity(TRAFFIC_COUNT),
            keys: KeyState::default(),
            engine,
            loop_slot: LoopSlot::default(),
            rng,
            events: Vec::new(),
        };
        game.spawn_traffic();
        game
    }

    fn spawn_traffic(&mut self) {
        self.traffic.clear();
        for _ in 0..TRAFFIC_COUNT {
            let car = TrafficCar {
                x: self.random_lane(),
                z: self.camera_z
                    + self
                        .rng
                        .random_range(SPAWN_CLEARANCE..TRACK_LENGTH * 0.8),
                width: CAR_WIDTH,
                height: CAR_HEIGHT,
                speed: self.rng.random_range(2.0..5.0),
                color: Rgba::hex(TRAFFIC_COLORS[self.rng.random_range(0..TRAFFIC_COLORS.len())]),
            };
            self.traffic.push(car);
        }
    }

    fn random_lane(&mut self) -> f32 {
        let half = (ROAD_WIDTH - 1.0) / 2.0;
        self.rng.random_range(-half..half)
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.speed = 0.0;
        self.camera_z = 0.0;
        self.player_x = 0.0;
        self.spawn_traffic();
        log::info!("Racing started");
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        self.keys.apply(event);
        if self.phase.accepts_start() && event.is_start() {
            self.start();
        }
    }

    pub fn update(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }

        if self.keys.up {
            self.speed = (self.speed + ACCELERATION).min(MAX_SPEED);
        } else if self.keys.down {
            self.speed = (self.speed - BRAKE).max(MAX_REVERSE);
        } else {
            self.speed *= COAST_FACTOR;
        }

        if self.keys.left {
            self.player_x -= STEER;
        }
        if self.keys.right {
            self.player_x += STEER;
        }
        let limit = ROAD_WIDTH / 2.0 - EDGE_MARGIN;
        self.player_x = self.player_x.clamp(-limit, limit);

        self.camera_z += self.speed * Z_PER_SPEED;

        for i in 0..self.traffic.len() {
            let car = &mut self.traffic[i];
            car.z += (self.speed - car.speed) * Z_PER_SPEED;
            if car.z < self.camera_z - RECYCLE_BEHIND {
                car.z += TRACK_LENGTH;
                let lane = self.random_lane();
                self.traffic[i].x = lane;
            }
        }

        if self.check_collisions() {
            return;
        }

        if self.speed > 0.0 {
            self.score += self.speed.floor() as u64;
        }

        if self.speed > EXHAUST_SPEED && self.rng.random_bool(EXHAUST_CHANCE) {
            let x = CANVAS_WIDTH / 2.0 + self.player_x * 50.0 + self.rng.random_range(-10.0..10.0);
            let y = CANVAS_HEIGHT * BASE_Y + self.rng.random_range(0.0..10.0);
            let vel = Vec2::new(self.rng.random_range(-1.0..1.0), self.rng.random_range(1.0..3.0));
            let size = self.rng.random_range(1.0..4.0);
            self.engine.create_particle(
                x,
                y,
                ParticleOptions::default()
                    .vel(vel)
                    .life(0.5)
                    .color(Rgba::hex(0xff8800))
                    .size(size),
            );
        }
    }

    /// Returns true if the run ended this tick
    fn check_collisions(&mut self) -> bool {
        let crashed = self.traffic.iter().any(|car| {
            within_depth(car.z, self.camera_z, COLLISION_DEPTH)
                && lateral_overlap(car.x, car.width, self.player_x, PLAYER_WIDTH)
        });
        if !crashed {
            return false;
        }
        self.engine.explosion(
            CANVAS_WIDTH / 2.0 + self.player_x * 50.0,
            CANVAS_HEIGHT * 0.7,
            30,
            None,
        );
        self.phase = GamePhase::GameOver;
        super::finish_run(self.score, &mut self.high_score, &mut self.events);
        log::info!("Racing over: score {}", self.score);
        true
    }

    /// Depth of a road segment ahead of the camera on the looped track
    pub fn segment_depth(&self, segment: &RoadSegment) -> f32 {
        (segment.z - self.camera_z).rem_euclid(TRACK_LENGTH)
    }

    /// Speed as shown on the HUD
    pub fn speed_kmh(&self) -> i32 {
        (self.speed * 20.0).floor() as i32
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
