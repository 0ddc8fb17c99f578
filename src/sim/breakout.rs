//! Breakout
//!
//! 8×12 brick wall, one ball, a paddle steered by the pointer (arrows nudge
//! the target), three lives and falling power-ups.

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Aabb, ball_over_paddle, circle_hits_rect, paddle_hit_offset};
use super::effects::{GameEngine, ParticleOptions};
use super::input::{InputEvent, KeyState};
use super::{GameEvent, GamePhase};
use crate::platform::LoopSlot;
use crate::renderer::color::{Rgba, palette};

pub mod consts {
    use glam::Vec2;

    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_WIDTH_BIG: f32 = 200.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_Y: f32 = 560.0;
    pub const PADDLE_SPEED: f32 = 8.0;

    pub const BALL_RADIUS: f32 = 8.0;
    /// Resting ball sits this far above the paddle
    pub const BALL_REST_GAP: f32 = 30.0;
    pub const LAUNCH_VY: f32 = -4.0;
    /// Launch vx is uniform in (-LAUNCH_VX_SPREAD, LAUNCH_VX_SPREAD)
    pub const LAUNCH_VX_SPREAD: f32 = 2.0;
    /// Paddle hits map the normalized offset onto this horizontal speed
    pub const PADDLE_DEFLECT: f32 = 5.0;
    pub const TRAIL_LEN: usize = 10;

    pub const BRICK_ROWS: usize = 8;
    pub const BRICK_COLS: usize = 12;
    pub const BRICK_SIZE: Vec2 = Vec2::new(60.0, 25.0);
    pub const BRICK_PADDING: f32 = 5.0;
    pub const BRICK_OFFSET: Vec2 = Vec2::new(35.0, 80.0);
    pub const BRICK_COLORS: [u32; 8] = [
        0xff6b6b, 0x4ecdc4, 0x45b7d1, 0x96ceb4, 0xfeca57, 0xff9ff3, 0x54a0ff, 0x5f27cd,
    ];
    pub const DESTROY_SCORE_PER_HIT: u64 = 100;
    pub const CHIP_SCORE: u64 = 50;
    pub const GLOW_DECAY: f32 = 0.05;

    pub const START_LIVES: u32 = 3;

    pub const POWER_UP_CHANCE: f64 = 0.2;
    pub const POWER_UP_SIZE: f32 = 15.0;
    pub const POWER_UP_FALL_SPEED: f32 = 2.0;
    pub const POWER_UP_TICKS: u32 = crate::ms_to_ticks(5000);
}

use consts::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    /// Centre x
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Paddle {
    fn new() -> Self {
        Self {
            x: CANVAS_WIDTH / 2.0,
            y: PADDLE_Y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x - self.width / 2.0, self.y),
            Vec2::new(self.width, self.height),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Oldest first
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    /// Resting on the paddle, waiting for launch
    pub fn is_resting(&self) -> bool {
        self.vel == Vec2::ZERO
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub pos: Vec2,
    pub size: Vec2,
    pub hits: u8,
    pub max_hits: u8,
    pub visible: bool,
    pub glow: f32,
    pub color: Rgba,
}

impl Brick {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PowerUpKind {
    BigPaddle,
    SlowBall,
    MultiBall,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [Self::BigPaddle, Self::SlowBall, Self::MultiBall];

    pub fn color(&self) -> Rgba {
        match self {
            PowerUpKind::BigPaddle => palette::ARCADE_GREEN,
            PowerUpKind::SlowBall => Rgba::hex(0xffaa00),
            PowerUpKind::MultiBall => Rgba::hex(0xff44ff),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::BigPaddle => "Big Paddle",
            PowerUpKind::SlowBall => "Slow Ball",
            PowerUpKind::MultiBall => "Multi Ball",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub size: f32,
    pub rotation: f32,
}

#[derive(Debug)]
pub struct Breakout {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub level: u32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    /// Ticks left per active power-up; a key exists only while active
    pub active: BTreeMap<PowerUpKind, u32>,
    /// Pointer target for the paddle centre
    pub target_x: f32,
    pub keys: KeyState,
    pub screen_shake: f32,
    pub flash: f32,
    pub engine: GameEngine,
    pub loop_slot: LoopSlot,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Breakout {
    pub fn new(seed: u64, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = GameEngine::new(rng.random());
        let paddle = Paddle::new();
        let mut game = Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            lives: START_LIVES,
            level: 1,
            paddle,
            ball: Ball {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                radius: BALL_RADIUS,
                trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            },
            bricks: build_wall(),
            power_ups: Vec::new(),
            active: BTreeMap::new(),
            target_x: paddle.x,
            keys: KeyState::default(),
            screen_shake: 0.0,
            flash: 0.0,
            engine,
            loop_slot: LoopSlot::default(),
            rng,
            events: Vec::new(),
        };
        game.reset_ball();
        game
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.bricks = build_wall();
        self.power_ups.clear();
        self.active.clear();
        self.paddle.width = PADDLE_WIDTH;
        self.reset_ball();
        log::info!("Breakout started");
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        self.keys.apply(event);
        match event {
            InputEvent::PointerMove(p) => self.target_x = p.x,
            _ if event.is_start() => {
                if self.phase.accepts_start() {
                    self.start();
                } else if self.phase == GamePhase::Playing {
                    self.launch();
                }
            }
            _ => {}
        }
    }

    /// Release a resting ball
    pub fn launch(&mut self) {
        if self.ball.is_resting() {
            let vx = self.rng.random_range(-LAUNCH_VX_SPREAD..LAUNCH_VX_SPREAD);
            self.ball.vel = Vec2::new(vx, LAUNCH_VY);
        }
    }

    pub fn update(&mut self) {
        // Effects keep fading after the run ends
        self.update_effects();
        if self.phase != GamePhase::Playing {
            return;
        }
        self.update_paddle();
        self.update_ball();
        if self.phase != GamePhase::Playing {
            return;
        }
        self.update_power_ups();
        self.check_collisions();
        self.check_level_complete();
    }

    fn update_paddle(&mut self) {
        if self.keys.left {
            self.target_x -= self.paddle.speed;
        }
        if self.keys.right {
            self.target_x += self.paddle.speed;
        }
        let half = self.paddle.width / 2.0;
        self.target_x = self.target_x.clamp(half, CANVAS_WIDTH - half);
        self.paddle.x = self.target_x;

        if self.ball.is_resting() {
            self.ball.pos.x = self.paddle.x;
        }
    }

    fn update_ball(&mut self) {
        let ball = &mut self.ball;
        ball.trail.push_back(ball.pos);
        if ball.trail.len() > TRAIL_LEN {
            ball.trail.pop_front();
        }
        ball.pos += ball.vel;

        let r = ball.radius;
        let mut bounced = false;
        if ball.pos.x - r <= 0.0 || ball.pos.x + r >= CANVAS_WIDTH {
            ball.vel.x = -ball.vel.x;
            ball.pos.x = ball.pos.x.clamp(r, CANVAS_WIDTH - r);
            bounced = true;
        }
        if ball.pos.y - r <= 0.0 {
            ball.vel.y = -ball.vel.y;
            ball.pos.y = r;
            bounced = true;
        }
        let pos = ball.pos;
        if bounced {
            self.bounce_sparks(pos);
        }

        if pos.y - r > CANVAS_HEIGHT {
            self.lose_life();
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.screen_shake = 20.0;
        self.engine
            .explosion(self.ball.pos.x, CANVAS_HEIGHT - 50.0, 15, Some(palette::DANGER_RED));
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            super::finish_run(self.score, &mut self.high_score, &mut self.events);
            log::info!("Breakout over: score {}", self.score);
        } else {
            self.reset_ball();
        }
    }

    fn update_power_ups(&mut self) {
        let bounds = self.paddle.bounds();
        let mut caught = Vec::new();
        self.power_ups.retain_mut(|p| {
            p.pos.y += POWER_UP_FALL_SPEED;
            p.rotation += 0.1;
            if p.pos.y > CANVAS_HEIGHT {
                return false;
            }
            let max = bounds.max();
            let hit = p.pos.x > bounds.min.x
                && p.pos.x < max.x
                && p.pos.y + p.size > bounds.min.y
                && p.pos.y - p.size < max.y;
            if hit {
                caught.push(*p);
            }
            !hit
        });
        for p in caught {
            self.activate(p.kind);
            self.engine
                .explosion(p.pos.x, p.pos.y, 10, Some(p.kind.color()));
        }

        let mut expired = Vec::new();
        for (kind, ticks) in self.active.iter_mut() {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                expired.push(*kind);
            }
        }
        for kind in expired {
            self.deactivate(kind);
        }
    }

    pub fn activate(&mut self, kind: PowerUpKind) {
        self.active.insert(kind, POWER_UP_TICKS);
        match kind {
            PowerUpKind::BigPaddle => self.paddle.width = PADDLE_WIDTH_BIG,
            PowerUpKind::SlowBall => self.ball.vel *= 0.5,
            PowerUpKind::MultiBall => {
                // Decorative extra balls
                for _ in 0..2 {
                    let vel = Vec2::new(
                        self.rng.random_range(-3.0..3.0),
                        -self.ball.vel.y.abs() + self.rng.random_range(-1.0..1.0),
                    );
                    self.engine.create_particle(
                        self.ball.pos.x,
                        self.ball.pos.y,
                        ParticleOptions::default()
                            .vel(vel)
                            .life(1.0)
                            .color(Rgba::hex(0x88ff88))
                            .size(BALL_RADIUS),
                    );
                }
            }
        }
        log::debug!("Power-up {:?} active", kind);
    }

    fn deactivate(&mut self, kind: PowerUpKind) {
        self.active.remove(&kind);
        if kind == PowerUpKind::BigPaddle {
            self.paddle.width = PADDLE_WIDTH;
        }
    }

    fn update_effects(&mut self) {
        self.screen_shake = (self.screen_shake - 1.0).max(0.0);
        self.flash = (self.flash - 1.0).max(0.0);
        for brick in self.bricks.iter_mut().filter(|b| b.glow > 0.0) {
            brick.glow = (brick.glow - GLOW_DECAY).max(0.0);
        }
    }

    fn check_collisions(&mut self) {
        let ball_pos = self.ball.pos;
        let r = self.ball.radius;

        if self.ball.vel.y > 0.0 && ball_over_paddle(ball_pos, r, &self.paddle.bounds()) {
            let offset = paddle_hit_offset(ball_pos.x, self.paddle.x, self.paddle.width);
            self.ball.vel.x = offset * PADDLE_DEFLECT;
            self.ball.vel.y = -self.ball.vel.y.abs();
            self.bounce_sparks(Vec2::new(ball_pos.x, self.paddle.y));
            self.engine
                .add_light(ball_pos.x, self.paddle.y, 100.0, palette::ARCADE_GREEN, 0.5);
        }

        // At most one brick per tick
        let Some(index) = self
            .bricks
            .iter()
            .position(|b| b.visible && circle_hits_rect(ball_pos, r, &b.bounds()))
        else {
            return;
        };
        self.hit_brick(index);
        self.ball.vel.y = -self.ball.vel.y;
        self.bounce_sparks(ball_pos);
    }

    fn hit_brick(&mut self, index: usize) {
        let brick = &mut self.bricks[index];
        brick.hits = brick.hits.saturating_sub(1);
        brick.glow = 1.0;
        let (center, color, max_hits) = (brick.center(), brick.color, brick.max_hits);

        if brick.hits == 0 {
            brick.visible = false;
            self.score += max_hits as u64 * DESTROY_SCORE_PER_HIT;
            self.screen_shake = 10.0;
            self.flash = 5.0;
            self.engine.explosion(center.x, center.y, 15, Some(color));
            if self.rng.random_bool(POWER_UP_CHANCE) {
                let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
                self.power_ups.push(PowerUp {
                    pos: center,
                    kind,
                    size: POWER_UP_SIZE,
                    rotation: 0.0,
                });
            }
        } else {
            self.score += CHIP_SCORE;
            self.engine.add_light(center.x, center.y, 80.0, color, 0.3);
        }
    }

    fn check_level_complete(&mut self) {
        if self.bricks.iter().any(|b| b.visible) {
            return;
        }
        self.level += 1;
        self.bricks = build_wall();
        self.reset_ball();
        self.engine.explosion(
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT / 2.0,
            30,
            Some(Rgba::hex(0x44ff44)),
        );
        self.events.push(GameEvent::LevelUp(self.level));
        log::info!("Breakout level {}", self.level);
    }

    fn reset_ball(&mut self) {
        self.ball.pos = Vec2::new(self.paddle.x, self.paddle.y - BALL_REST_GAP);
        self.ball.vel = Vec2::ZERO;
        self.ball.trail.clear();
    }

    fn bounce_sparks(&mut self, at: Vec2) {
        for i in 0..8 {
            let angle = std::f32::consts::TAU * i as f32 / 8.0;
            let speed = self.rng.random_range(1.0..4.0);
            let size = self.rng.random_range(1.0..3.0);
            self.engine.create_particle(
                at.x,
                at.y,
                ParticleOptions::default()
                    .vel(Vec2::from_angle(angle) * speed)
                    .life(0.3)
                    .color(Rgba::WHITE)
                    .size(size),
            );
        }
    }

    pub fn visible_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.visible).count()
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Fresh wall: rows get tougher every two rows
pub fn build_wall() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            let hits = (row / 2 + 1) as u8;
            bricks.push(Brick {
                pos: BRICK_OFFSET
                    + Vec2::new(
                        col as f32 * (BRICK_SIZE.x + BRICK_PADDING),
                        row as f32 * (BRICK_SIZE.y + BRICK_PADDING),
                    ),
                size: BRICK_SIZE,
                hits,
                max_hits: hits,
                visible: true,
                glow: 0.0,
                color: Rgba::hex(BRICK_COLORS[row % BRICK_COLORS.len()]),
            });
        }
    }
    bricks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Key;
    use proptest::prelude::*;

    fn playing(seed: u64) -> Breakout {
        let mut game = Breakout::new(seed, 0);
        game.handle_input(&InputEvent::Click(Vec2::new(400.0, 300.0)));
        game
    }

    #[test]
    fn test_wall_layout() {
        let wall = build_wall();
        assert_eq!(wall.len(), 96);
        assert_eq!(wall[0].pos, Vec2::new(35.0, 80.0));
        assert_eq!(wall[1].pos, Vec2::new(100.0, 80.0));
        assert_eq!(wall[12].pos, Vec2::new(35.0, 110.0));
        assert_eq!(wall[0].hits, 1);
        assert_eq!(wall[95].hits, 4);
    }

    #[test]
    fn test_ball_rests_until_launch() {
        let mut game = playing(1);
        assert!(game.ball.is_resting());
        for _ in 0..30 {
            game.update();
        }
        assert!(game.ball.is_resting());
        assert_eq!(game.ball.pos.y, PADDLE_Y - BALL_REST_GAP);

        game.handle_input(&InputEvent::KeyDown(Key::Space));
        assert_eq!(game.ball.vel.y, LAUNCH_VY);
        assert!(game.ball.vel.x.abs() < LAUNCH_VX_SPREAD);
    }

    #[test]
    fn test_resting_ball_follows_paddle() {
        let mut game = playing(1);
        game.handle_input(&InputEvent::PointerMove(Vec2::new(200.0, 500.0)));
        game.update();
        assert_eq!(game.paddle.x, 200.0);
        assert_eq!(game.ball.pos.x, 200.0);
    }

    #[test]
    fn test_paddle_clamped_to_canvas() {
        let mut game = playing(1);
        game.handle_input(&InputEvent::PointerMove(Vec2::new(-50.0, 0.0)));
        game.update();
        assert_eq!(game.paddle.x, PADDLE_WIDTH / 2.0);
    }

    #[test]
    fn test_arrow_keys_move_paddle() {
        let mut game = playing(1);
        game.handle_input(&InputEvent::KeyDown(Key::Right));
        game.update();
        game.update();
        assert_eq!(game.paddle.x, 400.0 + 2.0 * PADDLE_SPEED);
    }

    #[test]
    fn test_paddle_deflection() {
        let mut game = playing(1);
        game.update();
        game.ball.pos = Vec2::new(430.0, PADDLE_Y - 4.0);
        game.ball.vel = Vec2::new(0.0, 4.0);
        game.check_collisions();
        assert!((game.ball.vel.x - 2.5).abs() < 1e-5);
        assert_eq!(game.ball.vel.y, -4.0);
    }

    #[test]
    fn test_only_one_brick_per_tick() {
        let mut game = playing(1);
        // Straddle the gap between two bricks in the first row
        let left = game.bricks[0].clone();
        game.ball.pos = Vec2::new(left.pos.x + left.size.x + 2.5, left.center().y);
        game.ball.vel = Vec2::new(0.0, -4.0);
        game.check_collisions();
        assert_eq!(game.visible_bricks(), 95);
        assert_eq!(game.ball.vel.y, 4.0);
    }

    #[test]
    fn test_losing_last_life_ends_run() {
        let mut game = playing(1);
        game.lives = 1;
        game.ball.pos = Vec2::new(400.0, CANVAS_HEIGHT + 20.0);
        game.ball.vel = Vec2::new(0.0, 4.0);
        game.update();
        assert_eq!(game.phase, GamePhase::GameOver);
        assert_eq!(game.lives, 0);
        assert!(
            game.take_events()
                .contains(&GameEvent::GameOver { score: 0 })
        );
    }

    #[test]
    fn test_losing_a_life_resets_ball() {
        let mut game = playing(1);
        game.ball.pos = Vec2::new(400.0, CANVAS_HEIGHT + 20.0);
        game.ball.vel = Vec2::new(0.0, 4.0);
        game.update();
        assert_eq!(game.lives, 2);
        assert!(game.ball.is_resting());
        assert_eq!(game.phase, GamePhase::Playing);
    }

    #[test]
    fn test_power_up_timer_expires() {
        let mut game = playing(1);
        game.activate(PowerUpKind::BigPaddle);
        assert_eq!(game.paddle.width, PADDLE_WIDTH_BIG);
        for _ in 0..POWER_UP_TICKS - 1 {
            game.update();
        }
        assert!(game.active.contains_key(&PowerUpKind::BigPaddle));
        game.update();
        assert!(!game.active.contains_key(&PowerUpKind::BigPaddle));
        assert_eq!(game.paddle.width, PADDLE_WIDTH);
    }

    #[test]
    fn test_power_up_caught_by_paddle() {
        let mut game = playing(1);
        game.power_ups.push(PowerUp {
            pos: Vec2::new(400.0, PADDLE_Y - 10.0),
            kind: PowerUpKind::SlowBall,
            size: POWER_UP_SIZE,
            rotation: 0.0,
        });
        game.update();
        assert!(game.power_ups.is_empty());
        assert!(game.active.contains_key(&PowerUpKind::SlowBall));
    }

    #[test]
    fn test_clearing_wall_advances_level() {
        let mut game = playing(1);
        for brick in game.bricks.iter_mut() {
            brick.visible = false;
        }
        game.update();
        assert_eq!(game.level, 2);
        assert_eq!(game.visible_bricks(), 96);
        assert!(game.take_events().contains(&GameEvent::LevelUp(2)));
    }

    proptest! {
        #[test]
        fn prop_brick_hit_decrements(row in 0usize..BRICK_ROWS, col in 0usize..BRICK_COLS, worn in 0u8..4) {
            let mut game = playing(7);
            let index = row * BRICK_COLS + col;
            let max_hits = game.bricks[index].max_hits;
            let before = max_hits - worn.min(max_hits - 1);
            game.bricks[index].hits = before;
            game.ball.pos = game.bricks[index].center();
            game.ball.vel = Vec2::new(0.0, -4.0);

            game.check_collisions();

            let brick = &game.bricks[index];
            prop_assert_eq!(brick.hits, before - 1);
            if brick.hits == 0 {
                prop_assert!(!brick.visible);
                prop_assert_eq!(game.score, max_hits as u64 * DESTROY_SCORE_PER_HIT);
            } else {
                prop_assert!(brick.visible);
                prop_assert_eq!(game.score, CHIP_SCORE);
            }
            prop_assert_eq!(game.ball.vel.y, 4.0);
        }
    }
}
