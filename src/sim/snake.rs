//! Snake
//!
//! 40×30 grid of 20 px cells. The snake steps on its own interval (150 ms,
//! 2 ms faster per food, never below 50 ms) independent of the 60 Hz tick.

use std::collections::VecDeque;

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::effects::{GameEngine, ParticleOptions};
use super::grid::{Cell, Direction, GridSize};
use super::input::{InputEvent, Key};
use super::{GameEvent, GamePhase};
use crate::consts::TICK_MS;
use crate::platform::LoopSlot;
use crate::renderer::color::{Rgba, palette};

pub mod consts {
    use super::{Cell, GridSize};

    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    pub const CELL_SIZE: f32 = 20.0;
    pub const GRID: GridSize = GridSize::new(40, 30);
    pub const START: Cell = Cell::new(15, 15);
    pub const START_STEP_MS: f32 = 150.0;
    pub const MIN_STEP_MS: f32 = 50.0;
    pub const STEP_SPEEDUP_MS: f32 = 2.0;
    pub const FOOD_SCORE: u64 = 10;
    /// Obstacles are re-rolled every time the score crosses a multiple of this
    pub const OBSTACLE_REGEN_SCORE: u64 = 50;
    /// Obstacles never spawn within this many cells of the start
    pub const START_CLEARANCE: i32 = 2;
    pub const TRAIL_LEN: usize = 8;
    /// Delay between the per-segment death bursts
    pub const DEATH_BURST_STAGGER_TICKS: u32 = 3;
    pub const HIGH_SCORE_KEY: &str = "snakeHighScore";
}

use consts::*;

#[derive(Debug)]
pub struct Snake {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// Head first
    pub body: VecDeque<Cell>,
    /// Direction applied on the next step
    pub heading: Direction,
    /// Direction of the last completed step; reversals are checked against it
    pub last_moved: Direction,
    pub food: Cell,
    pub obstacles: Vec<Cell>,
    /// Recent head positions, newest first
    pub trail: VecDeque<Cell>,
    pub step_ms: f32,
    since_step_ms: f32,
    pub food_glow: f32,
    pub screen_shake: f32,
    death_bursts: Vec<(u32, Cell)>,
    pub engine: GameEngine,
    pub loop_slot: LoopSlot,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Snake {
    pub fn new(seed: u64, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = GameEngine::new(rng.random());
        let mut snake = Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            body: VecDeque::from([START]),
            heading: Direction::NONE,
            last_moved: Direction::NONE,
            food: START,
            obstacles: Vec::new(),
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            step_ms: START_STEP_MS,
            since_step_ms: 0.0,
            food_glow: 0.0,
            screen_shake: 0.0,
            death_bursts: Vec::new(),
            engine,
            loop_slot: LoopSlot::default(),
            rng,
            events: Vec::new(),
        };
        snake.food = snake.random_free_cell(|_| true).unwrap_or(START);
        snake.generate_obstacles();
        snake
    }

    /// Current level; drives the obstacle count
    pub fn level(&self) -> u32 {
        1 + (self.score / OBSTACLE_REGEN_SCORE) as u32
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(START)
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.step_ms = START_STEP_MS;
        self.since_step_ms = 0.0;
        self.body = VecDeque::from([START]);
        self.heading = Direction::RIGHT;
        self.last_moved = Direction::RIGHT;
        self.trail.clear();
        self.food_glow = 0.0;
        self.obstacles.clear();
        self.food = self.random_free_cell(|_| true).unwrap_or(START);
        self.generate_obstacles();
        log::info!("Snake started");
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        match self.phase {
            GamePhase::Menu | GamePhase::GameOver => {
                if event.is_start() {
                    self.start();
                }
            }
            GamePhase::Playing => match event {
                InputEvent::KeyDown(Key::Space) => self.phase = GamePhase::Paused,
                InputEvent::KeyDown(key) => {
                    if let Some(dir) = direction_for(*key) {
                        self.steer(dir);
                    }
                }
                _ => {}
            },
            GamePhase::Paused => {
                if *event == InputEvent::KeyDown(Key::Space) {
                    self.phase = GamePhase::Playing;
                }
            }
        }
    }

    /// Queue a direction change; reversing into the last step is ignored
    pub fn steer(&mut self, dir: Direction) {
        if !dir.is_reverse_of(self.last_moved) {
            self.heading = dir;
        }
    }

    pub fn update(&mut self) {
        self.tick_death_bursts();
        if self.screen_shake > 0.0 {
            self.screen_shake = (self.screen_shake - 1.0).max(0.0);
        }
        if self.phase != GamePhase::Playing {
            return;
        }

        self.since_step_ms += TICK_MS;
        // Tolerance for the 16.67 ms tick not dividing the interval exactly
        if self.since_step_ms + 1e-3 < self.step_ms {
            return;
        }
        self.since_step_ms = 0.0;
        self.step();
    }

    fn step(&mut self) {
        if self.heading.is_none() {
            return;
        }
        let head = self.head() + self.heading;

        if !GRID.contains(head) || self.body.contains(&head) || self.obstacles.contains(&head) {
            self.game_over();
            return;
        }

        self.body.push_front(head);
        self.last_moved = self.heading;

        if head == self.food {
            self.eat();
        } else {
            self.body.pop_back();
        }

        if self.food_glow > 0.0 {
            self.food_glow = (self.food_glow - 0.02).max(0.0);
        }
        self.trail.push_front(head);
        self.trail.truncate(TRAIL_LEN);
    }

    fn eat(&mut self) {
        let eaten = self.food;
        self.score += FOOD_SCORE;
        self.food = self.random_free_cell(|_| true).unwrap_or(eaten);
        self.food_glow = 1.0;
        self.food_burst(eaten);

        self.step_ms = (self.step_ms - STEP_SPEEDUP_MS).max(MIN_STEP_MS);
        if self.score % OBSTACLE_REGEN_SCORE == 0 {
            self.generate_obstacles();
            self.events.push(GameEvent::LevelUp(self.level()));
            log::info!("Snake level {}", self.level());
        }
    }

    fn food_burst(&mut self, cell: Cell) {
        let center = cell_center(cell);
        for i in 0..15 {
            let angle = std::f32::consts::TAU * i as f32 / 15.0;
            let speed = self.rng.random_range(1.0..4.0);
            let hue = self.rng.random_range(30.0..90.0);
            self.engine.create_particle(
                center.x,
                center.y,
                ParticleOptions::default()
                    .vel(Vec2::from_angle(angle) * speed)
                    .life(1.0)
                    .gravity(0.0)
                    .friction(1.0)
                    .color(Rgba::hsl(hue, 1.0, 0.6)),
            );
        }
        self.engine
            .explosion(center.x, center.y, 12, Some(Rgba::hex(0x44ff44)));
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.screen_shake = 30.0;
        self.death_bursts = self
            .body
            .iter()
            .enumerate()
            .map(|(i, &cell)| (i as u32 * DEATH_BURST_STAGGER_TICKS, cell))
            .collect();
        self.tick_death_bursts();

        super::finish_run(self.score, &mut self.high_score, &mut self.events);
        log::info!("Snake over: score {} (best {})", self.score, self.high_score);
    }

    fn tick_death_bursts(&mut self) {
        let mut due = Vec::new();
        self.death_bursts.retain_mut(|(delay, cell)| {
            if *delay == 0 {
                due.push(*cell);
                false
            } else {
                *delay -= 1;
                true
            }
        });
        for cell in due {
            let c = cell_center(cell);
            self.engine.explosion(c.x, c.y, 5, Some(palette::DANGER_RED));
        }
    }

    fn generate_obstacles(&mut self) {
        self.obstacles.clear();
        let count = self.level() / 2 + 3;
        for _ in 0..count {
            let food = self.food;
            let pick = self.random_free_cell(|c| c != food && c.chebyshev(START) > START_CLEARANCE);
            match pick {
                Some(cell) => self.obstacles.push(cell),
                None => break,
            }
        }
    }

    /// Random cell not covered by the snake or an obstacle and passing `allow`
    fn random_free_cell(&mut self, allow: impl Fn(Cell) -> bool) -> Option<Cell> {
        let free: Vec<Cell> = (0..GRID.len())
            .map(|i| GRID.cell_at(i))
            .filter(|c| !self.body.contains(c) && !self.obstacles.contains(c) && allow(*c))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

fn direction_for(key: Key) -> Option<Direction> {
    match key {
        Key::Up => Some(Direction::UP),
        Key::Down => Some(Direction::DOWN),
        Key::Left => Some(Direction::LEFT),
        Key::Right => Some(Direction::RIGHT),
        _ => None,
    }
}

/// Pixel centre of a grid cell
pub fn cell_center(cell: Cell) -> Vec2 {
    Vec2::new(
        cell.x as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        cell.y as f32 * CELL_SIZE + CELL_SIZE / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Ticks per step at the starting speed
    const STEP_TICKS: usize = 9;

    fn playing(seed: u64) -> Snake {
        let mut snake = Snake::new(seed, 0);
        snake.handle_input(&InputEvent::KeyDown(Key::Enter));
        snake.obstacles.clear();
        // Park the food far away from the test paths
        snake.food = Cell::new(0, 0);
        snake
    }

    fn run_step(snake: &mut Snake) {
        for _ in 0..STEP_TICKS {
            snake.update();
        }
    }

    /// Tick until the head moves once, whatever the current interval
    fn step_once(snake: &mut Snake) {
        let head = snake.head();
        for _ in 0..STEP_TICKS {
            snake.update();
            if snake.head() != head {
                break;
            }
        }
    }

    /// Put the food in the next cell and take the step onto it
    fn eat_ahead(snake: &mut Snake) {
        snake.food = snake.head() + snake.heading;
        step_once(snake);
    }

    #[test]
    fn test_starts_in_menu_and_waits() {
        let mut snake = Snake::new(1, 0);
        assert_eq!(snake.phase, GamePhase::Menu);
        for _ in 0..100 {
            snake.update();
        }
        assert_eq!(snake.head(), START);
    }

    #[test]
    fn test_first_step_after_interval() {
        let mut snake = playing(1);
        for _ in 0..STEP_TICKS - 1 {
            snake.update();
        }
        assert_eq!(snake.head(), START);
        snake.update();
        assert_eq!(snake.head(), Cell::new(16, 15));
    }

    #[test]
    fn test_reverse_is_ignored() {
        let mut snake = playing(1);
        snake.handle_input(&InputEvent::KeyDown(Key::Left));
        assert_eq!(snake.heading, Direction::RIGHT);
        snake.handle_input(&InputEvent::KeyDown(Key::Down));
        snake.handle_input(&InputEvent::KeyDown(Key::Down));
        assert_eq!(snake.heading, Direction::DOWN);
        run_step(&mut snake);
        assert_eq!(snake.head(), Cell::new(15, 16));
    }

    #[test]
    fn test_quick_turns_cannot_fold_back() {
        let mut snake = playing(1);
        // Up then left before the snake moves: left would reverse the last step
        snake.handle_input(&InputEvent::KeyDown(Key::Up));
        snake.handle_input(&InputEvent::KeyDown(Key::Left));
        assert_eq!(snake.heading, Direction::UP);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut snake = playing(2);
        snake.food = Cell::new(16, 15);
        run_step(&mut snake);
        assert_eq!(snake.score, FOOD_SCORE);
        assert_eq!(snake.body.len(), 2);
        assert_eq!(snake.step_ms, START_STEP_MS - STEP_SPEEDUP_MS);
        assert_ne!(snake.food, Cell::new(16, 15));
        assert!(!snake.body.contains(&snake.food));
        assert!(snake.engine.particle_count() > 0);
    }

    #[test]
    fn test_fifth_food_levels_up_and_rerolls_obstacles() {
        let mut snake = playing(7);
        for eaten in 1..=4u64 {
            eat_ahead(&mut snake);
            assert_eq!(snake.score, eaten * FOOD_SCORE);
            assert!(snake.obstacles.is_empty());
        }
        assert!(snake.take_events().is_empty());

        eat_ahead(&mut snake);
        assert_eq!(snake.score, OBSTACLE_REGEN_SCORE);
        assert_eq!(snake.level(), 2);
        assert_eq!(snake.take_events(), vec![GameEvent::LevelUp(2)]);
        assert_eq!(snake.obstacles.len(), 4);
        assert!(snake.obstacles.iter().all(|o| !snake.body.contains(o)));
        assert!(!snake.obstacles.contains(&snake.food));
        assert!(!snake.body.contains(&snake.food));
        assert_eq!(snake.body.len(), 6);
        assert_eq!(snake.step_ms, START_STEP_MS - 5.0 * STEP_SPEEDUP_MS);
    }

    #[test]
    fn test_step_interval_floors_at_minimum() {
        let mut snake = playing(8);
        snake.step_ms = MIN_STEP_MS + STEP_SPEEDUP_MS / 2.0;
        for _ in 0..3 {
            eat_ahead(&mut snake);
            assert!(snake.step_ms >= MIN_STEP_MS);
        }
        assert_eq!(snake.score, 3 * FOOD_SCORE);
        assert_eq!(snake.step_ms, MIN_STEP_MS);
    }

    #[test]
    fn test_wall_ends_run_and_reports_high_score() {
        let mut snake = playing(3);
        snake.score = 40;
        snake.heading = Direction::UP;
        snake.last_moved = Direction::UP;
        for _ in 0..16 {
            run_step(&mut snake);
        }
        assert_eq!(snake.phase, GamePhase::GameOver);
        let events = snake.take_events();
        assert!(events.contains(&GameEvent::HighScore(40)));
        assert!(events.contains(&GameEvent::GameOver { score: 40 }));
        assert_eq!(snake.high_score, 40);
    }

    #[test]
    fn test_no_high_score_event_when_not_beaten() {
        let mut snake = Snake::new(3, 500);
        snake.start();
        snake.obstacles.clear();
        snake.heading = Direction::UP;
        snake.last_moved = Direction::UP;
        for _ in 0..16 {
            run_step(&mut snake);
        }
        let events = snake.take_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::HighScore(_))));
        assert_eq!(snake.high_score, 500);
    }

    #[test]
    fn test_obstacle_ends_run() {
        let mut snake = playing(4);
        snake.obstacles.push(Cell::new(16, 15));
        run_step(&mut snake);
        assert_eq!(snake.phase, GamePhase::GameOver);
        assert_eq!(snake.head(), START);
    }

    #[test]
    fn test_space_toggles_pause() {
        let mut snake = playing(5);
        snake.handle_input(&InputEvent::KeyDown(Key::Space));
        assert_eq!(snake.phase, GamePhase::Paused);
        for _ in 0..50 {
            snake.update();
        }
        assert_eq!(snake.head(), START);
        snake.handle_input(&InputEvent::KeyDown(Key::Space));
        assert_eq!(snake.phase, GamePhase::Playing);
    }

    #[test]
    fn test_obstacles_keep_clear_of_start() {
        for seed in 0..20 {
            let mut snake = Snake::new(seed, 0);
            snake.start();
            assert_eq!(snake.obstacles.len(), 3);
            assert!(snake.obstacles.iter().all(|o| o.chebyshev(START) > START_CLEARANCE));
            assert!(!snake.obstacles.contains(&snake.food));
        }
    }

    #[test]
    fn test_death_bursts_are_staggered() {
        let mut snake = playing(6);
        snake.body = VecDeque::from([Cell::new(39, 5), Cell::new(38, 5), Cell::new(37, 5)]);
        snake.heading = Direction::RIGHT;
        run_step(&mut snake);
        assert_eq!(snake.phase, GamePhase::GameOver);
        let lights_now = snake.engine.lights().len();
        assert_eq!(lights_now, 1);
        for _ in 0..DEATH_BURST_STAGGER_TICKS * 2 {
            snake.update();
        }
        assert_eq!(snake.engine.lights().len(), 3);
    }

    proptest! {
        #[test]
        fn prop_step_moves_head_by_heading(x in 0i32..40, y in 0i32..30, d in 0usize..4) {
            let mut snake = playing(9);
            let dir = Direction::ALL[d];
            let start = Cell::new(x, y);
            snake.body = VecDeque::from([start]);
            snake.heading = dir;
            snake.last_moved = dir;
            run_step(&mut snake);

            let target = start + dir;
            if GRID.contains(target) {
                prop_assert_eq!(snake.head(), target);
                prop_assert_eq!(snake.phase, GamePhase::Playing);
            } else {
                prop_assert_eq!(snake.phase, GamePhase::GameOver);
                prop_assert!(GRID.contains(snake.head()));
            }
        }
    }
}
