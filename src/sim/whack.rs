//! Whack-a-Mole
//!
//! A 30 second round. The countdown and the mole spawner are two timers that
//! always start and stop together.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::effects::GameEngine;
use super::input::InputEvent;
use super::timer::TickTimer;
use super::{GameEvent, GamePhase};
use crate::platform::LoopSlot;
use crate::renderer::color::Rgba;
use crate::ms_to_ticks;
use crate::settings::Difficulty;

pub mod consts {
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 360.0;
    pub const MARGIN: f32 = 20.0;
    pub const ROUND_SECONDS: u32 = 30;
    pub const SECOND_TICKS: u32 = crate::ms_to_ticks(1000);
    pub const HIT_SCORE: u64 = 5;
    pub const MISS_PENALTY: u64 = 1;
}

use consts::*;

/// (rows, cols) per difficulty
pub fn board_dims(difficulty: Difficulty) -> (usize, usize) {
    match difficulty {
        Difficulty::Easy => (3, 3),
        Difficulty::Medium => (3, 4),
        Difficulty::Hard => (4, 4),
    }
}

/// Ticks between mole jumps
pub fn spawn_interval(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => ms_to_ticks(1200),
        Difficulty::Medium => ms_to_ticks(1000),
        Difficulty::Hard => ms_to_ticks(700),
    }
}

/// The round's two timers, owned and cleared as one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTimers {
    pub countdown: TickTimer,
    pub spawn: TickTimer,
}

#[derive(Debug)]
pub struct Whack {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub rows: usize,
    pub cols: usize,
    /// Hole currently showing the mole
    pub active: Option<usize>,
    pub seconds_left: u32,
    pub timers: Option<RoundTimers>,
    spawn_ticks: u32,
    pub engine: GameEngine,
    pub loop_slot: LoopSlot,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Whack {
    pub fn new(seed: u64, difficulty: Difficulty, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = GameEngine::new(rng.random());
        let (rows, cols) = board_dims(difficulty);
        Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            rows,
            cols,
            active: None,
            seconds_left: ROUND_SECONDS,
            timers: None,
            spawn_ticks: spawn_interval(difficulty),
            engine,
            loop_slot: LoopSlot::default(),
            rng,
            events: Vec::new(),
        }
    }

    pub fn holes(&self) -> usize {
        self.rows * self.cols
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.seconds_left = ROUND_SECONDS;
        self.timers = Some(RoundTimers {
            countdown: TickTimer::every(SECOND_TICKS),
            spawn: TickTimer::every(self.spawn_ticks),
        });
        self.move_mole();
        log::info!("Whack-a-Mole started ({}x{})", self.rows, self.cols);
    }

    fn move_mole(&mut self) {
        self.active = Some(self.rng.random_range(0..self.holes()));
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        if self.phase.accepts_start() {
            if event.is_start() {
                self.start();
            }
            return;
        }
        if let InputEvent::Click(p) = event {
            self.whack(self.hole_at(*p));
        }
    }

    /// Resolve a click on `hole` (`None` for a click between holes)
    pub fn whack(&mut self, hole: Option<usize>) {
        if self.phase != GamePhase::Playing {
            return;
        }
        match (hole, self.active) {
            (Some(h), Some(active)) if h == active => {
                self.score += HIT_SCORE;
                self.active = None;
                let c = self.hole_rect(h).center();
                self.engine
                    .explosion(c.x, c.y, 10, Some(Rgba::hex(0xffcc00)));
            }
            _ => self.score = self.score.saturating_sub(MISS_PENALTY),
        }
    }

    pub fn update(&mut self) {
        let Some(timers) = self.timers.as_mut() else {
            return;
        };
        let second = timers.countdown.tick();
        let jump = timers.spawn.tick();

        if second {
            self.seconds_left = self.seconds_left.saturating_sub(1);
            if self.seconds_left == 0 {
                self.end_round();
                return;
            }
        }
        if jump {
            self.move_mole();
        }
    }

    fn end_round(&mut self) {
        self.timers = None;
        self.active = None;
        self.phase = GamePhase::GameOver;
        super::finish_run(self.score, &mut self.high_score, &mut self.events);
        log::info!("Whack-a-Mole over: score {}", self.score);
    }

    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            ((CANVAS_WIDTH - 2.0 * MARGIN) / self.cols as f32).floor(),
            ((CANVAS_HEIGHT - 2.0 * MARGIN) / self.rows as f32).floor(),
        )
    }

    pub fn hole_rect(&self, index: usize) -> Aabb {
        let cell = self.cell_size();
        let (col, row) = (index % self.cols, index / self.cols);
        Aabb::new(
            Vec2::new(MARGIN + col as f32 * cell.x, MARGIN + row as f32 * cell.y),
            cell,
        )
    }

    pub fn hole_at(&self, p: Vec2) -> Option<usize> {
        let cell = self.cell_size();
        let gx = ((p.x - MARGIN) / cell.x).floor();
        let gy = ((p.y - MARGIN) / cell.y).floor();
        if gx < 0.0 || gy < 0.0 || gx >= self.cols as f32 || gy >= self.rows as f32 {
            return None;
        }
        Some(gy as usize * self.cols + gx as usize)
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(difficulty: Difficulty) -> Whack {
        let mut game = Whack::new(21, difficulty, 0);
        game.handle_input(&InputEvent::Click(Vec2::ZERO));
        game
    }

    #[test]
    fn test_dims_per_difficulty() {
        assert_eq!(Whack::new(1, Difficulty::Easy, 0).holes(), 9);
        assert_eq!(Whack::new(1, Difficulty::Medium, 0).holes(), 12);
        assert_eq!(Whack::new(1, Difficulty::Hard, 0).holes(), 16);
    }

    #[test]
    fn test_start_click_is_not_scored() {
        let game = playing(Difficulty::Medium);
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(game.score, 0);
        assert!(game.active.is_some());
        assert!(game.timers.is_some());
    }

    #[test]
    fn test_hit_and_miss() {
        let mut game = playing(Difficulty::Medium);
        let mole = game.active.unwrap();
        game.whack(Some(mole));
        assert_eq!(game.score, HIT_SCORE);
        assert_eq!(game.active, None);

        game.whack(Some(mole));
        assert_eq!(game.score, HIT_SCORE - MISS_PENALTY);
        game.whack(None);
        assert_eq!(game.score, HIT_SCORE - 2 * MISS_PENALTY);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut game = playing(Difficulty::Easy);
        game.active = None;
        game.whack(Some(0));
        game.whack(None);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_click_maps_to_hole() {
        let mut game = playing(Difficulty::Medium);
        // 440/4 = 110 wide, 320/3 = 106 tall
        let target = game.hole_rect(5).center();
        assert_eq!(game.hole_at(target), Some(5));
        game.active = Some(5);
        game.handle_input(&InputEvent::Click(target));
        assert_eq!(game.score, HIT_SCORE);
    }

    #[test]
    fn test_mole_moves_on_spawn_interval() {
        let mut game = playing(Difficulty::Hard);
        game.active = None;
        for _ in 0..spawn_interval(Difficulty::Hard) - 1 {
            game.update();
        }
        assert_eq!(game.active, None);
        game.update();
        assert!(game.active.is_some());
    }

    #[test]
    fn test_round_ends_after_thirty_seconds() {
        let mut game = playing(Difficulty::Easy);
        for _ in 0..(ROUND_SECONDS * SECOND_TICKS - 1) {
            game.update();
        }
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(game.seconds_left, 1);
        game.update();
        assert_eq!(game.phase, GamePhase::GameOver);
        assert_eq!(game.seconds_left, 0);
        assert!(game.timers.is_none());
        assert_eq!(game.take_events(), vec![GameEvent::GameOver { score: 0 }]);

        // Stopped timers stay stopped
        game.update();
        assert!(game.timers.is_none());
        game.whack(Some(0));
        assert_eq!(game.score, 0);
    }
}
