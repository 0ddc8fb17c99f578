//! Memory (pairs)

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::effects::GameEngine;
use super::input::InputEvent;
use super::timer::TickTimer;
use super::{GameEvent, GamePhase};
use crate::platform::LoopSlot;
use crate::renderer::color::palette;
use crate::settings::Difficulty;

pub mod consts {
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 450.0;
    /// Board inset from the canvas edge
    pub const MARGIN: f32 = 20.0;
    pub const MATCH_SCORE: u64 = 10;
    pub const MISMATCH_LOCK_TICKS: u32 = crate::ms_to_ticks(700);
}

use consts::*;

/// (cols, rows) per difficulty
pub fn board_dims(difficulty: Difficulty) -> (usize, usize) {
    match difficulty {
        Difficulty::Easy => (4, 3),
        Difficulty::Medium => (4, 4),
        Difficulty::Hard => (6, 6),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub value: u32,
    pub open: bool,
    pub matched: bool,
}

impl Card {
    pub fn face_up(&self) -> bool {
        self.open || self.matched
    }
}

/// A failed pair waiting to be turned back over
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mismatch {
    cards: (usize, usize),
    timer: TickTimer,
}

#[derive(Debug)]
pub struct Memory {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub cols: usize,
    pub rows: usize,
    pub cards: Vec<Card>,
    /// Index of the first card of the current attempt
    pub first: Option<usize>,
    pub pairs_found: usize,
    mismatch: Option<Mismatch>,
    pub engine: GameEngine,
    pub loop_slot: LoopSlot,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Memory {
    pub fn new(seed: u64, difficulty: Difficulty, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = GameEngine::new(rng.random());
        let (cols, rows) = board_dims(difficulty);
        let mut game = Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            cols,
            rows,
            cards: Vec::new(),
            first: None,
            pairs_found: 0,
            mismatch: None,
            engine,
            loop_slot: LoopSlot::default(),
            rng,
            events: Vec::new(),
        };
        game.deal();
        game
    }

    pub fn pairs(&self) -> usize {
        self.cols * self.rows / 2
    }

    /// Shuffle a fresh deck of pairs
    fn deal(&mut self) {
        let mut values: Vec<u32> = (0..self.pairs() as u32).flat_map(|v| [v, v]).collect();
        values.shuffle(&mut self.rng);
        self.cards = values
            .into_iter()
            .map(|value| Card {
                value,
                open: false,
                matched: false,
            })
            .collect();
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.first = None;
        self.pairs_found = 0;
        self.mismatch = None;
        self.deal();
        log::info!("Memory started ({}x{})", self.cols, self.rows);
    }

    /// Input is ignored while a mismatched pair is showing
    pub fn is_locked(&self) -> bool {
        self.mismatch.is_some()
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        if self.phase.accepts_start() {
            if event.is_start() {
                self.start();
            }
            return;
        }
        if let InputEvent::Click(p) = event {
            if let Some(index) = self.card_at(*p) {
                self.flip(index);
            }
        }
    }

    /// Turn over a card; the second flip of an attempt resolves the pair
    pub fn flip(&mut self, index: usize) {
        if self.phase != GamePhase::Playing || self.is_locked() {
            return;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return;
        };
        if card.face_up() {
            return;
        }
        card.open = true;

        let Some(first) = self.first.take() else {
            self.first = Some(index);
            return;
        };

        if self.cards[first].value == self.cards[index].value {
            self.cards[first].matched = true;
            self.cards[index].matched = true;
            self.score += MATCH_SCORE;
            self.pairs_found += 1;
            let c = self.card_rect(index).center();
            self.engine
                .explosion(c.x, c.y, 12, Some(palette::ARCADE_GREEN));
            if self.pairs_found == self.pairs() {
                self.phase = GamePhase::GameOver;
                super::finish_run(self.score, &mut self.high_score, &mut self.events);
                log::info!("Memory cleared: score {}", self.score);
            }
        } else {
            self.mismatch = Some(Mismatch {
                cards: (first, index),
                timer: TickTimer::once(MISMATCH_LOCK_TICKS),
            });
        }
    }

    pub fn update(&mut self) {
        let Some(mismatch) = self.mismatch.as_mut() else {
            return;
        };
        if mismatch.timer.tick() {
            let (a, b) = mismatch.cards;
            self.cards[a].open = false;
            self.cards[b].open = false;
            self.mismatch = None;
        }
    }

    /// Card cell size in pixels
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            ((CANVAS_WIDTH - 2.0 * MARGIN) / self.cols as f32).floor(),
            ((CANVAS_HEIGHT - 2.0 * MARGIN) / self.rows as f32).floor(),
        )
    }

    pub fn card_rect(&self, index: usize) -> Aabb {
        let cell = self.cell_size();
        let (col, row) = (index % self.cols, index / self.cols);
        Aabb::new(
            Vec2::new(MARGIN + col as f32 * cell.x, MARGIN + row as f32 * cell.y),
            cell,
        )
    }

    pub fn card_at(&self, p: Vec2) -> Option<usize> {
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
