//! 2048

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::effects::GameEngine;
use super::grid::Direction;
use super::input::{InputEvent, Key};
use super::{GameEvent, GamePhase};
use crate::platform::LoopSlot;

pub mod consts {
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 480.0;
    pub const SIZE: usize = 4;
    pub const PADDING: f32 = 20.0;
    /// Probability that a spawned tile is a 2 (otherwise 4)
    pub const SPAWN_TWO_CHANCE: f64 = 0.9;
}

use consts::*;

pub type Board = [[u32; SIZE]; SIZE];

/// Slide one line toward index 0, merging equal neighbours once.
/// Returns the new line and the score gained.
pub fn slide_line(line: [u32; SIZE]) -> ([u32; SIZE], u64) {
    let tiles: Vec<u32> = line.into_iter().filter(|&v| v != 0).collect();
    let mut out = [0; SIZE];
    let mut gained = 0;
    let mut i = 0;
    let mut slot = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            let merged = tiles[i] * 2;
            out[slot] = merged;
            gained += merged as u64;
            i += 2;
        } else {
            out[slot] = tiles[i];
            i += 1;
        }
        slot += 1;
    }
    (out, gained)
}

/// Apply a move to a board; returns the new board and the score gained
pub fn apply_move(board: &Board, dir: Direction) -> (Board, u64) {
    // Cell k of line i, counted from the edge the tiles slide toward
    let line_cell: fn(usize, usize) -> (usize, usize) = match dir {
        Direction::LEFT => |i, k| (i, k),
        Direction::RIGHT => |i, k| (i, SIZE - 1 - k),
        Direction::UP => |i, k| (k, i),
        Direction::DOWN => |i, k| (SIZE - 1 - k, i),
        _ => return (*board, 0),
    };
    let mut next = *board;
    let mut gained = 0;
    for i in 0..SIZE {
        let cells: [(usize, usize); SIZE] = std::array::from_fn(|k| line_cell(i, k));
        let line = cells.map(|(r, c)| board[r][c]);
        let (slid, g) = slide_line(line);
        for (k, (r, c)) in cells.into_iter().enumerate() {
            next[r][c] = slid[k];
        }
        gained += g;
    }
    (next, gained)
}

/// True if any move would change the board
pub fn has_moves(board: &Board) -> bool {
    Direction::ALL
        .iter()
        .any(|&d| apply_move(board, d).0 != *board)
}

#[derive(Debug)]
pub struct Game2048 {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub board: Board,
    pub engine: GameEngine,
    pub loop_slot: LoopSlot,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Game2048 {
    pub fn new(seed: u64, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = GameEngine::new(rng.random());
        Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            board: [[0; SIZE]; SIZE],
            engine,
            loop_slot: LoopSlot::default(),
            rng,
            events: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.board = [[0; SIZE]; SIZE];
        self.spawn();
        self.spawn();
        log::info!("2048 started");
    }

    /// Drop a 2 (90 %) or 4 on a random empty cell
    fn spawn(&mut self) {
        let empty: Vec<(usize, usize)> = (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.board[r][c] == 0)
            .collect();
        if let Some(&(r, c)) = empty.choose(&mut self.rng) {
            self.board[r][c] = if self.rng.random_bool(SPAWN_TWO_CHANCE) {
                2
            } else {
                4
            };
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        if self.phase.accepts_start() {
            if event.is_start() {
                self.start();
            }
            return;
        }
        let dir = match event {
            InputEvent::KeyDown(Key::Left) => Direction::LEFT,
            InputEvent::KeyDown(Key::Right) => Direction::RIGHT,
            InputEvent::KeyDown(Key::Up) => Direction::UP,
            InputEvent::KeyDown(Key::Down) => Direction::DOWN,
            _ => return,
        };
        self.slide(dir);
    }

    /// Returns true if the board changed
    pub fn slide(&mut self, dir: Direction) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let (next, gained) = apply_move(&self.board, dir);
        if next == self.board {
            return false;
        }
        self.board = next;
        self.score += gained;
        self.spawn();

        if !has_moves(&self.board) {
            self.phase = GamePhase::GameOver;
            super::finish_run(self.score, &mut self.high_score, &mut self.events);
            log::info!("2048 over: score {}", self.score);
        }
        true
    }

    /// Moves are input-driven; nothing advances per tick
    pub fn update(&mut self) {}

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
