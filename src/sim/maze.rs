//! Maze
//!
//! Odd-sized wall grid carved by randomized depth-first backtracking.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::effects::GameEngine;
use super::grid::{Cell, Direction};
use super::input::{InputEvent, Key};
use super::{GameEvent, GamePhase};
use crate::platform::LoopSlot;
use crate::renderer::color::palette;
use crate::settings::Difficulty;

pub mod consts {
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    pub const STEP_SCORE: u64 = 1;
    pub const EXIT_SCORE: u64 = 100;
}

use consts::*;

pub fn maze_size(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 15,
        Difficulty::Medium => 21,
        Difficulty::Hard => 31,
    }
}

/// Square wall grid; `true` is wall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walls {
    size: usize,
    cells: Vec<Vec<bool>>,
}

impl Walls {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        let n = self.size as i32;
        cell.x >= 0
            && cell.y >= 0
            && cell.x < n
            && cell.y < n
            && !self.cells[cell.y as usize][cell.x as usize]
    }

    fn open(&mut self, cell: Cell) {
        self.cells[cell.y as usize][cell.x as usize] = false;
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }
}

/// Carve a perfect maze from (1,1) with an explicit stack
pub fn carve(size: usize, rng: &mut impl Rng) -> Walls {
    let mut walls = Walls {
        size,
        cells: vec![vec![true; size]; size],
    };
    let start = Cell::new(1, 1);
    walls.open(start);

    let inner = |c: Cell| c.x > 0 && c.y > 0 && c.x < size as i32 - 1 && c.y < size as i32 - 1;
    let mut stack = vec![start];
    while let Some(&current) = stack.last() {
        let candidates: Vec<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|&d| {
                let next = current + d.scaled(2);
                inner(next) && !walls.is_open(next)
            })
            .collect();
        match candidates.choose(&mut *rng) {
            Some(&d) => {
                walls.open(current + d);
                let next = current + d.scaled(2);
                walls.open(next);
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }
    walls
}

#[derive(Debug)]
pub struct Maze {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub walls: Walls,
    pub player: Cell,
    pub exit: Cell,
    pub engine: GameEngine,
    pub loop_slot: LoopSlot,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Maze {
    pub fn new(seed: u64, difficulty: Difficulty, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = GameEngine::new(rng.random());
        let size = maze_size(difficulty);
        let walls = carve(size, &mut rng);
        Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            walls,
            player: Cell::new(1, 1),
            exit: Cell::new(size as i32 - 2, size as i32 - 2),
            engine,
            loop_slot: LoopSlot::default(),
            rng,
            events: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.walls = carve(self.walls.size(), &mut self.rng);
        self.player = Cell::new(1, 1);
        log::info!("Maze started ({0}x{0})", self.walls.size());
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
        self.step(dir);
    }

    /// Move one cell if open; returns true if the player moved
    pub fn step(&mut self, dir: Direction) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let next = self.player + dir;
        if !self.walls.is_open(next) {
            return false;
        }
        self.player = next;
        self.score += STEP_SCORE;

        if next == self.exit {
            self.score += EXIT_SCORE;
            let cell = CANVAS_WIDTH / self.walls.size() as f32;
            self.engine.explosion(
                (next.x as f32 + 0.5) * cell,
                (next.y as f32 + 0.5) * cell,
                25,
                Some(palette::ARCADE_GREEN),
            );
            self.phase = GamePhase::GameOver;
            super::finish_run(self.score, &mut self.high_score, &mut self.events);
            log::info!("Maze solved: score {}", self.score);
        }
        true
    }

    pub fn update(&mut self) {}

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{HashSet, VecDeque};

    fn reachable(walls: &Walls, from: Cell) -> HashSet<Cell> {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(c) = queue.pop_front() {
            for d in Direction::ALL {
                let n = c + d;
                if walls.is_open(n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    /// Shortest path of moves from `from` to `to`
    fn path(walls: &Walls, from: Cell, to: Cell) -> Vec<Direction> {
        let mut prev = std::collections::HashMap::new();
        let mut queue = VecDeque::from([from]);
        prev.insert(from, (from, Direction::NONE));
        while let Some(c) = queue.pop_front() {
            if c == to {
                break;
            }
            for d in Direction::ALL {
                let n = c + d;
                if walls.is_open(n) && !prev.contains_key(&n) {
                    prev.insert(n, (c, d));
                    queue.push_back(n);
                }
            }
        }
        let mut moves = Vec::new();
        let mut at = to;
        while at != from {
            let (p, d) = prev[&at];
            moves.push(d);
            at = p;
        }
        moves.reverse();
        moves
    }

    #[test]
    fn test_border_stays_solid() {
        let walls = carve(21, &mut Pcg32::seed_from_u64(3));
        for i in 0..21 {
            assert!(!walls.is_open(Cell::new(i, 0)));
            assert!(!walls.is_open(Cell::new(0, i)));
            assert!(!walls.is_open(Cell::new(i, 20)));
            assert!(!walls.is_open(Cell::new(20, i)));
        }
    }

    #[test]
    fn test_every_odd_cell_is_carved() {
        let walls = carve(15, &mut Pcg32::seed_from_u64(9));
        for y in (1..14).step_by(2) {
            for x in (1..14).step_by(2) {
                assert!(walls.is_open(Cell::new(x, y)));
            }
        }
    }

    #[test]
    fn test_walls_block_movement() {
        let mut game = Maze::new(1, Difficulty::Easy, 0);
        game.start();
        // (0,1) is border wall
        assert!(!game.step(Direction::LEFT));
        assert_eq!(game.player, Cell::new(1, 1));
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_solving_scores_and_ends_run() {
        let mut game = Maze::new(4, Difficulty::Easy, 0);
        game.handle_input(&InputEvent::KeyDown(Key::Space));
        let moves = path(&game.walls, game.player, game.exit);
        assert!(!moves.is_empty());
        for d in &moves {
            assert!(game.step(*d));
        }
        assert_eq!(game.player, game.exit);
        assert_eq!(game.score, moves.len() as u64 + EXIT_SCORE);
        assert_eq!(game.phase, GamePhase::GameOver);
        // Further input is ignored until restart
        assert!(!game.step(Direction::LEFT));
    }

    proptest! {
        #[test]
        fn prop_carved_cells_connected(seed in any::<u64>(), d in 0usize..3) {
            let size = [15, 21, 31][d];
            let walls = carve(size, &mut Pcg32::seed_from_u64(seed));
            let from_start = reachable(&walls, Cell::new(1, 1));
            let open = (0..size as i32)
                .flat_map(|y| (0..size as i32).map(move |x| Cell::new(x, y)))
                .filter(|&c| walls.is_open(c))
                .count();
            prop_assert_eq!(from_start.len(), open);
            let exit = Cell::new(size as i32 - 2, size as i32 - 2);
            prop_assert!(from_start.contains(&exit));
        }
    }
}
