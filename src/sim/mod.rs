//! Game rules
//!
//! Everything here runs on a fixed 60 Hz tick with seeded RNG only. Drawing
//! lives in `renderer::scenes`; the loop host lives in `platform`.

pub mod breakout;
pub mod collision;
pub mod effects;
pub mod game2048;
pub mod grid;
pub mod input;
pub mod maze;
pub mod memory;
pub mod racing;
pub mod snake;
pub mod timer;
pub mod whack;

pub use effects::{GameEngine, Light, Particle, ParticleOptions};
pub use grid::{Cell, Direction, GridSize};
pub use input::{InputEvent, Key, KeyState};
pub use timer::TickTimer;

use serde::{Deserialize, Serialize};

/// Lifecycle shared by every game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start gesture
    #[default]
    Menu,
    Playing,
    /// Snake only (Space toggles)
    Paused,
    /// Run ended; a start gesture restarts
    GameOver,
}

impl GamePhase {
    /// Phases in which a start gesture begins a new run
    pub fn accepts_start(&self) -> bool {
        matches!(self, GamePhase::Menu | GamePhase::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameOver",
        }
    }
}

/// Events emitted by a game for the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new personal best that should be persisted
    HighScore(u64),
    GameOver { score: u64 },
    LevelUp(u32),
}

/// Close out a run: raise the personal best if beaten and queue the events
pub(crate) fn finish_run(score: u64, high_score: &mut u64, events: &mut Vec<GameEvent>) {
    if score > *high_score {
        *high_score = score;
        events.push(GameEvent::HighScore(score));
    }
    events.push(GameEvent::GameOver { score });
}
