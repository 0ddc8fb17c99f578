//! The game interface and the tagged dispatch over the seven games

use glam::Vec2;

use crate::platform::LoopHandle;
use crate::renderer::draw::DrawList;
use crate::renderer::scenes;
use crate::settings::Difficulty;
use crate::sim::breakout::Breakout;
use crate::sim::game2048::Game2048;
use crate::sim::maze::Maze;
use crate::sim::memory::Memory;
use crate::sim::racing::Racing;
use crate::sim::snake::Snake;
use crate::sim::whack::Whack;
use crate::sim::{GameEngine, GameEvent, GamePhase, InputEvent};

/// Game type tags as used by the page and the stats table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameKind {
    Racing,
    Brick,
    Snake,
    Memory,
    Game2048,
    Maze,
    Whac,
}

impl GameKind {
    pub const ALL: [GameKind; 7] = [
        GameKind::Racing,
        GameKind::Brick,
        GameKind::Snake,
        GameKind::Memory,
        GameKind::Game2048,
        GameKind::Maze,
        GameKind::Whac,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Racing => "racing",
            GameKind::Brick => "brick",
            GameKind::Snake => "snake",
            GameKind::Memory => "memory",
            GameKind::Game2048 => "2048",
            GameKind::Maze => "maze",
            GameKind::Whac => "whac",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Racing => "Racing",
            GameKind::Brick => "Breakout",
            GameKind::Snake => "Snake",
            GameKind::Memory => "Memory",
            GameKind::Game2048 => "2048",
            GameKind::Maze => "Maze",
            GameKind::Whac => "Whack-a-Mole",
        }
    }
}

/// What the arcade needs from a game
pub trait Game {
    fn kind(&self) -> GameKind;

    /// Logical canvas size in pixels
    fn canvas_size(&self) -> Vec2;

    /// Take the single surface; the returned handle stays live until
    /// `detach` or the next `attach`.
    fn attach(&mut self) -> LoopHandle;

    /// Cancel the loop handle and drop transient effects
    fn detach(&mut self);

    fn is_attached(&self) -> bool;

    fn handle_input(&mut self, event: &InputEvent);

    /// One fixed simulation step
    fn update(&mut self);

    /// Paint the scene followed by the effect overlay
    fn render(&mut self, list: &mut DrawList);

    fn current_score(&self) -> u64;

    fn high_score(&self) -> u64;

    fn game_state(&self) -> GamePhase;

    fn drain_events(&mut self) -> Vec<GameEvent>;

    fn engine_mut(&mut self) -> &mut GameEngine;
}

macro_rules! impl_game {
    ($ty:ty, $kind:expr, $module:ident) => {
        impl Game for $ty {
            fn kind(&self) -> GameKind {
                $kind
            }

            fn canvas_size(&self) -> Vec2 {
                use crate::sim::$module::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
                Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)
            }

            fn attach(&mut self) -> LoopHandle {
                self.loop_slot.attach()
            }

            fn detach(&mut self) {
                self.loop_slot.detach();
                self.engine.clear();
            }

            fn is_attached(&self) -> bool {
                self.loop_slot.is_attached()
            }

            fn handle_input(&mut self, event: &InputEvent) {
                <$ty>::handle_input(self, event)
            }

            fn update(&mut self) {
                <$ty>::update(self)
            }

            fn render(&mut self, list: &mut DrawList) {
                scenes::$module::paint(self, list);
                list.set_offset(Vec2::ZERO);
                self.engine.render(list);
            }

            fn current_score(&self) -> u64 {
                self.score
            }

            fn high_score(&self) -> u64 {
                self.high_score
            }

            fn game_state(&self) -> GamePhase {
                self.phase
            }

            fn drain_events(&mut self) -> Vec<GameEvent> {
                self.take_events()
            }

            fn engine_mut(&mut self) -> &mut GameEngine {
                &mut self.engine
            }
        }
    };
}

impl_game!(Racing, GameKind::Racing, racing);
impl_game!(Breakout, GameKind::Brick, breakout);
impl_game!(Snake, GameKind::Snake, snake);
impl_game!(Memory, GameKind::Memory, memory);
impl_game!(Game2048, GameKind::Game2048, game2048);
impl_game!(Maze, GameKind::Maze, maze);
impl_game!(Whack, GameKind::Whac, whack);

/// One of the seven games
#[allow(clippy::large_enum_variant)]
#[derive(Debug)]
pub enum GameInstance {
    Racing(Racing),
    Brick(Breakout),
    Snake(Snake),
    Memory(Memory),
    Game2048(Game2048),
    Maze(Maze),
    Whac(Whack),
}

macro_rules! dispatch {
    ($self:expr, $game:ident => $body:expr) => {
        match $self {
            GameInstance::Racing($game) => $body,
            GameInstance::Brick($game) => $body,
            GameInstance::Snake($game) => $body,
            GameInstance::Memory($game) => $body,
            GameInstance::Game2048($game) => $body,
            GameInstance::Maze($game) => $body,
            GameInstance::Whac($game) => $body,
        }
    };
}

impl GameInstance {
    pub fn new(kind: GameKind, seed: u64, difficulty: Difficulty, high_score: u64) -> Self {
        match kind {
            GameKind::Racing => GameInstance::Racing(Racing::new(seed, high_score)),
            GameKind::Brick => GameInstance::Brick(Breakout::new(seed, high_score)),
            GameKind::Snake => GameInstance::Snake(Snake::new(seed, high_score)),
            GameKind::Memory => GameInstance::Memory(Memory::new(seed, difficulty, high_score)),
            GameKind::Game2048 => GameInstance::Game2048(Game2048::new(seed, high_score)),
            GameKind::Maze => GameInstance::Maze(Maze::new(seed, difficulty, high_score)),
            GameKind::Whac => GameInstance::Whac(Whack::new(seed, difficulty, high_score)),
        }
    }
}

impl Game for GameInstance {
    fn kind(&self) -> GameKind {
        dispatch!(self, g => g.kind())
    }

    fn canvas_size(&self) -> Vec2 {
        dispatch!(self, g => g.canvas_size())
    }

    fn attach(&mut self) -> LoopHandle {
        dispatch!(self, g => Game::attach(g))
    }

    fn detach(&mut self) {
        dispatch!(self, g => Game::detach(g))
    }

    fn is_attached(&self) -> bool {
        dispatch!(self, g => Game::is_attached(g))
    }

    fn handle_input(&mut self, event: &InputEvent) {
        dispatch!(self, g => Game::handle_input(g, event))
    }

    fn update(&mut self) {
        dispatch!(self, g => Game::update(g))
    }

    fn render(&mut self, list: &mut DrawList) {
        dispatch!(self, g => Game::render(g, list))
    }

    fn current_score(&self) -> u64 {
        dispatch!(self, g => g.current_score())
    }

    fn high_score(&self) -> u64 {
        dispatch!(self, g => Game::high_score(g))
    }

    fn game_state(&self) -> GamePhase {
        dispatch!(self, g => g.game_state())
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        dispatch!(self, g => g.drain_events())
    }

    fn engine_mut(&mut self) -> &mut GameEngine {
        dispatch!(self, g => g.engine_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(GameKind::from_str("pinball"), None);
        assert_eq!(GameKind::from_str("Snake"), None);
    }

    #[test]
    fn test_every_game_starts_in_menu_and_attaches() {
        for kind in GameKind::ALL {
            let mut game = GameInstance::new(kind, 1, Difficulty::Medium, 0);
            assert_eq!(game.kind(), kind);
            assert_eq!(game.game_state(), GamePhase::Menu);
            assert_eq!(game.current_score(), 0);

            let handle = game.attach();
            assert!(game.is_attached());
            assert!(!handle.is_cancelled());
            game.detach();
            assert!(handle.is_cancelled());
            assert!(!game.is_attached());
        }
    }

    #[test]
    fn test_start_gesture_begins_every_game() {
        for kind in GameKind::ALL {
            let mut game = GameInstance::new(kind, 2, Difficulty::Easy, 0);
            game.handle_input(&InputEvent::KeyDown(crate::sim::Key::Enter));
            assert_eq!(game.game_state(), GamePhase::Playing, "{}", kind.as_str());
        }
    }

    #[test]
    fn test_render_fills_list_for_every_game() {
        for kind in GameKind::ALL {
            let mut game = GameInstance::new(kind, 3, Difficulty::Hard, 0);
            let size = game.canvas_size();
            let mut list = DrawList::new(size.x, size.y);
            game.render(&mut list);
            // Scene plus the overlay backdrop
            assert!(!list.foreground().is_empty());
            assert_eq!(list.background().len(), 1);
        }
    }

    #[test]
    fn test_detach_clears_effects() {
        let mut game = GameInstance::new(GameKind::Snake, 4, Difficulty::Medium, 0);
        game.engine_mut().explosion(10.0, 10.0, 8, None);
        game.attach();
        game.detach();
        let mut list = DrawList::new(10.0, 10.0);
        game.engine_mut().render(&mut list);
        assert!(list.foreground().is_empty());
    }
}
