//! Orchestrates the single game slot and the aggregate statistics
//!
//! Only one game runs at a time. Loading a game always closes the previous
//! one first; closing cancels its loop handle before detaching it and folds
//! its score into the persisted stats.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::arcade::{Game, GameInstance, GameKind};
use crate::persistence::Store;
use crate::platform::LoopHandle;
use crate::renderer::draw::DrawList;
use crate::settings::{Difficulty, Settings};
use crate::sim::snake::consts::HIGH_SCORE_KEY as SNAKE_HIGH_SCORE_KEY;
use crate::sim::{GameEvent, InputEvent, Key};
use crate::stats::{GameStats, StatsSummary};

struct ActiveGame {
    game: GameInstance,
    handle: LoopHandle,
}

pub struct GameManager {
    store: Box<dyn Store>,
    stats: GameStats,
    settings: Settings,
    current: Option<ActiveGame>,
    rng: Pcg32,
}

impl GameManager {
    /// Load stats and settings from `store`; `seed` drives every game built
    /// by this manager.
    pub fn new(store: Box<dyn Store>, seed: u64) -> Self {
        let stats = GameStats::load(store.as_ref());
        let settings = Settings::load(store.as_ref());
        Self {
            store,
            stats,
            settings,
            current: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Close the running game (if any) and start `tag` in its place.
    /// Unknown tags are logged and leave the current game untouched.
    pub fn load_game(&mut self, tag: &str) -> Option<LoopHandle> {
        let Some(kind) = GameKind::from_str(tag) else {
            log::error!("Unknown game type: {tag:?}");
            return None;
        };

        self.close_game();

        let high_score = self.stored_high_score(kind);
        let mut game = GameInstance::new(kind, self.rng.random(), self.settings.difficulty, high_score);
        game.engine_mut().set_max_particles(self.settings.max_particles());
        let handle = game.attach();

        self.stats.record_play();
        self.save_stats();
        log::info!(
            "Loaded {} (game #{}, best {high_score})",
            kind.title(),
            self.stats.games_played
        );

        self.current = Some(ActiveGame {
            game,
            handle: handle.clone(),
        });
        Some(handle)
    }

    /// Stop the running game and record its score. No-op when idle.
    pub fn close_game(&mut self) {
        let Some(mut active) = self.current.take() else {
            return;
        };
        active.handle.cancel();
        active.game.detach();

        let kind = active.game.kind();
        let score = active.game.current_score();
        if self.stats.record_score(kind.as_str(), score) {
            log::info!("New best for {}: {score}", kind.title());
        }
        self.save_stats();
        log::info!("Closed {} with score {score}", kind.title());
    }

    pub fn get_game_stats(&self) -> StatsSummary {
        self.stats.summary()
    }

    /// Escape closes the running game; everything else goes to it
    pub fn handle_input(&mut self, event: &InputEvent) {
        if *event == InputEvent::KeyDown(Key::Escape) {
            self.close_game();
            return;
        }
        if let Some(active) = self.current.as_mut() {
            active.game.handle_input(event);
        }
    }

    /// Advance the running game one fixed step and act on what it reports
    pub fn tick(&mut self) {
        let Some(active) = self.current.as_mut() else {
            return;
        };
        if active.handle.is_cancelled() {
            return;
        }
        active.game.update();
        let kind = active.game.kind();
        let events = active.game.drain_events();

        for event in events {
            match event {
                GameEvent::HighScore(score) => self.persist_high_score(kind, score),
                GameEvent::GameOver { score } => {
                    log::info!("{} over with score {score}", kind.title());
                }
                GameEvent::LevelUp(level) => {
                    log::info!("{} reached level {level}", kind.title());
                }
            }
        }
    }

    /// Paint the running game into `list`, resized to its canvas
    pub fn render(&mut self, list: &mut DrawList) {
        let allow_shake = self.settings.effective_screen_shake();
        let Some(active) = self.current.as_mut() else {
            return;
        };
        let size = active.game.canvas_size();
        list.reset(size.x, size.y);
        list.set_allow_shake(allow_shake);
        active.game.render(list);
    }

    pub fn current(&self) -> Option<&GameInstance> {
        self.current.as_ref().map(|a| &a.game)
    }

    pub fn current_mut(&mut self) -> Option<&mut GameInstance> {
        self.current.as_mut().map(|a| &mut a.game)
    }

    pub fn current_kind(&self) -> Option<GameKind> {
        self.current().map(|g| g.kind())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings and persist them. The particle cap applies to
    /// the running game immediately; difficulty applies on the next load.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(e) = self.settings.save(self.store.as_mut()) {
            log::warn!("Failed to save settings: {e:#}");
        }
        let cap = self.settings.max_particles();
        if let Some(active) = self.current.as_mut() {
            active.game.engine_mut().set_max_particles(cap);
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        log::info!("Difficulty set to {}", difficulty.as_str());
        let settings = Settings {
            difficulty,
            ..self.settings.clone()
        };
        self.set_settings(settings);
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Best score a new game of `kind` starts with
    fn stored_high_score(&self, kind: GameKind) -> u64 {
        let tracked = self.stats.high_score(kind.as_str());
        if kind != GameKind::Snake {
            return tracked;
        }
        match self.store.get(SNAKE_HIGH_SCORE_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unreadable {SNAKE_HIGH_SCORE_KEY}: {raw:?}");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read {SNAKE_HIGH_SCORE_KEY}: {e:#}");
                0
            }
        }
    }

    fn persist_high_score(&mut self, kind: GameKind, score: u64) {
        log::info!("New {} high score: {score}", kind.title());
        if kind == GameKind::Snake {
            if let Err(e) = self.store.set(SNAKE_HIGH_SCORE_KEY, &score.to_string()) {
                log::warn!("Failed to save {SNAKE_HIGH_SCORE_KEY}: {e:#}");
            }
        }
        if self.stats.raise_high_score(kind.as_str(), score) {
            self.save_stats();
        }
    }

    fn save_stats(&mut self) {
        if let Err(e) = self.stats.save(self.store.as_mut()) {
            log::warn!("Failed to save stats: {e:#}");
        }
    }
}

/// The arcade as the page sees it: live, or disabled because the drawing
/// surface could not be acquired. Every operation on a disabled arcade is a
/// no-op.
pub enum Arcade {
    Live(GameManager),
    Disabled { reason: String },
}

impl Arcade {
    pub fn disabled(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::error!("Arcade disabled: {reason}");
        Arcade::Disabled { reason }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Arcade::Live(_))
    }

    pub fn manager(&mut self) -> Option<&mut GameManager> {
        match self {
            Arcade::Live(manager) => Some(manager),
            Arcade::Disabled { .. } => None,
        }
    }

    pub fn load_game(&mut self, tag: &str) -> Option<LoopHandle> {
        match self {
            Arcade::Live(manager) => manager.load_game(tag),
            Arcade::Disabled { reason } => {
                log::warn!("Cannot load {tag:?}: {reason}");
                None
            }
        }
    }

    pub fn close_game(&mut self) {
        if let Arcade::Live(manager) = self {
            manager.close_game();
        }
    }

    pub fn get_game_stats(&self) -> StatsSummary {
        match self {
            Arcade::Live(manager) => manager.get_game_stats(),
            Arcade::Disabled { .. } => GameStats::default().summary(),
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        if let Arcade::Live(manager) = self {
            manager.handle_input(event);
        }
    }

    pub fn tick(&mut self) {
        if let Arcade::Live(manager) = self {
            manager.tick();
        }
    }

    pub fn render(&mut self, list: &mut DrawList) {
        if let Arcade::Live(manager) = self {
            manager.render(list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Cell, Direction, GamePhase};
    use glam::Vec2;

    fn manager_with(store: MemoryStore) -> GameManager {
        GameManager::new(Box::new(store), 2024)
    }

    fn snake(manager: &mut GameManager) -> &mut crate::sim::snake::Snake {
        match manager.current_mut() {
            Some(GameInstance::Snake(snake)) => snake,
            other => panic!("expected snake, got {other:?}"),
        }
    }

    fn run_until_over(manager: &mut GameManager) {
        for _ in 0..20_000 {
            manager.tick();
            if manager.current().map(|g| g.game_state()) == Some(GamePhase::GameOver) {
                return;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn test_unknown_type_keeps_current_game() {
        let mut manager = manager_with(MemoryStore::new());
        manager.load_game("maze").unwrap();
        assert!(manager.load_game("pinball").is_none());
        assert_eq!(manager.current_kind(), Some(GameKind::Maze));
        assert_eq!(manager.get_game_stats().games_played, 1);
    }

    #[test]
    fn test_loading_replaces_and_cancels_previous() {
        let mut manager = manager_with(MemoryStore::new());
        let first = manager.load_game("2048").unwrap();
        let second = manager.load_game("racing").unwrap();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(manager.current_kind(), Some(GameKind::Racing));

        let stats = manager.get_game_stats();
        assert_eq!(stats.games_played, 2);
        // Closed without scoring: no entry, as if never played
        assert_eq!(stats.high_scores.get("2048"), None);
        assert!(stats.high_scores.is_empty());
    }

    #[test]
    fn test_close_records_score_and_persists() {
        let mut manager = manager_with(MemoryStore::new());
        let handle = manager.load_game("whac").unwrap();
        match manager.current_mut() {
            Some(GameInstance::Whac(game)) => game.score = 35,
            other => panic!("expected whac, got {other:?}"),
        }
        manager.close_game();
        assert!(handle.is_cancelled());
        assert!(manager.current().is_none());

        let stats = manager.get_game_stats();
        assert_eq!(stats.total_score, 35);
        assert_eq!(stats.high_scores["whac"], 35);
        assert_eq!(stats.average_score, 35);
        assert_eq!(stats.total_play_time, 3);

        let saved = GameStats::load(manager.store());
        assert_eq!(saved.total_score, 35);

        // Idle close changes nothing
        manager.close_game();
        assert_eq!(manager.get_game_stats().total_score, 35);
    }

    #[test]
    fn test_stats_survive_a_new_manager() {
        let mut store = MemoryStore::new();
        let mut stats = GameStats::new();
        stats.record_play();
        stats.record_score("brick", 700);
        stats.save(&mut store).unwrap();

        let mut manager = manager_with(store);
        manager.load_game("brick").unwrap();
        assert_eq!(manager.current().unwrap().high_score(), 700);
        assert_eq!(manager.get_game_stats().games_played, 2);
    }

    #[test]
    fn test_escape_closes_current_game() {
        let mut manager = manager_with(MemoryStore::new());
        let handle = manager.load_game("memory").unwrap();
        manager.handle_input(&InputEvent::KeyDown(Key::Escape));
        assert!(handle.is_cancelled());
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_difficulty_applies_to_next_load_and_persists() {
        let mut manager = manager_with(MemoryStore::new());
        manager.set_difficulty(Difficulty::Hard);
        manager.load_game("memory").unwrap();
        match manager.current() {
            Some(GameInstance::Memory(game)) => assert_eq!(game.cards.len(), 36),
            other => panic!("expected memory, got {other:?}"),
        }
        assert_eq!(Settings::load(manager.store()).difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_particle_cap_follows_settings() {
        let mut manager = manager_with(MemoryStore::new());
        manager.load_game("snake").unwrap();
        manager.set_settings(Settings {
            particles: false,
            ..Settings::default()
        });
        let engine = manager.current_mut().unwrap().engine_mut();
        engine.explosion(0.0, 0.0, 20, None);
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn test_render_sizes_list_to_game() {
        let mut manager = manager_with(MemoryStore::new());
        let mut list = DrawList::new(1.0, 1.0);
        manager.render(&mut list);
        assert!(list.is_empty());

        manager.load_game("whac").unwrap();
        manager.render(&mut list);
        assert_eq!(list.size(), Vec2::new(480.0, 360.0));
        assert!(!list.is_empty());
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let boards: Vec<_> = (0..2)
            .map(|_| {
                let mut manager = manager_with(MemoryStore::new());
                manager.load_game("2048").unwrap();
                manager.handle_input(&InputEvent::Click(Vec2::ZERO));
                match manager.current() {
                    Some(GameInstance::Game2048(game)) => game.board,
                    other => panic!("expected 2048, got {other:?}"),
                }
            })
            .collect();
        assert_eq!(boards[0], boards[1]);
    }

    #[test]
    fn test_snake_session_persists_beaten_high_score() {
        let mut store = MemoryStore::new();
        store.set(SNAKE_HIGH_SCORE_KEY, "5").unwrap();
        let mut manager = manager_with(store);

        manager.load_game("snake").unwrap();
        assert_eq!(manager.current().unwrap().high_score(), 5);
        manager.handle_input(&InputEvent::Click(Vec2::new(400.0, 300.0)));
        assert_eq!(snake(&mut manager).heading, Direction::RIGHT);

        manager.handle_input(&InputEvent::KeyDown(Key::Down));
        assert_eq!(snake(&mut manager).heading, Direction::DOWN);
        manager.handle_input(&InputEvent::KeyDown(Key::Down));
        assert_eq!(snake(&mut manager).heading, Direction::DOWN);

        // Food right under the head, then straight down through the floor
        snake(&mut manager).food = Cell::new(15, 16);
        run_until_over(&mut manager);

        let score = manager.current().unwrap().current_score();
        assert!(score >= 10);
        assert_eq!(
            manager.store().get(SNAKE_HIGH_SCORE_KEY).unwrap(),
            Some(score.to_string())
        );

        manager.close_game();
        let stats = manager.get_game_stats();
        assert_eq!(stats.high_scores["snake"], score);
        assert_eq!(stats.total_score, score);
    }

    #[test]
    fn test_snake_session_keeps_unbeaten_high_score() {
        let mut store = MemoryStore::new();
        store.set(SNAKE_HIGH_SCORE_KEY, "1000").unwrap();
        let mut manager = manager_with(store);

        manager.load_game("snake").unwrap();
        manager.handle_input(&InputEvent::KeyDown(Key::Space));
        manager.handle_input(&InputEvent::KeyDown(Key::Up));
        run_until_over(&mut manager);

        assert!(manager.current().unwrap().current_score() < 1000);
        assert_eq!(
            manager.store().get(SNAKE_HIGH_SCORE_KEY).unwrap().as_deref(),
            Some("1000")
        );
    }

    #[test]
    fn test_disabled_arcade_is_inert() {
        let mut arcade = Arcade::disabled("no adapter");
        assert!(!arcade.is_live());
        assert!(arcade.load_game("snake").is_none());
        arcade.handle_input(&InputEvent::Click(Vec2::ZERO));
        arcade.tick();
        arcade.close_game();
        assert_eq!(arcade.get_game_stats().games_played, 0);
        assert!(arcade.manager().is_none());
    }
}
