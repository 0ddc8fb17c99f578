//! Aggregate play statistics
//!
//! One JSON blob for the whole arcade, persisted under `gameStats` in the
//! camelCase shape the club site already stores.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::persistence::{self, Store};

/// Nominal minutes credited per game played
const MINUTES_PER_GAME: f64 = 3.5;

/// Persisted counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameStats {
    pub games_played: u64,
    pub total_score: u64,
    /// Best score per game type tag
    pub high_scores: BTreeMap<String, u64>,
}

/// Read-only view handed to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub games_played: u64,
    pub total_score: u64,
    pub high_scores: BTreeMap<String, u64>,
    pub average_score: u64,
    /// Minutes
    pub total_play_time: u64,
}

impl GameStats {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "gameStats";

    pub fn new() -> Self {
        Self::default()
    }

    /// Count a freshly loaded game
    pub fn record_play(&mut self) {
        self.games_played += 1;
    }

    /// Fold a finished run into the totals.
    /// Returns true if it set a new best for this game type.
    pub fn record_score(&mut self, game: &str, score: u64) -> bool {
        self.total_score += score;
        self.raise_high_score(game, score)
    }

    /// Store `score` as the best for `game` if it beats the current best.
    /// A game type gets an entry only once it has a positive best.
    pub fn raise_high_score(&mut self, game: &str, score: u64) -> bool {
        if score <= self.high_score(game) {
            return false;
        }
        self.high_scores.insert(game.to_string(), score);
        true
    }

    /// Best recorded score for a game type (0 if never played)
    pub fn high_score(&self, game: &str) -> u64 {
        self.high_scores.get(game).copied().unwrap_or(0)
    }

    pub fn summary(&self) -> StatsSummary {
        let average_score = self.total_score.checked_div(self.games_played).unwrap_or(0);
        StatsSummary {
            games_played: self.games_played,
            total_score: self.total_score,
            high_scores: self.high_scores.clone(),
            average_score,
            total_play_time: (self.games_played as f64 * MINUTES_PER_GAME).floor() as u64,
        }
    }

    /// Load stats, starting fresh if nothing readable is stored
    pub fn load(store: &dyn Store) -> Self {
        match persistence::load_json::<GameStats>(store, Self::STORAGE_KEY) {
            Some(stats) => {
                log::info!("Loaded stats ({} games played)", stats.games_played);
                stats
            }
            None => {
                log::info!("No stats found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn Store) -> Result<()> {
        persistence::save_json(store, Self::STORAGE_KEY, self)
    }
}
