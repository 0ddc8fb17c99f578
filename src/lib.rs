//! Club Arcade - the members' mini-game arcade
//!
//! Core modules:
//! - `sim`: Game rules for the seven mini-games and the shared particle/light layer
//! - `arcade`: The `Game` trait and the tagged `GameInstance` dispatch
//! - `manager`: Loads/closes games and keeps aggregate play statistics
//! - `renderer`: Draw lists, tessellation and the WebGPU backend
//! - `platform`: Input mapping, frame clock and loop cancellation
//! - `persistence`: Key/value stores (memory, LocalStorage, files)

pub mod arcade;
pub mod manager;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;

pub use arcade::{Game, GameInstance, GameKind};
pub use manager::{Arcade, GameManager};
pub use settings::{Difficulty, QualityPreset, Settings};
pub use stats::{GameStats, StatsSummary};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. Every per-tick constant in the games was
    /// tuned against a 60 Hz animation frame.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds per simulation tick
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Effect-layer clock advance per rendered frame (seconds)
    pub const ENGINE_TIME_STEP: f32 = 0.016;
}

/// Whole simulation ticks for a millisecond duration, rounded, at least one
pub const fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms * 60 + 500) / 1000;
    if ticks == 0 { 1 } else { ticks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(700), 42);
        assert_eq!(ms_to_ticks(1200), 72);
        assert_eq!(ms_to_ticks(5000), 300);
        assert_eq!(ms_to_ticks(0), 1);
    }
}
