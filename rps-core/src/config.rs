use anyhow::{Context, Result};
use rps_types::GameMode;
use std::env;
use std::time::Duration;

/// Presentation timing for one round. All values are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTiming {
    pub countdown_from: u32,
    pub countdown_tick_ms: u64,
    pub go_text: String,
    pub go_hold_ms: u64,
    pub cue_initial_ms: u64,   // before the arena is reset
    pub cue_show_moves_ms: u64, // until the winner is brought forward
    pub cue_vanish_ms: u64,    // from the start of the move until the loser vanishes
    pub shake_ms: u64,
}

impl Default for RoundTiming {
    fn default() -> Self {
        Self {
            countdown_from: 3,
            countdown_tick_ms: 500,
            go_text: "FIGHT!".to_string(),
            go_hold_ms: 300,
            cue_initial_ms: 50,
            cue_show_moves_ms: 500,
            cue_vanish_ms: 2000,
            shake_ms: 500,
        }
    }
}

impl RoundTiming {
    /// No waiting at all; handy for headless drivers.
    pub fn instant() -> Self {
        Self {
            countdown_tick_ms: 0,
            go_hold_ms: 0,
            cue_initial_ms: 0,
            cue_show_moves_ms: 0,
            cue_vanish_ms: 0,
            shake_ms: 0,
            ..Self::default()
        }
    }

    /// Wall-clock length of the countdown sequence.
    pub fn countdown_duration(&self) -> Duration {
        Duration::from_millis(
            self.countdown_tick_ms * u64::from(self.countdown_from) + self.go_hold_ms,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    pub mode: GameMode,
    pub timing: RoundTiming,
}

impl CoreConfig {
    /// Read `RPS_GAME_MODE` and `RPS_COUNTDOWN_TICK_MS`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mode = match env::var("RPS_GAME_MODE") {
            Ok(value) => value.parse().context("Invalid RPS_GAME_MODE")?,
            Err(_) => GameMode::default(),
        };

        let mut timing = RoundTiming::default();
        if let Ok(value) = env::var("RPS_COUNTDOWN_TICK_MS") {
            timing.countdown_tick_ms = value
                .parse()
                .context("Invalid RPS_COUNTDOWN_TICK_MS")?;
        }

        Ok(Self { mode, timing })
    }
}
