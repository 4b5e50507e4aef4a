use rps_types::{Choice, Outcome, PlayerId, Side};
use serde::Serialize;

use crate::stats::ScoreBoard;

/// Display data for one side's revealed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealedChoice {
    pub side: Side,
    pub choice: Choice,
    pub symbol: String,
    pub name: String,
}

/// Presentation instruction emitted while a round animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cue", rename_all = "camelCase")]
pub enum AnimationCue {
    /// Clear leftover effects and restore the arena scale.
    ResetArena,
    ZoomArena,
    /// Bring the winner forward and move both cards toward each other.
    AdvanceMoves { winner: Side },
    /// Make the loser vanish and restore the arena scale.
    VanishLoser { loser: Side },
    Shake,
    StopShake,
}

/// A cue paired with how long to wait after the previous cue before applying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedCue {
    pub cue: AnimationCue,
    pub delay_ms: u64,
}

/// One step of the countdown shown before the reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownTick {
    pub text: String,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RoundEvent {
    RoundStarted {
        player_id: Option<PlayerId>,
        round: u32,
    },
    CountdownTick {
        text: String,
    },
    ChoicesRevealed {
        player: RevealedChoice,
        computer: RevealedChoice,
    },
    Cue {
        cue: AnimationCue,
    },
    RoundScored {
        outcome: Outcome,
        scoreboard: ScoreBoard,
    },
    StatsReset {
        player_id: PlayerId,
        scoreboard: ScoreBoard,
    },
}

/// Event handler trait for presentation layers
pub trait RoundEventHandler: Send {
    fn handle_event(&mut self, event: RoundEvent);
}

/// Simple event bus for distributing round events
pub struct RoundEventBus {
    handlers: Vec<Box<dyn RoundEventHandler>>,
}

impl RoundEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn RoundEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: RoundEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for RoundEventBus {
    fn default() -> Self {
        Self::new()
    }
}
