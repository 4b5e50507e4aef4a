use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::Choice;

pub type PlayerId = Uuid;

/// Cumulative record of every round a player has played against the computer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PlayerStats {
    pub player_score: u32,
    pub computer_score: u32,
    pub player_wins: u32,
    pub computer_wins: u32,
    pub player_history: Vec<Choice>,
    pub computer_history: Vec<Choice>,
    pub total_rounds: u32,
}

impl PlayerStats {
    /// Ties consume a round without touching either win counter.
    pub fn ties(&self) -> u32 {
        self.total_rounds
            .saturating_sub(self.player_wins + self.computer_wins)
    }

    /// Checks the counter/history invariants a well-formed record must hold.
    pub fn is_consistent(&self) -> bool {
        let rounds = self.total_rounds as usize;
        self.player_wins + self.computer_wins <= self.total_rounds
            && self.player_history.len() == rounds
            && self.computer_history.len() == rounds
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: Option<PlayerId>, // None until the store has persisted it
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            icon: icon.into(),
            stats: PlayerStats::default(),
        }
    }
}

/// Registration payload for a new player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPlayer {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}
