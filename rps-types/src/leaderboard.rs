use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Read-only leaderboard row. The store returns rows already ordered by
/// `score`; `rank` is filled in client-side from that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub name: String,
    pub icon: String,
    pub win_percentage: f64,
    pub games_played: u32,
    pub score: f64, // Wilson score lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub rank: Option<u32>,
}

/// Annotate already-ordered rows with their 1-based position.
pub fn assign_ranks(entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| LeaderboardEntry {
            rank: Some(index as u32 + 1),
            ..entry
        })
        .collect()
}
