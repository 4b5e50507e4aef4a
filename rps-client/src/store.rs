use async_trait::async_trait;
use rps_types::{LeaderboardEntry, NewPlayer, Player, PlayerId, PlayerStats};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("player {0} not found")]
    NotFound(PlayerId),
    #[error("store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Transport failures are worth retrying; everything else is an answer.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transport(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Malformed(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

/// Remote record of players and their cumulative stats.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn fetch_all_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Stats come back zeroed when the record has none.
    async fn fetch_player(&self, id: PlayerId) -> Result<Player, StoreError>;

    async fn create_player(&self, new_player: &NewPlayer) -> Result<Player, StoreError>;

    async fn update_player_stats(
        &self,
        id: PlayerId,
        stats: &PlayerStats,
    ) -> Result<Player, StoreError>;

    async fn reset_player_stats(&self, id: PlayerId) -> Result<(), StoreError>;
}

/// Server-ranked view of every player.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Entries arrive already ordered by score; callers must keep that order.
    async fn fetch_ranked_player_stats(&self) -> Result<Vec<LeaderboardEntry>, StoreError>;
}
