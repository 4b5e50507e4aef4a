use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Domain failures reported by the player store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },
    #[error("Player name must not be blank")]
    InvalidPlayerName,
    #[error("Player name already taken: {name}")]
    PlayerNameTaken { name: String },
    #[error("Store failure: {message}")]
    StoreFailure { message: String },
}

/// JSON body of every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&GameError> for ErrorResponse {
    fn from(error: &GameError) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
