use async_trait::async_trait;
use reqwest::StatusCode;
use rps_types::{ErrorResponse, LeaderboardEntry, NewPlayer, Player, PlayerId, PlayerStats};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::store::{LeaderboardStore, PlayerStore, StoreError};

/// REST client for the player API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    /// `base_url` points at the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.as_str())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn players_url(&self) -> String {
        format!("{}/players", self.base_url)
    }

    fn player_url(&self, id: PlayerId) -> String {
        format!("{}/players/{}", self.base_url, id)
    }

    async fn check(
        response: reqwest::Response,
        player_id: Option<PlayerId>,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = player_id {
                return Err(StoreError::NotFound(id));
            }
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        player_id: Option<PlayerId>,
    ) -> Result<T, StoreError> {
        let response = Self::check(response, player_id).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl PlayerStore for HttpStore {
    #[instrument(skip(self))]
    async fn fetch_all_players(&self) -> Result<Vec<Player>, StoreError> {
        let response = self.client.get(self.players_url()).send().await?;
        let players: Vec<Player> = Self::read_json(response, None).await?;
        debug!(count = players.len(), "Fetched players");
        Ok(players)
    }

    #[instrument(skip(self))]
    async fn fetch_player(&self, id: PlayerId) -> Result<Player, StoreError> {
        let response = self.client.get(self.player_url(id)).send().await?;
        Self::read_json(response, Some(id)).await
    }

    #[instrument(skip(self), fields(name = %new_player.name))]
    async fn create_player(&self, new_player: &NewPlayer) -> Result<Player, StoreError> {
        let response = self
            .client
            .post(self.players_url())
            .json(new_player)
            .send()
            .await?;
        Self::read_json(response, None).await
    }

    #[instrument(skip(self, stats))]
    async fn update_player_stats(
        &self,
        id: PlayerId,
        stats: &PlayerStats,
    ) -> Result<Player, StoreError> {
        let response = self
            .client
            .put(format!("{}/stats", self.player_url(id)))
            .json(stats)
            .send()
            .await?;
        Self::read_json(response, Some(id)).await
    }

    #[instrument(skip(self))]
    async fn reset_player_stats(&self, id: PlayerId) -> Result<(), StoreError> {
        let response = self
            .client
            .put(format!("{}/reset-stats", self.player_url(id)))
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }
}

#[async_trait]
impl LeaderboardStore for HttpStore {
    #[instrument(skip(self))]
    async fn fetch_ranked_player_stats(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let response = self
            .client
            .get(format!("{}/leaderboard-stats", self.players_url()))
            .send()
            .await?;
        Self::read_json(response, None).await
    }
}
