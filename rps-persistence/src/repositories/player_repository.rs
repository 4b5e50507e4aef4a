use anyhow::Result;
use rps_types::{Choice, LeaderboardEntry, NewPlayer, Player, PlayerStats};
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::cmp::Ordering;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::entities::{players, prelude::*};

/// z-score for a 95% confidence interval.
pub const WILSON_Z: f64 = 1.96;

const HISTORY_DELIMITER: &str = ",";

pub struct PlayerRepository {
    db: DatabaseConnection,
}

impl PlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_player(model: players::Model) -> Player {
        Player {
            id: Some(model.id),
            name: model.name,
            icon: model.icon,
            stats: PlayerStats {
                player_score: to_count(model.player_score),
                computer_score: to_count(model.computer_score),
                player_wins: to_count(model.player_wins),
                computer_wins: to_count(model.computer_wins),
                player_history: decode_history(&model.player_history),
                computer_history: decode_history(&model.computer_history),
                total_rounds: to_count(model.total_rounds),
            },
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Player>> {
        let models = Players::find()
            .order_by_asc(players::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::model_to_player).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Player>> {
        let model = Players::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Self::model_to_player))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Player>> {
        let model = Players::find()
            .filter(players::Column::Name.eq(name.trim()))
            .one(&self.db)
            .await?;
        Ok(model.map(Self::model_to_player))
    }

    /// Insert a player with zeroed stats. Name checks belong to the caller.
    #[instrument(skip(self, new_player), fields(name = %new_player.name.trim()))]
    pub async fn create_player(&self, new_player: NewPlayer) -> Result<Player> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now().into();
        let model = players::ActiveModel {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(new_player.name.trim().to_string()),
            icon: ActiveValue::Set(new_player.icon),
            player_score: ActiveValue::Set(0),
            computer_score: ActiveValue::Set(0),
            player_wins: ActiveValue::Set(0),
            computer_wins: ActiveValue::Set(0),
            total_rounds: ActiveValue::Set(0),
            player_history: ActiveValue::Set(String::new()),
            computer_history: ActiveValue::Set(String::new()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        Players::insert(model).exec(&self.db).await?;

        let created = Players::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created player"))?;
        debug!("Created player {} ({})", created.name, id);

        Ok(Self::model_to_player(created))
    }

    /// Replace the stored stats wholesale. `None` when the player does not exist.
    #[instrument(skip(self, stats), fields(rounds = stats.total_rounds))]
    pub async fn update_stats(&self, id: Uuid, stats: &PlayerStats) -> Result<Option<Player>> {
        let Some(existing) = Players::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let updated = players::ActiveModel {
            id: ActiveValue::Unchanged(existing.id),
            player_score: ActiveValue::Set(to_column(stats.player_score)),
            computer_score: ActiveValue::Set(to_column(stats.computer_score)),
            player_wins: ActiveValue::Set(to_column(stats.player_wins)),
            computer_wins: ActiveValue::Set(to_column(stats.computer_wins)),
            total_rounds: ActiveValue::Set(to_column(stats.total_rounds)),
            player_history: ActiveValue::Set(encode_history(&stats.player_history)),
            computer_history: ActiveValue::Set(encode_history(&stats.computer_history)),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let model = Players::update(updated).exec(&self.db).await?;
        Ok(Some(Self::model_to_player(model)))
    }

    #[instrument(skip(self))]
    pub async fn reset_stats(&self, id: Uuid) -> Result<Option<Player>> {
        self.update_stats(id, &PlayerStats::default()).await
    }

    /// Every player ranked by the Wilson lower bound of their win rate, best
    /// first; equal scores fall back to name order.
    pub async fn leaderboard_stats(&self) -> Result<Vec<LeaderboardEntry>> {
        let models = Players::find().all(&self.db).await?;

        let mut entries: Vec<LeaderboardEntry> = models
            .into_iter()
            .map(|model| {
                let wins = to_count(model.player_wins);
                let games = to_count(model.total_rounds);
                LeaderboardEntry {
                    id: model.id,
                    name: model.name,
                    icon: model.icon,
                    win_percentage: win_percentage(wins, games),
                    games_played: games,
                    score: wilson_lower_bound(wins, games),
                    rank: None,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(entries)
    }
}

/// Share of games won as a percentage, rounded to two decimals.
pub fn win_percentage(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    let percentage = f64::from(wins) / f64::from(games) * 100.0;
    (percentage * 100.0).round() / 100.0
}

/// Lower bound of the Wilson score interval for `wins` out of `games`.
pub fn wilson_lower_bound(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    let n = f64::from(games);
    let p = f64::from(wins) / n;
    let z_sq = WILSON_Z * WILSON_Z;

    let numerator =
        p + z_sq / (2.0 * n) - WILSON_Z * (p * (1.0 - p) / n + z_sq / (4.0 * n * n)).sqrt();
    numerator / (1.0 + z_sq / n)
}

fn encode_history(history: &[Choice]) -> String {
    history
        .iter()
        .map(Choice::as_str)
        .collect::<Vec<_>>()
        .join(HISTORY_DELIMITER)
}

fn decode_history(raw: &str) -> Vec<Choice> {
    raw.split(HISTORY_DELIMITER)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .filter_map(|value| match value.parse::<Choice>() {
            Ok(choice) => Some(choice),
            Err(err) => {
                warn!("Dropping stored history entry: {}", err);
                None
            }
        })
        .collect()
}

fn to_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
