use rps_core::{
    CoreConfig, OpponentStrategy, OverlayState, RoundEvent, RoundEventBus, RoundEventHandler,
    RoundMachine, RoundPhase, ScoreBoard,
};
use rps_types::{Choice, LeaderboardEntry, Outcome, Player, PlayerId, PlayerStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::LeaderboardCache;
use crate::store::{PlayerStore, StoreError};

/// Where the host should go after opening a game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Home,
}

/// Result of one completed round.
#[derive(Debug)]
pub struct RoundReport {
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub outcome: Outcome,
    pub stats: PlayerStats,
    pub scoreboard: ScoreBoard,
    /// Background write of the new stats; `None` for a player that was never persisted.
    pub persistence: Option<JoinHandle<Result<(), StoreError>>>,
}

/// One player's game screen: owns the current player and drives rounds in real time.
///
/// Locks are taken per step and released before every sleep, so a second
/// `play` while a round is running is turned away by the machine.
pub struct GameSession {
    machine: Mutex<RoundMachine>,
    players: Arc<dyn PlayerStore>,
    leaderboard: Arc<LeaderboardCache>,
    events: Mutex<RoundEventBus>,
    overlay: Mutex<OverlayState>,
}

impl GameSession {
    pub fn new(
        config: &CoreConfig,
        players: Arc<dyn PlayerStore>,
        leaderboard: Arc<LeaderboardCache>,
        opponent: Box<dyn OpponentStrategy>,
    ) -> Self {
        Self::with_machine(
            RoundMachine::from_config(config, opponent),
            players,
            leaderboard,
        )
    }

    pub fn with_machine(
        machine: RoundMachine,
        players: Arc<dyn PlayerStore>,
        leaderboard: Arc<LeaderboardCache>,
    ) -> Self {
        Self {
            machine: Mutex::new(machine),
            players,
            leaderboard,
            events: Mutex::new(RoundEventBus::new()),
            overlay: Mutex::new(OverlayState::new()),
        }
    }

    pub async fn add_handler(&self, handler: Box<dyn RoundEventHandler>) {
        self.events.lock().await.add_handler(handler);
    }

    pub fn leaderboard(&self) -> &Arc<LeaderboardCache> {
        &self.leaderboard
    }

    pub async fn phase(&self) -> RoundPhase {
        self.machine.lock().await.phase()
    }

    pub async fn current_player(&self) -> Option<Player> {
        self.machine.lock().await.player().cloned()
    }

    pub async fn scoreboard(&self) -> ScoreBoard {
        self.machine.lock().await.scoreboard().clone()
    }

    pub async fn opponent_history(&self) -> Vec<Choice> {
        self.machine.lock().await.opponent_history().to_vec()
    }

    /// Load the player named by the route. Anything short of a fetched player
    /// sends the host back home. A round already in flight keeps its player
    /// and the newly fetched record is dropped.
    pub async fn open(&self, route_id: Option<&str>) -> Navigation {
        let Some(raw) = route_id else {
            debug!("No player id in route");
            return Navigation::Home;
        };
        let Ok(id) = raw.parse::<PlayerId>() else {
            warn!("Invalid player id in route: {}", raw);
            return Navigation::Home;
        };

        match self.players.fetch_player(id).await {
            Ok(player) => {
                if let Err(rejected) = self.machine.lock().await.load_player(player) {
                    debug!("Keeping current player for {}: {}", id, rejected);
                }
                Navigation::Stay
            }
            Err(err) => {
                warn!("Could not load player {}: {}", id, err);
                self.machine.lock().await.unload_player();
                Navigation::Home
            }
        }
    }

    /// Play one round with `choice`. Returns `None` when the input was ignored
    /// or the round was abandoned before it could be scored.
    pub async fn play(&self, choice: Choice) -> Option<RoundReport> {
        let (plan, player_id) = {
            let mut machine = self.machine.lock().await;
            match machine.submit_choice(choice) {
                Ok(plan) => (plan, machine.player().and_then(|player| player.id)),
                Err(rejected) => {
                    debug!("Ignoring choice {}: {}", choice, rejected);
                    return None;
                }
            }
        };

        self.publish(RoundEvent::RoundStarted {
            player_id,
            round: plan.round,
        })
        .await;

        for tick in plan.countdown {
            pause(tick.delay_ms).await;
            self.publish(RoundEvent::CountdownTick { text: tick.text }).await;
        }

        let reveal = self.machine.lock().await.reveal(plan.round_id);
        let reveal = match reveal {
            Ok(reveal) => reveal,
            Err(err) => {
                warn!("Round abandoned before reveal: {}", err);
                return None;
            }
        };
        self.publish(RoundEvent::ChoicesRevealed {
            player: reveal.player,
            computer: reveal.computer,
        })
        .await;

        for timed in reveal.cues {
            pause(timed.delay_ms).await;
            self.publish(RoundEvent::Cue { cue: timed.cue }).await;
        }

        let scored = self.machine.lock().await.score(plan.round_id);
        let scored = match scored {
            Ok(scored) => scored,
            Err(err) => {
                warn!("Round abandoned before scoring: {}", err);
                return None;
            }
        };
        self.publish(RoundEvent::RoundScored {
            outcome: scored.outcome,
            scoreboard: scored.scoreboard.clone(),
        })
        .await;

        let persistence = scored
            .player_id
            .map(|id| self.persist_stats(id, scored.stats.clone()));
        self.leaderboard.mark_stale();

        if let Err(err) = self.machine.lock().await.finish(plan.round_id) {
            debug!("Round already left scoring: {}", err);
        }

        Some(RoundReport {
            player_choice: scored.player_choice,
            computer_choice: scored.computer_choice,
            outcome: scored.outcome,
            stats: scored.stats,
            scoreboard: scored.scoreboard,
            persistence,
        })
    }

    /// Zero the current player's stats remotely and reload them.
    ///
    /// Returns `Ok(false)` when no reset was attempted because the session is
    /// not idle. If the reload fails the player is unloaded and the host
    /// should navigate home.
    pub async fn reset_stats(&self) -> Result<bool, StoreError> {
        let id = match self.machine.lock().await.begin_reset() {
            Ok(id) => id,
            Err(rejected) => {
                debug!("Ignoring reset request: {}", rejected);
                return Ok(false);
            }
        };

        if let Err(err) = self.players.reset_player_stats(id).await {
            warn!("Failed to reset stats for {}: {}", id, err);
            self.machine.lock().await.cancel_reset();
            return Err(err);
        }
        self.leaderboard.mark_stale();

        match self.players.fetch_player(id).await {
            Ok(player) => {
                let scoreboard = {
                    let mut machine = self.machine.lock().await;
                    machine.complete_reset(player);
                    machine.scoreboard().clone()
                };
                info!("Reset stats for {}", id);
                self.publish(RoundEvent::StatsReset {
                    player_id: id,
                    scoreboard,
                })
                .await;
                Ok(true)
            }
            Err(err) => {
                warn!("Failed to reload {} after reset: {}", id, err);
                self.machine.lock().await.unload_player();
                Err(err)
            }
        }
    }

    /// Flip the leaderboard overlay. Opening it returns the leaderboard, read
    /// through the cache; a failed fetch shows an empty list.
    pub async fn toggle_overlay(&self) -> Option<Vec<LeaderboardEntry>> {
        let visible = self.overlay.lock().await.toggle();
        if !visible {
            return None;
        }
        Some(self.leaderboard.fetch().await.unwrap_or_default())
    }

    pub async fn close_overlay(&self) {
        self.overlay.lock().await.close();
    }

    pub async fn is_overlay_visible(&self) -> bool {
        self.overlay.lock().await.is_visible()
    }

    fn persist_stats(&self, id: PlayerId, stats: PlayerStats) -> JoinHandle<Result<(), StoreError>> {
        let store = Arc::clone(&self.players);
        let leaderboard = Arc::clone(&self.leaderboard);

        tokio::spawn(async move {
            match store.update_player_stats(id, &stats).await {
                Ok(_) => {
                    // A refetch may have raced the write.
                    leaderboard.mark_stale();
                    debug!("Persisted stats for {}", id);
                    Ok(())
                }
                Err(err) => {
                    error!("Failed to persist stats for {}: {}", id, err);
                    Err(err)
                }
            }
        })
    }

    async fn publish(&self, event: RoundEvent) {
        self.events.lock().await.publish(event);
    }
}

async fn pause(delay_ms: u64) {
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
