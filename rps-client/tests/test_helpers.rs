#![allow(dead_code)]

use async_trait::async_trait;
use rps_client::{LeaderboardCache, LeaderboardStore, PlayerStore, StoreError};
use rps_types::{LeaderboardEntry, NewPlayer, Player, PlayerId, PlayerStats};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory player store with call counters and switchable failures.
#[derive(Default)]
pub struct MockPlayerStore {
    players: Mutex<HashMap<PlayerId, Player>>,
    pub fetch_all_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub reset_calls: AtomicUsize,
    pub fail_updates: AtomicBool,
    pub fail_resets: AtomicBool,
    pub fail_fetches: AtomicBool,
}

impl MockPlayerStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stores a player under a fresh id and returns it.
    pub fn insert(&self, name: &str) -> Player {
        let player = Player {
            id: Some(uuid::Uuid::new_v4()),
            ..Player::new(name, "🐼")
        };
        self.insert_player(player.clone());
        player
    }

    pub fn insert_player(&self, player: Player) {
        if let Some(id) = player.id {
            self.players.lock().unwrap().insert(id, player);
        }
    }

    pub fn stored(&self, id: PlayerId) -> Option<Player> {
        self.players.lock().unwrap().get(&id).cloned()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn transport_error() -> StoreError {
    StoreError::Transport("connection refused".to_string())
}

#[async_trait]
impl PlayerStore for MockPlayerStore {
    async fn fetch_all_players(&self) -> Result<Vec<Player>, StoreError> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(transport_error());
        }
        let mut players: Vec<Player> = self.players.lock().unwrap().values().cloned().collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(players)
    }

    async fn fetch_player(&self, id: PlayerId) -> Result<Player, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(transport_error());
        }
        self.stored(id).ok_or(StoreError::NotFound(id))
    }

    async fn create_player(&self, new_player: &NewPlayer) -> Result<Player, StoreError> {
        if new_player.name.trim().is_empty() {
            return Err(StoreError::Rejected {
                status: 400,
                message: "Player name must not be blank".to_string(),
            });
        }
        let player = Player {
            id: Some(uuid::Uuid::new_v4()),
            ..Player::new(new_player.name.clone(), new_player.icon.clone())
        };
        self.insert_player(player.clone());
        Ok(player)
    }

    async fn update_player_stats(
        &self,
        id: PlayerId,
        stats: &PlayerStats,
    ) -> Result<Player, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(transport_error());
        }
        let mut players = self.players.lock().unwrap();
        let player = players.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        player.stats = stats.clone();
        Ok(player.clone())
    }

    async fn reset_player_stats(&self, id: PlayerId) -> Result<(), StoreError> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_resets.load(Ordering::SeqCst) {
            return Err(transport_error());
        }
        let mut players = self.players.lock().unwrap();
        let player = players.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        player.stats = PlayerStats::default();
        Ok(())
    }
}

/// Leaderboard double that can be slowed down to overlap concurrent fetches.
#[derive(Default)]
pub struct MockLeaderboardStore {
    entries: Mutex<Vec<LeaderboardEntry>>,
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub delay_ms: AtomicUsize,
}

impl MockLeaderboardStore {
    pub fn with_entries(entries: Vec<LeaderboardEntry>) -> Arc<Self> {
        let store = Self::default();
        *store.entries.lock().unwrap() = entries;
        Arc::new(store)
    }

    pub fn set_entries(&self, entries: Vec<LeaderboardEntry>) {
        *self.entries.lock().unwrap() = entries;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LeaderboardStore for MockLeaderboardStore {
    async fn fetch_ranked_player_stats(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst) as u64;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(transport_error());
        }
        Ok(self.entries.lock().unwrap().clone())
    }
}

pub fn entry(name: &str, score: f64) -> LeaderboardEntry {
    LeaderboardEntry {
        id: uuid::Uuid::new_v4(),
        name: name.to_string(),
        icon: String::new(),
        win_percentage: score * 100.0,
        games_played: 10,
        score,
        rank: None,
    }
}

pub fn leaderboard_cache(store: &Arc<MockLeaderboardStore>) -> Arc<LeaderboardCache> {
    Arc::new(LeaderboardCache::for_store(store.clone()))
}

/// Session with the default timing and an opponent that plays `moves` in order
pub fn scripted_session(
    store: Arc<MockPlayerStore>,
    leaderboard: &Arc<MockLeaderboardStore>,
    moves: &[rps_types::Choice],
) -> rps_client::GameSession {
    let machine = rps_core::RoundMachine::new(
        rps_core::RuleTable::classic(),
        rps_core::RoundTiming::default(),
        Box::new(rps_core::ScriptedOpponent::new(moves.iter().copied())),
    );
    rps_client::GameSession::with_machine(machine, store, leaderboard_cache(leaderboard))
}

/// Collects round events for assertions
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<rps_core::RoundEvent>>>,
}

impl EventCollector {
    pub fn get_events(&self) -> Vec<rps_core::RoundEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl rps_core::RoundEventHandler for EventCollector {
    fn handle_event(&mut self, event: rps_core::RoundEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Serves the real API over a fresh in-memory database on an ephemeral port.
/// `/broken/players` answers 200 with a body that is not JSON.
pub async fn spawn_api_server() -> std::net::SocketAddr {
    use migration::MigratorTrait;
    use warp::Filter;

    let db = rps_persistence::connect_to_memory_database().await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let repository = Arc::new(rps_persistence::PlayerRepository::new(db));

    let broken = warp::path!("broken" / "players").map(|| "<html>maintenance</html>");
    let routes = broken.or(rps_server::create_routes(repository, "http://localhost:4200"));

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}
