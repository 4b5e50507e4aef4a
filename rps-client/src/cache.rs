use async_trait::async_trait;
use rps_types::{LeaderboardEntry, Player, assign_ranks};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::store::{LeaderboardStore, PlayerStore, StoreError};

/// Something that can load a whole remote collection in one call.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    type Item: Clone + Send + Sync;

    /// Short label used in log lines.
    fn label(&self) -> &'static str;

    async fn load(&self) -> Result<Vec<Self::Item>, StoreError>;
}

#[derive(Debug)]
struct CacheEntry<T> {
    items: Vec<T>,
    stale: bool,
    generation: u64, // bumped on every invalidation
}

/// A remote collection guarded by a freshness flag.
///
/// A fresh cache answers from memory. A stale one refetches, and concurrent
/// fetches share a single remote call. `mark_stale` clears the collection
/// right away, so readers may briefly see an empty list.
pub struct StalenessCache<S: CollectionSource> {
    source: S,
    entry: Mutex<CacheEntry<S::Item>>,
    fetch_gate: tokio::sync::Mutex<()>,
}

impl<S: CollectionSource> StalenessCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entry: Mutex::new(CacheEntry {
                items: Vec::new(),
                stale: true,
                generation: 0,
            }),
            fetch_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(&self) -> Result<Vec<S::Item>, StoreError> {
        if let Some(items) = self.fresh_items() {
            debug!("{} cache hit", self.source.label());
            return Ok(items);
        }

        let _gate = self.fetch_gate.lock().await;
        if let Some(items) = self.fresh_items() {
            debug!("{} filled by a concurrent fetch", self.source.label());
            return Ok(items);
        }

        let generation = self.entry().generation;
        match self.source.load().await {
            Ok(items) => {
                let mut entry = self.entry();
                if entry.generation == generation {
                    entry.items = items.clone();
                    entry.stale = false;
                } else {
                    debug!(
                        "{} invalidated during fetch, result not cached",
                        self.source.label()
                    );
                }
                Ok(items)
            }
            Err(err) => {
                warn!("Failed to fetch {}: {}", self.source.label(), err);
                self.mark_stale();
                Err(err)
            }
        }
    }

    pub fn mark_stale(&self) {
        let mut entry = self.entry();
        entry.stale = true;
        entry.items.clear();
        entry.generation += 1;
    }

    pub fn is_stale(&self) -> bool {
        self.entry().stale
    }

    /// Current contents without touching the source.
    pub fn snapshot(&self) -> Vec<S::Item> {
        self.entry().items.clone()
    }

    fn fresh_items(&self) -> Option<Vec<S::Item>> {
        let entry = self.entry();
        (!entry.stale).then(|| entry.items.clone())
    }

    fn entry(&self) -> MutexGuard<'_, CacheEntry<S::Item>> {
        // The entry is only ever assigned whole fields, so a poisoned lock
        // still holds a usable value.
        self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct PlayerSource {
    store: Arc<dyn PlayerStore>,
}

impl PlayerSource {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CollectionSource for PlayerSource {
    type Item = Player;

    fn label(&self) -> &'static str {
        "players"
    }

    async fn load(&self) -> Result<Vec<Player>, StoreError> {
        self.store.fetch_all_players().await
    }
}

pub struct LeaderboardSource {
    store: Arc<dyn LeaderboardStore>,
}

impl LeaderboardSource {
    pub fn new(store: Arc<dyn LeaderboardStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CollectionSource for LeaderboardSource {
    type Item = LeaderboardEntry;

    fn label(&self) -> &'static str {
        "leaderboard"
    }

    /// Keeps the server order and numbers it from 1.
    async fn load(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let entries = self.store.fetch_ranked_player_stats().await?;
        Ok(assign_ranks(entries))
    }
}

pub type PlayerDirectory = StalenessCache<PlayerSource>;
pub type LeaderboardCache = StalenessCache<LeaderboardSource>;

impl PlayerDirectory {
    pub fn for_store(store: Arc<dyn PlayerStore>) -> Self {
        Self::new(PlayerSource::new(store))
    }
}

impl LeaderboardCache {
    pub fn for_store(store: Arc<dyn LeaderboardStore>) -> Self {
        Self::new(LeaderboardSource::new(store))
    }
}
