mod test_helpers;

use rps_client::{Lobby, PlayerDirectory, StoreError};
use rps_types::NewPlayer;
use std::sync::atomic::Ordering;
use test_helpers::*;

#[tokio::test]
async fn test_cache_hit_does_not_call_store() {
    let store = MockLeaderboardStore::with_entries(vec![entry("Ann", 0.8)]);
    let cache = leaderboard_cache(&store);

    let first = cache.fetch().await.unwrap();
    let second = cache.fetch().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_ranks_follow_server_order() {
    // Deliberately not sorted by score: the client must not reorder.
    let store = MockLeaderboardStore::with_entries(vec![
        entry("Low", 0.1),
        entry("High", 0.9),
        entry("Mid", 0.5),
    ]);
    let cache = leaderboard_cache(&store);

    let entries = cache.fetch().await.unwrap();

    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    let ranks: Vec<_> = entries.iter().map(|e| e.rank).collect();
    assert_eq!(names, ["Low", "High", "Mid"]);
    assert_eq!(ranks, [Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn test_failed_fetch_leaves_cache_stale_and_retries() {
    let store = MockLeaderboardStore::with_entries(vec![entry("Ann", 0.8)]);
    store.fail.store(true, Ordering::SeqCst);
    let cache = leaderboard_cache(&store);

    let err = cache.fetch().await.unwrap_err();
    assert!(err.is_transient());
    assert!(cache.is_stale());
    assert!(cache.snapshot().is_empty());

    store.fail.store(false, Ordering::SeqCst);
    assert_eq!(cache.fetch().await.unwrap().len(), 1);
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_mark_stale_forces_refetch() {
    let store = MockLeaderboardStore::with_entries(vec![entry("Ann", 0.8)]);
    let cache = leaderboard_cache(&store);
    cache.fetch().await.unwrap();

    store.set_entries(vec![entry("Ann", 0.8), entry("Ben", 0.4)]);
    cache.mark_stale();
    cache.mark_stale();
    assert!(cache.snapshot().is_empty());

    assert_eq!(cache.fetch().await.unwrap().len(), 2);
    assert_eq!(store.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_share_one_call() {
    let store = MockLeaderboardStore::with_entries(vec![entry("Ann", 0.8)]);
    store.delay_ms.store(100, Ordering::SeqCst);
    let cache = leaderboard_cache(&store);

    let (a, b, c) = tokio::join!(cache.fetch(), cache.fetch(), cache.fetch());

    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);
    assert_eq!(c.unwrap().len(), 1);
    assert_eq!(store.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_invalidation_during_fetch_is_not_cached() {
    let store = MockLeaderboardStore::with_entries(vec![entry("Ann", 0.8)]);
    store.delay_ms.store(100, Ordering::SeqCst);
    let cache = leaderboard_cache(&store);

    let invalidate = async {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        cache.mark_stale();
    };
    let (fetched, _) = tokio::join!(cache.fetch(), invalidate);

    assert_eq!(fetched.unwrap().len(), 1);
    assert!(cache.is_stale());
    assert!(cache.snapshot().is_empty());
}

#[tokio::test]
async fn test_player_directory_lists_players() {
    let store = MockPlayerStore::new();
    store.insert("Zed");
    store.insert("Amy");
    let directory = PlayerDirectory::for_store(store.clone());

    let players = directory.fetch().await.unwrap();

    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Amy");
    directory.fetch().await.unwrap();
    assert_eq!(MockPlayerStore::count(&store.fetch_all_calls), 1);
}

#[tokio::test]
async fn test_creating_player_invalidates_directory() {
    let store = MockPlayerStore::new();
    store.insert("Amy");
    let lobby = Lobby::new(store.clone());
    assert_eq!(lobby.players().await.unwrap().len(), 1);

    let created = lobby
        .create_player(NewPlayer {
            name: "Bo".to_string(),
            icon: "🐸".to_string(),
        })
        .await
        .unwrap();

    assert!(created.id.is_some());
    assert!(lobby.directory().is_stale());
    assert_eq!(lobby.players().await.unwrap().len(), 2);
    assert_eq!(MockPlayerStore::count(&store.fetch_all_calls), 2);
}

#[tokio::test]
async fn test_rejected_player_keeps_directory_fresh() {
    let store = MockPlayerStore::new();
    let lobby = Lobby::new(store.clone());
    lobby.players().await.unwrap();

    let err = lobby
        .create_player(NewPlayer {
            name: "  ".to_string(),
            icon: String::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Rejected { status: 400, .. }));
    assert!(!lobby.directory().is_stale());
}
