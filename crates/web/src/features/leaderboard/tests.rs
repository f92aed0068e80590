use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use storage::{
    Store,
    error::{Result as StorageResult, StorageError},
    kv::{KvStore, MemoryKvStore, keys},
    models::{GameResult, PlayerStats},
    repository::{leaderboard::LeaderboardRepository, player::PlayerRepository},
};
use tokio::sync::Mutex;
use tower::util::ServiceExt;

use super::services;
use crate::{routes::router, state::AppState};

/// Memory store that can be told to fail reads or writes of one key.
struct FlakyStore {
    inner: MemoryKvStore,
    fail_get: Option<String>,
    fail_put: Option<String>,
}

impl FlakyStore {
    fn outage() -> StorageError {
        StorageError::Unavailable {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    }
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        if self.fail_get.as_deref() == Some(key) {
            return Err(Self::outage());
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &Value) -> StorageResult<()> {
        if self.fail_put.as_deref() == Some(key) {
            return Err(Self::outage());
        }
        self.inner.put(key, value).await
    }
}

/// Memory store that yields to the scheduler around every call, widening race windows.
struct YieldingStore(MemoryKvStore);

#[async_trait]
impl KvStore for YieldingStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        tokio::task::yield_now().await;
        let value = self.0.get(key).await;
        tokio::task::yield_now().await;
        value
    }

    async fn put(&self, key: &str, value: &Value) -> StorageResult<()> {
        tokio::task::yield_now().await;
        self.0.put(key, value).await
    }
}

fn app(store: impl KvStore + 'static) -> Router {
    router(AppState::new(Store::new(store)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_raw(app: &Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/leaderboard")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_game(app: &Router, address: &str, username: &str, result: &str) -> (StatusCode, Value) {
    let body = json!({
        "playerAddress": address,
        "username": username,
        "gameResult": result,
    });
    post_raw(app, &body.to_string()).await
}

fn addresses(leaderboard: &Value) -> Vec<String> {
    leaderboard
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["address"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_first_win_on_empty_store() {
    let app = app(MemoryKvStore::new());

    let (status, json) = post_game(&app, "0xA", "alice", "win").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "success": true,
            "leaderboard": [
                {"address": "0xA", "username": "alice", "wins": 1, "losses": 0, "gamesPlayed": 1}
            ],
            "playerStats": {"wins": 1, "losses": 0, "gamesPlayed": 1}
        })
    );
}

#[tokio::test]
async fn test_get_player_after_post() {
    let app = app(MemoryKvStore::new());
    post_game(&app, "0xA", "alice", "win").await;

    let (status, json) = get_json(&app, "/api/leaderboard?player=0xA").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"wins": 1, "losses": 0, "gamesPlayed": 1}));
}

#[tokio::test]
async fn test_get_leaderboard_after_posts() {
    let app = app(MemoryKvStore::new());
    post_game(&app, "0xA", "alice", "loss").await;
    post_game(&app, "0xB", "bob", "win").await;

    let (status, json) = get_json(&app, "/api/leaderboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(addresses(&json), vec!["0xB", "0xA"]);
}

#[tokio::test]
async fn test_empty_player_param_returns_leaderboard() {
    let app = app(MemoryKvStore::new());
    post_game(&app, "0xA", "alice", "win").await;

    let (status, json) = get_json(&app, "/api/leaderboard?player=").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.is_array());
}

#[tokio::test]
async fn test_missing_leaderboard_is_error() {
    let app = app(MemoryKvStore::new());

    let (status, json) = get_json(&app, "/api/leaderboard").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Key not found: leaderboard");
}

#[tokio::test]
async fn test_missing_player_is_error() {
    let app = app(MemoryKvStore::new());

    let (status, json) = get_json(&app, "/api/leaderboard?player=0xZ").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Key not found: player:0xZ");
}

#[tokio::test]
async fn test_read_outage_is_distinct_from_missing_key() {
    let app = app(FlakyStore {
        inner: MemoryKvStore::new(),
        fail_get: Some(keys::LEADERBOARD.to_string()),
        fail_put: None,
    });

    let (status, json) = get_json(&app, "/api/leaderboard").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("503"));
    assert!(!message.contains("not found"));
}

#[tokio::test]
async fn test_get_player_returns_stored_document() {
    let store = MemoryKvStore::new();
    let stored = json!({"wins": 2, "losses": 1, "gamesPlayed": 3, "streak": 4});
    store.put(&keys::player_stats("0xA"), &stored).await.unwrap();
    store.put(&keys::player_stats("0xB"), &json!({})).await.unwrap();
    let app = app(store);

    let (status, json) = get_json(&app, "/api/leaderboard?player=0xA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, stored);

    let (status, json) = get_json(&app, "/api/leaderboard?player=0xB").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({}));
}

#[tokio::test]
async fn test_leaderboard_entry_without_username() {
    let store = MemoryKvStore::new();
    let stored = json!([{"address": "0xOld", "wins": 3, "losses": 0, "gamesPlayed": 3}]);
    store.put(keys::LEADERBOARD, &stored).await.unwrap();
    let app = app(store);

    let (status, json) = get_json(&app, "/api/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, stored);

    let (status, json) = post_game(&app, "0xA", "alice", "win").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(addresses(&json["leaderboard"]), vec!["0xOld", "0xA"]);
    assert_eq!(json["leaderboard"][0]["username"], "");
}

#[tokio::test]
async fn test_unreadable_leaderboard_fails_before_any_write() {
    let store = MemoryKvStore::new();
    store
        .put(keys::LEADERBOARD, &json!({"not": "an array"}))
        .await
        .unwrap();
    let app = app(store.clone());

    let (status, json) = post_game(&app, "0xA", "alice", "win").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().starts_with("Failed to parse JSON"));
    assert!(!store.contains_key(&keys::player_stats("0xA")).await);
    assert!(!store.contains_key(&keys::player_username("0xA")).await);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_leaderboard_read_outage_fails_before_any_write() {
    let inner = MemoryKvStore::new();
    let app = app(FlakyStore {
        inner: inner.clone(),
        fail_get: Some(keys::LEADERBOARD.to_string()),
        fail_put: None,
    });

    let (status, _) = post_game(&app, "0xA", "alice", "win").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(inner.is_empty().await);
}

#[tokio::test]
async fn test_wins_and_losses_accumulate() {
    let app = app(MemoryKvStore::new());
    let results = ["win", "loss", "win", "win", "loss"];

    for result in results {
        let (status, _) = post_game(&app, "0xA", "alice", result).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, json) = get_json(&app, "/api/leaderboard?player=0xA").await;
    assert_eq!(json, json!({"wins": 3, "losses": 2, "gamesPlayed": 5}));
}

#[tokio::test]
async fn test_unknown_game_result_is_rejected() {
    let store = MemoryKvStore::new();
    let app = app(store.clone());
    post_game(&app, "0xA", "alice", "win").await;

    let (status, json) = post_game(&app, "0xA", "alice", "draw").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({"error": "gameResult must be 'win' or 'loss', got 'draw'"})
    );

    let (_, stats) = get_json(&app, "/api/leaderboard?player=0xA").await;
    assert_eq!(stats, json!({"wins": 1, "losses": 0, "gamesPlayed": 1}));
}

#[tokio::test]
async fn test_rejected_submission_writes_nothing() {
    let store = MemoryKvStore::new();
    let app = app(store.clone());

    let (status, _) = post_game(&app, "", "alice", "win").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app(MemoryKvStore::new());

    let (status, json) = post_raw(&app, "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, json) = post_raw(&app, r#"{"playerAddress":"0xA"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_existing_player_updated_in_place() {
    let app = app(MemoryKvStore::new());
    post_game(&app, "0xA", "alice", "win").await;
    post_game(&app, "0xB", "bob", "loss").await;

    let (_, json) = post_game(&app, "0xB", "bob", "loss").await;
    assert_eq!(json["leaderboard"].as_array().unwrap().len(), 2);

    let (_, json) = post_game(&app, "0xC", "carol", "loss").await;
    let leaderboard = json["leaderboard"].as_array().unwrap();
    assert_eq!(leaderboard.len(), 3);
    assert_eq!(leaderboard[1]["gamesPlayed"], 2);
}

#[tokio::test]
async fn test_leaderboard_sorted_by_wins() {
    let app = app(MemoryKvStore::new());
    let games = [
        ("0xA", "win"),
        ("0xB", "win"),
        ("0xB", "win"),
        ("0xC", "loss"),
        ("0xC", "win"),
        ("0xC", "win"),
        ("0xC", "win"),
    ];

    for (address, result) in games {
        let (_, json) = post_game(&app, address, address, result).await;
        let wins: Vec<u64> = json["leaderboard"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["wins"].as_u64().unwrap())
            .collect();
        assert!(wins.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    let (_, json) = get_json(&app, "/api/leaderboard").await;
    assert_eq!(addresses(&json), vec!["0xC", "0xB", "0xA"]);
}

#[tokio::test]
async fn test_username_stored_under_profile_key() {
    let store = MemoryKvStore::new();
    let app = app(store.clone());

    post_game(&app, "0xA", "alice", "win").await;
    let (_, json) = post_game(&app, "0xA", "alice2", "win").await;

    assert_eq!(json["leaderboard"][0]["username"], "alice2");
    let profile = store.get(&keys::player_username("0xA")).await.unwrap();
    assert_eq!(profile, Some(json!({"username": "alice2"})));
}

#[tokio::test]
async fn test_stats_outage_fails_without_writes() {
    let inner = MemoryKvStore::new();
    let app = app(FlakyStore {
        inner: inner.clone(),
        fail_get: Some(keys::player_stats("0xA")),
        fail_put: None,
    });

    let (status, json) = post_game(&app, "0xA", "alice", "win").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].is_string());
    assert!(inner.is_empty().await);
}

#[tokio::test]
async fn test_leaderboard_outage_keeps_partial_writes() {
    let inner = MemoryKvStore::new();
    let app = app(FlakyStore {
        inner: inner.clone(),
        fail_get: None,
        fail_put: Some(keys::LEADERBOARD.to_string()),
    });

    let (status, _) = post_game(&app, "0xA", "alice", "win").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(inner.contains_key(&keys::player_stats("0xA")).await);
    assert!(inner.contains_key(&keys::player_username("0xA")).await);
    assert!(!inner.contains_key(keys::LEADERBOARD).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_are_not_lost() {
    let inner = MemoryKvStore::new();
    let store = Store::new(YieldingStore(inner.clone()));
    let gate = Arc::new(Mutex::new(()));
    let players = ["0xA", "0xB", "0xC", "0xD"];

    let mut handles = Vec::new();
    for round in 0..10 {
        for (i, &address) in players.iter().enumerate() {
            let store = store.clone();
            let gate = gate.clone();
            let result = if (round + i) % 2 == 0 {
                GameResult::Win
            } else {
                GameResult::Loss
            };
            handles.push(tokio::spawn(async move {
                services::submit_game(store.kv(), &gate, address, address, result)
                    .await
                    .unwrap();
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let repo = PlayerRepository::new(&inner);
    for address in players {
        let stats = repo.find_stats(address).await.unwrap();
        assert_eq!(stats, PlayerStats::new(5, 5, 10));
    }

    let leaderboard = LeaderboardRepository::new(&inner).find().await.unwrap();
    assert_eq!(leaderboard.len(), players.len());
    assert!(leaderboard.entries().iter().all(|e| e.stats.games_played == 10));
}
