use storage::{
    dto::leaderboard::SubmitGameResponse,
    error::Result,
    kv::KvStore,
    models::{GameResult, LeaderboardEntry, Placement, PlayerProfile},
    repository::{leaderboard::LeaderboardRepository, player::PlayerRepository},
};
use serde_json::Value;
use tokio::sync::Mutex;

/// Get the stored stats document for one player, as persisted
pub async fn get_player_stats(store: &dyn KvStore, address: &str) -> Result<Value> {
    let repo = PlayerRepository::new(store);
    repo.find_stats_document(address).await
}

/// Get the stored leaderboard blob, as persisted
pub async fn get_leaderboard(store: &dyn KvStore) -> Result<Value> {
    let repo = LeaderboardRepository::new(store);
    repo.find_document().await
}

/// Record one game for `address` and re-rank the leaderboard.
///
/// Both stored documents are read and parsed before anything is written. Writes go
/// stats, then the username profile, then the leaderboard. They are not
/// transactional: a failed write leaves the earlier writes in place.
pub async fn submit_game(
    store: &dyn KvStore,
    write_gate: &Mutex<()>,
    address: &str,
    username: &str,
    result: GameResult,
) -> Result<SubmitGameResponse> {
    let _guard = write_gate.lock().await;

    let players = PlayerRepository::new(store);
    let leaderboards = LeaderboardRepository::new(store);

    let mut stats = players.find_stats_or_default(address).await?;
    let mut leaderboard = leaderboards.find_or_default().await?;

    if !stats.is_consistent() {
        tracing::warn!(
            "Stored stats for {} do not add up: {} wins + {} losses != {} games",
            address,
            stats.wins,
            stats.losses,
            stats.games_played
        );
    }
    stats.record(result);

    players.save_stats(address, &stats).await?;
    players
        .save_profile(address, &PlayerProfile::new(username))
        .await?;

    let placement = leaderboard.record(LeaderboardEntry::new(address, username, stats));
    leaderboards.save(&leaderboard).await?;

    tracing::info!(
        "Recorded {} for {} ({} entry, {} players ranked)",
        result,
        address,
        match placement {
            Placement::Updated => "updated",
            Placement::Inserted => "new",
        },
        leaderboard.len()
    );

    Ok(SubmitGameResponse::new(leaderboard, stats))
}
