/// Key holding the full ranked leaderboard.
pub const LEADERBOARD: &str = "leaderboard";

pub fn player_stats(address: &str) -> String {
    format!("player:{address}")
}

pub fn player_username(address: &str) -> String {
    format!("player:{address}:username")
}
