mod game_result;
mod leaderboard;
mod player_profile;
mod player_stats;

pub use game_result::GameResult;
pub use leaderboard::{Leaderboard, LeaderboardEntry, Placement};
pub use player_profile::PlayerProfile;
pub use player_stats::PlayerStats;
