use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display name for a player, stored under `player:{address}:username`.
/// This record is the source of truth for usernames; leaderboard entries carry a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlayerProfile {
    pub username: String,
}

impl PlayerProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
