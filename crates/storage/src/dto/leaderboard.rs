use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{GameResult, Leaderboard, PlayerStats};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Player address; when omitted the full leaderboard is returned
    pub player: Option<String>,
}

impl LeaderboardQuery {
    /// The requested address, treating an empty `player=` as absent.
    pub fn player(&self) -> Option<&str> {
        self.player.as_deref().filter(|p| !p.is_empty())
    }
}

/// Request payload for recording the result of one game
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGameRequest {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Player address must be between 1 and 128 characters"
    ))]
    pub player_address: String,

    #[validate(length(
        min = 1,
        max = 64,
        message = "Username must be between 1 and 64 characters"
    ))]
    pub username: String,

    /// `win` or `loss`; anything else is rejected by [`SubmitGameRequest::game_result`]
    #[schema(example = "win")]
    pub game_result: String,
}

impl SubmitGameRequest {
    pub fn game_result(&self) -> Result<GameResult, String> {
        self.game_result.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGameResponse {
    pub success: bool,
    pub leaderboard: Leaderboard,
    pub player_stats: PlayerStats,
}

impl SubmitGameResponse {
    pub fn new(leaderboard: Leaderboard, player_stats: PlayerStats) -> Self {
        Self {
            success: true,
            leaderboard,
            player_stats,
        }
    }
}
