use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::GameResult;

/// Aggregate counters for one player, stored under `player:{address}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerStats {
    pub wins: u64,
    pub losses: u64,
    pub games_played: u64,
}

impl PlayerStats {
    pub fn new(wins: u64, losses: u64, games_played: u64) -> Self {
        Self {
            wins,
            losses,
            games_played,
        }
    }

    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
        }
        self.games_played += 1;
    }

    pub fn is_consistent(&self) -> bool {
        self.wins + self.losses == self.games_played
    }
}
