use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PlayerStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub address: String,
    /// Older blobs may carry entries written without a username.
    #[serde(default)]
    pub username: String,
    #[serde(flatten)]
    pub stats: PlayerStats,
}

impl LeaderboardEntry {
    pub fn new(address: impl Into<String>, username: impl Into<String>, stats: PlayerStats) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            stats,
        }
    }
}

/// Whether [`Leaderboard::record`] replaced an existing row or added a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Updated,
    Inserted,
}

/// All players ranked by wins, highest first. Stored whole under the `leaderboard` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Leaderboard(Vec<LeaderboardEntry>);

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn find(&self, address: &str) -> Option<&LeaderboardEntry> {
        self.0.iter().find(|entry| entry.address == address)
    }

    /// Replace the row for `entry.address` (or append it) and re-rank.
    pub fn record(&mut self, entry: LeaderboardEntry) -> Placement {
        let placement = match self.0.iter().position(|e| e.address == entry.address) {
            Some(index) => {
                self.0[index] = entry;
                Placement::Updated
            }
            None => {
                self.0.push(entry);
                Placement::Inserted
            }
        };

        self.rank();
        placement
    }

    /// Stable sort, descending by wins. Ties keep their existing order.
    pub fn rank(&mut self) {
        self.0.sort_by(|a, b| b.stats.wins.cmp(&a.stats.wins));
        debug_assert!(self.is_ranked());
    }

    pub fn is_ranked(&self) -> bool {
        self.0
            .windows(2)
            .all(|pair| pair[0].stats.wins >= pair[1].stats.wins)
    }
}

impl From<Vec<LeaderboardEntry>> for Leaderboard {
    fn from(entries: Vec<LeaderboardEntry>) -> Self {
        Self(entries)
    }
}
