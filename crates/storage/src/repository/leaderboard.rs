use serde_json::Value;

use crate::error::{Result, StorageError};
use crate::kv::{self, KvStore, keys};
use crate::models::Leaderboard;

pub struct LeaderboardRepository<'a> {
    store: &'a dyn KvStore,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub async fn find(&self) -> Result<Leaderboard> {
        kv::get_json(self.store, keys::LEADERBOARD)
            .await?
            .ok_or_else(|| StorageError::not_found(keys::LEADERBOARD))
    }

    /// The stored leaderboard blob exactly as persisted.
    pub async fn find_document(&self) -> Result<Value> {
        match self.store.get(keys::LEADERBOARD).await? {
            Some(value) => Ok(value),
            None => Err(StorageError::not_found(keys::LEADERBOARD)),
        }
    }

    /// The stored leaderboard, empty when nothing has been recorded yet.
    pub async fn find_or_default(&self) -> Result<Leaderboard> {
        match self.find().await {
            Ok(leaderboard) => Ok(leaderboard),
            Err(e) if e.is_not_found() => Ok(Leaderboard::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn save(&self, leaderboard: &Leaderboard) -> Result<()> {
        kv::put_json(self.store, keys::LEADERBOARD, leaderboard).await
    }
}
