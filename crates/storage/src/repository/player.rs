use serde_json::Value;

use crate::error::{Result, StorageError};
use crate::kv::{self, KvStore, keys};
use crate::models::{PlayerProfile, PlayerStats};

pub struct PlayerRepository<'a> {
    store: &'a dyn KvStore,
}

impl<'a> PlayerRepository<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub async fn find_stats(&self, address: &str) -> Result<PlayerStats> {
        let key = keys::player_stats(address);
        match kv::get_json(self.store, &key).await? {
            Some(value) => Ok(value),
            None => Err(StorageError::not_found(key)),
        }
    }

    /// The stored stats document exactly as persisted, without schema checks.
    pub async fn find_stats_document(&self, address: &str) -> Result<Value> {
        let key = keys::player_stats(address);
        match self.store.get(&key).await? {
            Some(value) => Ok(value),
            None => Err(StorageError::not_found(key)),
        }
    }

    /// Stats for `address`, zeroed when the player has never been recorded.
    /// Store failures still propagate.
    pub async fn find_stats_or_default(&self, address: &str) -> Result<PlayerStats> {
        match self.find_stats(address).await {
            Ok(stats) => Ok(stats),
            Err(e) if e.is_not_found() => {
                tracing::debug!("No stats recorded for {}, starting from zero", address);
                Ok(PlayerStats::default())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn save_stats(&self, address: &str, stats: &PlayerStats) -> Result<()> {
        kv::put_json(self.store, &keys::player_stats(address), stats).await
    }

    #[cfg(test)]
    pub async fn find_profile(&self, address: &str) -> Result<PlayerProfile> {
        let key = keys::player_username(address);
        match kv::get_json(self.store, &key).await? {
            Some(value) => Ok(value),
            None => Err(StorageError::not_found(key)),
        }
    }

    pub async fn save_profile(&self, address: &str, profile: &PlayerProfile) -> Result<()> {
        kv::put_json(self.store, &keys::player_username(address), profile).await
    }
}
