pub mod dto;
pub mod error;
pub mod kv;
pub mod models;
pub mod repository;

use std::sync::Arc;

use kv::KvStore;

pub use error::{Result, StorageError};

/// Shared handle to the key-value store backing the leaderboard.
#[derive(Clone)]
pub struct Store {
    kv: Arc<dyn KvStore>,
}

impl Store {
    pub fn new(kv: impl KvStore + 'static) -> Self {
        Self { kv: Arc::new(kv) }
    }

    pub fn from_arc(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &dyn KvStore {
        self.kv.as_ref()
    }
}
