//! Key-value persistence. Values are opaque JSON documents addressed by string keys.

mod http;
pub mod keys;
mod memory;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

pub use http::HttpKvStore;
pub use memory::MemoryKvStore;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`, `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Overwrite the value stored under `key`.
    async fn put(&self, key: &str, value: &Value) -> Result<()>;
}

pub async fn get_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub async fn put_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value)?;
    store.put(key, &value).await
}
