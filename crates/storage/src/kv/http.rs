use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url, header::CONTENT_TYPE};
use serde_json::Value;

use super::KvStore;
use crate::error::{Result, StorageError};

/// Client for a namespaced key-value service exposing `GET`/`PUT {base}/{namespace}/{key}`.
pub struct HttpKvStore {
    client: Client,
    base_url: Url,
}

impl HttpKvStore {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Root of the KV API (e.g., "https://api.tencentcloudapi.com/kv")
    /// * `namespace` - Namespace identifier appended as the first path segment
    /// * `timeout` - Upper bound for a single store request
    pub fn new(base_url: &str, namespace: &str, timeout: Duration) -> Result<Self> {
        let mut url =
            Url::parse(base_url).map_err(|e| StorageError::InvalidUrl(format!("{base_url}: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| StorageError::InvalidUrl(format!("{base_url}: cannot be a base")))?
            .pop_if_empty()
            .push(namespace);

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn key_url(&self, key: &str) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(key);
        }
        url
    }

    async fn failure(response: Response) -> StorageError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else {
            body
        };

        StorageError::Unavailable {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl KvStore for HttpKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        tracing::debug!("KV GET {}", key);

        let response = self
            .client
            .get(self.key_url(key))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let error = Self::failure(response).await;
            tracing::warn!("KV GET {} failed: {}", key, error);
            return Err(error);
        }

        let bytes = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn put(&self, key: &str, value: &Value) -> Result<()> {
        tracing::debug!("KV PUT {}", key);

        let response = self.client.put(self.key_url(key)).json(value).send().await?;

        if !response.status().is_success() {
            let error = Self::failure(response).await;
            tracing::warn!("KV PUT {} failed: {}", key, error);
            return Err(error);
        }

        Ok(())
    }
}
