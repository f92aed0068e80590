use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("KV request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Key not found: {key}")]
    NotFound { key: String },

    #[error("KV request failed ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("Invalid KV base URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// True when the key is absent, as opposed to the store failing to answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}
