use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result, bail};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_KV_BASE_URL: &str = "https://api.tencentcloudapi.com/kv";
const DEFAULT_KV_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvBackend {
    Http,
    Memory,
}

impl FromStr for KvBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "memory" => Ok(Self::Memory),
            other => bail!("KV_BACKEND must be 'http' or 'memory', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub kv_backend: KvBackend,
    pub kv_base_url: String,
    pub kv_namespace_id: String,
    pub kv_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let kv_backend = match lookup("KV_BACKEND") {
            Some(backend) => backend.parse()?,
            None => KvBackend::Http,
        };

        let kv_namespace_id = match kv_backend {
            KvBackend::Http => lookup("KV_NAMESPACE_ID")
                .filter(|id| !id.trim().is_empty())
                .context("Cannot load KV_NAMESPACE_ID env variable")?,
            KvBackend::Memory => lookup("KV_NAMESPACE_ID").unwrap_or_default(),
        };

        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a number")?,
            None => DEFAULT_PORT,
        };

        let kv_timeout_secs = match lookup("KV_TIMEOUT_SECS") {
            Some(secs) => secs.parse().context("KV_TIMEOUT_SECS must be a number")?,
            None => DEFAULT_KV_TIMEOUT_SECS,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            kv_backend,
            kv_base_url: lookup("KV_BASE_URL").unwrap_or_else(|| DEFAULT_KV_BASE_URL.to_string()),
            kv_namespace_id,
            kv_timeout: Duration::from_secs(kv_timeout_secs),
        })
    }
}
