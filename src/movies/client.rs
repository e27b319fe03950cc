use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::OmdbConfig;

/// Movie metadata lookup. The JSON is handed to the view as-is.
#[async_trait]
pub trait MovieSearch: Send + Sync {
    async fn search(&self, term: &str) -> anyhow::Result<Value>;
}

#[derive(Clone)]
pub struct OmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(cfg: &OmdbConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build omdb http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl MovieSearch for OmdbClient {
    async fn search(&self, term: &str) -> anyhow::Result<Value> {
        let body = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("s", term)])
            .send()
            .await
            .context("omdb request")?
            .error_for_status()
            .context("omdb status")?
            .json::<Value>()
            .await
            .context("omdb response body")?;
        debug!(term, "omdb search done");
        Ok(body)
    }
}
