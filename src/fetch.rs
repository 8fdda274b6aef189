//! Loading input documents from disk or over HTTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Request, Response};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Executes HTTP requests; lets callers swap in a stub or a decorated client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Plain reqwest client with conservative timeouts.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

/// Downloads `url` and returns the body, failing on non-success statuses.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Reads `source` from a local path, or fetches it when it is an http(s) URL.
#[tracing::instrument]
pub async fn load_bytes(source: &str) -> Result<Vec<u8>> {
    if is_remote(source) {
        let client = BasicClient::new()?;
        let bytes = fetch_bytes(&client, source).await?;
        debug!(bytes = bytes.len(), "Fetched remote source");
        Ok(bytes)
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
