use async_trait::async_trait;
use tracing::debug;

use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::traits::Fetcher;

/// reqwest による `Fetcher` 実装。リトライはしない
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FilterConfig) -> Result<Self, FilterError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FilterError::ClientInit(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FilterError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FilterError::Fetch(format!("{}: {}", url, e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| FilterError::Fetch(format!("{}: {}", url, e)))?;

        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}
