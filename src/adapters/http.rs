use crate::domain::ports::RetryPolicy;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("zodiac-etl/", env!("CARGO_PKG_VERSION"));

/// HTTP GET 包裝，非 2xx 視為錯誤
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, retry })
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!("Making request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// 失敗時依 retry 設定重試，兩次嘗試之間等待固定時間
    pub async fn get_text_with_retry(&self, url: &str) -> Result<String> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.get_text(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        "⚠️ Error fetching {} (attempt {}/{}): {}, retrying...",
                        url,
                        attempt,
                        attempts,
                        e
                    );
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
