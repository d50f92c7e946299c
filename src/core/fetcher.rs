use crate::core::DocumentFetcher;
use crate::utils::error::{Result, ResultsError};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("lotto-live/", env!("CARGO_PKG_VERSION"));

/// Plain HTTP GET fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        tracing::debug!("Fetching results page: {} (timeout {:?})", url, timeout);
        // 單次請求的逾時會覆蓋 Client 的預設值
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| timed_out(e, url, timeout))?;
        let status = response.status();
        tracing::debug!("Response status from {}: {}", url, status);

        if !status.is_success() {
            return Err(ResultsError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| timed_out(e, url, timeout))
    }
}

fn timed_out(error: reqwest::Error, url: &str, timeout: Duration) -> ResultsError {
    if error.is_timeout() {
        ResultsError::TimeoutError {
            url: url.to_string(),
            seconds: timeout.as_secs(),
        }
    } else {
        ResultsError::ApiError(error)
    }
}
