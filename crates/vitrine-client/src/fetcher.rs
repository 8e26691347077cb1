use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use vitrine_core::error::AppError;
use vitrine_core::traits::Fetcher;

const USER_AGENT: &str = concat!("Vitrine/", env!("CARGO_PKG_VERSION"), " (museum search)");
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// JSON-over-HTTPS fetcher for the museum APIs.
///
/// Makes exactly one attempt per call. A non-2xx status is an error carrying
/// the status code; the adapters decide whether that means "absent".
#[derive(Clone)]
pub struct ReqwestFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let headers = HeaderMap::from_iter([(ACCEPT, HeaderValue::from_static("application/json"))]);
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, timeout })
    }

    fn classify(&self, url: &str, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout.as_secs())
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed for {url}: {e}"))
        } else {
            AppError::HttpError(format!("Request to {url} failed: {e}"))
        }
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        tracing::debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!("HTTP {} for {url}", status.as_u16())));
        }

        response.text().await.map_err(|e| self.classify(url, e))
    }
}
