//! HTTP client for the update endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use tracing::debug;

use crate::config::{DEFAULT_CHECK_URL, REQUEST_TIMEOUT_MS};
use crate::version::error::SourceError;
use crate::version::source::ReleaseSource;
use crate::version::types::{CheckRequest, ReleaseInfo};

/// Update endpoint client
pub struct HttpReleaseSource {
    client: Client,
    url: String,
}

impl Default for HttpReleaseSource {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_URL.to_string())
    }
}

impl HttpReleaseSource {
    pub fn new(url: String) -> Self {
        Self::with_timeout(url, Duration::from_millis(REQUEST_TIMEOUT_MS))
    }

    pub fn with_timeout(url: String, timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReleaseSource for HttpReleaseSource {
    async fn fetch_release(&self, request: &CheckRequest) -> Result<ReleaseInfo, SourceError> {
        debug!(
            "Checking {} {} against {}",
            request.package_name, request.package_version, self.url
        );

        let response = self.client.put(&self.url).json(request).send().await?;
        let status = response.status();

        let body = response.text().await?;
        let info: ReleaseInfo = serde_json::from_str(&body).map_err(|e| {
            SourceError::InvalidResponse(format!("status {}: {}", status, e))
        })?;

        debug!(
            "Endpoint answered success={} for {}",
            info.success, request.package_name
        );

        Ok(info)
    }
}
