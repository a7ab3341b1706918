//! Public IP lookup.

use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_LOOKUP_URL: &str = "http://ifconfig.me/ip";

/// Source of the host's current public IP address.
///
/// The address is kept as the raw trimmed string the service returned;
/// the update decision is an exact string comparison, so no parsing or
/// normalization happens here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public IP address.
    async fn fetch(&self) -> Result<String>;
}

/// IP fetcher backed by an external plain-text lookup service.
pub struct IpFetcher {
    client: reqwest::Client,
    url: String,
}

impl IpFetcher {
    /// Create a fetcher against the default lookup service.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_LOOKUP_URL.to_string())
    }

    /// Create a fetcher with a custom URL (for testing).
    pub fn with_url(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, url }
    }
}

impl Default for IpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpSource for IpFetcher {
    async fn fetch(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(DdnsError::IpLookup(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }

        let text = response.text().await?;
        let ip = text.trim().to_string();
        tracing::debug!(ip = %ip, url = %self.url, "Fetched public IP address");
        Ok(ip)
    }
}
