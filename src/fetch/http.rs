//! reqwest-backed fetcher for the native host

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{FetchError, FetchResponse, Fetcher};

/// Fetches panel URLs relative to a backend base URL
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url` (e.g. "http://localhost:5000")
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a panel path; absolute URLs pass through
    pub fn resolve(&self, url: &str) -> Result<String, FetchError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        if !url.starts_with('/') {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }
        Ok(format!("{}{}", self.base_url, url))
    }
}

#[async_trait(?Send)]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let full_url = self.resolve(url)?;

        let response = self
            .client
            .get(&full_url)
            .header(reqwest::header::ACCEPT, "text/html, application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        tracing::debug!(url = %full_url, status, bytes = body.len(), "GET completed");
        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let fetcher = HttpFetcher::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();

        assert_eq!(fetcher.base_url(), "http://localhost:5000");
        assert_eq!(fetcher.resolve("/home").unwrap(), "http://localhost:5000/home");
        assert_eq!(
            fetcher.resolve("https://admin.example.com/debtors").unwrap(),
            "https://admin.example.com/debtors"
        );
        assert!(matches!(fetcher.resolve("home"), Err(FetchError::InvalidUrl(_))));
    }
}
