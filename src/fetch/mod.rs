//! Fetch Port
//!
//! Abstracts the HTTP GETs the shell issues: panel fragments and the
//! dashboard summary. The browser host implements it with `gloo-net`, the
//! native host with `reqwest` ([`HttpFetcher`]).

#[cfg(feature = "native")]
mod http;

#[cfg(feature = "native")]
pub use http::HttpFetcher;

use async_trait::async_trait;
use thiserror::Error;

/// A completed HTTP exchange, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors that prevent a response from arriving at all
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Issues GET requests on behalf of the shell
///
/// Futures are `!Send`: the shell runs on a single UI thread.
#[async_trait(?Send)]
pub trait Fetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}
