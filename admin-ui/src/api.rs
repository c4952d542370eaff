//! HTTP Fetcher
//!
//! Panel fragments and dashboard data through `fetch`, via gloo-net.

use admin_shell::{FetchError, FetchResponse, Fetcher};
use async_trait::async_trait;
use gloo_net::http::Request;

/// [`Fetcher`] for the browser; relative URLs resolve against `base_url`
pub struct GlooFetcher {
    base_url: String,
}

impl GlooFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }
}

#[async_trait(?Send)]
impl Fetcher for GlooFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = Request::get(&self.resolve(url))
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        into_fetch_response(status, response.text().await)
    }
}

/// A body that cannot be read fails the request like a dropped connection
fn into_fetch_response(
    status: u16,
    body: Result<String, gloo_net::Error>,
) -> Result<FetchResponse, FetchError> {
    let body = body.map_err(|e| FetchError::Network(e.to_string()))?;
    Ok(FetchResponse::new(status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let fetcher = GlooFetcher::new("http://admin.local");
        assert_eq!(fetcher.resolve("/home"), "http://admin.local/home");
        assert_eq!(fetcher.resolve("https://cdn.example/x"), "https://cdn.example/x");

        let same_origin = GlooFetcher::new("");
        assert_eq!(same_origin.resolve("/debtors"), "/debtors");
    }

    #[test]
    fn test_unreadable_body_is_a_network_error() {
        let aborted = gloo_net::Error::GlooError("body stream aborted".into());
        let err = into_fetch_response(200, Err(aborted)).unwrap_err();
        assert!(matches!(err, FetchError::Network(ref msg) if msg.contains("body stream aborted")));

        let ok = into_fetch_response(200, Ok("<h3>Payments</h3>".into())).unwrap();
        assert_eq!(ok, FetchResponse::new(200, "<h3>Payments</h3>"));
    }
}
