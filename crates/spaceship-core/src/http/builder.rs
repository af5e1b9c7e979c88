//! HTTP request builder for Spaceship API requests
//!
//! Joins endpoint-relative paths onto the configured base URI, encodes query
//! pairs and applies the authentication headers.

use crate::http::auth::Credentials;
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Builder for constructing authenticated provider requests
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    credentials: Credentials,
}

impl RequestBuilder {
    /// Create a new RequestBuilder for the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Build a request for an endpoint-relative path such as `domains/example.com`
    pub fn build_request(
        &self,
        client: &reqwest::Client,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<reqwest::Request> {
        let url = self.build_url(path, query)?;

        let mut headers = HeaderMap::new();
        self.credentials.apply_auth(&mut headers)?;

        let mut request_builder = client.request(method, url).headers(headers);
        if let Some(body) = body {
            request_builder = request_builder.json(body);
        }

        request_builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build request: {}", e)))
    }

    /// Build the full URL from the base endpoint, path and query pairs.
    ///
    /// `Url::join` would drop the last segment of a base without a trailing
    /// slash (`.../api/v1`), so the path is appended textually.
    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let raw = format!(
            "{}/{}",
            self.credentials.endpoint(),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| {
            Error::configuration(format!(
                "Invalid API endpoint {}: {}",
                self.credentials.endpoint(),
                e
            ))
        })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}
