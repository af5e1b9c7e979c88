//! Authentication handling for the Spaceship API
//!
//! Spaceship authenticates every call with a key/secret header pair.

use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::fmt;

/// Default production endpoint
pub const DEFAULT_ENDPOINT: &str = "https://spaceship.dev/api/v1";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Header carrying the API secret
pub const API_SECRET_HEADER: &str = "X-API-Secret";

const MISSING_CREDENTIALS: &str = "API credentials are missing.";

/// API key, secret and base endpoint for one client instance
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
    endpoint: String,
}

impl Credentials {
    /// Create credentials; a trailing `/` on the endpoint is dropped
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Base endpoint without trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fail with a configuration error unless key, secret and endpoint are set
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty()
            || self.api_secret.trim().is_empty()
            || self.endpoint.trim().is_empty()
        {
            return Err(Error::configuration(MISSING_CREDENTIALS));
        }
        Ok(())
    }

    /// Apply the fixed authentication and content-type headers
    pub fn apply_auth(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            header_value(&self.api_key, API_KEY_HEADER)?,
        );
        headers.insert(
            HeaderName::from_static("x-api-secret"),
            header_value(&self.api_secret, API_SECRET_HEADER)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(())
    }
}

fn header_value(value: &str, header: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        Error::configuration(format!("{} contains characters not allowed in a header", header))
    })?;
    value.set_sensitive(true);
    Ok(value)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_auth_headers() {
        let credentials = Credentials::new("key-123", "secret-456", DEFAULT_ENDPOINT);
        let mut headers = HeaderMap::new();

        credentials.apply_auth(&mut headers).unwrap();

        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "key-123");
        assert_eq!(headers.get(API_SECRET_HEADER).unwrap(), "secret-456");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_missing_credentials() {
        for credentials in [
            Credentials::new("", "secret", DEFAULT_ENDPOINT),
            Credentials::new("key", " ", DEFAULT_ENDPOINT),
            Credentials::new("key", "secret", ""),
        ] {
            let err = credentials.validate().unwrap_err();
            assert_eq!(err.to_string(), "API credentials are missing.");
            assert_eq!(err.kind(), "configuration");
        }
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let credentials = Credentials::new("k", "s", "https://spaceship.dev/api/v1/");
        assert_eq!(credentials.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("key-123", "secret-456", DEFAULT_ENDPOINT);
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("key-123"));
        assert!(!rendered.contains("secret-456"));
        assert!(rendered.contains("spaceship.dev"));
    }

    #[test]
    fn test_invalid_header_value() {
        let credentials = Credentials::new("bad\nkey", "secret", DEFAULT_ENDPOINT);
        let mut headers = HeaderMap::new();
        assert!(credentials.apply_auth(&mut headers).is_err());
    }
}
