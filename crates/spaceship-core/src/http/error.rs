//! HTTP error classification and normalization
//!
//! Turns provider failure responses and transport failures into the crate's
//! `Error` variants, extracting the provider's human-readable message.

use crate::Error;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Message used when a failure carries nothing readable at all
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Coarse classification of a failed call, used for log fields and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    /// Client errors (4xx) other than the ones below
    ClientError,
    /// 401 / 403
    AuthenticationError,
    /// 404
    NotFound,
    /// 429
    RateLimitError,
    /// Server errors (5xx)
    ServerError,
    /// No response was obtained
    NetworkError,
    /// Failure detected before any request was sent
    Local,
    /// Any other status
    Unknown,
}

impl ErrorClassification {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => ErrorClassification::AuthenticationError,
            404 => ErrorClassification::NotFound,
            429 => ErrorClassification::RateLimitError,
            400..=499 => ErrorClassification::ClientError,
            500..=599 => ErrorClassification::ServerError,
            _ => ErrorClassification::Unknown,
        }
    }
}

impl fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClassification::ClientError => "client_error",
            ErrorClassification::AuthenticationError => "authentication_error",
            ErrorClassification::NotFound => "not_found",
            ErrorClassification::RateLimitError => "rate_limit_error",
            ErrorClassification::ServerError => "server_error",
            ErrorClassification::NetworkError => "network_error",
            ErrorClassification::Local => "local",
            ErrorClassification::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Build a provider error from a non-2xx status and its raw body
pub fn provider_error(status: StatusCode, body: &str) -> Error {
    let details = serde_json::from_str::<Value>(body).ok();
    let message = extract_provider_message(details.as_ref(), body);

    Error::Provider {
        status_code: status.as_u16(),
        message,
        details,
    }
}

/// Build a transport error from a failed request
pub fn transport_error(error: reqwest::Error) -> Error {
    let message = if error.is_timeout() {
        format!("Request timed out: {}", error)
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    Error::Transport {
        status_code: 0,
        message,
        source: Some(error),
    }
}

/// Build a transport error for a response whose body broke off after the
/// status arrived
pub fn body_read_error(status: StatusCode, error: reqwest::Error) -> Error {
    Error::Transport {
        status_code: status.as_u16(),
        message: format!("Failed to read response body: {}", error),
        source: Some(error),
    }
}

/// Extract the provider's error message.
///
/// Spaceship reports failures as `{"detail": "..."}`; a generic `message`
/// field and the raw body are accepted as fallbacks.
fn extract_provider_message(details: Option<&Value>, body: &str) -> String {
    if let Some(json) = details {
        for key in ["detail", "message"] {
            if let Some(message) = json.get(key).and_then(|m| m.as_str()) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }

        // Structured JSON without a message field is not a readable message
        return UNKNOWN_ERROR.to_string();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        trimmed.to_string()
    }
}
