//! Response normalization for Spaceship API responses
//!
//! Maps a raw status/body pair onto the uniform success/error contract:
//!
//! - `202 Accepted` and `204 No Content` carry no useful payload and become
//!   the success marker without looking at the body
//! - any other `2xx` yields its decoded JSON body, or the success marker when
//!   the body is empty or not JSON
//! - everything else becomes an [`Error::Provider`](crate::Error::Provider)

use crate::http::error::provider_error;
use crate::Result;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// The `{"success": true}` value synthesized for payload-less successes
pub fn success_marker() -> Value {
    json!({ "success": true })
}

/// Whether a status is answered with the success marker without reading the body
pub fn is_payloadless(status: StatusCode) -> bool {
    matches!(status, StatusCode::ACCEPTED | StatusCode::NO_CONTENT)
}

/// Normalize a provider response into a success payload or a provider error
pub fn normalize_response(status: StatusCode, body: &str) -> Result<Value> {
    if is_payloadless(status) {
        return Ok(success_marker());
    }

    if status.is_success() {
        return Ok(serde_json::from_str::<Value>(body).unwrap_or_else(|_| success_marker()));
    }

    Err(provider_error(status, body))
}

/// Decode a normalized success payload into its schema type
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}
