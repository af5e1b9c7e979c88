//! Transport layer for the Spaceship REST API
//!
//! - Credential headers and endpoint handling
//! - Request building with query encoding
//! - Status interpretation and error classification
//! - Explicit connect/request timeouts

pub mod auth;
pub mod builder;
pub mod client;
pub mod error;
pub mod normalizer;
pub mod timeout;

pub use auth::{Credentials, DEFAULT_ENDPOINT};
pub use builder::RequestBuilder;
pub use client::{ClientConfig, SpaceshipClient};
pub use error::ErrorClassification;
pub use normalizer::{normalize_response, success_marker};
pub use timeout::TimeoutConfig;

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
