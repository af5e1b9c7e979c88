//! Spaceship Core - registrar integration for the Spaceship domain API
//!
//! This crate drives domain lifecycle operations (registration, transfer,
//! renewal, nameservers, locking) against the Spaceship REST API and returns
//! a uniform success/error result to the calling host.
//!
//! # Main Components
//!
//! - **Normalizer**: domain canonicalization, phone formatting, contact
//!   validation and lifecycle status mapping
//! - **HTTP**: authenticated single-shot transport with status normalization
//! - **Registrar**: multi-step operations built on the transport
//! - **Host**: host parameter decoding and result shaping
//!
//! # Example
//!
//! ```no_run
//! use spaceship_core::{into_host_value, HostParams, Registrar, RegistrarSettings};
//!
//! async fn example(raw: serde_json::Value) -> serde_json::Value {
//!     let params = match HostParams::from_value(raw) {
//!         Ok(params) => params,
//!         Err(err) => return serde_json::json!({ "error": err.to_string() }),
//!     };
//!     let result = match Registrar::from_params(&params, RegistrarSettings::default()) {
//!         Ok(registrar) => registrar.sync(&params).await,
//!         Err(err) => Err(err),
//!     };
//!     into_host_value(result)
//! }
//! ```

pub mod error;
pub mod host;
pub mod http;
pub mod normalizer;
pub mod redaction;
pub mod registrar;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use host::{config_options, into_host_value, metadata, HostParams, HostPayload};
pub use http::{ClientConfig, Credentials, SpaceshipClient, TimeoutConfig};
pub use normalizer::{
    canonicalize_domain, format_phone_number, map_lifecycle_status, validate_contact_data,
    DomainName,
};
pub use registrar::{
    DomainStatus, LockState, NameserverAssignment, Registrar, RegistrarSettings,
    RegistrationOutcome, SyncStatus,
};
pub use types::{ContactRecord, DomainInfo, LifecycleStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
