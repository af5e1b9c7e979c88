//! Error types for the Spaceship core library
//!
//! Every registrar operation fails with one of these variants. The `Display`
//! text of each variant is the human-readable message handed back to the host
//! in its `{error: ...}` result, so variants carry the final wording rather
//! than a prefix-decorated one.

use crate::http::ErrorClassification;
use serde_json::Value;
use thiserror::Error;

/// Main error type for Spaceship operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing credentials or an unusable client setup
    #[error("{message}")]
    Configuration { message: String },

    /// Missing or malformed host input
    #[error("{message}")]
    Validation {
        /// Wire name of the offending field, when one field is to blame
        field: Option<String>,
        message: String,
    },

    /// The provider reported success but the payload is missing an expected
    /// field or does not match its schema
    #[error("{message}")]
    Protocol { message: String },

    /// The provider answered with a non-2xx status
    #[error("{message}")]
    Provider {
        status_code: u16,
        message: String,
        /// Response body decoded as JSON, when it was JSON
        details: Option<Value>,
    },

    /// No usable response was obtained: connection refused, timeout, TLS
    /// failure, or a body that broke off after the status line
    #[error("{message}")]
    Transport {
        /// Status of the interrupted response, `0` when none arrived
        status_code: u16,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// An expiration date could not be parsed
    #[error("{message}")]
    DateFormat { message: String },

    /// Operation deliberately not offered through the API
    #[error("{message}")]
    Unsupported { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error that is not tied to a single field
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Create the validation error for an empty required field
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            field: Some(field.to_string()),
            message: format!("Missing required field: {}", field),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a date format error
    pub fn date_format(message: impl Into<String>) -> Self {
        Self::DateFormat {
            message: message.into(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Status code half of the `{statusCode, message}` descriptor.
    ///
    /// Provider errors carry the HTTP status. Transport errors carry the
    /// status of a response whose body could not be read, otherwise `0`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Provider { status_code, .. } | Self::Transport { status_code, .. } => {
                *status_code
            }
            _ => 0,
        }
    }

    /// Classification used for log fields and CLI exit codes
    pub fn classification(&self) -> ErrorClassification {
        match self {
            Self::Provider { status_code, .. } => ErrorClassification::from_status(*status_code),
            Self::Transport { .. } => ErrorClassification::NetworkError,
            _ => ErrorClassification::Local,
        }
    }

    /// Short, stable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Validation { .. } => "validation",
            Self::Protocol { .. } => "protocol",
            Self::Provider { .. } => "provider",
            Self::Transport { .. } => "transport",
            Self::DateFormat { .. } => "date_format",
            Self::Unsupported { .. } => "unsupported",
        }
    }

    /// Prefix the message of a remote failure, keeping its variant and status.
    ///
    /// Local errors are returned unchanged: their wording is already final.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            Self::Provider {
                status_code,
                message,
                details,
            } => Self::Provider {
                status_code,
                message: format!("{}: {}", context, message),
                details,
            },
            Self::Transport {
                status_code,
                message,
                source,
            } => Self::Transport {
                status_code,
                message: format!("{}: {}", context, message),
                source,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Protocol {
            message: format!("Unexpected response payload: {}", err),
        }
    }
}
