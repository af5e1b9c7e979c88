//! Timeout configuration for provider requests
//!
//! Every call is a single attempt, so the request timeout is the upper bound
//! on how long one provider call can block an operation.

use crate::{Error, Result};
use std::time::Duration;

/// Timeout configuration for HTTP requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Total time allowed for the whole request, body included
    pub request_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl TimeoutConfig {
    /// Create a timeout configuration from whole seconds
    pub fn from_secs(connect_secs: u64, request_secs: u64) -> Self {
        Self {
            connect_timeout: Duration::from_secs(connect_secs),
            request_timeout: Duration::from_secs(request_secs),
        }
    }

    /// Override the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate timeout configuration
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout.is_zero() {
            return Err(Error::configuration("Connect timeout cannot be zero"));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::configuration("Request timeout cannot be zero"));
        }

        if self.request_timeout < self.connect_timeout {
            return Err(Error::configuration(
                "Request timeout should be >= connect timeout",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_config_default() {
        let config = TimeoutConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_config_validation() {
        assert!(TimeoutConfig::from_secs(0, 30).validate().is_err());
        assert!(TimeoutConfig::from_secs(10, 0).validate().is_err());
        assert!(TimeoutConfig::from_secs(10, 5).validate().is_err());
        assert!(TimeoutConfig::from_secs(5, 5).validate().is_ok());
    }

    #[test]
    fn test_request_timeout_override() {
        let config = TimeoutConfig::default().with_request_timeout(Duration::from_secs(60));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }
}
