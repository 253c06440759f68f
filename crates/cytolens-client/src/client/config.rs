//! Client configuration
//!
//! This module provides configuration structures and builders for the
//! scoped request client.

use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Configuration for the scoped request client
///
/// Contains all the settings needed to configure client behavior, including
/// the base endpoint, timeouts, and the user agent string.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "ConfigBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct ClientConfig {
    /// Base URL of the resource API; relative image locators are rewritten
    /// against this endpoint
    #[builder(setter(custom), default = "ClientConfig::default_base_url()")]
    pub base_url: Url,
    /// Request timeout duration
    #[builder(default = "Duration::from_secs(30)")]
    pub timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// User agent string for requests
    #[builder(default = "ClientConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    fn default_base_url() -> Url {
        "http://localhost:8000/".parse().expect("Valid default URL")
    }

    fn default_user_agent() -> String {
        format!("cytolens-client/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl ConfigBuilder {
    /// Set the base URL of the resource API
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url =
            Some(url.parse().map_err(|e| {
                Error::config(format!("Invalid base URL '{}': {}", url, e))
            })?);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(timeout) = &self.timeout {
            if timeout.is_zero() {
                return Err("Timeout must be greater than 0".to_string());
            }
        }

        if let Some(connect_timeout) = &self.connect_timeout {
            if connect_timeout.is_zero() {
                return Err("Connect timeout must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

impl From<ConfigBuilderError> for Error {
    fn from(err: ConfigBuilderError) -> Self {
        Error::Config {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("cytolens-test/0.0")
            .build()
            .expect("Valid config");

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "cytolens-test/0.0");
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("cytolens-client/"));
    }

    #[test]
    fn test_custom_base_url() {
        let config = ClientConfig::builder()
            .with_base_url("https://api.cytolens.dev/")
            .expect("Valid URL")
            .build()
            .expect("Valid config");

        assert_eq!(config.base_url.as_str(), "https://api.cytolens.dev/");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ClientConfig::builder().with_base_url("not-a-valid-url");

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = ClientConfig::builder()
            .with_timeout(Duration::from_secs(0))
            .build();

        assert!(result.is_err());
    }
}
