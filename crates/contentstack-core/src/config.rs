//! Configuration structures for Contentstack clients.
//!
//! [`ClientConfig`] is the serializable, validated description of where the
//! management API lives and how to reach it. It is immutable once a client has
//! been built from it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::endpoint::parse_base_url;
use crate::Error;

/// Default management API host.
pub const DEFAULT_BASE_URL: &str = "https://api.contentstack.io/";

/// Configuration for a management client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientConfig {
    /// Base address every resource path is resolved against
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Session token used when a stack has no management token
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,

    /// Whole-request timeout in seconds (none by default)
    #[validate(range(min = 1, max = 300))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Connect timeout in seconds (none by default)
    #[validate(range(min = 1, max = 60))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Dump requests and responses as debug events
    #[serde(default)]
    pub debug: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_tls_verify() -> bool {
    true
}

impl ClientConfig {
    /// Create a new client configuration for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL fails validation.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };

        config.check()?;
        Ok(config)
    }

    /// Validate a configuration obtained some other way, e.g. deserialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the first invalid setting.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Set the session token.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set the connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = Some(seconds);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Enable or disable request/response dumps.
    #[must_use]
    pub const fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Request timeout as a Duration, if set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Connect timeout as a Duration, if set.
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Parse the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL cannot serve as a base.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        parse_base_url(&self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            request_timeout_secs: None,
            connect_timeout_secs: None,
            tls_verify: default_tls_verify(),
            debug: false,
        }
    }
}
