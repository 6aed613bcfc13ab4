//! Error types for Contentstack management operations.
//!
//! Every layer of the request pipeline returns the first error it encounters.
//! Response classification maps HTTP status codes onto the variants below; the
//! remaining variants cover misconfiguration detected before any request is sent.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Contentstack operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Base address or relative path is not a valid URI reference
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection, DNS, TLS, timeout or cancellation failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body is not valid JSON or does not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request payload could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// Server answered 401
    #[error("Not authorized")]
    NotAuthorized,

    /// Server answered 422 with structured field errors
    #[error("Validation failed: {0}")]
    Validation(ErrorMessage),

    /// Server answered with a status the classifier does not handle
    #[error("Unhandled status code: {code}")]
    UnexpectedStatus {
        /// Raw HTTP status code
        code: u16,
    },

    /// Header name or value cannot be sent over HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Neither a management token nor a session token is available
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Specialized result type for Contentstack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error body returned with a 422 response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    /// Human-readable message
    #[serde(default)]
    pub error_message: String,
    /// Numeric error code
    #[serde(default)]
    pub error_code: i64,
    /// Validation messages keyed by field name
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorMessage {
    /// Messages reported for a single field.
    #[must_use]
    pub fn field_errors(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.error_message, self.error_code)
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Encode(_) => "ENCODE_ERROR",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::InvalidHeader(_) => "INVALID_HEADER",
            Self::MissingCredentials(_) => "MISSING_CREDENTIALS",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Returns true when the error was raised before anything reached the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_)
                | Self::Encode(_)
                | Self::InvalidHeader(_)
                | Self::MissingCredentials(_)
                | Self::ConfigError(_)
        )
    }

    /// Structured validation detail, present only for 422 responses.
    #[must_use]
    pub const fn validation_detail(&self) -> Option<&ErrorMessage> {
        match self {
            Self::Validation(detail) => Some(detail),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for Error {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}
