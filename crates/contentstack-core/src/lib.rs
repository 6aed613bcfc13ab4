//! # contentstack-core
//!
//! Shared plumbing for the Contentstack management API client.
//!
//! Every API call flows through the same pipeline: a relative path is resolved
//! against the configured base address, a request is built with JSON headers,
//! an injected transport sends it, and the response is classified by status
//! code into a decoded value or a typed error.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and the structured 422 error body
//! - [`config`] - Serializable, validated client configuration
//! - [`endpoint`] - Base address parsing and path resolution
//! - [`query`] - Multi-valued query parameters
//! - [`request`] - Request descriptors
//! - [`transport`] - Pluggable transport trait and logging decorator
//! - [`response`] - Status-code based response classification
//! - [`client`] - HTTP settings and the request pipeline
//! - [`uid`] - Strongly-typed resource identifiers

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
pub mod uid;

pub use client::{ApiClient, HttpConfig};
pub use config::ClientConfig;
pub use error::{Error, ErrorMessage, Result};
pub use query::QueryParams;
pub use request::RequestDescriptor;
pub use transport::{LoggingTransport, Transport};
