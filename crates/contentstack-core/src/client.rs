//! HTTP transport settings and the shared request pipeline.
//!
//! [`ApiClient`] ties the pieces together: a [`RequestDescriptor`] is resolved
//! against the base address, built into a request, handed to the configured
//! [`Transport`] and the response classified. There is no retry at any step.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::response::classify;
use crate::transport::{LoggingTransport, Transport};

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// User agent sent by the default transport.
pub const USER_AGENT: &str = concat!("contentstack-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP transport configuration.
///
/// Timeouts are unset by default; callers that need a deadline configure one
/// here or wrap calls in `tokio::time::timeout`.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Option<Duration>,

    /// Connect timeout
    pub connect_timeout: Option<Duration>,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Whether to verify TLS certificates
    pub tls_verify: bool,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,

    /// User agent header
    pub user_agent: String,
}

impl HttpConfig {
    /// Create a new HTTP configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            tls_verify: true,
            enable_logging: false,
            enable_compression: true,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Derive transport settings from a [`ClientConfig`].
    #[must_use]
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            tls_verify: config.tls_verify,
            enable_logging: config.debug,
            ..Self::new()
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build a `reqwest` client from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the client cannot be constructed.
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .gzip(self.enable_compression);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if !self.tls_verify {
            warn!("TLS verification disabled for Contentstack client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))
    }

    /// Build the default transport, wrapped for logging when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be constructed.
    pub fn build_transport(&self) -> Result<Arc<dyn Transport>> {
        let client: Arc<dyn Transport> = Arc::new(self.build_http_client()?);
        Ok(self.wrap_transport(client))
    }

    /// Apply the logging decorator to a caller-supplied transport when enabled.
    #[must_use]
    pub fn wrap_transport(&self, transport: Arc<dyn Transport>) -> Arc<dyn Transport> {
        if self.enable_logging {
            Arc::new(LoggingTransport::new(transport))
        } else {
            transport
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Base address plus transport: the request/response pipeline shared by all resources.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a pipeline over an existing transport.
    #[must_use]
    pub fn new(base_url: Url, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url,
            transport,
        }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build and dispatch `descriptor`, returning the raw response.
    ///
    /// The status code is not interpreted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path does not resolve, or
    /// [`Error::Transport`] if the transport fails.
    pub async fn send(&self, descriptor: RequestDescriptor) -> Result<reqwest::Response> {
        let request = descriptor.build(&self.base_url)?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.transport.send(request).await?;
        debug!(status = response.status().as_u16(), "received response");
        Ok(response)
    }

    /// Send `descriptor` and classify the response into `T`.
    ///
    /// # Errors
    ///
    /// Any error from [`ApiClient::send`] or [`crate::response::classify`].
    pub async fn execute<T>(&self, descriptor: RequestDescriptor) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(descriptor).await?;
        classify(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_client(server: &MockServer) -> ApiClient {
        let transport = HttpConfig::new().build_transport().unwrap();
        ApiClient::new(Url::parse(&server.uri()).unwrap(), transport)
    }

    #[test]
    fn test_http_config_new() {
        let config = HttpConfig::new();
        assert!(config.timeout.is_none());
        assert!(config.connect_timeout.is_none());
        assert_eq!(
            config.pool_idle_timeout,
            Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT)
        );
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert!(config.tls_verify);
        assert!(!config.enable_logging);
        assert!(config.enable_compression);
    }

    #[test]
    fn test_http_config_builder() {
        let config = HttpConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(3))
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_tls_verify(false)
            .with_logging(true)
            .with_compression(false)
            .with_user_agent("custom/1.0");

        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.tls_verify);
        assert!(config.enable_logging);
        assert!(!config.enable_compression);
        assert_eq!(config.user_agent, "custom/1.0");
    }

    #[test]
    fn test_http_config_from_client_config() {
        let client_config = ClientConfig::default().with_timeout(10).with_debug(true);
        let config = HttpConfig::from_client_config(&client_config);
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert!(config.enable_logging);
    }

    #[test]
    fn test_pool_constants() {
        assert_eq!(DEFAULT_POOL_IDLE_TIMEOUT, 90);
        assert_eq!(DEFAULT_POOL_MAX_IDLE_PER_HOST, 10);
    }

    #[tokio::test]
    async fn execute_sends_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/content_types/blog/entries"))
            .and(query_param("locale", "en-us"))
            .and(header("accept", "application/json; charset=utf-8"))
            .and(header("content-type", "application/json; charset=utf-8"))
            .and(header("api_key", "blt-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
            .expect(1)
            .mount(&server)
            .await;

        let descriptor = RequestDescriptor::get("/v3/content_types/blog/entries")
            .with_query(crate::QueryParams::new().with("locale", "en-us"))
            .with_header("api_key", "blt-key")
            .unwrap();

        let value: Value = api_client(&server).execute(descriptor).await.unwrap();
        assert_eq!(value, json!({"entries": []}));
    }

    #[tokio::test]
    async fn execute_classifies_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let result: Result<Value> = api_client(&server)
            .execute(RequestDescriptor::delete("/v3/webhooks/nope"))
            .await;
        assert_eq!(result, Err(Error::UnexpectedStatus { code: 404 }));
    }

    #[tokio::test]
    async fn send_returns_raw_response_without_classifying() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let response = api_client(&server)
            .send(RequestDescriptor::get("/v3/settings"))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 503);
    }

    #[tokio::test]
    async fn transport_failure_propagates_without_retry() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Err(Error::Transport("tls handshake failed".to_string())));

        let client = ApiClient::new(
            Url::parse("https://api.contentstack.io").unwrap(),
            Arc::new(mock),
        );
        let result: Result<Value> = client.execute(RequestDescriptor::get("/v3/stacks")).await;
        assert_eq!(
            result,
            Err(Error::Transport("tls handshake failed".to_string()))
        );
    }

    #[tokio::test]
    async fn invalid_path_never_reaches_transport() {
        let mut mock = MockTransport::new();
        mock.expect_send().times(0);

        let client = ApiClient::new(
            Url::parse("https://api.contentstack.io").unwrap(),
            Arc::new(mock),
        );
        let result: Result<Value> = client
            .execute(RequestDescriptor::get("http://[broken"))
            .await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn transport_timeout_surfaces_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let transport = HttpConfig::new()
            .with_timeout(Duration::from_millis(100))
            .build_transport()
            .unwrap();
        let client = ApiClient::new(Url::parse(&server.uri()).unwrap(), transport);

        let result: Result<Value> = client.execute(RequestDescriptor::get("/v3/locales")).await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[tokio::test]
    async fn dropping_the_future_cancels_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = api_client(&server);
        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            client.execute::<Value>(RequestDescriptor::get("/v3/locales")),
        )
        .await;
        assert!(outcome.is_err());
    }
}
