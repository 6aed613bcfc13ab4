//! Pluggable HTTP transport.
//!
//! The pipeline never talks to the network directly. It hands a fully built
//! [`reqwest::Request`] to a [`Transport`] and gets the raw response back;
//! status codes are interpreted later by the response classifier.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::error::Result;

/// Header names whose values are never written to logs.
const REDACTED_HEADERS: &[&str] = &["authorization", "authtoken", "api_key"];

/// Paths whose request bodies carry credentials and are never written to logs.
const REDACTED_BODY_PATHS: &[&str] = &["/v3/user-session"];

/// Executes HTTP requests.
///
/// Implementations own connection management, TLS and timeouts. Dropping the
/// future returned by [`Transport::send`] must abort the in-flight request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] for connection, DNS, TLS or timeout
    /// failures. Non-success status codes are not errors at this layer.
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        Ok(self.execute(request).await?)
    }
}

/// Transport decorator that dumps requests and responses as `tracing` debug events.
#[derive(Clone)]
pub struct LoggingTransport {
    inner: Arc<dyn Transport>,
}

impl LoggingTransport {
    /// Wrap another transport.
    #[must_use]
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for LoggingTransport {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        debug!(
            method = %request.method(),
            url = %request.url(),
            headers = ?redact(request.headers()),
            body = %loggable_body(&request),
            "REQUEST"
        );

        let result = self.inner.send(request).await;
        match &result {
            Ok(response) => debug!(
                status = response.status().as_u16(),
                url = %response.url(),
                headers = ?redact(response.headers()),
                "RESPONSE"
            ),
            Err(err) => debug!(error = %err, "RESPONSE"),
        }
        result
    }
}

fn loggable_body(request: &reqwest::Request) -> String {
    let Some(bytes) = request.body().and_then(reqwest::Body::as_bytes) else {
        return String::new();
    };
    if REDACTED_BODY_PATHS
        .iter()
        .any(|path| request.url().path().ends_with(path))
    {
        return "[REDACTED]".to_string();
    }
    String::from_utf8_lossy(bytes).into_owned()
}

fn redact(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if REDACTED_HEADERS.contains(&name.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use reqwest::header::HeaderValue;
    use reqwest::Method;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request_for(url: &str) -> reqwest::Request {
        reqwest::Request::new(Method::GET, url.parse().unwrap())
    }

    #[tokio::test]
    async fn reqwest_client_returns_raw_response_for_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/stacks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let request = request_for(&format!("{}/v3/stacks", server.uri()));
        let response = Transport::send(&client, request).await.unwrap();
        assert_eq!(response.status().as_u16(), 500);
    }

    #[tokio::test]
    async fn reqwest_client_maps_connection_failure() {
        let client = reqwest::Client::new();
        // Port 9 (discard) on localhost is not expected to accept HTTP connections.
        let result = Transport::send(&client, request_for("http://127.0.0.1:9/v3/stacks")).await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[tokio::test]
    async fn logging_transport_delegates_errors() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Err(Error::Transport("dns failure".to_string())));

        let transport = LoggingTransport::new(Arc::new(mock));
        let err = transport
            .send(request_for("https://api.contentstack.io/v3/stacks"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::Transport("dns failure".to_string()));
    }

    #[tokio::test]
    async fn logging_transport_delegates_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let transport = LoggingTransport::new(Arc::new(reqwest::Client::new()));
        let response = transport
            .send(request_for(&format!("{}/v3/settings", server.uri())))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    #[test]
    fn redact_hides_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert("authtoken", HeaderValue::from_static("secret"));
        headers.insert("branch", HeaderValue::from_static("main"));

        let shown = redact(&headers);
        assert!(shown.contains(&("authtoken".to_string(), "[REDACTED]".to_string())));
        assert!(shown.contains(&("branch".to_string(), "main".to_string())));
    }

    #[test]
    fn login_body_is_redacted() {
        let mut request = reqwest::Request::new(
            Method::POST,
            "https://api.contentstack.io/v3/user-session".parse().unwrap(),
        );
        *request.body_mut() = Some(r#"{"user":{"password":"hunter2"}}"#.into());

        let shown = loggable_body(&request);
        assert_eq!(shown, "[REDACTED]");
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn other_bodies_are_logged() {
        let mut request = reqwest::Request::new(
            Method::POST,
            "https://api.contentstack.io/v3/content_types".parse().unwrap(),
        );
        *request.body_mut() = Some(r#"{"content_type":{}}"#.into());
        assert_eq!(loggable_body(&request), r#"{"content_type":{}}"#);

        assert_eq!(loggable_body(&request_for("https://api.contentstack.io/v3/stacks")), "");
    }
}
