//! Request descriptors and their conversion into HTTP requests.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::endpoint::resolve_endpoint;
use crate::error::{Error, Result};
use crate::query::QueryParams;

/// Media type sent in both `Accept` and `Content-Type` on every request.
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Everything needed to issue one API call.
///
/// Built fresh for each call and consumed when the request is sent.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base address
    pub path: String,
    /// Query parameters
    pub query: QueryParams,
    /// Caller-supplied headers (multi-valued)
    pub headers: HeaderMap,
    /// Optional encoded body
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    /// Create a descriptor with no query, headers or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Shorthand for a `GET` descriptor.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a `POST` descriptor.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Shorthand for a `PUT` descriptor.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Shorthand for a `DELETE` descriptor.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replace the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Append every header from `headers`.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in &headers {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Append a single header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the name or value cannot be sent.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Attach raw body bytes.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `payload` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if serialization fails.
    pub fn with_json<B>(self, payload: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload).map_err(|err| Error::Encode(err.to_string()))?;
        Ok(self.with_body(body))
    }

    /// Resolve against `base` and build the HTTP request.
    ///
    /// `Accept` and `Content-Type` are always set to JSON with UTF-8 charset,
    /// replacing any caller-supplied values for those two headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path cannot be resolved.
    pub fn build(self, base: &Url) -> Result<reqwest::Request> {
        let mut url = resolve_endpoint(base, &self.path)?;
        self.query.apply_to(&mut url);

        let mut request = reqwest::Request::new(self.method, url);
        let headers = request.headers_mut();
        for (name, value) in &self.headers {
            headers.append(name.clone(), value.clone());
        }
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_UTF8));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));

        if let Some(body) = self.body {
            *request.body_mut() = Some(body.into());
        }

        Ok(request)
    }
}
