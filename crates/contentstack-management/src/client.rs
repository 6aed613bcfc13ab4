//! Management API client.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use contentstack_core::endpoint::parse_base_url;
use contentstack_core::{
    ApiClient, ClientConfig, Error, HttpConfig, RequestDescriptor, Result, Transport,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use url::Url;

use crate::models::{Stack, StackListParams};
use crate::resource::unwrap_envelope;
use crate::stack::{StackAuth, StackSession, AUTHTOKEN_HEADER};

const USER_AGENT: &str = concat!("contentstack-management/", env!("CARGO_PKG_VERSION"));

pub(crate) const USER_SESSION_PATH: &str = "/v3/user-session";
pub(crate) const STACKS_PATH: &str = "/v3/stacks";

/// Builder for [`ManagementClient`].
pub struct ManagementClientBuilder {
    base_url: Url,
    auth_token: Option<SecretString>,
    http: HttpConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for ManagementClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementClientBuilder")
            .field("base_url", &self.base_url.as_str())
            .field("auth_token", &self.auth_token.is_some())
            .field("http", &self.http)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl ManagementClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` cannot serve as a base address.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url.as_ref())?,
            auth_token: None,
            http: HttpConfig::new().with_user_agent(USER_AGENT),
            transport: None,
        })
    }

    /// Create a builder from a serialized configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid, or
    /// [`Error::InvalidUrl`] if its base URL cannot serve as a base address.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.check()?;
        let mut builder = Self::new(&config.base_url)?
            .with_http_config(HttpConfig::from_client_config(config).with_user_agent(USER_AGENT));
        if let Some(token) = &config.auth_token {
            builder = builder.with_auth_token(token.clone());
        }
        Ok(builder)
    }

    /// Start with a session token already stored.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(SecretString::from(token.into()));
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.http = config;
        self
    }

    /// Send requests through `transport` instead of a fresh `reqwest::Client`.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Dump every request and response as `tracing` debug events.
    #[must_use]
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.http = self.http.with_logging(enabled);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ManagementClient> {
        let transport = match self.transport {
            Some(transport) => self.http.wrap_transport(transport),
            None => self.http.build_transport()?,
        };

        Ok(ManagementClient {
            api: ApiClient::new(self.base_url, transport),
            auth_token: Arc::new(RwLock::new(self.auth_token)),
        })
    }
}

/// Client for the content management API.
///
/// Cloning is cheap; all clones share the transport and the stored session
/// token. Only [`ManagementClient::login`] and
/// [`ManagementClient::set_auth_token`] replace that token. The swap is
/// atomic, but requests already in flight keep the token they started with,
/// so callers that need every request to observe a new login must order the
/// calls themselves.
#[derive(Clone)]
pub struct ManagementClient {
    api: ApiClient,
    auth_token: Arc<RwLock<Option<SecretString>>>,
}

impl fmt::Debug for ManagementClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementClient")
            .field("api", &self.api)
            .field("has_auth_token", &self.has_auth_token())
            .finish()
    }
}

impl ManagementClient {
    /// Construct a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] or [`Error::ConfigError`] as the builder does.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ManagementClientBuilder::new(base_url)?.build()
    }

    /// Start building a client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` cannot serve as a base address.
    pub fn builder(base_url: impl AsRef<str>) -> Result<ManagementClientBuilder> {
        ManagementClientBuilder::new(base_url)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// The stored session token, if any.
    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.auth_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| token.expose_secret().to_string())
    }

    /// Whether a session token is stored.
    #[must_use]
    pub fn has_auth_token(&self) -> bool {
        self.auth_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the stored session token.
    pub fn set_auth_token(&self, token: impl Into<String>) {
        *self
            .auth_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(SecretString::from(token.into()));
    }

    /// Bind this client to a stack.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if `auth` has no management token
    /// and no session token is stored.
    pub fn stack(&self, auth: StackAuth) -> Result<StackSession> {
        StackSession::new(self.clone(), auth)
    }

    /// List the stacks visible to the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] when no session token is stored,
    /// [`Error::Decode`] when the response has no `stacks` member, otherwise the
    /// first pipeline error.
    pub async fn stacks(&self, params: &StackListParams) -> Result<Vec<Stack>> {
        let token = self.auth_token().ok_or_else(|| {
            Error::MissingCredentials("listing stacks requires a session token".to_string())
        })?;

        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&token)?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(AUTHTOKEN_HEADER), value);
        if let Some(organization) = &params.organization_uid {
            headers.insert(
                HeaderName::from_static("organization_uid"),
                HeaderValue::from_str(organization.as_str())?,
            );
        }

        let descriptor = RequestDescriptor::get(STACKS_PATH)
            .with_query(params.to_query())
            .with_headers(headers);
        let body: Map<String, Value> = self.api.execute(descriptor).await?;
        unwrap_envelope(body, "stacks")
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }
}
