//! Stack sessions: a client bound to one stack's credentials.

use std::fmt;
use std::sync::Arc;

use contentstack_core::uid::{validate_segment, ApiKey, ContentTypeUid, LocaleCode};
use contentstack_core::{Error, RequestDescriptor, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::ManagementClient;
use crate::entry::Entry;
use crate::models::{ContentType, Environment, GlobalField, Locale, StackSettings, Webhook};
use crate::resource::{unwrap_envelope, ResourceApi};

/// Header carrying the stack API key.
pub const API_KEY_HEADER: &str = "api_key";
/// Header carrying a stack management token.
pub const AUTHORIZATION_HEADER: &str = "authorization";
/// Header carrying a user session token.
pub const AUTHTOKEN_HEADER: &str = "authtoken";
/// Header selecting a content branch.
pub const BRANCH_HEADER: &str = "branch";

/// Credentials identifying one stack.
pub struct StackAuth {
    /// Stack API key.
    pub api_key: ApiKey,
    /// Stack management token; when absent the client's session token is used.
    pub management_token: Option<SecretString>,
    /// Content branch.
    pub branch: Option<String>,
}

impl StackAuth {
    /// Credentials for `api_key` with no management token or branch.
    #[must_use]
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: api_key.into(),
            management_token: None,
            branch: None,
        }
    }

    /// Set the management token.
    #[must_use]
    pub fn with_management_token(mut self, token: impl Into<String>) -> Self {
        self.management_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the content branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

impl fmt::Debug for StackAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackAuth")
            .field("api_key", &self.api_key)
            .field("management_token", &self.management_token.is_some())
            .field("branch", &self.branch)
            .finish()
    }
}

/// A client bound to one stack.
///
/// Sessions hold only immutable credentials plus a handle to the client, so
/// they can be cloned and shared across tasks freely.
#[derive(Clone)]
pub struct StackSession {
    client: ManagementClient,
    auth: Arc<StackAuth>,
}

impl fmt::Debug for StackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackSession")
            .field("client", &self.client)
            .field("auth", &self.auth)
            .finish()
    }
}

impl StackSession {
    /// Bind `client` to a stack.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] when `auth` carries no management
    /// token and the client holds no session token.
    pub fn new(client: ManagementClient, auth: StackAuth) -> Result<Self> {
        if auth.management_token.is_none() && !client.has_auth_token() {
            return Err(Error::MissingCredentials(
                "the management token is required when no auth token is used".to_string(),
            ));
        }

        Ok(Self {
            client,
            auth: Arc::new(auth),
        })
    }

    /// The stack API key.
    #[must_use]
    pub fn api_key(&self) -> &ApiKey {
        &self.auth.api_key
    }

    /// The selected branch, if any.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.auth.branch.as_deref()
    }

    /// The client this session was created from.
    #[must_use]
    pub fn client(&self) -> &ManagementClient {
        &self.client
    }

    /// Headers identifying this stack.
    ///
    /// The session token is read at call time, so a login performed after the
    /// session was created is picked up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] for credentials that cannot be sent, or
    /// [`Error::MissingCredentials`] if no token is available any more.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(self.auth.api_key.as_str())?,
        );

        match &self.auth.management_token {
            Some(token) => {
                headers.insert(
                    HeaderName::from_static(AUTHORIZATION_HEADER),
                    sensitive(token.expose_secret())?,
                );
            }
            None => {
                let token = self.client.auth_token().ok_or_else(|| {
                    Error::MissingCredentials("no session token is available".to_string())
                })?;
                headers.insert(
                    HeaderName::from_static(AUTHTOKEN_HEADER),
                    sensitive(&token)?,
                );
            }
        }

        if let Some(branch) = &self.auth.branch {
            headers.insert(
                HeaderName::from_static(BRANCH_HEADER),
                HeaderValue::from_str(branch)?,
            );
        }

        Ok(headers)
    }

    /// Content types of this stack.
    #[must_use]
    pub fn content_types(&self) -> ResourceApi<'_, ContentType> {
        ResourceApi::new(self, "/v3/content_types")
    }

    /// Entries of one content type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `content_type` is not a single path segment.
    pub fn entries(&self, content_type: &ContentTypeUid) -> Result<ResourceApi<'_, Entry>> {
        validate_segment(content_type.as_str())?;
        Ok(ResourceApi::new(self, format!("/v3/content_types/{content_type}/entries")))
    }

    /// Entries of one content type, restricted to `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `content_type` is not a single path segment.
    pub fn localized_entries(
        &self,
        content_type: &ContentTypeUid,
        locale: &LocaleCode,
    ) -> Result<ResourceApi<'_, Entry>> {
        Ok(self.entries(content_type)?.with_locale(locale))
    }

    /// Publishing environments of this stack.
    #[must_use]
    pub fn environments(&self) -> ResourceApi<'_, Environment> {
        ResourceApi::new(self, "/v3/environments")
    }

    /// Global fields of this stack.
    #[must_use]
    pub fn global_fields(&self) -> ResourceApi<'_, GlobalField> {
        ResourceApi::new(self, "/v3/global_fields")
    }

    /// Locales enabled on this stack.
    #[must_use]
    pub fn locales(&self) -> ResourceApi<'_, Locale> {
        ResourceApi::new(self, "/v3/locales")
    }

    /// Webhooks of this stack.
    #[must_use]
    pub fn webhooks(&self) -> ResourceApi<'_, Webhook> {
        ResourceApi::new(self, "/v3/webhooks")
    }

    /// Read the stack settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the response has no `stack_settings`
    /// member, otherwise the first pipeline error.
    pub async fn settings(&self) -> Result<StackSettings> {
        let body: Map<String, Value> = self
            .execute(RequestDescriptor::get("/v3/settings"))
            .await?;
        let settings: Option<StackSettings> = unwrap_envelope(body, "stack_settings")?;
        Ok(settings.unwrap_or_default())
    }

    pub(crate) async fn execute<T>(&self, descriptor: RequestDescriptor) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let descriptor = descriptor.with_headers(self.headers()?);
        self.client.api().execute(descriptor).await
    }
}

fn sensitive(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)?;
    value.set_sensitive(true);
    Ok(value)
}
