//! User session login.

use std::fmt;

use contentstack_core::{Error, RequestDescriptor, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::info;

use crate::client::{ManagementClient, USER_SESSION_PATH};

/// Email and password for a user session.
pub struct UserCredentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: SecretString,
    /// Two-factor code, when the account requires one
    pub tfa_token: Option<String>,
}

impl UserCredentials {
    /// Credentials without a two-factor code.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
            tfa_token: None,
        }
    }

    /// Attach a two-factor code.
    #[must_use]
    pub fn with_tfa_token(mut self, token: impl Into<String>) -> Self {
        self.tfa_token = Some(token.into());
        self
    }

    fn payload(&self) -> Value {
        let mut user = json!({
            "email": self.email,
            "password": self.password.expose_secret(),
        });
        if let Some(tfa) = &self.tfa_token {
            user["tfa_token"] = Value::String(tfa.clone());
        }
        json!({ "user": user })
    }
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("tfa_token", &self.tfa_token.is_some())
            .finish()
    }
}

impl ManagementClient {
    /// Log in and store the issued session token on this client.
    ///
    /// Every clone of the client sees the new token. Stack sessions created
    /// without a management token pick it up on their next request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthorized`] for rejected credentials,
    /// [`Error::Decode`] when the response carries no `user.authtoken` string,
    /// or the first pipeline error.
    pub async fn login(&self, credentials: &UserCredentials) -> Result<()> {
        let descriptor =
            RequestDescriptor::post(USER_SESSION_PATH).with_json(&credentials.payload())?;
        let body: Value = self.api().execute(descriptor).await?;

        let token = extract_token(&body)?;
        self.set_auth_token(token);
        info!(email = %credentials.email, "logged in");
        Ok(())
    }
}

fn extract_token(body: &Value) -> Result<&str> {
    let user = body
        .get("user")
        .ok_or_else(|| Error::Decode("login response has no `user` object".to_string()))?;
    match user.get("authtoken") {
        Some(Value::String(token)) => Ok(token.as_str()),
        Some(_) => Err(Error::Decode(
            "`user.authtoken` in login response is not a string".to_string(),
        )),
        None => Err(Error::Decode("login response has no `user.authtoken`".to_string())),
    }
}
