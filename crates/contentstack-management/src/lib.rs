//! Client and data models for the Contentstack content management API.
//!
//! A [`ManagementClient`] talks to one API host. Log in with
//! [`ManagementClient::login`] or supply a stack management token, then bind
//! the client to a stack with [`ManagementClient::stack`] and work with its
//! resources:
//!
//! ```no_run
//! # async fn demo() -> contentstack_management::Result<()> {
//! use contentstack_management::{ManagementClient, StackAuth};
//!
//! let client = ManagementClient::new("https://api.contentstack.io")?;
//! let stack = client.stack(StackAuth::new("blt-api-key").with_management_token("cs-token"))?;
//! for content_type in stack.content_types().fetch_all().await? {
//!     println!("{} ({})", content_type.title, content_type.uid);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod entry;
pub mod models;
pub mod resource;
pub mod session;
pub mod stack;

pub use client::{ManagementClient, ManagementClientBuilder};
pub use contentstack_core::config::DEFAULT_BASE_URL;
pub use contentstack_core::{uid, ClientConfig, Error, ErrorMessage, HttpConfig, Transport};
pub use entry::{Entry, EntryInput};
pub use models::{
    ContentType, ContentTypeInput, ContentTypeOptions, Environment, EnvironmentInput,
    EnvironmentUrl, GlobalField, GlobalFieldInput, Locale, LocaleInput, Stack, StackListParams,
    StackSettings, Webhook, WebhookDestination, WebhookHeader, WebhookInput,
};
pub use resource::{Resource, ResourceApi};
pub use session::UserCredentials;
pub use stack::{StackAuth, StackSession};

/// Convenient result alias that reuses the shared Contentstack error type.
pub type Result<T> = contentstack_core::Result<T>;
