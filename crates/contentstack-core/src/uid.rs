//! Strongly-typed identifiers for Contentstack resources.
//!
//! Identifiers are opaque strings on the wire. Wrapping them keeps a content
//! type UID from being passed where an environment name is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed string identifier types.
macro_rules! uid_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an identifier without validating it.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Converts into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Parses an identifier that is safe to use as a single path segment.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidUrl`] for empty input, the dot segments
            /// `.` and `..`, or input containing `/`, `?` or `#`.
            pub fn parse(input: &str) -> Result<Self> {
                validate_segment(input).map(|()| Self(input.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

uid_type!(ApiKey, "Stack API key");
uid_type!(ContentTypeUid, "Content type UID");
uid_type!(EntryUid, "Entry UID");
uid_type!(EnvironmentName, "Environment name (environments are addressed by name)");
uid_type!(GlobalFieldUid, "Global field UID");
uid_type!(LocaleCode, "Locale code such as `en-us`");
uid_type!(WebhookUid, "Webhook UID");
uid_type!(StackUid, "Stack UID");
uid_type!(OrganizationUid, "Organization UID");
uid_type!(UserUid, "User UID");

/// Checks that `input` can be appended to a resource path as one segment.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when the input is empty, is a dot segment, or
/// contains a character that would change the path structure.
pub fn validate_segment(input: &str) -> Result<()> {
    if input.is_empty() {
        return Err(Error::InvalidUrl("identifier must not be empty".to_string()));
    }
    // URL resolution collapses these into the parent path.
    if input == "." || input == ".." {
        return Err(Error::InvalidUrl(format!(
            "identifier `{input}` is a relative path segment"
        )));
    }
    if input.contains(['/', '?', '#']) {
        return Err(Error::InvalidUrl(format!(
            "identifier `{input}` contains a reserved path character"
        )));
    }
    Ok(())
}
