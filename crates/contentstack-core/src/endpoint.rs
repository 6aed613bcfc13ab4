//! Resolution of relative resource paths against the configured base address.

use url::Url;

use crate::error::{Error, Result};

/// Parses a base address.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when the input is not an absolute URL that can
/// serve as a base for relative references.
pub fn parse_base_url(input: &str) -> Result<Url> {
    let url = Url::parse(input)
        .map_err(|err| Error::InvalidUrl(format!("Invalid base URL `{input}`: {err}")))?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(format!(
            "Base URL `{input}` cannot be used to resolve paths"
        )));
    }

    Ok(url)
}

/// Resolves `path` against `base` using standard reference resolution.
///
/// An absolute path replaces the path component of `base`; the query and
/// fragment of `base` are discarded.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if `path` is not a valid URI reference.
pub fn resolve_endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut url = base
        .join(path)
        .map_err(|err| Error::InvalidUrl(format!("Invalid path `{path}`: {err}")))?;
    url.set_fragment(None);
    Ok(url)
}
