//! Multi-valued HTTP query parameters.
//!
//! Each key maps to an ordered list of values. Encoding sorts keys and keeps
//! values in insertion order, so the same parameters always produce the same
//! query string.

use std::collections::BTreeMap;
use std::fmt::Display;

use url::Url;

/// Builder for assembling query parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create a new, empty set of parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Append a value for `key`.
    pub fn push<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Display,
    {
        self.values
            .entry(key.into())
            .or_default()
            .push(value.to_string());
    }

    /// Append a value when it is present.
    pub fn push_opt<T>(&mut self, key: impl Into<String>, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Append every value of an iterator under the same key.
    pub fn push_all<I, T>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let entry = self.values.entry(key.into()).or_default();
        entry.extend(values.into_iter().map(|value| value.to_string()));
    }

    /// Builder-style variant of [`QueryParams::push`].
    #[must_use]
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Display,
    {
        self.push(key, value);
        self
    }

    /// Append all values from `other`, after the values already present.
    pub fn merge(&mut self, other: &Self) {
        for (key, values) in &other.values {
            self.values
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    /// All values recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Flatten into key/value pairs in encoding order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.values
            .iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| (key.as_str(), value.as_str()))
            })
            .collect()
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }

    /// Replace the query component of `url` with these parameters.
    ///
    /// An empty set clears the query entirely.
    pub fn apply_to(&self, url: &mut Url) {
        if self.is_empty() {
            url.set_query(None);
            return;
        }

        url.set_query(None);
        let mut serializer = url.query_pairs_mut();
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
    }

    /// Percent-encoded query string without the leading `?`.
    #[must_use]
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}
