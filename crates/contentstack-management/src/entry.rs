//! Entries: typed metadata plus an open map of user-defined fields.

use chrono::{DateTime, Utc};
use contentstack_core::query::QueryParams;
use contentstack_core::uid::{EntryUid, LocaleCode, UserUid};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::resource::{Resource, ResourceApi};

/// Keys decoded into [`Entry`] metadata and never present in [`Entry::fields`].
pub const METADATA_KEYS: [&str; 11] = [
    "uid",
    "created_at",
    "updated_at",
    "created_by",
    "updated_by",
    "locale",
    "_version",
    "tags",
    "ACL",
    "_in_progress",
    "publish_details",
];

/// A content entry.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Entry {
    /// Entry identifier
    pub uid: EntryUid,

    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserUid>,

    /// Last modifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserUid>,

    /// Locale of this version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<LocaleCode>,

    /// Revision number
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Access control list
    #[serde(rename = "ACL", skip_serializing_if = "Option::is_none")]
    pub acl: Option<Value>,

    /// Whether the entry is still being edited
    #[serde(rename = "_in_progress", skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<bool>,

    /// Publishing state per environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_details: Option<Value>,

    /// User-defined fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct EntryMetadata {
    #[serde(default)]
    uid: EntryUid,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    created_by: Option<UserUid>,
    #[serde(default)]
    updated_by: Option<UserUid>,
    #[serde(default)]
    locale: Option<LocaleCode>,
    #[serde(default, rename = "_version")]
    version: Option<u32>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default, rename = "ACL")]
    acl: Option<Value>,
    #[serde(default, rename = "_in_progress")]
    in_progress: Option<bool>,
    #[serde(default)]
    publish_details: Option<Value>,
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;
        let metadata = EntryMetadata::deserialize(Value::Object(fields.clone()))
            .map_err(serde::de::Error::custom)?;

        for key in METADATA_KEYS {
            fields.remove(key);
        }

        Ok(Self {
            uid: metadata.uid,
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
            created_by: metadata.created_by,
            updated_by: metadata.updated_by,
            locale: metadata.locale,
            version: metadata.version,
            tags: metadata.tags.unwrap_or_default(),
            acl: metadata.acl,
            in_progress: metadata.in_progress,
            publish_details: metadata.publish_details,
            fields,
        })
    }
}

impl Entry {
    /// Look up a user-defined field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Payload for creating or updating an entry.
///
/// The locale travels as a query parameter, not in the body.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EntryInput {
    /// Locale to write
    #[serde(skip)]
    pub locale: Option<LocaleCode>,

    /// User-defined fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntryInput {
    /// Empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Write to a specific locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<LocaleCode>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

impl Resource for Entry {
    type Id = EntryUid;
    type Input = EntryInput;

    const SINGULAR: &'static str = "entry";
    const PLURAL: &'static str = "entries";

    fn input_query(input: &EntryInput) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("locale", input.locale.as_ref());
        query
    }
}

impl ResourceApi<'_, Entry> {
    /// Restrict every call made through this adapter to `locale`.
    #[must_use]
    pub fn with_locale(self, locale: &LocaleCode) -> Self {
        self.with_query("locale", locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_keys_are_stripped_from_fields() {
        let entry: Entry = serde_json::from_value(json!({
            "uid": "blt123",
            "created_at": "2024-01-15T10:00:00.000Z",
            "updated_at": "2024-01-16T10:00:00.000Z",
            "created_by": "blt-user-1",
            "updated_by": "blt-user-2",
            "locale": "en-us",
            "_version": 3,
            "title": "Hello",
            "body": "<p>World</p>"
        }))
        .unwrap();

        let mut keys: Vec<_> = entry.fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["body", "title"]);
        assert_eq!(entry.uid.as_str(), "blt123");
        assert_eq!(entry.version, Some(3));
        assert_eq!(entry.locale.as_ref().map(LocaleCode::as_str), Some("en-us"));
        assert_eq!(entry.updated_by.as_ref().map(UserUid::as_str), Some("blt-user-2"));
        assert_eq!(entry.field("title"), Some(&json!("Hello")));
    }

    #[test]
    fn missing_metadata_is_tolerated() {
        let entry: Entry = serde_json::from_value(json!({
            "uid": "blt123",
            "title": "Hello"
        }))
        .unwrap();

        assert!(entry.created_at.is_none());
        assert!(entry.tags.is_empty());
        assert_eq!(entry.fields.len(), 1);
    }

    #[test]
    fn extended_metadata_is_typed_not_a_field() {
        let entry: Entry = serde_json::from_value(json!({
            "uid": "blt123",
            "tags": ["news"],
            "ACL": {},
            "_in_progress": false,
            "publish_details": {"environment": "production"},
            "rating": 5
        }))
        .unwrap();

        assert_eq!(entry.tags, vec!["news".to_string()]);
        assert_eq!(entry.in_progress, Some(false));
        assert!(entry.acl.is_some());
        assert_eq!(entry.fields.len(), 1);
        assert_eq!(entry.field("rating"), Some(&json!(5)));
    }

    #[test]
    fn badly_typed_metadata_is_an_error() {
        let result: Result<Entry, _> = serde_json::from_value(json!({
            "uid": "blt123",
            "_version": "three"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn input_serializes_fields_only() {
        let input = EntryInput::new()
            .with_field("title", "Hello")
            .with_locale("fr-fr");

        assert_eq!(serde_json::to_value(&input).unwrap(), json!({"title": "Hello"}));
        let query = Entry::input_query(&input);
        assert_eq!(query.get("locale"), Some(&["fr-fr".to_string()][..]));
    }

    #[test]
    fn input_without_locale_adds_no_query() {
        let input = EntryInput::new().with_field("title", "Hello");
        assert!(Entry::input_query(&input).is_empty());
    }
}
