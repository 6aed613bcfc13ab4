//! Management API models.
//!
//! Entities are the unwrapped values found inside the `{"<resource>": {...}}`
//! envelopes; inputs are the payloads sent on create and update.

use chrono::{DateTime, Utc};
use contentstack_core::query::QueryParams;
use contentstack_core::uid::{
    ApiKey, ContentTypeUid, EnvironmentName, GlobalFieldUid, LocaleCode, OrganizationUid,
    StackUid, UserUid, WebhookUid,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::resource::Resource;

/// Decode an explicit `null` the same way as a missing member.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A content type: the schema entries are created against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentType {
    /// Content type UID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: ContentTypeUid,
    /// Display title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Field schema, passed through untouched.
    #[serde(default)]
    pub schema: Value,
    /// Content type options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ContentTypeOptions>,
    /// Whether revisions are kept.
    #[serde(default, deserialize_with = "null_as_default")]
    pub maintain_revisions: bool,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Options attached to a content type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentTypeOptions {
    /// Field used as the entry title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Whether entries can be published.
    #[serde(default, deserialize_with = "null_as_default")]
    pub publishable: bool,
    /// Whether entries are webpages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_page: bool,
    /// Whether only one entry may exist.
    #[serde(default, deserialize_with = "null_as_default")]
    pub singleton: bool,
    /// Fields shown as subtitles.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_title: Vec<String>,
    /// URL pattern for webpage entries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_pattern: String,
    /// URL prefix for webpage entries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_prefix: String,
}

/// Payload for creating or updating a content type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentTypeInput {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Content type UID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<ContentTypeUid>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl Resource for ContentType {
    type Id = ContentTypeUid;
    type Input = ContentTypeInput;

    const SINGULAR: &'static str = "content_type";
    const PLURAL: &'static str = "content_types";
}

/// A publishing environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Environment {
    /// Environment name, also its address in the API.
    pub name: EnvironmentName,
    /// Server-assigned UID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Base URLs per locale.
    #[serde(default, deserialize_with = "null_as_default")]
    pub urls: Vec<EnvironmentUrl>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Base URL of an environment for one locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentUrl {
    /// Locale code.
    pub locale: LocaleCode,
    /// Base URL.
    pub url: String,
}

/// Payload for creating or updating an environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentInput {
    /// Environment name.
    pub name: EnvironmentName,
    /// Base URLs per locale.
    #[serde(default)]
    pub urls: Vec<EnvironmentUrl>,
}

impl Resource for Environment {
    type Id = EnvironmentName;
    type Input = EnvironmentInput;

    const SINGULAR: &'static str = "environment";
    const PLURAL: &'static str = "environments";
}

/// A reusable group of fields shared between content types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalField {
    /// Global field UID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: GlobalFieldUid,
    /// Display title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Field schema, passed through untouched.
    #[serde(default)]
    pub schema: Value,
    /// Whether revisions are kept.
    #[serde(default, deserialize_with = "null_as_default")]
    pub maintain_revisions: bool,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a global field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalFieldInput {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Global field UID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<GlobalFieldUid>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether revisions are kept.
    #[serde(default)]
    pub maintain_revisions: bool,
    /// Field schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl Resource for GlobalField {
    type Id = GlobalFieldUid;
    type Input = GlobalFieldInput;

    const SINGULAR: &'static str = "global_field";
    const PLURAL: &'static str = "global_fields";
}

/// A language enabled on the stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Locale {
    /// Locale code, also its address in the API.
    pub code: LocaleCode,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Server-assigned UID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Locale used when content is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_locale: Option<LocaleCode>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleInput {
    /// Locale code.
    pub code: LocaleCode,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fallback locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_locale: Option<LocaleCode>,
}

impl Resource for Locale {
    type Id = LocaleCode;
    type Input = LocaleInput;

    const SINGULAR: &'static str = "locale";
    const PLURAL: &'static str = "locales";
}

/// A webhook notifying external endpoints of stack events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Webhook {
    /// Webhook UID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: WebhookUid,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Owning organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_uid: Option<OrganizationUid>,
    /// Event channels that trigger the webhook.
    #[serde(default, deserialize_with = "null_as_default")]
    pub channels: Vec<String>,
    /// Branches the webhook applies to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub branches: Vec<String>,
    /// Delivery targets.
    #[serde(default, deserialize_with = "null_as_default")]
    pub destinations: Vec<WebhookDestination>,
    /// Retry policy name (`manual`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub retry_policy: String,
    /// Whether the webhook is disabled.
    #[serde(default, deserialize_with = "null_as_default")]
    pub disabled: bool,
    /// Whether payloads are sent in concise form.
    #[serde(default, deserialize_with = "null_as_default")]
    pub concise_payload: bool,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserUid>,
    /// Last updater.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserUid>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Delivery target of a webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookDestination {
    /// Target URL.
    pub target_url: String,
    /// Basic auth user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_basic_auth: Option<String>,
    /// Basic auth password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_basic_password: Option<String>,
    /// Extra headers sent with each delivery.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_header: Vec<WebhookHeader>,
}

/// Custom header sent with webhook deliveries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookHeader {
    /// Header name.
    #[serde(rename = "header_name")]
    pub name: String,
    /// Header value.
    pub value: String,
}

/// Payload for creating or updating a webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookInput {
    /// Display name.
    pub name: String,
    /// Branches the webhook applies to.
    #[serde(default)]
    pub branches: Vec<String>,
    /// Event channels.
    #[serde(default)]
    pub channels: Vec<String>,
    /// Delivery targets.
    #[serde(default)]
    pub destinations: Vec<WebhookDestination>,
    /// Retry policy name.
    #[serde(default)]
    pub retry_policy: String,
    /// Whether the webhook is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Whether payloads are sent in concise form.
    #[serde(default)]
    pub concise_payload: bool,
}

impl Resource for Webhook {
    type Id = WebhookUid;
    type Input = WebhookInput;

    const SINGULAR: &'static str = "webhook";
    const PLURAL: &'static str = "webhooks";
}

/// A stack visible to the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stack {
    /// Stack UID.
    pub uid: StackUid,
    /// Stack name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// API key used to address the stack.
    pub api_key: ApiKey,
    /// Owning organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_uid: Option<OrganizationUid>,
    /// Master locale code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_locale: Option<LocaleCode>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters for listing stacks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StackListParams {
    /// Restrict to one organization (sent as a header).
    pub organization_uid: Option<OrganizationUid>,
    /// Ask the server to include the total count.
    pub include_count: Option<bool>,
    /// Page size.
    pub limit: Option<u32>,
    /// Number of stacks to skip.
    pub skip: Option<u32>,
    /// Field to sort ascending by.
    pub asc: Option<String>,
    /// Field to sort descending by.
    pub desc: Option<String>,
}

impl StackListParams {
    /// Convert to URL query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("include_count", self.include_count);
        params.push_opt("limit", self.limit);
        params.push_opt("skip", self.skip);
        params.push_opt("asc", self.asc.as_deref());
        params.push_opt("desc", self.desc.as_deref());
        params
    }
}

/// Stack-wide settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StackSettings {
    /// User-defined stack variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_variables: Option<Map<String, Value>>,
    /// System-managed variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrete_variables: Option<Map<String, Value>>,
    /// Rich text editor settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rte: Option<Map<String, Value>>,
    /// Any other settings the server returns.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_type_input_omits_unset_members() {
        let input = ContentTypeInput {
            title: Some("Blog Post".into()),
            ..ContentTypeInput::default()
        };
        assert_eq!(serde_json::to_value(&input).unwrap(), json!({"title": "Blog Post"}));
    }

    #[test]
    fn content_type_decodes_timestamps_and_options() {
        let content_type: ContentType = serde_json::from_value(json!({
            "uid": "blog_post",
            "title": "Blog Post",
            "schema": [{"uid": "title", "data_type": "text"}],
            "options": {"is_page": true, "singleton": false, "sub_title": ["url"]},
            "created_at": "2023-05-02T10:15:30.123Z"
        }))
        .unwrap();

        assert_eq!(content_type.uid.as_str(), "blog_post");
        assert!(content_type.options.unwrap().is_page);
        assert!(content_type.created_at.is_some());
        assert!(content_type.updated_at.is_none());
        assert!(content_type.schema.is_array());
    }

    #[test]
    fn null_members_decode_as_defaults() {
        let content_type: ContentType = serde_json::from_value(json!({
            "uid": "blog_post",
            "title": null,
            "description": null,
            "maintain_revisions": null,
            "options": {"title": null, "sub_title": null, "singleton": null}
        }))
        .unwrap();
        assert_eq!(content_type.title, "");
        assert_eq!(content_type.description, "");
        assert!(!content_type.maintain_revisions);
        assert!(content_type.options.unwrap().sub_title.is_empty());

        let webhook: Webhook = serde_json::from_value(json!({
            "uid": "blt-hook",
            "name": null,
            "channels": null,
            "branches": null,
            "destinations": null,
            "retry_policy": null,
            "disabled": null
        }))
        .unwrap();
        assert_eq!(webhook.name, "");
        assert!(webhook.channels.is_empty());
        assert!(webhook.branches.is_empty());
        assert!(webhook.destinations.is_empty());
        assert_eq!(webhook.retry_policy, "");
    }

    #[test]
    fn wrongly_typed_members_still_fail() {
        let result: Result<GlobalField, _> = serde_json::from_value(json!({
            "uid": "seo",
            "title": 42
        }));
        assert!(result.is_err());
    }

    #[test]
    fn webhook_header_uses_header_name_key() {
        let header = WebhookHeader {
            name: "X-Secret".into(),
            value: "abc".into(),
        };
        assert_eq!(
            serde_json::to_value(&header).unwrap(),
            json!({"header_name": "X-Secret", "value": "abc"})
        );
    }

    #[test]
    fn stack_list_params_to_query() {
        let params = StackListParams {
            organization_uid: Some(OrganizationUid::from("org")),
            include_count: Some(true),
            limit: Some(25),
            asc: Some("name".into()),
            ..StackListParams::default()
        };

        let query = params.to_query();
        assert_eq!(query.encode(), "asc=name&include_count=true&limit=25");
        assert!(query.get("organization_uid").is_none());
    }

    #[test]
    fn stack_settings_keep_unknown_members() {
        let settings: StackSettings = serde_json::from_value(json!({
            "stack_variables": {"enforce_unique_urls": true},
            "live_preview": {"enabled": false}
        }))
        .unwrap();

        assert!(settings.stack_variables.is_some());
        assert!(settings.other.contains_key("live_preview"));
    }

    #[test]
    fn resource_envelope_keys() {
        assert_eq!(ContentType::SINGULAR, "content_type");
        assert_eq!(GlobalField::PLURAL, "global_fields");
        assert_eq!(Locale::PLURAL, "locales");
    }
}
