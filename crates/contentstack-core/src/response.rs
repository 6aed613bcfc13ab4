//! Status-code based response classification.
//!
//! Each response is classified independently: 200 and 201 decode into the
//! destination type, 401 and 422 become typed errors, and every other status
//! is reported as [`Error::UnexpectedStatus`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, ErrorMessage, Result};

/// Drain the response body and classify it.
///
/// The body is read to completion and the response dropped before
/// classification, so the connection is released on every exit path.
///
/// # Errors
///
/// Returns [`Error::Transport`] if reading the body fails, otherwise whatever
/// [`classify_body`] reports.
pub async fn classify<T>(response: reqwest::Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|err| Error::Transport(format!("Failed to read response body: {err}")))?;

    classify_body(status, &body)
}

/// Classify an already drained response by status code and body.
///
/// # Errors
///
/// - [`Error::Decode`] when the body does not decode into the shape required
///   for the status
/// - [`Error::NotAuthorized`] for 401 with a JSON object or `null` body
/// - [`Error::Validation`] for 422
/// - [`Error::UnexpectedStatus`] for any other status
pub fn classify_body<T>(status: u16, body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    match status {
        200 | 201 => serde_json::from_slice(body).map_err(|err| {
            Error::Decode(format!("Failed to decode {status} response: {err}"))
        }),
        401 => {
            // The server's detail is parsed to confirm the shape, then dropped.
            // A `null` body counts as an empty object.
            let _detail: Option<Map<String, Value>> =
                serde_json::from_slice(body).map_err(|err| {
                    Error::Decode(format!("Failed to decode 401 response: {err}"))
                })?;
            Err(Error::NotAuthorized)
        }
        422 => {
            let detail: ErrorMessage = serde_json::from_slice(body).map_err(|err| {
                Error::Decode(format!("Failed to decode 422 response: {err}"))
            })?;
            debug!(
                code = detail.error_code,
                fields = detail.errors.len(),
                "validation failure"
            );
            Err(Error::Validation(detail))
        }
        code => Err(Error::UnexpectedStatus { code }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Envelope {
        locale: Locale,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Locale {
        code: String,
    }

    #[test]
    fn success_statuses_decode_body() {
        for status in [200, 201] {
            let result: Result<Envelope> =
                classify_body(status, br#"{"locale":{"code":"en-us"}}"#);
            let envelope = assert_ok!(result);
            assert_eq!(envelope.locale.code, "en-us");
        }
    }

    #[test]
    fn success_status_with_invalid_json_is_decode_error() {
        let result: Result<Envelope> = classify_body(200, b"<html>");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn success_status_with_wrong_shape_is_decode_error() {
        let result: Result<Envelope> = classify_body(201, br#"{"locale":"en-us"}"#);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn unauthorized_ignores_body_content() {
        let result: Result<Value> =
            classify_body(401, br#"{"error_message":"Bad token","error_code":105}"#);
        assert_eq!(result, Err(Error::NotAuthorized));

        let result: Result<Value> = classify_body(401, b"{}");
        assert_eq!(result, Err(Error::NotAuthorized));
    }

    #[test]
    fn unauthorized_with_null_body_is_not_authorized() {
        let result: Result<Value> = classify_body(401, b"null");
        assert_eq!(result, Err(Error::NotAuthorized));
    }

    #[test]
    fn unauthorized_with_invalid_json_is_decode_error() {
        let result: Result<Value> = classify_body(401, b"not json");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn unprocessable_entity_yields_structured_error() {
        let result: Result<Value> = classify_body(
            422,
            br#"{"error_message":"x","error_code":1,"errors":{"title":["required"]}}"#,
        );

        let mut errors = BTreeMap::new();
        errors.insert("title".to_string(), vec!["required".to_string()]);
        assert_eq!(
            result,
            Err(Error::Validation(ErrorMessage {
                error_message: "x".to_string(),
                error_code: 1,
                errors,
            }))
        );
    }

    #[test]
    fn unprocessable_entity_with_invalid_json_is_decode_error() {
        let result: Result<Value> = classify_body(422, b"");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn other_statuses_are_unexpected() {
        for code in [204, 400, 403, 404, 500, 599] {
            let result: Result<Value> = classify_body(code, b"{}");
            assert_eq!(assert_err!(result), Error::UnexpectedStatus { code });
        }
    }
}
