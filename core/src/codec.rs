//! Request body encoding and response body decoding, driven by `Format`.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::content_type::{ContentType, Format};
use crate::error::RequestError;

/// Serialize a request body for the given content type.
///
/// Form bodies must be flat objects; text-like bodies must already be
/// strings.
pub fn encode_body<B: Serialize>(body: &B, content_type: ContentType) -> Result<String, RequestError> {
    match content_type.format() {
        Format::Json => serde_json::to_string(body).map_err(RequestError::failed),
        Format::Form => encode_form(&to_value(body)?),
        Format::Text => match to_value(body)? {
            Value::String(s) => Ok(s),
            other => Err(RequestError::Configuration(format!(
                "{content_type} body must be a string, got {}",
                kind(&other)
            ))),
        },
    }
}

/// Interpret a raw response body. Only JSON is parsed; every other content
/// type comes back as a string, verbatim.
pub fn decode_body(raw: &str, content_type: ContentType) -> Result<Value, RequestError> {
    match content_type.format() {
        Format::Json => serde_json::from_str(raw).map_err(RequestError::failed),
        Format::Form | Format::Text => Ok(Value::String(raw.to_string())),
    }
}

fn to_value<B: Serialize>(body: &B) -> Result<Value, RequestError> {
    serde_json::to_value(body).map_err(RequestError::failed)
}

fn encode_form(body: &Value) -> Result<String, RequestError> {
    let Value::Object(fields) = body else {
        return Err(RequestError::Configuration(format!(
            "Form body must be an object, got {}",
            kind(body)
        )));
    };
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            Value::Array(_) | Value::Object(_) => {
                return Err(RequestError::Configuration(format!(
                    "Form field `{key}` must be a primitive, got {}",
                    kind(value)
                )));
            }
        };
        serializer.append_pair(key, &value);
    }
    Ok(serializer.finish())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct Login {
        user: String,
        remember: bool,
    }

    #[test]
    fn json_body_is_serialized() {
        let body = Login {
            user: "ada".to_string(),
            remember: true,
        };
        let encoded = encode_body(&body, ContentType::Json).unwrap();
        let back: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, json!({"user": "ada", "remember": true}));
    }

    #[test]
    fn form_body_is_urlencoded() {
        let mut body = BTreeMap::new();
        body.insert("x", "1");
        body.insert("y", "2");
        assert_eq!(encode_body(&body, ContentType::FormUrlEncoded).unwrap(), "x=1&y=2");
    }

    #[test]
    fn form_body_escapes_reserved_characters() {
        let mut body = BTreeMap::new();
        body.insert("q", "a b&c=d");
        assert_eq!(
            encode_body(&body, ContentType::FormUrlEncoded).unwrap(),
            "q=a+b%26c%3Dd"
        );
    }

    // Fields keep declaration order.
    #[test]
    fn form_body_stringifies_primitives() {
        let body = Login {
            user: "ada".to_string(),
            remember: false,
        };
        assert_eq!(
            encode_body(&body, ContentType::FormUrlEncoded).unwrap(),
            "user=ada&remember=false"
        );
    }

    #[test]
    fn form_body_rejects_nested_values() {
        let err = encode_body(&json!({"a": {"b": 1}}), ContentType::FormUrlEncoded).unwrap_err();
        assert!(matches!(err, RequestError::Configuration(_)));
    }

    #[test]
    fn form_body_rejects_non_object() {
        let err = encode_body(&"x=1", ContentType::FormUrlEncoded).unwrap_err();
        assert_eq!(err.to_string(), "Form body must be an object, got string");
    }

    #[test]
    fn text_like_bodies_pass_through() {
        let xml = "<note><to>Ada</to></note>";
        assert_eq!(encode_body(&xml, ContentType::Xml).unwrap(), xml);
        assert_eq!(encode_body(&"hi", ContentType::Text).unwrap(), "hi");
        assert_eq!(encode_body(&"<p>x</p>", ContentType::Html).unwrap(), "<p>x</p>");
    }

    #[test]
    fn text_body_must_be_string() {
        let err = encode_body(&json!({"a": 1}), ContentType::Text).unwrap_err();
        assert_eq!(err.to_string(), "text/plain body must be a string, got object");
    }

    #[test]
    fn json_response_is_parsed() {
        let value = decode_body(r#"{"id":1}"#, ContentType::Json).unwrap();
        assert_eq!(value, json!({"id": 1}));
    }

    #[test]
    fn bad_json_response_is_generic_failure() {
        let err = decode_body("not json", ContentType::Json).unwrap_err();
        assert!(matches!(err, RequestError::Failed(_)));
        assert!(err.to_string().starts_with("Request failed: "));
    }

    #[test]
    fn non_json_response_is_verbatim_text() {
        for content_type in [ContentType::Text, ContentType::Xml, ContentType::Html, ContentType::FormUrlEncoded] {
            let value = decode_body("<a>{not json}</a>", content_type).unwrap();
            assert_eq!(value, Value::String("<a>{not json}</a>".to_string()));
        }
    }
}
