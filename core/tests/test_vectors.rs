//! Verify request building against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file lists inputs and either the expected wire output or the
//! expected error kind. Only the pure `build_*` steps run here; nothing is
//! sent.

use serde_json::Value;
use typed_fetch::{ContentType, FetchClient, GetConfig, PostConfig, QueryValue, RequestError};

fn client() -> FetchClient {
    FetchClient::default()
}

fn query_value(value: &Value) -> QueryValue {
    match value {
        Value::String(s) => QueryValue::from(s.as_str()),
        Value::Bool(b) => QueryValue::from(*b),
        Value::Number(n) if n.is_i64() => QueryValue::Int(n.as_i64().unwrap()),
        Value::Number(n) => QueryValue::Float(n.as_f64().unwrap()),
        other => panic!("unsupported query value: {other}"),
    }
}

fn assert_error_kind(name: &str, err: RequestError, expected: &str) {
    match expected {
        "Configuration" => assert!(
            matches!(err, RequestError::Configuration(_)),
            "{name}: expected Configuration, got {err:?}"
        ),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// URL resolution
// ---------------------------------------------------------------------------

#[test]
fn url_test_vectors() {
    let raw = include_str!("../../test-vectors/urls.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];

        let mut config = GetConfig::new();
        if let Some(url) = input["url"].as_str() {
            config = config.url(url);
        }
        if let Some(base_url) = input["base_url"].as_str() {
            config = config.base_url(base_url);
        }
        if let Some(route) = input["route"].as_str() {
            config = config.route(route);
        }
        for pair in input["query"].as_array().into_iter().flatten() {
            let pair = pair.as_array().unwrap();
            config = config.query(pair[0].as_str().unwrap(), query_value(&pair[1]));
        }

        let result = c.build_get(&config);
        if let Some(expected_error) = case["expected_error"].as_str() {
            assert_error_kind(name, result.unwrap_err(), expected_error);
        } else {
            let req = result.unwrap();
            assert_eq!(req.url, case["expected_url"].as_str().unwrap(), "{name}: url");
        }
    }
}

// ---------------------------------------------------------------------------
// Form encoding
// ---------------------------------------------------------------------------

#[test]
fn form_test_vectors() {
    let raw = include_str!("../../test-vectors/form.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config = PostConfig::new()
            .url("http://localhost:3000/form")
            .content_type(ContentType::FormUrlEncoded)
            .body(case["body"].clone());

        let result = c.build_post(&config);
        if let Some(expected_error) = case["expected_error"].as_str() {
            assert_error_kind(name, result.unwrap_err(), expected_error);
        } else {
            let req = result.unwrap();
            assert_eq!(
                req.body.as_deref(),
                case["expected_body"].as_str(),
                "{name}: body"
            );
            assert_eq!(
                req.header("content-type"),
                Some("application/x-www-form-urlencoded"),
                "{name}: content type"
            );
        }
    }
}
