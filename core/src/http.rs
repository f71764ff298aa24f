//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! pipeline builds `HttpRequest` values and interprets `HttpResponse` values
//! without touching the network itself; a `Transport` performs the actual
//! round-trip. Keeping the boundary as data makes every step before and after
//! the network call deterministic and easy to test with a recording fake.

use std::fmt;

/// HTTP method for a request. Only the two verbs the pipeline issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `FetchClient::build_get` / `FetchClient::build_post`. `url` is
/// always absolute and already carries any query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True for any status in the 200..=299 range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Build the outgoing header set: the content-type-derived header first, then
/// each additional header, replacing any earlier header with the same
/// (case-insensitive) name.
pub(crate) fn merge_headers(
    base: (&str, &str),
    additional: &[(String, String)],
) -> Vec<(String, String)> {
    let mut headers = vec![(base.0.to_string(), base.1.to_string())];
    for (name, value) in additional {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        headers.push((name.clone(), value.clone()));
    }
    headers
}
