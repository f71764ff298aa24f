//! URL resolution and query-string construction.

use std::fmt;

use url::Url;

use crate::error::RequestError;

/// Where a request goes: either an absolute `url`, or a `route` resolved
/// against `base_url`. When `url` is set the other two are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTarget {
    pub url: Option<String>,
    pub base_url: Option<String>,
    pub route: Option<String>,
}

impl RequestTarget {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn route(base_url: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            url: None,
            base_url: Some(base_url.into()),
            route: Some(route.into()),
        }
    }

    /// Produce the normalized absolute URL for this target.
    pub fn resolve(&self) -> Result<Url, RequestError> {
        if let Some(url) = &self.url {
            return Url::parse(url).map_err(invalid_url);
        }
        match (&self.base_url, &self.route) {
            (Some(base_url), Some(route)) => Url::parse(base_url)
                .and_then(|base| base.join(route))
                .map_err(invalid_url),
            _ => Err(invalid_url(
                "either `url` or both `base_url` and `route` must be provided",
            )),
        }
    }
}

fn invalid_url(reason: impl fmt::Display) -> RequestError {
    RequestError::Configuration(format!("Invalid URL: {reason}"))
}

/// A primitive query-string value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::Float(n) => write!(f, "{n}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

macro_rules! query_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Int(i64::from(value))
                }
            }
        )*
    };
}

query_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! query_value_from_wide_int {
    ($($ty:ty),*) => {
        $(
            /// Values outside the `i64` range keep their exact digits as a string.
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    i64::try_from(value)
                        .map(QueryValue::Int)
                        .unwrap_or_else(|_| QueryValue::Str(value.to_string()))
                }
            }
        )*
    };
}

query_value_from_wide_int!(u64, usize, isize);

impl From<f32> for QueryValue {
    /// Widened through the shortest decimal form, so `0.1f32` prints as `0.1`.
    fn from(value: f32) -> Self {
        QueryValue::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }
}

/// Append each pair to the query string in order. Existing pairs are kept and
/// repeated keys produce repeated pairs.
pub fn append_query(url: &mut Url, params: &[(String, QueryValue)]) {
    if params.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (key, value) in params {
        pairs.append_pair(key, &value.to_string());
    }
}
