//! Per-call request configuration.
//!
//! # Design
//! `GetConfig` and `PostConfig` are consumed by a single call and never
//! shared. The schema is a type parameter so that the validated output type
//! follows from it; the default `Passthrough` schema yields the decoded
//! `serde_json::Value` unchanged.
//!
//! The mapper passed to `parse_response` is typed on the schema's output, so
//! it must come after `schema`. The `M` parameter tracks this: `schema` only
//! exists on `Unmapped` configs and `parse_response` moves the config to
//! `Mapped`, so the reverse order does not compile:
//!
//! ```compile_fail
//! use typed_fetch::{GetConfig, Typed};
//!
//! let config = GetConfig::new()
//!     .url("http://localhost/")
//!     .parse_response(Ok)
//!     .schema(Typed::<u32>::new());
//! ```

use std::marker::PhantomData;

use serde_json::Value;

use crate::content_type::ContentType;
use crate::error::BoxError;
use crate::schema::{Passthrough, Schema};
use crate::target::{QueryValue, RequestTarget};

/// Final mapping applied to the validated value.
pub type ResponseMapper<O> = Box<dyn Fn(O) -> Result<O, BoxError> + Send + Sync>;

/// How a successful response is validated and transformed.
pub struct ResponseOptions<S: Schema> {
    pub schema: S,
    /// Use the tolerant validation entry point. Failures surface the same
    /// way in both modes.
    pub safe_parse: bool,
    pub parse_response: Option<ResponseMapper<S::Output>>,
}

impl<S: Schema> ResponseOptions<S> {
    pub fn new(schema: S) -> Self {
        Self {
            schema,
            safe_parse: false,
            parse_response: None,
        }
    }

    fn with_safe_parse(mut self, safe_parse: bool) -> Self {
        self.safe_parse = safe_parse;
        self
    }
}

impl Default for ResponseOptions<Passthrough> {
    fn default() -> Self {
        Self::new(Passthrough)
    }
}

/// Builder state: no `parse_response` yet, `schema` may still be set.
#[derive(Debug)]
pub enum Unmapped {}

/// Builder state: `parse_response` is set and the schema is fixed.
#[derive(Debug)]
pub enum Mapped {}

/// Configuration for a GET call.
pub struct GetConfig<S: Schema = Passthrough, M = Unmapped> {
    pub target: RequestTarget,
    /// Appended to the query string in order; repeated keys are kept.
    pub query: Vec<(String, QueryValue)>,
    /// Sent as `Accept` and used to decode the response.
    pub content_type: ContentType,
    pub headers: Vec<(String, String)>,
    pub response: ResponseOptions<S>,
    state: PhantomData<fn() -> M>,
}

impl GetConfig {
    pub fn new() -> Self {
        Self {
            target: RequestTarget::default(),
            query: Vec::new(),
            content_type: ContentType::default(),
            headers: Vec::new(),
            response: ResponseOptions::default(),
            state: PhantomData,
        }
    }
}

impl Default for GetConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema, M> GetConfig<S, M> {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.target.url = Some(url.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.target.base_url = Some(base_url.into());
        self
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.target.route = Some(route.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn safe_parse(mut self, safe_parse: bool) -> Self {
        self.response.safe_parse = safe_parse;
        self
    }
}

impl<S: Schema> GetConfig<S, Unmapped> {
    /// Validate the response with `schema`.
    pub fn schema<S2: Schema>(self, schema: S2) -> GetConfig<S2, Unmapped> {
        GetConfig {
            target: self.target,
            query: self.query,
            content_type: self.content_type,
            headers: self.headers,
            response: ResponseOptions::new(schema).with_safe_parse(self.response.safe_parse),
            state: PhantomData,
        }
    }

    /// Map the validated value once more before it is returned.
    pub fn parse_response<F>(mut self, map: F) -> GetConfig<S, Mapped>
    where
        F: Fn(S::Output) -> Result<S::Output, BoxError> + Send + Sync + 'static,
    {
        self.response.parse_response = Some(Box::new(map));
        GetConfig {
            target: self.target,
            query: self.query,
            content_type: self.content_type,
            headers: self.headers,
            response: self.response,
            state: PhantomData,
        }
    }
}

/// Configuration for a POST call. `body` is required at call time.
pub struct PostConfig<B = Value, S: Schema = Passthrough, M = Unmapped> {
    pub target: RequestTarget,
    pub body: Option<B>,
    /// Sent as `Content-Type`, selects the body encoding, and decodes the
    /// response.
    pub content_type: ContentType,
    pub headers: Vec<(String, String)>,
    pub response: ResponseOptions<S>,
    state: PhantomData<fn() -> M>,
}

impl PostConfig {
    pub fn new() -> Self {
        Self {
            target: RequestTarget::default(),
            body: None,
            content_type: ContentType::default(),
            headers: Vec::new(),
            response: ResponseOptions::default(),
            state: PhantomData,
        }
    }
}

impl Default for PostConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, S: Schema, M> PostConfig<B, S, M> {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.target.url = Some(url.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.target.base_url = Some(base_url.into());
        self
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.target.route = Some(route.into());
        self
    }

    pub fn body<B2>(self, body: B2) -> PostConfig<B2, S, M> {
        PostConfig {
            target: self.target,
            body: Some(body),
            content_type: self.content_type,
            headers: self.headers,
            response: self.response,
            state: PhantomData,
        }
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn safe_parse(mut self, safe_parse: bool) -> Self {
        self.response.safe_parse = safe_parse;
        self
    }
}

impl<B, S: Schema> PostConfig<B, S, Unmapped> {
    /// Validate the response with `schema`.
    pub fn schema<S2: Schema>(self, schema: S2) -> PostConfig<B, S2, Unmapped> {
        PostConfig {
            target: self.target,
            body: self.body,
            content_type: self.content_type,
            headers: self.headers,
            response: ResponseOptions::new(schema).with_safe_parse(self.response.safe_parse),
            state: PhantomData,
        }
    }

    /// Map the validated value once more before it is returned.
    pub fn parse_response<F>(mut self, map: F) -> PostConfig<B, S, Mapped>
    where
        F: Fn(S::Output) -> Result<S::Output, BoxError> + Send + Sync + 'static,
    {
        self.response.parse_response = Some(Box::new(map));
        PostConfig {
            target: self.target,
            body: self.body,
            content_type: self.content_type,
            headers: self.headers,
            response: self.response,
            state: PhantomData,
        }
    }
}
