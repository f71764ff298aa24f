//! Typed GET/POST helpers with content-type-driven encoding and schema
//! validation.
//!
//! # Overview
//! A call resolves its URL, encodes the body (POST), sends the request
//! through a `Transport`, rejects non-2xx statuses, decodes the body (JSON
//! or verbatim text), validates it against a `Schema` and finally applies an
//! optional `parse_response` mapping.
//!
//! # Design
//! - `FetchClient` is stateless. It holds only a `Transport`.
//! - Request building and response parsing are pure functions over the
//!   plain-data `HttpRequest` / `HttpResponse` types, so the I/O boundary is
//!   explicit and can be faked in tests.
//! - `RequestError` is the single error type: configuration problems, HTTP
//!   status failures and schema rejections keep their own variants, and every
//!   other failure is normalized to `Request failed: <message>`.

pub mod client;
pub mod codec;
pub mod config;
pub mod content_type;
pub mod error;
pub mod http;
pub mod schema;
pub mod target;
pub mod transport;

pub use client::{get, post, FetchClient};
pub use config::{GetConfig, Mapped, PostConfig, ResponseMapper, ResponseOptions, Unmapped};
pub use content_type::ContentType;
pub use error::{BoxError, HttpError, RequestError, ValidationError, ValidationIssue, ValidationIssues};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use schema::{Passthrough, Schema, Typed};
pub use target::{QueryValue, RequestTarget};
pub use transport::{ReqwestTransport, Transport, TransportError};
