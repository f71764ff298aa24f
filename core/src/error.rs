//! Error types for the request pipeline.
//!
//! # Design
//! Four outcomes reach the caller. `Http` and `Validation` are surfaced
//! verbatim with their structured payloads. `Configuration` covers anything
//! rejected before the network is touched. Every other failure (transport,
//! body read, JSON decode, a failing `parse_response`) is flattened into
//! `Failed`, which keeps only the original message text.

use std::fmt;

use thiserror::Error;

/// Boxed error returned by user-supplied response mappers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Errors returned by `FetchClient::get` / `FetchClient::post`.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Missing or malformed URL inputs, missing POST body, or a body that the
    /// declared content type cannot carry.
    #[error("{0}")]
    Configuration(String),

    /// The server answered outside the 2xx range.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The decoded response was rejected by the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Anything else. Only the message of the underlying failure survives.
    #[error("Request failed: {0}")]
    Failed(String),
}

impl RequestError {
    /// Normalize an arbitrary failure into `Failed`, keeping its message.
    pub(crate) fn failed(message: impl fmt::Display) -> Self {
        let message = message.to_string();
        if message.is_empty() {
            RequestError::Failed(UNKNOWN_ERROR.to_string())
        } else {
            RequestError::Failed(message)
        }
    }

    /// Status code when this is an `Http` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http(err) => Some(err.status),
            _ => None,
        }
    }
}

/// A non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HttpError {
    pub status: u16,
    pub message: String,
    /// Raw response body, kept for debugging.
    pub body: String,
}

impl HttpError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            message: format!("Network response was not ok, status: {status}"),
            body: body.into(),
        }
    }
}

/// A single schema complaint, anchored at a path inside the decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Object keys / array indices leading to the offending value. Empty for
    /// the root.
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    pub fn root(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

/// Structured failure produced by a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationIssues {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationIssues {
    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }
}

impl fmt::Display for ValidationIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Schema rejection, carrying every issue the schema reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {issues}")]
pub struct ValidationError {
    pub issues: ValidationIssues,
}

impl From<ValidationIssues> for ValidationError {
    fn from(issues: ValidationIssues) -> Self {
        Self { issues }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_format() {
        let err = HttpError::new(404, "missing");
        assert_eq!(err.to_string(), "Network response was not ok, status: 404");
        assert_eq!(err.body, "missing");
    }

    #[test]
    fn failed_prefixes_message() {
        let err = RequestError::failed("connection refused");
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }

    #[test]
    fn failed_with_empty_message_uses_fallback() {
        let err = RequestError::failed("");
        assert_eq!(err.to_string(), "Request failed: An unknown error occurred");
    }

    #[test]
    fn http_and_validation_display_verbatim() {
        let err = RequestError::from(HttpError::new(500, ""));
        assert_eq!(err.to_string(), "Network response was not ok, status: 500");
        assert_eq!(err.status(), Some(500));

        let issues = ValidationIssues::single(ValidationIssue::new(
            vec!["user".to_string(), "email".to_string()],
            "expected string",
        ));
        let err = RequestError::from(ValidationError::from(issues));
        assert_eq!(err.to_string(), "Validation failed: user.email: expected string");
        assert_eq!(err.status(), None);
    }
}
