//! Schema capability used to validate and shape decoded responses.
//!
//! # Design
//! A schema turns a decoded `serde_json::Value` into its `Output` or reports
//! every problem as `ValidationIssues`. `safe_parse` is the tolerant entry
//! point returning a plain `Result`; `parse` is the strict entry point and
//! defaults to `safe_parse` with the issues wrapped in `ValidationError`.
//! The pipeline calls one or the other depending on `safe_parse`, and both
//! produce the same observable outcome.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{RequestError, ValidationError, ValidationIssue, ValidationIssues};

pub trait Schema: Send + Sync {
    type Output;

    /// Validate `data`, returning the issues on failure.
    fn safe_parse(&self, data: Value) -> Result<Self::Output, ValidationIssues>;

    /// Validate `data`, failing with a `ValidationError`.
    fn parse(&self, data: Value) -> Result<Self::Output, ValidationError> {
        self.safe_parse(data).map_err(ValidationError::from)
    }

    /// Add a check on the validated output. A failing predicate reports
    /// `message` at `path` (dot separated, empty for the root).
    fn refine<F>(self, path: &str, message: &str, predicate: F) -> Refine<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Output) -> bool + Send + Sync,
    {
        Refine {
            inner: self,
            path: split_path(path),
            message: message.to_string(),
            predicate,
        }
    }
}

/// Accepts anything and returns it unchanged. Used when no schema is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Schema for Passthrough {
    type Output = Value;

    fn safe_parse(&self, data: Value) -> Result<Value, ValidationIssues> {
        Ok(data)
    }
}

/// Validates by deserializing into `T`.
pub struct Typed<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typed<{}>", std::any::type_name::<T>())
    }
}

impl<T: DeserializeOwned> Schema for Typed<T> {
    type Output = T;

    fn safe_parse(&self, data: Value) -> Result<T, ValidationIssues> {
        serde_json::from_value(data)
            .map_err(|e| ValidationIssues::single(ValidationIssue::root(e.to_string())))
    }
}

/// Schema backed by a closure.
pub struct FnSchema<F> {
    check: F,
}

/// Build a schema from a closure.
pub fn from_fn<O, F>(check: F) -> FnSchema<F>
where
    F: Fn(Value) -> Result<O, ValidationIssues> + Send + Sync,
{
    FnSchema { check }
}

impl<O, F> Schema for FnSchema<F>
where
    F: Fn(Value) -> Result<O, ValidationIssues> + Send + Sync,
{
    type Output = O;

    fn safe_parse(&self, data: Value) -> Result<O, ValidationIssues> {
        (self.check)(data)
    }
}

/// See `Schema::refine`.
pub struct Refine<S, F> {
    inner: S,
    path: Vec<String>,
    message: String,
    predicate: F,
}

impl<S, F> Schema for Refine<S, F>
where
    S: Schema,
    F: Fn(&S::Output) -> bool + Send + Sync,
{
    type Output = S::Output;

    fn safe_parse(&self, data: Value) -> Result<S::Output, ValidationIssues> {
        let output = self.inner.safe_parse(data)?;
        if (self.predicate)(&output) {
            Ok(output)
        } else {
            Err(ValidationIssues::single(ValidationIssue::new(
                self.path.clone(),
                self.message.clone(),
            )))
        }
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run `schema` over a decoded body in the requested mode.
pub(crate) fn validate<S: Schema>(
    schema: &S,
    decoded: Value,
    safe_parse: bool,
) -> Result<S::Output, RequestError> {
    let outcome = if safe_parse {
        schema.safe_parse(decoded).map_err(ValidationError::from)
    } else {
        schema.parse(decoded)
    };
    outcome.map_err(|err| {
        debug!(issues = err.issues.len(), "response rejected by schema");
        RequestError::Validation(err)
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        email: String,
    }

    #[test]
    fn passthrough_returns_input() {
        let data = json!({"anything": [1, 2, 3]});
        assert_eq!(Passthrough.safe_parse(data.clone()).unwrap(), data);
    }

    #[test]
    fn typed_accepts_matching_shape() {
        let user = Typed::<User>::new()
            .safe_parse(json!({"id": 7, "email": "ada@example.com"}))
            .unwrap();
        assert_eq!(
            user,
            User {
                id: 7,
                email: "ada@example.com".to_string()
            }
        );
    }

    #[test]
    fn typed_reports_serde_message() {
        let issues = Typed::<User>::new().safe_parse(json!({"id": 7})).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.issues[0].message, "missing field `email`");
    }

    #[test]
    fn strict_parse_wraps_issues() {
        let err = Typed::<User>::new().parse(json!("nope")).unwrap_err();
        assert_eq!(err.issues.len(), 1);
    }

    #[test]
    fn refine_reports_path() {
        let schema = Typed::<User>::new().refine("email", "must contain @", |u| u.email.contains('@'));
        let issues = schema
            .safe_parse(json!({"id": 1, "email": "nobody"}))
            .unwrap_err();
        assert_eq!(issues.issues[0].path, vec!["email".to_string()]);
        assert_eq!(issues.to_string(), "email: must contain @");
    }

    #[test]
    fn from_fn_collects_multiple_issues() {
        let schema = from_fn(|data: Value| {
            let mut issues = ValidationIssues::default();
            if !data["name"].is_string() {
                issues.push(ValidationIssue::new(vec!["name".into()], "expected string"));
            }
            if !data["age"].is_u64() {
                issues.push(ValidationIssue::new(vec!["age".into()], "expected integer"));
            }
            if issues.is_empty() {
                Ok(data)
            } else {
                Err(issues)
            }
        });
        let issues = schema.safe_parse(json!({"name": 1})).unwrap_err();
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn both_modes_agree() {
        let schema = Typed::<User>::new();
        let good = json!({"id": 1, "email": "a@b.c"});
        assert_eq!(
            validate(&schema, good.clone(), false).unwrap(),
            validate(&schema, good, true).unwrap()
        );

        let bad = json!({"id": "one"});
        let strict = validate(&schema, bad.clone(), false).unwrap_err();
        let tolerant = validate(&schema, bad, true).unwrap_err();
        match (strict, tolerant) {
            (RequestError::Validation(a), RequestError::Validation(b)) => assert_eq!(a, b),
            other => panic!("expected two validation errors, got {other:?}"),
        }
    }
}
