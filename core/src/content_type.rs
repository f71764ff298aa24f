//! Declared content types and the wire format each one selects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RequestError;

/// How a body is written on the way out and read on the way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON text in both directions.
    Json,
    /// `application/x-www-form-urlencoded` on the way out, text on the way back.
    Form,
    /// Passed through untouched in both directions.
    Text,
}

/// The closed set of content types the pipeline understands.
///
/// A content type is sent as `Accept` on GET and `Content-Type` on POST, and
/// picks the encode/decode strategy for bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
    #[default]
    Json,
    FormUrlEncoded,
    Text,
    Xml,
    Html,
}

// mime, format
static TABLE: [(ContentType, &str, Format); 5] = [
    (ContentType::Json, "application/json", Format::Json),
    (ContentType::FormUrlEncoded, "application/x-www-form-urlencoded", Format::Form),
    (ContentType::Text, "text/plain", Format::Text),
    (ContentType::Xml, "application/xml", Format::Text),
    (ContentType::Html, "text/html", Format::Text),
];

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Json,
        ContentType::FormUrlEncoded,
        ContentType::Text,
        ContentType::Xml,
        ContentType::Html,
    ];

    fn entry(&self) -> &'static (ContentType, &'static str, Format) {
        // Every variant has exactly one row.
        let idx = match self {
            ContentType::Json => 0,
            ContentType::FormUrlEncoded => 1,
            ContentType::Text => 2,
            ContentType::Xml => 3,
            ContentType::Html => 4,
        };
        &TABLE[idx]
    }

    pub fn mime(&self) -> &'static str {
        self.entry().1
    }

    pub fn format(&self) -> Format {
        self.entry().2
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

impl FromStr for ContentType {
    type Err = RequestError;

    /// Parses a MIME string. Parameters such as `; charset=utf-8` are ignored
    /// and matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or("").trim();
        TABLE
            .iter()
            .find(|(_, mime, _)| mime.eq_ignore_ascii_case(essence))
            .map(|(content_type, _, _)| *content_type)
            .ok_or_else(|| RequestError::Configuration(format!("Unsupported Content-Type: {s}")))
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.mime())
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
