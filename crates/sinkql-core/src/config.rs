//! Dialect configuration.
//!
//! The sink pipeline passes its options explicitly as an optional
//! [`SinkOptions`]; a dialect created without them (for example by a source
//! connector) uses type-driven defaults everywhere.
//!
//! Keys use the connector's dotted property names so a properties map can be
//! deserialized directly:
//!
//! ```rust
//! use sinkql_core::config::{DialectConfig, InsertMode, TimestampPrecision};
//!
//! let config = DialectConfig::from_json_str(r#"{
//!     "quote.sql.identifiers": "never",
//!     "insert.mode": "UPSERT",
//!     "timestamp.fields.list": "created_at, updated_at",
//!     "timestamp.precision.mode": "nanoseconds"
//! }"#).unwrap();
//!
//! let sink = config.sink.unwrap();
//! assert_eq!(sink.insert_mode, InsertMode::Upsert);
//! assert_eq!(sink.timestamp_fields, vec!["created_at", "updated_at"]);
//! assert_eq!(sink.timestamp_precision, TimestampPrecision::Nanoseconds);
//! ```

use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::identifier::QuoteMethod;

/// How records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InsertMode {
    /// Plain INSERT.
    #[default]
    Insert,
    /// Insert-or-update in one statement.
    Upsert,
    /// UPDATE only.
    Update,
}

impl FromStr for InsertMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INSERT" => Ok(Self::Insert),
            "UPSERT" => Ok(Self::Upsert),
            "UPDATE" => Ok(Self::Update),
            other => Err(format!("unknown insert mode '{other}'")),
        }
    }
}

impl TryFrom<String> for InsertMode {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InsertMode> for String {
    fn from(value: InsertMode) -> Self {
        match value {
            InsertMode::Insert => "insert",
            InsertMode::Upsert => "upsert",
            InsertMode::Update => "update",
        }
        .to_string()
    }
}

/// Sub-second precision of fields listed in `timestamp.fields.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimestampPrecision {
    /// Six fractional digits.
    #[default]
    Microseconds,
    /// Nine fractional digits.
    Nanoseconds,
}

impl TimestampPrecision {
    /// Returns the number of fractional second digits.
    #[must_use]
    pub const fn digits(self) -> u8 {
        match self {
            Self::Microseconds => 6,
            Self::Nanoseconds => 9,
        }
    }
}

impl FromStr for TimestampPrecision {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "microseconds" => Ok(Self::Microseconds),
            "nanoseconds" => Ok(Self::Nanoseconds),
            other => Err(format!("unknown timestamp precision '{other}'")),
        }
    }
}

impl TryFrom<String> for TimestampPrecision {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimestampPrecision> for String {
    fn from(value: TimestampPrecision) -> Self {
        match value {
            TimestampPrecision::Microseconds => "microseconds",
            TimestampPrecision::Nanoseconds => "nanoseconds",
        }
        .to_string()
    }
}

/// Options only a sink pipeline supplies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SinkOptions {
    /// Write mode.
    #[serde(rename = "insert.mode", default)]
    pub insert_mode: InsertMode,
    /// Field names stored as timestamps regardless of their wire kind.
    #[serde(
        rename = "timestamp.fields.list",
        default,
        deserialize_with = "list_or_csv"
    )]
    pub timestamp_fields: Vec<String>,
    /// Precision for `timestamp_fields`.
    #[serde(rename = "timestamp.precision.mode", default)]
    pub timestamp_precision: TimestampPrecision,
}

impl SinkOptions {
    /// Creates options for the given insert mode.
    #[must_use]
    pub fn new(insert_mode: InsertMode) -> Self {
        Self {
            insert_mode,
            ..Self::default()
        }
    }

    /// Designates timestamp fields at the given precision.
    #[must_use]
    pub fn timestamp_fields<I, S>(mut self, fields: I, precision: TimestampPrecision) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timestamp_fields = fields.into_iter().map(Into::into).collect();
        self.timestamp_precision = precision;
        self
    }

    /// Returns the configured precision when `field` is a timestamp field.
    #[must_use]
    pub fn timestamp_precision_for(&self, field: &str) -> Option<TimestampPrecision> {
        self.timestamp_fields
            .iter()
            .any(|f| f == field)
            .then_some(self.timestamp_precision)
    }
}

/// Configuration every dialect instance is created with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialectConfig {
    /// Identifier quoting (`quote.sql.identifiers`).
    pub quote_identifiers: QuoteMethod,
    /// Sink-only options; absent outside a sink.
    pub sink: Option<SinkOptions>,
}

impl DialectConfig {
    /// Creates a configuration with sink options.
    #[must_use]
    pub const fn sink(quote_identifiers: QuoteMethod, sink: SinkOptions) -> Self {
        Self {
            quote_identifiers,
            sink: Some(sink),
        }
    }

    /// Reads a configuration from a JSON object of connector properties.
    ///
    /// Sink options are present when any sink key is.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DialectError::Config`] for malformed JSON or values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the insert mode, defaulting to plain inserts outside a sink.
    #[must_use]
    pub fn insert_mode(&self) -> InsertMode {
        self.sink.as_ref().map_or(InsertMode::Insert, |s| s.insert_mode)
    }
}

const SINK_KEYS: [&str; 3] = [
    "insert.mode",
    "timestamp.fields.list",
    "timestamp.precision.mode",
];

impl<'de> Deserialize<'de> for DialectConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let quote_identifiers = match map.get("quote.sql.identifiers") {
            Some(value) => QuoteMethod::deserialize(value).map_err(de::Error::custom)?,
            None => QuoteMethod::default(),
        };
        let sink = if SINK_KEYS.iter().any(|k| map.contains_key(*k)) {
            Some(
                SinkOptions::deserialize(serde_json::Value::Object(map))
                    .map_err(de::Error::custom)?,
            )
        } else {
            None
        };
        Ok(Self {
            quote_identifiers,
            sink,
        })
    }
}

fn list_or_csv<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(items) => items,
        ListOrCsv::Csv(csv) => csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sink_keys_means_no_sink_options() {
        let config =
            DialectConfig::from_json_str(r#"{"quote.sql.identifiers": "ALWAYS"}"#).unwrap();
        assert_eq!(config.quote_identifiers, QuoteMethod::Always);
        assert!(config.sink.is_none());
        assert_eq!(config.insert_mode(), InsertMode::Insert);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = DialectConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DialectConfig::default());
    }

    #[test]
    fn test_timestamp_fields_as_array() {
        let config = DialectConfig::from_json_str(
            r#"{"insert.mode": "upsert", "timestamp.fields.list": ["ts"]}"#,
        )
        .unwrap();
        let sink = config.sink.unwrap();
        assert_eq!(sink.timestamp_fields, vec!["ts"]);
        assert_eq!(sink.timestamp_precision, TimestampPrecision::Microseconds);
        assert_eq!(
            sink.timestamp_precision_for("ts"),
            Some(TimestampPrecision::Microseconds)
        );
        assert_eq!(sink.timestamp_precision_for("other"), None);
    }

    #[test]
    fn test_bad_insert_mode_is_config_error() {
        let err = DialectConfig::from_json_str(r#"{"insert.mode": "merge"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown insert mode"));
    }

    #[test]
    fn test_precision_digits() {
        assert_eq!(TimestampPrecision::Microseconds.digits(), 6);
        assert_eq!(TimestampPrecision::Nanoseconds.digits(), 9);
    }
}
