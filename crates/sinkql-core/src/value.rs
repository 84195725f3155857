//! Runtime field values.
//!
//! A [`FieldValue`] is what the pipeline hands the binder for one column of
//! one row. Absence is modelled as `Option::None` at the call site, never as
//! a variant.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

/// A runtime value for a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 8-bit integer.
    Int8(i8),
    /// 16-bit integer.
    Int16(i16),
    /// 32-bit integer.
    Int32(i32),
    /// 64-bit integer.
    Int64(i64),
    /// Single precision float.
    Float32(f32),
    /// Double precision float.
    Float64(f64),
    /// Boolean.
    Boolean(bool),
    /// Text.
    String(String),
    /// Raw byte sequence.
    Bytes(Vec<u8>),
    /// Shared byte buffer.
    Buffer(Bytes),
    /// Decimal value.
    Decimal(Decimal),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Instant in UTC.
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Returns the value as bytes, for either binary variant.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            Self::Buffer(b) => Some(b.as_ref()),
            _ => None,
        }
    }

    /// Renders the value as an inline SQL literal.
    ///
    /// Only used for column DEFAULT clauses; row values are always bound.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        match self {
            Self::Int8(n) => n.to_string(),
            Self::Int16(n) => n.to_string(),
            Self::Int32(n) => n.to_string(),
            Self::Int64(n) => n.to_string(),
            Self::Float32(f) => f.to_string(),
            Self::Float64(f) => f.to_string(),
            Self::Boolean(b) => String::from(if *b { "1" } else { "0" }),
            Self::String(s) => {
                // Escape single quotes by doubling them
                format!("'{}'", s.replace('\'', "''"))
            }
            Self::Bytes(_) | Self::Buffer(_) => {
                let hex: String = self
                    .as_bytes()
                    .unwrap_or_default()
                    .iter()
                    .map(|byte| format!("{byte:02X}"))
                    .collect();
                format!("x'{hex}'")
            }
            Self::Decimal(d) => d.to_string(),
            Self::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
            Self::Time(t) => format!("'{}'", t.format("%H:%M:%S%.3f")),
            Self::Timestamp(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}

impl From<i8> for FieldValue {
    fn from(v: i8) -> Self {
        Self::Int8(v)
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Bytes> for FieldValue {
    fn from(v: Bytes) -> Self {
        Self::Buffer(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}
