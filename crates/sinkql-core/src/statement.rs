//! Driver-facing collaborators: the prepared statement bind surface and the
//! catalog connection used for lookups.
//!
//! Both are synchronous. A statement is borrowed mutably for each bind, so
//! one statement can never be driven from two threads at once.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::error::DriverError;
use crate::metadata::SqlTypeCode;

/// Result type for driver calls.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// An owned reader handed to the driver for streamed binds.
pub type ParamStream = Box<dyn Read + Send>;

/// The bind surface of a prepared statement.
///
/// Parameter positions are 1-based.
pub trait PreparedStatement {
    /// Binds SQL NULL.
    fn set_null(&mut self, index: usize, sql_type: Option<SqlTypeCode>) -> DriverResult<()>;
    /// Binds a boolean.
    fn set_bool(&mut self, index: usize, value: bool) -> DriverResult<()>;
    /// Binds an 8-bit integer.
    fn set_i8(&mut self, index: usize, value: i8) -> DriverResult<()>;
    /// Binds a 16-bit integer.
    fn set_i16(&mut self, index: usize, value: i16) -> DriverResult<()>;
    /// Binds a 32-bit integer.
    fn set_i32(&mut self, index: usize, value: i32) -> DriverResult<()>;
    /// Binds a 64-bit integer.
    fn set_i64(&mut self, index: usize, value: i64) -> DriverResult<()>;
    /// Binds a single precision float through the generic float call.
    fn set_f32(&mut self, index: usize, value: f32) -> DriverResult<()>;
    /// Binds a double precision float through the generic float call.
    fn set_f64(&mut self, index: usize, value: f64) -> DriverResult<()>;
    /// Binds a string.
    fn set_string(&mut self, index: usize, value: &str) -> DriverResult<()>;
    /// Binds a string using the national character set.
    fn set_nstring(&mut self, index: usize, value: &str) -> DriverResult<()>;
    /// Binds a byte array inline.
    fn set_bytes(&mut self, index: usize, value: &[u8]) -> DriverResult<()>;
    /// Binds a decimal.
    fn set_decimal(&mut self, index: usize, value: &Decimal) -> DriverResult<()>;
    /// Binds a date.
    fn set_date(&mut self, index: usize, value: NaiveDate) -> DriverResult<()>;
    /// Binds a time of day.
    fn set_time(&mut self, index: usize, value: NaiveTime) -> DriverResult<()>;
    /// Binds a UTC timestamp.
    fn set_timestamp(&mut self, index: usize, value: DateTime<Utc>) -> DriverResult<()>;
    /// Binds a character stream.
    ///
    /// The stream yields UTF-8 bytes; `length` counts characters, not bytes.
    /// Without `length` the driver consumes the stream to find it.
    fn set_character_stream(
        &mut self,
        index: usize,
        reader: ParamStream,
        length: Option<u64>,
    ) -> DriverResult<()>;
    /// Binds a national character stream of unknown length, as UTF-8 bytes.
    fn set_ncharacter_stream(&mut self, index: usize, reader: ParamStream) -> DriverResult<()>;
    /// Binds a binary large object from a byte stream.
    fn set_blob(&mut self, index: usize, reader: ParamStream) -> DriverResult<()>;

    /// Binds a float through the driver's native binary float call.
    ///
    /// Drivers without one fall back to [`PreparedStatement::set_f32`].
    fn set_binary_float(&mut self, index: usize, value: f32) -> DriverResult<()> {
        self.set_f32(index, value)
    }

    /// Binds a double through the driver's native binary double call.
    ///
    /// Drivers without one fall back to [`PreparedStatement::set_f64`].
    fn set_binary_double(&mut self, index: usize, value: f64) -> DriverResult<()> {
        self.set_f64(index, value)
    }
}

/// A catalog row: column label to nullable text value.
pub type Row = BTreeMap<String, Option<String>>;

/// The subset of a live connection the dialects query.
pub trait CatalogConnection {
    /// Returns the user name of the current session.
    fn session_user(&mut self) -> DriverResult<String>;

    /// Runs a parameterized query with text parameters and returns all rows.
    fn query(&mut self, sql: &str, params: &[&str]) -> DriverResult<Vec<Row>>;
}

/// A value recorded by [`RecordingStatement`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// `set_null`.
    Null(Option<SqlTypeCode>),
    /// `set_bool`.
    Bool(bool),
    /// `set_i8`.
    I8(i8),
    /// `set_i16`.
    I16(i16),
    /// `set_i32`.
    I32(i32),
    /// `set_i64`.
    I64(i64),
    /// `set_f32`.
    F32(f32),
    /// `set_f64`.
    F64(f64),
    /// `set_string`.
    String(String),
    /// `set_nstring`.
    NString(String),
    /// `set_bytes`.
    Bytes(Vec<u8>),
    /// `set_decimal`.
    Decimal(Decimal),
    /// `set_date`.
    Date(NaiveDate),
    /// `set_time`.
    Time(NaiveTime),
    /// `set_timestamp`.
    Timestamp(DateTime<Utc>),
    /// `set_character_stream`, with the stream drained to text.
    CharacterStream {
        /// Stream contents.
        text: String,
        /// Length hint passed by the caller.
        length: Option<u64>,
    },
    /// `set_ncharacter_stream`, with the stream drained to text.
    NCharacterStream(String),
    /// `set_blob`, with the stream drained.
    Blob(Vec<u8>),
    /// `set_binary_float`.
    BinaryFloat(f32),
    /// `set_binary_double`.
    BinaryDouble(f64),
}

/// An in-memory statement that records every bind in call order.
///
/// Useful for dry runs and for asserting bind decisions in tests.
#[derive(Debug, Default)]
pub struct RecordingStatement {
    binds: Vec<(usize, BoundValue)>,
    reject: Option<(usize, DriverError)>,
}

impl RecordingStatement {
    /// Creates an empty statement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes any bind at `index` fail with `error`.
    #[must_use]
    pub fn rejecting(mut self, index: usize, error: DriverError) -> Self {
        self.reject = Some((index, error));
        self
    }

    /// Returns all binds in call order.
    #[must_use]
    pub fn binds(&self) -> &[(usize, BoundValue)] {
        &self.binds
    }

    /// Returns the last value bound at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BoundValue> {
        self.binds
            .iter()
            .rev()
            .find(|(i, _)| *i == index)
            .map(|(_, v)| v)
    }

    /// Forgets all recorded binds.
    pub fn clear(&mut self) {
        self.binds.clear();
    }

    fn record(&mut self, index: usize, value: BoundValue) -> DriverResult<()> {
        if let Some((reject_index, error)) = &self.reject {
            if *reject_index == index {
                return Err(error.clone());
            }
        }
        self.binds.push((index, value));
        Ok(())
    }
}

fn drain_text(mut reader: ParamStream) -> DriverResult<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| DriverError::new(17002, format!("failed to read character stream: {e}")))?;
    Ok(text)
}

impl PreparedStatement for RecordingStatement {
    fn set_null(&mut self, index: usize, sql_type: Option<SqlTypeCode>) -> DriverResult<()> {
        self.record(index, BoundValue::Null(sql_type))
    }

    fn set_bool(&mut self, index: usize, value: bool) -> DriverResult<()> {
        self.record(index, BoundValue::Bool(value))
    }

    fn set_i8(&mut self, index: usize, value: i8) -> DriverResult<()> {
        self.record(index, BoundValue::I8(value))
    }

    fn set_i16(&mut self, index: usize, value: i16) -> DriverResult<()> {
        self.record(index, BoundValue::I16(value))
    }

    fn set_i32(&mut self, index: usize, value: i32) -> DriverResult<()> {
        self.record(index, BoundValue::I32(value))
    }

    fn set_i64(&mut self, index: usize, value: i64) -> DriverResult<()> {
        self.record(index, BoundValue::I64(value))
    }

    fn set_f32(&mut self, index: usize, value: f32) -> DriverResult<()> {
        self.record(index, BoundValue::F32(value))
    }

    fn set_f64(&mut self, index: usize, value: f64) -> DriverResult<()> {
        self.record(index, BoundValue::F64(value))
    }

    fn set_string(&mut self, index: usize, value: &str) -> DriverResult<()> {
        self.record(index, BoundValue::String(value.to_string()))
    }

    fn set_nstring(&mut self, index: usize, value: &str) -> DriverResult<()> {
        self.record(index, BoundValue::NString(value.to_string()))
    }

    fn set_bytes(&mut self, index: usize, value: &[u8]) -> DriverResult<()> {
        self.record(index, BoundValue::Bytes(value.to_vec()))
    }

    fn set_decimal(&mut self, index: usize, value: &Decimal) -> DriverResult<()> {
        self.record(index, BoundValue::Decimal(*value))
    }

    fn set_date(&mut self, index: usize, value: NaiveDate) -> DriverResult<()> {
        self.record(index, BoundValue::Date(value))
    }

    fn set_time(&mut self, index: usize, value: NaiveTime) -> DriverResult<()> {
        self.record(index, BoundValue::Time(value))
    }

    fn set_timestamp(&mut self, index: usize, value: DateTime<Utc>) -> DriverResult<()> {
        self.record(index, BoundValue::Timestamp(value))
    }

    fn set_character_stream(
        &mut self,
        index: usize,
        reader: ParamStream,
        length: Option<u64>,
    ) -> DriverResult<()> {
        let text = drain_text(reader)?;
        self.record(index, BoundValue::CharacterStream { text, length })
    }

    fn set_ncharacter_stream(&mut self, index: usize, reader: ParamStream) -> DriverResult<()> {
        let text = drain_text(reader)?;
        self.record(index, BoundValue::NCharacterStream(text))
    }

    fn set_blob(&mut self, index: usize, mut reader: ParamStream) -> DriverResult<()> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| DriverError::new(17002, format!("failed to read blob stream: {e}")))?;
        self.record(index, BoundValue::Blob(data))
    }

    fn set_binary_float(&mut self, index: usize, value: f32) -> DriverResult<()> {
        self.record(index, BoundValue::BinaryFloat(value))
    }

    fn set_binary_double(&mut self, index: usize, value: f64) -> DriverResult<()> {
        self.record(index, BoundValue::BinaryDouble(value))
    }
}
