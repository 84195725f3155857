//! Semantic type descriptors for record fields.
//!
//! A [`Schema`] describes one field of an outgoing record: its primitive
//! wire kind, an optional logical annotation layered on top of it, and any
//! parameters the annotation needs (the decimal scale, for example).

use std::collections::BTreeMap;
use std::fmt;

use crate::value::FieldValue;

/// Parameter key carrying the scale of a decimal field.
pub const DECIMAL_SCALE: &str = "scale";

/// Primitive wire kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Single precision float.
    Float32,
    /// Double precision float.
    Float64,
    /// Boolean.
    Boolean,
    /// UTF-8 string.
    String,
    /// Byte sequence.
    Bytes,
    /// Ordered collection. No dialect maps it to a column.
    Array,
    /// Key/value collection. No dialect maps it to a column.
    Map,
    /// Nested record. No dialect maps it to a column.
    Struct,
}

impl PrimitiveKind {
    /// Returns the upper-case wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
            Self::Bytes => "BYTES",
            Self::Array => "ARRAY",
            Self::Map => "MAP",
            Self::Struct => "STRUCT",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical annotation layered over a primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// Arbitrary precision decimal with a fixed scale (over BYTES).
    Decimal,
    /// Calendar date (over INT32).
    Date,
    /// Time of day (over INT32).
    Time,
    /// Instant in time (over INT64).
    Timestamp,
}

impl LogicalType {
    /// Returns the fully qualified logical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Decimal => "org.apache.kafka.connect.data.Decimal",
            Self::Date => "org.apache.kafka.connect.data.Date",
            Self::Time => "org.apache.kafka.connect.data.Time",
            Self::Timestamp => "org.apache.kafka.connect.data.Timestamp",
        }
    }
}

/// Semantic type of a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Primitive wire kind.
    pub kind: PrimitiveKind,
    /// Optional logical annotation; takes precedence over `kind` for mapping.
    pub logical: Option<LogicalType>,
    /// Annotation parameters.
    pub parameters: BTreeMap<String, String>,
    /// Whether the field may be absent.
    pub optional: bool,
    /// Default value rendered into column specs.
    pub default: Option<FieldValue>,
}

impl Schema {
    /// Creates a required schema of the given kind.
    #[must_use]
    pub const fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            logical: None,
            parameters: BTreeMap::new(),
            optional: false,
            default: None,
        }
    }

    /// Creates a decimal schema with the given scale.
    #[must_use]
    pub fn decimal(scale: u32) -> Self {
        Self::new(PrimitiveKind::Bytes)
            .logical(LogicalType::Decimal)
            .parameter(DECIMAL_SCALE, scale.to_string())
    }

    /// Creates a date schema.
    #[must_use]
    pub fn date() -> Self {
        Self::new(PrimitiveKind::Int32).logical(LogicalType::Date)
    }

    /// Creates a time schema.
    #[must_use]
    pub fn time() -> Self {
        Self::new(PrimitiveKind::Int32).logical(LogicalType::Time)
    }

    /// Creates a timestamp schema.
    #[must_use]
    pub fn timestamp() -> Self {
        Self::new(PrimitiveKind::Int64).logical(LogicalType::Timestamp)
    }

    /// Sets the logical annotation.
    #[must_use]
    pub fn logical(mut self, logical: LogicalType) -> Self {
        self.logical = Some(logical);
        self
    }

    /// Adds an annotation parameter.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Marks the schema optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: FieldValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns the declared decimal scale, if present and numeric.
    #[must_use]
    pub fn decimal_scale(&self) -> Option<u32> {
        self.parameters.get(DECIMAL_SCALE)?.parse().ok()
    }
}

/// A field of an outgoing record, as seen by DDL generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkRecordField {
    /// Field (and column) name.
    pub name: String,
    /// Semantic type.
    pub schema: Schema,
    /// Whether the field is part of the primary key.
    pub is_primary_key: bool,
}

impl SinkRecordField {
    /// Creates a non-key field.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            is_primary_key: false,
        }
    }

    /// Creates a primary key field.
    #[must_use]
    pub fn primary_key(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            is_primary_key: true,
        }
    }

    /// Returns whether the column accepts NULL.
    ///
    /// Key columns never do.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        !self.is_primary_key && self.schema.optional
    }
}
