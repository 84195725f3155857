//! Generic ANSI dialect.
//!
//! Every vendor dialect falls back to the functions here for whatever its
//! hooks decline, so they define the baseline behaviour of the crate.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use tracing::debug;

use super::{
    AlterAddStyle, BindContext, BindOutcome, BindRequest, DatabaseDialect, DialectHooks,
    DialectProfile, DropIfExists, UpsertStrategy,
};
use crate::config::DialectConfig;
use crate::error::{DialectError, Result};
use crate::identifier::{CaseFold, IdentifierRules};
use crate::schema::{LogicalType, PrimitiveKind, SinkRecordField};
use crate::statement::PreparedStatement;
use crate::value::FieldValue;

/// Dialect used when no vendor dialect claims a connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl GenericDialect {
    /// Capability profile of the generic dialect.
    pub const PROFILE: DialectProfile = DialectProfile {
        name: "generic",
        rules: IdentifierRules::ANSI,
        canonical_case: CaseFold::Preserve,
        upsert: UpsertStrategy::Unsupported,
        drop_if_exists: DropIfExists::Native,
        cascade_clause: " CASCADE",
        alter_add: AlterAddStyle::AddPerColumn,
        upsert_lob_threshold: None,
        health_check_query: "SELECT 1",
        current_timestamp_query: "SELECT CURRENT_TIMESTAMP",
    };

    /// Creates a generic dialect instance.
    #[must_use]
    pub fn create(config: DialectConfig) -> DatabaseDialect {
        DatabaseDialect::new(Self::PROFILE, Self, config)
    }
}

impl DialectHooks for GenericDialect {}

/// Maps a field to a generic ANSI column type.
///
/// # Errors
///
/// Returns [`DialectError::UnsupportedType`] for structured kinds.
pub(crate) fn sql_type(field: &SinkRecordField) -> Result<String> {
    let schema = &field.schema;
    if let Some(logical) = schema.logical {
        return Ok(match logical {
            LogicalType::Decimal => "DECIMAL",
            LogicalType::Date => "DATE",
            LogicalType::Time => "TIME",
            LogicalType::Timestamp => "TIMESTAMP",
        }
        .to_string());
    }
    let sql_type = match schema.kind {
        PrimitiveKind::Int8 => "TINYINT",
        PrimitiveKind::Int16 => "SMALLINT",
        PrimitiveKind::Int32 => "INTEGER",
        PrimitiveKind::Int64 => "BIGINT",
        PrimitiveKind::Float32 => "REAL",
        PrimitiveKind::Float64 => "DOUBLE PRECISION",
        PrimitiveKind::Boolean => "BOOLEAN",
        PrimitiveKind::String => "TEXT",
        PrimitiveKind::Bytes => "BLOB",
        PrimitiveKind::Array | PrimitiveKind::Map | PrimitiveKind::Struct => {
            return Err(DialectError::UnsupportedType {
                kind: schema.kind,
                logical: schema.logical,
            })
        }
    };
    Ok(sql_type.to_string())
}

/// Binds a value whose variant matches the field's logical annotation.
pub(crate) fn bind_logical(
    statement: &mut dyn PreparedStatement,
    request: &BindRequest<'_>,
) -> Result<BindOutcome> {
    let index = request.index;
    match (request.schema.logical, request.value) {
        (Some(LogicalType::Decimal), FieldValue::Decimal(d)) => statement.set_decimal(index, d)?,
        (Some(LogicalType::Date), FieldValue::Date(d)) => statement.set_date(index, *d)?,
        (Some(LogicalType::Time), FieldValue::Time(t)) => statement.set_time(index, *t)?,
        (Some(LogicalType::Timestamp), FieldValue::Timestamp(ts)) => {
            statement.set_timestamp(index, *ts)?;
        }
        _ => return Ok(BindOutcome::NotApplicable),
    }
    Ok(BindOutcome::Bound)
}

/// Binds a primitive value with the plain driver calls.
///
/// INT64 and STRING fields listed as timestamp fields in the sink options
/// are bound as timestamps.
pub(crate) fn bind_primitive(
    statement: &mut dyn PreparedStatement,
    request: &BindRequest<'_>,
    context: &BindContext<'_>,
) -> Result<BindOutcome> {
    let index = request.index;
    if let Some(ts) = timestamp_field_value(request, context)? {
        statement.set_timestamp(index, ts)?;
        return Ok(BindOutcome::Bound);
    }
    match request.value {
        FieldValue::Int8(v) => statement.set_i8(index, *v)?,
        FieldValue::Int16(v) => statement.set_i16(index, *v)?,
        FieldValue::Int32(v) => statement.set_i32(index, *v)?,
        FieldValue::Int64(v) => statement.set_i64(index, *v)?,
        FieldValue::Float32(v) => statement.set_f32(index, *v)?,
        FieldValue::Float64(v) => statement.set_f64(index, *v)?,
        FieldValue::Boolean(v) => statement.set_bool(index, *v)?,
        FieldValue::String(s) => statement.set_string(index, s)?,
        FieldValue::Bytes(_) | FieldValue::Buffer(_) => {
            statement.set_bytes(index, request.value.as_bytes().unwrap_or_default())?;
        }
        FieldValue::Decimal(_)
        | FieldValue::Date(_)
        | FieldValue::Time(_)
        | FieldValue::Timestamp(_) => return Ok(BindOutcome::NotApplicable),
    }
    Ok(BindOutcome::Bound)
}

fn timestamp_field_value(
    request: &BindRequest<'_>,
    context: &BindContext<'_>,
) -> Result<Option<DateTime<Utc>>> {
    let listed = context
        .sink
        .and_then(|sink| sink.timestamp_precision_for(request.field_name))
        .is_some();
    if !listed || request.schema.logical.is_some() {
        return Ok(None);
    }
    let invalid = |message: String| DialectError::InvalidValue {
        field: request.field_name.to_string(),
        message,
    };
    match (request.schema.kind, request.value) {
        (PrimitiveKind::Int64, FieldValue::Int64(nanos)) => {
            Ok(Some(DateTime::from_timestamp_nanos(*nanos)))
        }
        (PrimitiveKind::String, FieldValue::String(text)) => {
            parse_timestamp(text).map(Some).ok_or_else(|| {
                invalid(format!("'{text}' is not an RFC 3339 or ISO-8601 timestamp"))
            })
        }
        _ => Ok(None),
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

static PASSWORD_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([?&;]([^=&;]*)password([^=&;]*)=)[^&;]*")
        .expect("password parameter pattern is valid")
});

/// Masks `password=` style URL and property parameters.
pub(crate) fn sanitize_url(url: &str) -> String {
    let sanitized = PASSWORD_PARAMETER.replace_all(url, "${1}****");
    if sanitized != url {
        debug!("Masked password parameter in connection URL");
    }
    sanitized.into_owned()
}
