//! Oracle primitive binds decided by the target column type.
//!
//! Only applies when catalog metadata is available; without it the generic
//! binder decides by semantic type alone.

use std::io::Cursor;

use bytes::Buf;
use sinkql_core::dialect::{BindContext, BindOutcome, BindRequest};
use sinkql_core::statement::PreparedStatement;
use sinkql_core::{FieldValue, InsertMode, PrimitiveKind, Result, SqlTypeCode};
use tracing::debug;

pub fn bind_primitive(
    statement: &mut dyn PreparedStatement,
    request: &BindRequest<'_>,
    context: &BindContext<'_>,
) -> Result<BindOutcome> {
    let Some(column) = request.column else {
        return Ok(BindOutcome::NotApplicable);
    };
    let index = request.index;

    match (request.schema.kind, column.sql_type, request.value) {
        (PrimitiveKind::String, SqlTypeCode::Clob, FieldValue::String(text)) => {
            let length = clob_length_hint(text, context);
            debug!(
                field = request.field_name,
                index,
                with_length = length.is_some(),
                "Streaming CLOB value"
            );
            let reader = Box::new(Cursor::new(text.clone().into_bytes()));
            statement.set_character_stream(index, reader, length)?;
        }
        (PrimitiveKind::String, SqlTypeCode::NClob, FieldValue::String(text)) => {
            let reader = Box::new(Cursor::new(text.clone().into_bytes()));
            statement.set_ncharacter_stream(index, reader)?;
        }
        (
            PrimitiveKind::String,
            SqlTypeCode::NVarchar | SqlTypeCode::NChar,
            FieldValue::String(text),
        ) => {
            statement.set_nstring(index, text)?;
        }
        (PrimitiveKind::Bytes, SqlTypeCode::Blob, FieldValue::Buffer(buffer)) => {
            statement.set_blob(index, Box::new(buffer.clone().reader()))?;
        }
        (PrimitiveKind::Bytes, SqlTypeCode::Blob, FieldValue::Bytes(raw)) => {
            statement.set_blob(index, Box::new(Cursor::new(raw.clone())))?;
        }
        (PrimitiveKind::Float32, SqlTypeCode::BinaryFloat, FieldValue::Float32(v)) => {
            statement.set_binary_float(index, *v)?;
        }
        (PrimitiveKind::Float64, SqlTypeCode::BinaryDouble, FieldValue::Float64(v)) => {
            statement.set_binary_double(index, *v)?;
        }
        _ => return Ok(BindOutcome::NotApplicable),
    }
    Ok(BindOutcome::Bound)
}

/// Length hint for a CLOB stream, counted in characters.
///
/// Upsert statements stream values at or above the profile threshold without
/// a hint; everything else carries one.
fn clob_length_hint(text: &str, context: &BindContext<'_>) -> Option<u64> {
    let length = text.chars().count();
    let threshold = match (context.insert_mode(), context.profile.upsert_lob_threshold) {
        (InsertMode::Upsert, Some(threshold)) => threshold,
        _ => usize::MAX,
    };
    if length < threshold {
        u64::try_from(length).ok()
    } else {
        None
    }
}
