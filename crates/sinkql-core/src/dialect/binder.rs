//! Value binding.
//!
//! A value passes through an ordered chain of handlers until one binds it:
//! SQL NULL for absent values, then the logical binder, then the dialect's
//! primitive hook, then the generic primitive binder. A value nobody claims
//! is an unsupported source type.

use std::collections::BTreeMap;

use tracing::debug;

use super::{generic, DatabaseDialect, DialectProfile};
use crate::config::{InsertMode, SinkOptions};
use crate::error::{DialectError, Result};
use crate::metadata::{ColumnDefinition, SqlTypeCode, TableDefinition};
use crate::schema::{LogicalType, PrimitiveKind, Schema, SinkRecordField};
use crate::statement::PreparedStatement;
use crate::value::FieldValue;

/// Result of offering a value to one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The handler issued the bind call.
    Bound,
    /// The handler does not apply; the next one is tried.
    NotApplicable,
}

/// One non-null value to bind.
#[derive(Debug, Clone, Copy)]
pub struct BindRequest<'a> {
    /// 1-based parameter position.
    pub index: usize,
    /// Field the value belongs to.
    pub field_name: &'a str,
    /// Semantic type of the field.
    pub schema: &'a Schema,
    /// The value.
    pub value: &'a FieldValue,
    /// Catalog metadata of the target column, when the table exists.
    pub column: Option<&'a ColumnDefinition>,
}

/// Dialect state a handler may consult.
#[derive(Debug, Clone, Copy)]
pub struct BindContext<'a> {
    /// Profile of the binding dialect.
    pub profile: &'a DialectProfile,
    /// Sink options, absent outside a sink.
    pub sink: Option<&'a SinkOptions>,
}

impl BindContext<'_> {
    /// Returns the configured insert mode.
    #[must_use]
    pub fn insert_mode(&self) -> InsertMode {
        self.sink.map_or(InsertMode::Insert, |sink| sink.insert_mode)
    }
}

impl DatabaseDialect {
    /// Binds one field value at `index`.
    ///
    /// `column` is the target column's catalog metadata; pass `None` when
    /// the table does not exist yet and the bind is decided by type alone.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnsupportedSourceType`] when no handler
    /// claims the value, and propagates driver errors unchanged.
    pub fn bind_field(
        &self,
        statement: &mut dyn PreparedStatement,
        index: usize,
        field: &SinkRecordField,
        value: Option<&FieldValue>,
        column: Option<&ColumnDefinition>,
    ) -> Result<()> {
        let Some(value) = value else {
            let sql_type =
                column.map_or_else(|| null_type_code(&field.schema), |c| Some(c.sql_type));
            statement.set_null(index, sql_type)?;
            return Ok(());
        };

        let request = BindRequest {
            index,
            field_name: &field.name,
            schema: &field.schema,
            value,
            column,
        };
        let context = BindContext {
            profile: &self.profile,
            sink: self.sink_options(),
        };

        if generic::bind_logical(statement, &request)? == BindOutcome::Bound {
            return Ok(());
        }
        if self.hooks.bind_primitive(statement, &request, &context)? == BindOutcome::Bound {
            debug!(dialect = self.name(), field = %field.name, index, "Bound through dialect hook");
            return Ok(());
        }
        if generic::bind_primitive(statement, &request, &context)? == BindOutcome::Bound {
            return Ok(());
        }
        Err(DialectError::UnsupportedSourceType(field.schema.kind))
    }
}

/// SQL type code used for NULL when no catalog metadata is available.
fn null_type_code(schema: &Schema) -> Option<SqlTypeCode> {
    if let Some(logical) = schema.logical {
        return Some(match logical {
            LogicalType::Decimal => SqlTypeCode::Numeric,
            LogicalType::Date => SqlTypeCode::Date,
            LogicalType::Time => SqlTypeCode::Time,
            LogicalType::Timestamp => SqlTypeCode::Timestamp,
        });
    }
    match schema.kind {
        PrimitiveKind::Int8 | PrimitiveKind::Int16 => Some(SqlTypeCode::SmallInt),
        PrimitiveKind::Int32 => Some(SqlTypeCode::Integer),
        PrimitiveKind::Int64 => Some(SqlTypeCode::BigInt),
        PrimitiveKind::Float32 => Some(SqlTypeCode::Real),
        PrimitiveKind::Float64 => Some(SqlTypeCode::Double),
        PrimitiveKind::Boolean => Some(SqlTypeCode::Boolean),
        PrimitiveKind::String => Some(SqlTypeCode::Varchar),
        PrimitiveKind::Bytes => Some(SqlTypeCode::Varbinary),
        PrimitiveKind::Array | PrimitiveKind::Map | PrimitiveKind::Struct => None,
    }
}

/// Binds whole records in the parameter order the statement builders use.
///
/// Insert and upsert statements take key fields first; update statements
/// take them last.
#[derive(Debug, Clone, Copy)]
pub struct StatementBinder<'a> {
    dialect: &'a DatabaseDialect,
    insert_mode: InsertMode,
    key_fields: &'a [SinkRecordField],
    non_key_fields: &'a [SinkRecordField],
    table: Option<&'a TableDefinition>,
}

impl<'a> StatementBinder<'a> {
    /// Creates a binder using the dialect's configured insert mode.
    #[must_use]
    pub fn new(
        dialect: &'a DatabaseDialect,
        key_fields: &'a [SinkRecordField],
        non_key_fields: &'a [SinkRecordField],
    ) -> Self {
        Self {
            dialect,
            insert_mode: dialect.config().insert_mode(),
            key_fields,
            non_key_fields,
            table: None,
        }
    }

    /// Overrides the insert mode.
    #[must_use]
    pub const fn insert_mode(mut self, insert_mode: InsertMode) -> Self {
        self.insert_mode = insert_mode;
        self
    }

    /// Resolves column metadata from an existing table.
    #[must_use]
    pub const fn table(mut self, table: &'a TableDefinition) -> Self {
        self.table = Some(table);
        self
    }

    /// Fields in parameter order.
    fn ordered_fields(&self) -> impl Iterator<Item = &'a SinkRecordField> {
        let (first, second) = match self.insert_mode {
            InsertMode::Update => (self.non_key_fields, self.key_fields),
            InsertMode::Insert | InsertMode::Upsert => (self.key_fields, self.non_key_fields),
        };
        first.iter().chain(second)
    }

    fn column(&self, name: &str) -> Option<&'a ColumnDefinition> {
        let table = self.table?;
        table.column(name).or_else(|| {
            let folded = self.dialect.policy().fold().apply(name);
            table.column(&folded)
        })
    }

    /// Binds one record and returns the number of parameters bound.
    ///
    /// Fields missing from `values` are bound as NULL.
    ///
    /// # Errors
    ///
    /// Returns the first bind error; earlier parameters stay bound.
    pub fn bind_record(
        &self,
        statement: &mut dyn PreparedStatement,
        values: &BTreeMap<String, FieldValue>,
    ) -> Result<usize> {
        let mut index = 0;
        for field in self.ordered_fields() {
            index += 1;
            let column = self.column(&field.name);
            self.dialect
                .bind_field(statement, index, field, values.get(&field.name), column)?;
        }
        debug!(
            dialect = self.dialect.name(),
            mode = ?self.insert_mode,
            parameters = index,
            "Bound record"
        );
        Ok(index)
    }
}
