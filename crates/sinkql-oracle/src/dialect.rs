//! Oracle dialect implementation.

use std::sync::LazyLock;

use regex::Regex;
use sinkql_core::config::{DialectConfig, SinkOptions};
use sinkql_core::dialect::{
    AlterAddStyle, BindContext, BindOutcome, BindRequest, DatabaseDialect, DialectHooks,
    DialectProfile, DropIfExists, UpsertStrategy,
};
use sinkql_core::identifier::{CaseFold, IdentifierPolicy, IdentifierRules};
use sinkql_core::statement::{CatalogConnection, PreparedStatement};
use sinkql_core::{DialectError, LogicalType, PrimitiveKind, Result, SinkRecordField};
use tracing::debug;

use crate::bind;

/// `ORA-00942: table or view does not exist`, as seen by `SQLCODE`.
pub const TABLE_DOES_NOT_EXIST: i32 = -942;

/// Character LOB values at least this long are streamed without a length
/// hint in upsert mode.
pub const CLOB_UPSERT_THRESHOLD: usize = 4000;

const SYNONYM_QUERY: &str =
    "SELECT TABLE_OWNER, TABLE_NAME FROM ALL_SYNONYMS WHERE OWNER = ? AND SYNONYM_NAME = ?";

static THIN_CREDENTIALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(:thin:[^/]*)/([^@]*)@").expect("thin credentials pattern is valid")
});

static OCI_CREDENTIALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(:oci[^:]*:[^/]*)/([^@]*)@").expect("oci credentials pattern is valid")
});

/// Oracle dialect hooks.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl OracleDialect {
    /// Capability profile of Oracle.
    pub const PROFILE: DialectProfile = DialectProfile {
        name: "oracle",
        rules: IdentifierRules::ANSI,
        canonical_case: CaseFold::Upper,
        upsert: UpsertStrategy::Merge {
            source_suffix: " FROM dual",
        },
        drop_if_exists: DropIfExists::Guarded {
            missing_object_code: TABLE_DOES_NOT_EXIST,
        },
        cascade_clause: " CASCADE CONSTRAINTS",
        alter_add: AlterAddStyle::Parenthesized,
        upsert_lob_threshold: Some(CLOB_UPSERT_THRESHOLD),
        health_check_query: "SELECT 1 FROM DUAL",
        current_timestamp_query: "select CURRENT_TIMESTAMP from dual",
    };

    /// Creates a new Oracle dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates a configured Oracle dialect instance.
    #[must_use]
    pub fn create(config: DialectConfig) -> DatabaseDialect {
        DatabaseDialect::new(Self::PROFILE, Self, config)
    }
}

impl DialectHooks for OracleDialect {
    fn sql_type(
        &self,
        field: &SinkRecordField,
        sink: Option<&SinkOptions>,
    ) -> Result<Option<String>> {
        let schema = &field.schema;
        if let Some(logical) = schema.logical {
            let sql_type = match logical {
                LogicalType::Decimal => {
                    let scale = schema.decimal_scale().ok_or_else(|| DialectError::InvalidSchema {
                        field: field.name.clone(),
                        message: "decimal requires a numeric 'scale' parameter".to_string(),
                    })?;
                    format!("NUMBER(*,{scale})")
                }
                LogicalType::Date | LogicalType::Time => "DATE".to_string(),
                LogicalType::Timestamp => "TIMESTAMP".to_string(),
            };
            return Ok(Some(sql_type));
        }

        if matches!(schema.kind, PrimitiveKind::Int64 | PrimitiveKind::String) {
            if let Some(precision) = sink.and_then(|s| s.timestamp_precision_for(&field.name)) {
                return Ok(Some(format!("TIMESTAMP({})", precision.digits())));
            }
        }

        let sql_type = match schema.kind {
            PrimitiveKind::Int8 => "NUMBER(3,0)",
            PrimitiveKind::Int16 => "NUMBER(5,0)",
            PrimitiveKind::Int32 => "NUMBER(10,0)",
            PrimitiveKind::Int64 => "NUMBER(19,0)",
            PrimitiveKind::Float32 => "BINARY_FLOAT",
            PrimitiveKind::Float64 => "BINARY_DOUBLE",
            PrimitiveKind::Boolean => "NUMBER(1,0)",
            PrimitiveKind::String => "VARCHAR2(4000)",
            PrimitiveKind::Bytes => "BLOB",
            PrimitiveKind::Array | PrimitiveKind::Map | PrimitiveKind::Struct => return Ok(None),
        };
        Ok(Some(sql_type.to_string()))
    }

    fn bind_primitive(
        &self,
        statement: &mut dyn PreparedStatement,
        request: &BindRequest<'_>,
        context: &BindContext<'_>,
    ) -> Result<BindOutcome> {
        bind::bind_primitive(statement, request, context)
    }

    fn sanitize_url(&self, url: &str) -> String {
        let url = THIN_CREDENTIALS.replace_all(url, "${1}/****@");
        OCI_CREDENTIALS.replace_all(&url, "${1}/****@").into_owned()
    }

    fn resolve_synonym(
        &self,
        connection: &mut dyn CatalogConnection,
        policy: &IdentifierPolicy,
        synonym: &str,
    ) -> Result<Option<String>> {
        let table = policy.parse_table_identifier(synonym)?;
        let owner = connection.session_user()?.to_uppercase();
        let name = table.table.to_uppercase();
        debug!(owner = %owner, synonym = %name, "Looking up synonym");

        let rows = connection.query(SYNONYM_QUERY, &[owner.as_str(), name.as_str()])?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|mut row| row.remove("TABLE_NAME").flatten()))
    }
}

#[cfg(test)]
mod tests {
    use sinkql_core::config::{InsertMode, TimestampPrecision};
    use sinkql_core::Schema;

    use super::*;

    fn map(field: &SinkRecordField, sink: Option<&SinkOptions>) -> String {
        OracleDialect.sql_type(field, sink).unwrap().unwrap()
    }

    #[test]
    fn test_oracle_primitive_types() {
        let cases = [
            (PrimitiveKind::Int8, "NUMBER(3,0)"),
            (PrimitiveKind::Int16, "NUMBER(5,0)"),
            (PrimitiveKind::Int32, "NUMBER(10,0)"),
            (PrimitiveKind::Int64, "NUMBER(19,0)"),
            (PrimitiveKind::Float32, "BINARY_FLOAT"),
            (PrimitiveKind::Float64, "BINARY_DOUBLE"),
            (PrimitiveKind::Boolean, "NUMBER(1,0)"),
            (PrimitiveKind::String, "VARCHAR2(4000)"),
            (PrimitiveKind::Bytes, "BLOB"),
        ];
        for (kind, expected) in cases {
            assert_eq!(map(&SinkRecordField::new("f", Schema::new(kind)), None), expected);
        }
    }

    #[test]
    fn test_oracle_logical_types() {
        assert_eq!(map(&SinkRecordField::new("f", Schema::decimal(3)), None), "NUMBER(*,3)");
        assert_eq!(map(&SinkRecordField::new("f", Schema::date()), None), "DATE");
        assert_eq!(map(&SinkRecordField::new("f", Schema::time()), None), "DATE");
        assert_eq!(map(&SinkRecordField::new("f", Schema::timestamp()), None), "TIMESTAMP");
    }

    #[test]
    fn test_decimal_without_scale_is_invalid() {
        let field = SinkRecordField::new(
            "amount",
            Schema::new(PrimitiveKind::Bytes).logical(LogicalType::Decimal),
        );
        let err = OracleDialect.sql_type(&field, None).unwrap_err();
        assert!(matches!(err, DialectError::InvalidSchema { field, .. } if field == "amount"));
    }

    #[test]
    fn test_structured_kinds_defer_to_generic() {
        let field = SinkRecordField::new("f", Schema::new(PrimitiveKind::Array));
        assert!(OracleDialect.sql_type(&field, None).unwrap().is_none());
    }

    #[test]
    fn test_timestamp_override_by_precision() {
        let micros = SinkOptions::new(InsertMode::Insert)
            .timestamp_fields(["ts"], TimestampPrecision::Microseconds);
        let nanos = SinkOptions::new(InsertMode::Insert)
            .timestamp_fields(["ts"], TimestampPrecision::Nanoseconds);

        for kind in [PrimitiveKind::Int64, PrimitiveKind::String] {
            let field = SinkRecordField::new("ts", Schema::new(kind));
            assert_eq!(map(&field, Some(&micros)), "TIMESTAMP(6)");
            assert_eq!(map(&field, Some(&nanos)), "TIMESTAMP(9)");
        }

        let int32 = SinkRecordField::new("ts", Schema::new(PrimitiveKind::Int32));
        assert_eq!(map(&int32, Some(&nanos)), "NUMBER(10,0)");
        let other = SinkRecordField::new("other", Schema::new(PrimitiveKind::Int64));
        assert_eq!(map(&other, Some(&nanos)), "NUMBER(19,0)");
    }

    #[test]
    fn test_sanitize_thin_and_oci() {
        let hooks = OracleDialect;
        assert_eq!(
            hooks.sanitize_url("jdbc:oracle:thin:scott/tiger@db:1521/svc"),
            "jdbc:oracle:thin:scott/****@db:1521/svc"
        );
        assert_eq!(
            hooks.sanitize_url("jdbc:oracle:oci8:scott/tiger@svc"),
            "jdbc:oracle:oci8:scott/****@svc"
        );
        assert_eq!(
            hooks.sanitize_url("jdbc:oracle:thin:@db:1521/svc"),
            "jdbc:oracle:thin:@db:1521/svc"
        );
    }
}
