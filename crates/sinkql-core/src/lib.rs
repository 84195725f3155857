//! # sinkql-core
//!
//! Dialect-aware DDL/DML generation and parameter binding for relational
//! sinks.
//!
//! A sink pipeline hands this crate logically typed records (a column name, a
//! semantic type and a runtime value) and gets back statement text and
//! parameter binds that are correct for one target database.
//!
//! This crate provides:
//! - The record data model: [`Schema`], [`SinkRecordField`], [`FieldValue`]
//! - Identifier quoting, case folding and qualified-name parsing
//!   ([`IdentifierPolicy`])
//! - Statement builders for `CREATE`/`ALTER`/`DROP TABLE`, `INSERT`,
//!   `UPDATE` and merge-style upserts
//! - A value binder chain that picks the one correct bind call per value
//! - The generic ANSI dialect every vendor dialect falls back to
//! - A [`DialectRegistry`] selecting a dialect from a connection URL
//!
//! ## Building statements
//!
//! ```rust
//! use sinkql_core::config::DialectConfig;
//! use sinkql_core::dialect::{DropOptions, GenericDialect};
//! use sinkql_core::{ColumnId, PrimitiveKind, Schema, SinkRecordField, TableId};
//!
//! let dialect = GenericDialect::create(DialectConfig::default());
//! let table = TableId::new(None, Some("app"), "orders");
//!
//! let fields = [
//!     SinkRecordField::primary_key("id", Schema::new(PrimitiveKind::Int64)),
//!     SinkRecordField::new("note", Schema::new(PrimitiveKind::String).optional()),
//! ];
//! let ddl = dialect.build_create_table(&table, &fields).unwrap();
//! assert!(ddl.starts_with("CREATE TABLE \"app\".\"orders\" ("));
//!
//! let insert = dialect.build_insert(
//!     &table,
//!     &[ColumnId::new(&table, "id")],
//!     &[ColumnId::new(&table, "note")],
//! );
//! assert_eq!(insert, "INSERT INTO \"app\".\"orders\"(\"id\",\"note\") VALUES(?,?)");
//!
//! let drop = dialect.build_drop_table(&table, DropOptions::new().if_exists(true));
//! assert_eq!(drop, "DROP TABLE IF EXISTS \"app\".\"orders\"");
//! ```
//!
//! ## Binding values
//!
//! Values are bound through the [`PreparedStatement`] trait. The
//! [`RecordingStatement`] implementation records every call, which is handy
//! for dry runs:
//!
//! ```rust
//! use sinkql_core::config::DialectConfig;
//! use sinkql_core::dialect::GenericDialect;
//! use sinkql_core::statement::{BoundValue, RecordingStatement};
//! use sinkql_core::{FieldValue, PrimitiveKind, Schema, SinkRecordField};
//!
//! let dialect = GenericDialect::create(DialectConfig::default());
//! let field = SinkRecordField::new("qty", Schema::new(PrimitiveKind::Int32).optional());
//!
//! let mut stmt = RecordingStatement::new();
//! dialect.bind_field(&mut stmt, 1, &field, Some(&FieldValue::Int32(3)), None).unwrap();
//! dialect.bind_field(&mut stmt, 2, &field, None, None).unwrap();
//! assert_eq!(stmt.get(1), Some(&BoundValue::I32(3)));
//! ```

pub mod config;
pub mod dialect;
pub mod error;
pub mod expression;
pub mod identifier;
pub mod metadata;
pub mod registry;
pub mod schema;
pub mod statement;
pub mod value;

pub use config::{DialectConfig, InsertMode, SinkOptions, TimestampPrecision};
pub use dialect::{DatabaseDialect, DialectHooks, DialectProfile, StatementBinder};
pub use error::{DialectError, DriverError, Result};
pub use identifier::{ColumnId, IdentifierPolicy, QuoteMethod, TableId};
pub use metadata::{ColumnDefinition, SqlTypeCode, TableDefinition};
pub use registry::{DialectProvider, DialectRegistry, JdbcUrlInfo};
pub use schema::{LogicalType, PrimitiveKind, Schema, SinkRecordField};
pub use statement::{CatalogConnection, PreparedStatement, RecordingStatement};
pub use value::FieldValue;
