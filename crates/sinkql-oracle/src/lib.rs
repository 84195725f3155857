//! # sinkql-oracle
//!
//! Oracle-specific dialect for `sinkql-core`.
//!
//! # How Oracle differs from the generic dialect
//!
//! - **No native upsert**: insert-or-update is synthesized as a `MERGE`
//!   from a single-row select on `dual`. Parameters are bound key columns
//!   first, then non-key columns.
//! - **No `DROP TABLE IF EXISTS`**: the drop runs inside an anonymous
//!   PL/SQL block that swallows `ORA-00942` and re-raises anything else.
//! - **Multi-column `ALTER TABLE ... ADD(...)`** in a single statement.
//! - **Case folding**: unquoted names are stored upper-case, so table names
//!   are folded when identifier quoting is disabled.
//! - **Types**: integers map to `NUMBER(p,0)` sized for their width,
//!   booleans to `NUMBER(1,0)`, floats to `BINARY_FLOAT`/`BINARY_DOUBLE`,
//!   strings to `VARCHAR2(4000)` and bytes to `BLOB`. Date and time both map
//!   to `DATE`.
//! - **Large objects**: strings bound to `CLOB`/`NCLOB` columns are
//!   streamed; `NVARCHAR2`/`NCHAR` columns use the national character bind.
//! - **Synonyms**: table names may be synonyms resolved through
//!   `ALL_SYNONYMS`.
//! - **Credentials in URLs**: `thin` and `oci` URLs carry `user/password@`,
//!   which is masked in logs.
//!
//! ## Example
//!
//! ```rust
//! use sinkql_core::config::{DialectConfig, InsertMode, SinkOptions};
//! use sinkql_core::{ColumnId, QuoteMethod, TableId};
//!
//! let registry = sinkql_oracle::registry();
//! let config = DialectConfig::sink(QuoteMethod::Always, SinkOptions::new(InsertMode::Upsert));
//! let dialect = registry
//!     .find_best_for("jdbc:oracle:thin:scott/tiger@db:1521/svc", config)
//!     .unwrap();
//!
//! let table = TableId::named("ORDERS");
//! let sql = dialect
//!     .build_upsert(&table, &[ColumnId::new(&table, "ID")], &[ColumnId::new(&table, "NOTE")])
//!     .unwrap();
//! assert!(sql.starts_with("merge into \"ORDERS\" using (select ? \"ID\", ? \"NOTE\" FROM dual)"));
//!
//! assert_eq!(
//!     dialect.sanitize_url("jdbc:oracle:thin:scott/tiger@db:1521/svc"),
//!     "jdbc:oracle:thin:scott/****@db:1521/svc"
//! );
//! ```

mod bind;
mod dialect;
mod provider;

pub use dialect::{OracleDialect, CLOB_UPSERT_THRESHOLD, TABLE_DOES_NOT_EXIST};
pub use provider::{registry, OracleProvider};
