//! Live catalog metadata for target columns.
//!
//! These are resolved from the target table before a statement is built and
//! are absent entirely when the table does not exist yet.

use std::collections::BTreeMap;

use crate::identifier::TableId;

/// SQL type code reported by the catalog for a column.
///
/// Mirrors the subset of driver type codes the dialects distinguish;
/// anything else is carried verbatim in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlTypeCode {
    /// BOOLEAN.
    Boolean,
    /// SMALLINT / TINYINT.
    SmallInt,
    /// INTEGER.
    Integer,
    /// BIGINT.
    BigInt,
    /// NUMERIC / NUMBER / DECIMAL.
    Numeric,
    /// REAL / FLOAT.
    Real,
    /// DOUBLE.
    Double,
    /// Vendor native single precision float (Oracle `BINARY_FLOAT`).
    BinaryFloat,
    /// Vendor native double precision float (Oracle `BINARY_DOUBLE`).
    BinaryDouble,
    /// CHAR.
    Char,
    /// VARCHAR / VARCHAR2.
    Varchar,
    /// NCHAR.
    NChar,
    /// NVARCHAR / NVARCHAR2.
    NVarchar,
    /// Character large object.
    Clob,
    /// National character large object.
    NClob,
    /// VARBINARY / RAW.
    Varbinary,
    /// Binary large object.
    Blob,
    /// DATE.
    Date,
    /// TIME.
    Time,
    /// TIMESTAMP.
    Timestamp,
    /// Any other driver type code.
    Other(i32),
}

/// Metadata for one existing column of the target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name as stored in the catalog.
    pub name: String,
    /// Driver type code.
    pub sql_type: SqlTypeCode,
    /// Vendor type name (e.g. `VARCHAR2`).
    pub type_name: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Numeric precision, when applicable.
    pub precision: Option<u32>,
    /// Numeric scale, when applicable.
    pub scale: Option<i32>,
}

impl ColumnDefinition {
    /// Creates a nullable column definition.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sql_type: SqlTypeCode,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sql_type,
            type_name: type_name.into(),
            nullable: true,
            precision: None,
            scale: None,
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets numeric precision and scale.
    #[must_use]
    pub fn numeric(mut self, precision: u32, scale: i32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }
}

/// Metadata for an existing target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    /// Table identifier.
    pub table: TableId,
    columns: BTreeMap<String, ColumnDefinition>,
}

impl TableDefinition {
    /// Creates a definition from catalog columns.
    #[must_use]
    pub fn new(table: TableId, columns: impl IntoIterator<Item = ColumnDefinition>) -> Self {
        Self {
            table,
            columns: columns.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.get(name)
    }

    /// Returns the column names in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
