//! Error types for dialect operations.

use crate::schema::{LogicalType, PrimitiveKind};

/// An error raised by the underlying driver or catalog call.
///
/// The dialect layer never interprets these; they travel back to the
/// pipeline unchanged so it can decide whether to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (vendor code {vendor_code}, SQLSTATE {})", .sql_state.as_deref().unwrap_or("-"))]
pub struct DriverError {
    /// Vendor-specific error code (e.g. 942 for ORA-00942).
    pub vendor_code: i32,
    /// Five character SQLSTATE, when the driver reports one.
    pub sql_state: Option<String>,
    /// Driver message.
    pub message: String,
}

impl DriverError {
    /// Creates a driver error with no SQLSTATE.
    #[must_use]
    pub fn new(vendor_code: i32, message: impl Into<String>) -> Self {
        Self {
            vendor_code,
            sql_state: None,
            message: message.into(),
        }
    }

    /// Attaches a SQLSTATE.
    #[must_use]
    pub fn with_sql_state(mut self, state: impl Into<String>) -> Self {
        self.sql_state = Some(state.into());
        self
    }
}

/// Errors that can occur while mapping, building or binding.
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    /// A semantic type has no column type in this dialect.
    #[error("{} ({kind}) type doesn't have a mapping to the SQL database column type", .logical.map_or("<none>", LogicalType::name))]
    UnsupportedType {
        /// Primitive kind of the field.
        kind: PrimitiveKind,
        /// Logical annotation of the field, if any.
        logical: Option<LogicalType>,
    },

    /// No binder path claimed the value.
    #[error("Unsupported source data type: {0}")]
    UnsupportedSourceType(PrimitiveKind),

    /// The dialect cannot express the requested statement.
    #[error("{dialect} dialect does not support {operation}")]
    UnsupportedOperation {
        /// Dialect name.
        dialect: &'static str,
        /// What was asked for.
        operation: &'static str,
    },

    /// The field schema is malformed (e.g. a decimal without scale).
    #[error("Invalid schema for field '{field}': {message}")]
    InvalidSchema {
        /// Field name.
        field: String,
        /// What is wrong.
        message: String,
    },

    /// A runtime value could not be converted for binding.
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// What is wrong.
        message: String,
    },

    /// A merge-style upsert was requested without key columns.
    #[error("Upsert into '{0}' requires at least one key column")]
    MissingKeyColumns(String),

    /// A connection URL could not be parsed. Carries the sanitized URL.
    #[error("Invalid connection URL '{0}'")]
    InvalidUrl(String),

    /// A qualified identifier could not be parsed.
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// No provider is registered under the requested name.
    #[error("No dialect named '{0}' is registered")]
    UnknownDialect(String),

    /// Configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// The driver rejected a bind or query.
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

impl DialectError {
    /// Returns true when retrying the same record cannot succeed.
    ///
    /// Driver errors are left to the caller.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        !matches!(self, Self::Driver(_))
    }
}

/// Result type for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_source_message() {
        let err = DialectError::UnsupportedSourceType(PrimitiveKind::Struct);
        assert_eq!(err.to_string(), "Unsupported source data type: STRUCT");
        assert!(err.is_permanent());
    }

    #[test]
    fn test_driver_error_is_not_permanent() {
        let err: DialectError = DriverError::new(942, "table or view does not exist")
            .with_sql_state("42000")
            .into();
        assert!(!err.is_permanent());
        assert_eq!(
            err.to_string(),
            "Driver error: table or view does not exist (vendor code 942, SQLSTATE 42000)"
        );
    }

    #[test]
    fn test_unsupported_type_message() {
        let err = DialectError::UnsupportedType {
            kind: PrimitiveKind::Map,
            logical: None,
        };
        assert_eq!(
            err.to_string(),
            "<none> (MAP) type doesn't have a mapping to the SQL database column type"
        );
    }
}
