//! Registry provider for the Oracle dialect.

use sinkql_core::config::DialectConfig;
use sinkql_core::dialect::DatabaseDialect;
use sinkql_core::registry::{DialectProvider, DialectRegistry};

use crate::OracleDialect;

/// Serves `jdbc:oracle:*` connections.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleProvider;

impl DialectProvider for OracleProvider {
    fn name(&self) -> &'static str {
        OracleDialect::PROFILE.name
    }

    fn subprotocols(&self) -> &'static [&'static str] {
        &["oracle"]
    }

    fn create(&self, config: DialectConfig) -> DatabaseDialect {
        OracleDialect::create(config)
    }
}

/// Returns a registry with the generic and Oracle providers.
#[must_use]
pub fn registry() -> DialectRegistry {
    let mut registry = DialectRegistry::new();
    registry.register(OracleProvider);
    registry
}
