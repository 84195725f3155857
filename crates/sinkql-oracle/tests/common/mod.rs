#![allow(dead_code)]

use std::collections::BTreeMap;

use sinkql_core::statement::{CatalogConnection, DriverResult, Row};
use sinkql_core::{
    ColumnId, DatabaseDialect, DialectConfig, DriverError, InsertMode, QuoteMethod, SinkOptions,
    TableId,
};
use sinkql_oracle::OracleDialect;

/// In-memory catalog answering the health check and `ALL_SYNONYMS` lookups.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    pub user: String,
    /// (owner, synonym) -> target table.
    pub synonyms: BTreeMap<(String, String), String>,
    pub queries: Vec<(String, Vec<String>)>,
    pub fail_with: Option<DriverError>,
}

impl FakeCatalog {
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            ..Self::default()
        }
    }

    pub fn with_synonym(mut self, owner: &str, synonym: &str, table: &str) -> Self {
        self.synonyms
            .insert((owner.to_string(), synonym.to_string()), table.to_string());
        self
    }

    pub fn failing(mut self, error: DriverError) -> Self {
        self.fail_with = Some(error);
        self
    }
}

impl CatalogConnection for FakeCatalog {
    fn session_user(&mut self) -> DriverResult<String> {
        Ok(self.user.clone())
    }

    fn query(&mut self, sql: &str, params: &[&str]) -> DriverResult<Vec<Row>> {
        self.queries.push((
            sql.to_string(),
            params.iter().map(|p| (*p).to_string()).collect(),
        ));
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        if sql == "SELECT 1 FROM DUAL" {
            return Ok(vec![Row::from([("1".to_string(), Some("1".to_string()))])]);
        }
        if sql.contains("ALL_SYNONYMS") {
            let key = (params[0].to_string(), params[1].to_string());
            return Ok(self
                .synonyms
                .get(&key)
                .map(|table| {
                    vec![Row::from([
                        ("TABLE_OWNER".to_string(), Some(key.0.clone())),
                        ("TABLE_NAME".to_string(), Some(table.clone())),
                    ])]
                })
                .unwrap_or_default());
        }
        Ok(Vec::new())
    }
}

pub fn oracle() -> DatabaseDialect {
    OracleDialect::create(DialectConfig::default())
}

pub fn oracle_unquoted() -> DatabaseDialect {
    OracleDialect::create(DialectConfig {
        quote_identifiers: QuoteMethod::Never,
        sink: None,
    })
}

pub fn oracle_sink(sink: SinkOptions) -> DatabaseDialect {
    OracleDialect::create(DialectConfig::sink(QuoteMethod::Always, sink))
}

pub fn oracle_mode(mode: InsertMode) -> DatabaseDialect {
    oracle_sink(SinkOptions::new(mode))
}

pub fn columns(table: &TableId, names: &[&str]) -> Vec<ColumnId> {
    names.iter().map(|name| ColumnId::new(table, *name)).collect()
}
