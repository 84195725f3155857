//! SQL dialect support.
//!
//! Databases differ in how they quote names, which column types they offer,
//! whether they can upsert natively, and which bind calls their drivers
//! accept. Instead of a subclass per database, a dialect here is:
//!
//! - a [`DialectProfile`]: plain data describing capabilities (quote
//!   characters, canonical case, upsert strategy, drop-if-exists support,
//!   LOB thresholds, health-check queries), and
//! - a [`DialectHooks`] implementation: a handful of functions that may
//!   claim a type mapping, a bind, a URL rewrite or a synonym lookup before
//!   the generic behaviour runs.
//!
//! [`DatabaseDialect`] composes the two with an [`IdentifierPolicy`] and the
//! instance configuration. It is immutable after construction and can be
//! shared across writer threads.

mod binder;
pub(crate) mod generic;
mod statements;

pub use binder::{BindContext, BindOutcome, BindRequest, StatementBinder};
pub use generic::GenericDialect;
pub use statements::DropOptions;

use std::fmt;

use tracing::debug;

use crate::config::{DialectConfig, SinkOptions};
use crate::error::Result;
use crate::identifier::{CaseFold, IdentifierPolicy, IdentifierRules, TableId};
use crate::schema::SinkRecordField;
use crate::statement::{CatalogConnection, PreparedStatement};

/// How a dialect expresses insert-or-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStrategy {
    /// The dialect cannot upsert in one statement.
    Unsupported,
    /// `MERGE` from a derived single-row source.
    Merge {
        /// Text closing the derived source select (e.g. ` FROM dual`).
        source_suffix: &'static str,
    },
}

/// How a dialect drops a table that may not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIfExists {
    /// `DROP TABLE IF EXISTS` is available.
    Native,
    /// The drop runs in a procedural block that swallows one error code.
    Guarded {
        /// `SQLCODE` raised when the table does not exist.
        missing_object_code: i32,
    },
}

/// How `ALTER TABLE` adds several columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterAddStyle {
    /// `ALTER TABLE t ADD c1 ..., ADD c2 ...`.
    AddPerColumn,
    /// `ALTER TABLE t ADD(c1 ..., c2 ...)`.
    Parenthesized,
}

/// Capability description of a database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectProfile {
    /// Dialect name.
    pub name: &'static str,
    /// Separator and quote strings.
    pub rules: IdentifierRules,
    /// Case the database folds unquoted names to.
    pub canonical_case: CaseFold,
    /// Upsert synthesis.
    pub upsert: UpsertStrategy,
    /// Drop-if-exists support.
    pub drop_if_exists: DropIfExists,
    /// Clause appended to `DROP TABLE` for cascading drops.
    pub cascade_clause: &'static str,
    /// Multi-column `ALTER TABLE ... ADD` form.
    pub alter_add: AlterAddStyle,
    /// In upsert mode, character LOB values at least this long are streamed
    /// without a length hint.
    pub upsert_lob_threshold: Option<usize>,
    /// Query used to validate a live connection.
    pub health_check_query: &'static str,
    /// Query returning the database clock.
    pub current_timestamp_query: &'static str,
}

/// Dialect-specific overrides consulted before the generic behaviour.
///
/// Every method defaults to "not applicable", so a dialect only implements
/// what differs from the generic one.
pub trait DialectHooks: Send + Sync + fmt::Debug {
    /// Maps a field to a column type, or returns `None` to use the generic
    /// mapping.
    ///
    /// # Errors
    ///
    /// Returns an error when the field claims a mapping but its schema is
    /// malformed.
    fn sql_type(
        &self,
        field: &SinkRecordField,
        sink: Option<&SinkOptions>,
    ) -> Result<Option<String>> {
        let _ = (field, sink);
        Ok(None)
    }

    /// Binds a non-null primitive value, or declines.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the bind call.
    fn bind_primitive(
        &self,
        statement: &mut dyn PreparedStatement,
        request: &BindRequest<'_>,
        context: &BindContext<'_>,
    ) -> Result<BindOutcome> {
        let _ = (statement, request, context);
        Ok(BindOutcome::NotApplicable)
    }

    /// Masks credentials the generic sanitizer does not recognize.
    ///
    /// Receives the output of the generic sanitizer.
    fn sanitize_url(&self, url: &str) -> String {
        url.to_string()
    }

    /// Resolves a synonym to the table it names.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the catalog query.
    fn resolve_synonym(
        &self,
        connection: &mut dyn CatalogConnection,
        policy: &IdentifierPolicy,
        synonym: &str,
    ) -> Result<Option<String>> {
        let _ = (connection, policy, synonym);
        Ok(None)
    }
}

/// A configured dialect: profile, hooks, identifier policy and options.
#[derive(Debug)]
pub struct DatabaseDialect {
    profile: DialectProfile,
    hooks: Box<dyn DialectHooks>,
    policy: IdentifierPolicy,
    config: DialectConfig,
}

impl DatabaseDialect {
    /// Creates a dialect instance.
    pub fn new(
        profile: DialectProfile,
        hooks: impl DialectHooks + 'static,
        config: DialectConfig,
    ) -> Self {
        let policy = IdentifierPolicy::new(
            profile.rules,
            config.quote_identifiers,
            profile.canonical_case,
        );
        Self {
            profile,
            hooks: Box::new(hooks),
            policy,
            config,
        }
    }

    /// Returns the dialect name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.profile.name
    }

    /// Returns the capability profile.
    #[must_use]
    pub const fn profile(&self) -> &DialectProfile {
        &self.profile
    }

    /// Returns the identifier policy.
    #[must_use]
    pub const fn policy(&self) -> &IdentifierPolicy {
        &self.policy
    }

    /// Returns the instance configuration.
    #[must_use]
    pub const fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// Returns the sink options, when running inside a sink.
    #[must_use]
    pub fn sink_options(&self) -> Option<&SinkOptions> {
        self.config.sink.as_ref()
    }

    /// Maps a field to the dialect's column type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DialectError::UnsupportedType`] when neither the
    /// dialect nor the generic mapping knows the type.
    pub fn sql_type(&self, field: &SinkRecordField) -> Result<String> {
        match self.hooks.sql_type(field, self.sink_options())? {
            Some(sql_type) => Ok(sql_type),
            None => generic::sql_type(field),
        }
    }

    /// Quotes a name part according to the identifier policy.
    #[must_use]
    pub fn quote(&self, name: &str) -> String {
        self.policy.quote(name)
    }

    /// Parses a qualified table name, applying the dialect's case folding.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DialectError::InvalidIdentifier`] for malformed names.
    pub fn parse_table_identifier(&self, fqn: &str) -> Result<TableId> {
        self.policy.parse_table_identifier(fqn)
    }

    /// Folds a table identifier to the dialect's case.
    #[must_use]
    pub fn normalize_case(&self, table: TableId) -> TableId {
        self.policy.normalize_case(table)
    }

    /// Resolves a synonym to the canonical table name it points at.
    ///
    /// Returns `None` when no synonym exists. Nothing is cached; callers
    /// should keep the answer for the lifetime of their table descriptor.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the catalog lookup.
    pub fn resolve_synonym(
        &self,
        connection: &mut dyn CatalogConnection,
        synonym: &str,
    ) -> Result<Option<String>> {
        let resolved = self.hooks.resolve_synonym(connection, &self.policy, synonym)?;
        debug!(dialect = self.name(), synonym, resolved = ?resolved, "Resolved synonym");
        Ok(resolved)
    }

    /// Returns the query used to validate a live connection.
    #[must_use]
    pub const fn health_check_query(&self) -> &'static str {
        self.profile.health_check_query
    }

    /// Returns the query reading the database clock.
    #[must_use]
    pub const fn current_timestamp_query(&self) -> &'static str {
        self.profile.current_timestamp_query
    }

    /// Runs the health-check query on `connection`.
    ///
    /// # Errors
    ///
    /// Propagates the driver error of a failing query.
    pub fn is_connection_valid(&self, connection: &mut dyn CatalogConnection) -> Result<bool> {
        let rows = connection.query(self.health_check_query(), &[])?;
        Ok(!rows.is_empty())
    }

    /// Masks credentials embedded in a connection URL.
    ///
    /// Idempotent: sanitizing a sanitized URL returns it unchanged.
    #[must_use]
    pub fn sanitize_url(&self, url: &str) -> String {
        self.hooks.sanitize_url(&generic::sanitize_url(url))
    }
}
