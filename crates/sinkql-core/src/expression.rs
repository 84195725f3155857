//! Incremental builder for statement text.
//!
//! The builder renders identifiers through an [`IdentifierPolicy`] and
//! offers list helpers with a delimiter and a per-item transform, which is
//! all the statement builders need.

use std::fmt;

use crate::identifier::{ColumnId, IdentifierPolicy, TableId};

/// Builds SQL text with policy-aware identifier rendering.
#[derive(Debug, Clone)]
pub struct ExpressionBuilder<'a> {
    policy: &'a IdentifierPolicy,
    sql: String,
}

impl<'a> ExpressionBuilder<'a> {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new(policy: &'a IdentifierPolicy) -> Self {
        Self {
            policy,
            sql: String::new(),
        }
    }

    /// Returns the identifier policy.
    #[must_use]
    pub const fn policy(&self) -> &'a IdentifierPolicy {
        self.policy
    }

    /// Appends raw text.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    /// Appends a qualified, quoted table name.
    pub fn append_table(&mut self, table: &TableId) -> &mut Self {
        let rendered = self.policy.quote_table(table);
        self.sql.push_str(&rendered);
        self
    }

    /// Appends a quoted column name without any table qualifier.
    pub fn append_column_name(&mut self, name: &str) -> &mut Self {
        let rendered = self.policy.quote(name);
        self.sql.push_str(&rendered);
        self
    }

    /// Appends a column, qualified by its table when it has one.
    pub fn append_column(&mut self, column: &ColumnId) -> &mut Self {
        let rendered = self.policy.quote_column(column);
        self.sql.push_str(&rendered);
        self
    }

    /// Appends the identifier separator (`.` for most dialects).
    pub fn append_separator(&mut self) -> &mut Self {
        self.sql.push_str(self.policy.rules().separator);
        self
    }

    /// Appends `items`, separated by `delimiter`, each rendered by `transform`.
    pub fn append_list<'i, T: 'i, I, F>(
        &mut self,
        delimiter: &str,
        items: I,
        mut transform: F,
    ) -> &mut Self
    where
        I: IntoIterator<Item = &'i T>,
        F: FnMut(&mut Self, &T),
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(delimiter);
            }
            transform(self, item);
        }
        self
    }

    /// Appends column names (unqualified), each preceded by `prefix`.
    pub fn append_column_names_with_prefix<'i, I>(
        &mut self,
        delimiter: &str,
        prefix: &str,
        columns: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = &'i ColumnId>,
    {
        self.append_list(delimiter, columns, |b, col| {
            b.append(prefix).append_column_name(&col.name);
        })
    }

    /// Returns the built text.
    #[must_use]
    pub fn build(self) -> String {
        self.sql
    }
}

impl fmt::Display for ExpressionBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
