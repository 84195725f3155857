//! DDL and DML text generation.

use tracing::debug;

use super::{AlterAddStyle, DatabaseDialect, DropIfExists, UpsertStrategy};
use crate::error::{DialectError, Result};
use crate::expression::ExpressionBuilder;
use crate::identifier::{ColumnId, TableId};
use crate::schema::SinkRecordField;

/// Options for `DROP TABLE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropOptions {
    /// Also drop dependent constraints.
    pub cascade: bool,
    /// Do not fail when the table is missing.
    pub if_exists: bool,
}

impl DropOptions {
    /// Creates options with both flags off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cascade: false,
            if_exists: false,
        }
    }

    /// Sets the cascade flag.
    #[must_use]
    pub const fn cascade(mut self, cascade: bool) -> Self {
        self.cascade = cascade;
        self
    }

    /// Sets the if-exists flag.
    #[must_use]
    pub const fn if_exists(mut self, if_exists: bool) -> Self {
        self.if_exists = if_exists;
        self
    }
}

impl DatabaseDialect {
    /// Returns an empty expression builder bound to this dialect's policy.
    #[must_use]
    pub const fn expression_builder(&self) -> ExpressionBuilder<'_> {
        ExpressionBuilder::new(&self.policy)
    }

    /// Renders one column definition: name, type and nullability or default.
    ///
    /// # Errors
    ///
    /// Returns the type mapping error for unmappable fields.
    pub fn column_spec(&self, field: &SinkRecordField) -> Result<String> {
        let mut builder = self.expression_builder();
        builder
            .append_column_name(&field.name)
            .append(" ")
            .append(&self.sql_type(field)?);
        if let Some(default) = &field.schema.default {
            builder.append(" DEFAULT ").append(&default.to_sql_literal());
        } else if field.is_optional() {
            builder.append(" NULL");
        } else {
            builder.append(" NOT NULL");
        }
        Ok(builder.build())
    }

    fn column_specs(&self, fields: &[SinkRecordField]) -> Result<Vec<String>> {
        fields.iter().map(|field| self.column_spec(field)).collect()
    }

    /// Builds `CREATE TABLE` with a primary key clause for key fields.
    ///
    /// # Errors
    ///
    /// Returns the type mapping error of the first unmappable field.
    pub fn build_create_table(
        &self,
        table: &TableId,
        fields: &[SinkRecordField],
    ) -> Result<String> {
        let specs = self.column_specs(fields)?;
        let keys: Vec<&str> = fields
            .iter()
            .filter(|f| f.is_primary_key)
            .map(|f| f.name.as_str())
            .collect();

        let mut builder = self.expression_builder();
        builder.append("CREATE TABLE ").append_table(table).append(" (");
        builder.append_list(",", &specs, |b, spec| {
            b.append("\n").append(spec);
        });
        if !keys.is_empty() {
            builder.append(",\nPRIMARY KEY(");
            builder.append_list(",", &keys, |b, key| {
                b.append_column_name(key);
            });
            builder.append(")");
        }
        builder.append(")");

        let sql = builder.build();
        debug!(dialect = self.name(), sql = %sql, "Built create table statement");
        Ok(sql)
    }

    /// Builds the statements adding `fields` to an existing table.
    ///
    /// Both supported styles produce a single statement.
    ///
    /// # Errors
    ///
    /// Returns the type mapping error of the first unmappable field.
    pub fn build_alter_table(
        &self,
        table: &TableId,
        fields: &[SinkRecordField],
    ) -> Result<Vec<String>> {
        let specs = self.column_specs(fields)?;

        let mut builder = self.expression_builder();
        builder.append("ALTER TABLE ").append_table(table);
        match self.profile.alter_add {
            AlterAddStyle::Parenthesized => {
                builder.append(" ADD(");
                builder.append_list(",", &specs, |b, spec| {
                    b.append("\n").append(spec);
                });
                builder.append(")");
            }
            AlterAddStyle::AddPerColumn => {
                builder.append(" ");
                builder.append_list(",", &specs, |b, spec| {
                    b.append("\nADD ").append(spec);
                });
            }
        }

        let sql = builder.build();
        debug!(dialect = self.name(), sql = %sql, "Built alter table statement");
        Ok(vec![sql])
    }

    /// Builds `DROP TABLE`.
    ///
    /// With `if_exists` on a dialect lacking the native clause, the drop is
    /// wrapped in a block that swallows only the missing-table error code.
    #[must_use]
    pub fn build_drop_table(&self, table: &TableId, options: DropOptions) -> String {
        let native_if_exists =
            options.if_exists && self.profile.drop_if_exists == DropIfExists::Native;

        let mut builder = self.expression_builder();
        builder.append("DROP TABLE ");
        if native_if_exists {
            builder.append("IF EXISTS ");
        }
        builder.append_table(table);
        if options.cascade {
            builder.append(self.profile.cascade_clause);
        }
        let drop = builder.build();

        let sql = match self.profile.drop_if_exists {
            DropIfExists::Guarded { missing_object_code } if options.if_exists => format!(
                "BEGIN EXECUTE IMMEDIATE '{}' EXCEPTION WHEN OTHERS THEN IF SQLCODE != {missing_object_code} THEN     RAISE;END IF;END;",
                drop.replace('\'', "''")
            ),
            _ => drop,
        };
        debug!(dialect = self.name(), sql = %sql, "Built drop table statement");
        sql
    }

    /// Builds a parameterized `INSERT`, key columns first.
    #[must_use]
    pub fn build_insert(
        &self,
        table: &TableId,
        key_columns: &[ColumnId],
        non_key_columns: &[ColumnId],
    ) -> String {
        let count = key_columns.len() + non_key_columns.len();

        let mut builder = self.expression_builder();
        builder.append("INSERT INTO ").append_table(table).append("(");
        builder.append_list(",", key_columns.iter().chain(non_key_columns), |b, col| {
            b.append_column_name(&col.name);
        });
        builder.append(") VALUES(");
        builder.append(&vec!["?"; count].join(","));
        builder.append(")");

        let sql = builder.build();
        debug!(dialect = self.name(), sql = %sql, "Built insert statement");
        sql
    }

    /// Builds a parameterized `UPDATE`; SET parameters precede WHERE ones.
    #[must_use]
    pub fn build_update(
        &self,
        table: &TableId,
        key_columns: &[ColumnId],
        non_key_columns: &[ColumnId],
    ) -> String {
        let mut builder = self.expression_builder();
        builder.append("UPDATE ").append_table(table).append(" SET ");
        builder.append_list(", ", non_key_columns, |b, col| {
            b.append_column_name(&col.name).append(" = ?");
        });
        if !key_columns.is_empty() {
            builder.append(" WHERE ");
            builder.append_list(" AND ", key_columns, |b, col| {
                b.append_column_name(&col.name).append(" = ?");
            });
        }

        let sql = builder.build();
        debug!(dialect = self.name(), sql = %sql, "Built update statement");
        sql
    }

    /// Builds an insert-or-update statement.
    ///
    /// Parameters are bound key columns first, then non-key columns, matching
    /// the derived source select list. With no non-key columns the statement
    /// has no update clause.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnsupportedOperation`] when the dialect has no
    /// upsert strategy and [`DialectError::MissingKeyColumns`] when
    /// `key_columns` is empty.
    pub fn build_upsert(
        &self,
        table: &TableId,
        key_columns: &[ColumnId],
        non_key_columns: &[ColumnId],
    ) -> Result<String> {
        let UpsertStrategy::Merge { source_suffix } = self.profile.upsert else {
            return Err(DialectError::UnsupportedOperation {
                dialect: self.name(),
                operation: "upsert",
            });
        };
        if key_columns.is_empty() {
            return Err(DialectError::MissingKeyColumns(table.to_string()));
        }

        let mut builder = self.expression_builder();
        builder.append("merge into ").append_table(table).append(" using (select ");
        builder.append_column_names_with_prefix(
            ", ",
            "? ",
            key_columns.iter().chain(non_key_columns),
        );
        builder.append(source_suffix).append(") incoming on(");
        builder.append_list(" and ", key_columns, |b, col| {
            b.append_table(table)
                .append_separator()
                .append_column_name(&col.name)
                .append("=incoming.")
                .append_column_name(&col.name);
        });
        builder.append(")");
        if !non_key_columns.is_empty() {
            builder.append(" when matched then update set ");
            builder.append_list(",", non_key_columns, |b, col| {
                b.append_table(table)
                    .append_separator()
                    .append_column_name(&col.name)
                    .append("=incoming.")
                    .append_column_name(&col.name);
            });
        }
        builder.append(" when not matched then insert(");
        builder.append_list(",", non_key_columns.iter().chain(key_columns), |b, col| {
            b.append_column(col);
        });
        builder.append(") values(");
        builder.append_column_names_with_prefix(
            ",",
            "incoming.",
            non_key_columns.iter().chain(key_columns),
        );
        builder.append(")");

        let sql = builder.build();
        debug!(dialect = self.name(), sql = %sql, "Built upsert statement");
        Ok(sql)
    }
}
