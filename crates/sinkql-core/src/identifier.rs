//! Table and column identifiers, and the per-dialect policy that renders
//! and parses them.
//!
//! An [`IdentifierPolicy`] is fixed when the dialect is created: its quote
//! method and case-folding mode never change afterwards, so every name the
//! dialect renders or parses in one session is folded the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DialectError, Result};

/// A possibly qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId {
    /// Catalog, if qualified.
    pub catalog: Option<String>,
    /// Schema, if qualified.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
}

impl TableId {
    /// Creates a table identifier.
    #[must_use]
    pub fn new(catalog: Option<&str>, schema: Option<&str>, table: impl Into<String>) -> Self {
        Self {
            catalog: catalog.map(str::to_string),
            schema: schema.map(str::to_string),
            table: table.into(),
        }
    }

    /// Creates an unqualified table identifier.
    #[must_use]
    pub fn named(table: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            table: table.into(),
        }
    }

    /// Returns the present name parts, outermost first.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.catalog
            .as_deref()
            .into_iter()
            .chain(self.schema.as_deref())
            .chain(std::iter::once(self.table.as_str()))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts().collect::<Vec<_>>().join("."))
    }
}

/// A column name, optionally owned by a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnId {
    /// Owning table; rendered as a qualifier when present.
    pub table: Option<TableId>,
    /// Column name.
    pub name: String,
}

impl ColumnId {
    /// Creates a column owned by `table`.
    #[must_use]
    pub fn new(table: &TableId, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.clone()),
            name: name.into(),
        }
    }

    /// Creates an unqualified column.
    #[must_use]
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }
}

/// Whether identifiers are wrapped in quotes when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuoteMethod {
    /// Always quote.
    #[default]
    Always,
    /// Never quote; the database folds names to its canonical case.
    Never,
}

impl FromStr for QuoteMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown quote method '{other}'")),
        }
    }
}

impl TryFrom<String> for QuoteMethod {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuoteMethod> for String {
    fn from(value: QuoteMethod) -> Self {
        match value {
            QuoteMethod::Always => "always".to_string(),
            QuoteMethod::Never => "never".to_string(),
        }
    }
}

/// Case applied to unquoted table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFold {
    /// Fold to upper case.
    Upper,
    /// Fold to lower case.
    Lower,
    /// Keep the name verbatim.
    #[default]
    Preserve,
}

impl CaseFold {
    /// Applies the fold to `name`.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Upper => name.to_uppercase(),
            Self::Lower => name.to_lowercase(),
            Self::Preserve => name.to_string(),
        }
    }
}

/// Delimiter and quote strings of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierRules {
    /// Separator between qualified name parts.
    pub separator: &'static str,
    /// Opening quote.
    pub open_quote: &'static str,
    /// Closing quote.
    pub close_quote: &'static str,
}

impl IdentifierRules {
    /// ANSI rules: `.` separator, double quotes.
    pub const ANSI: Self = Self::new(".", "\"", "\"");

    /// Creates identifier rules.
    #[must_use]
    pub const fn new(
        separator: &'static str,
        open_quote: &'static str,
        close_quote: &'static str,
    ) -> Self {
        Self {
            separator,
            open_quote,
            close_quote,
        }
    }

    /// Splits a qualified identifier into its parts.
    ///
    /// A quoted part may contain the separator; its quotes are removed.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidIdentifier`] for an unterminated quote,
    /// text following a close quote without a separator, a trailing
    /// separator, or an empty input.
    pub fn parse_qualified(&self, fqn: &str) -> Result<Vec<String>> {
        let invalid = || DialectError::InvalidIdentifier(fqn.to_string());
        if fqn.is_empty() {
            return Err(invalid());
        }

        let mut parts = Vec::new();
        let mut rest = fqn;
        while !rest.is_empty() {
            if !self.open_quote.is_empty() && rest.starts_with(self.open_quote) {
                let (segment, after) = self
                    .split_quoted(&rest[self.open_quote.len()..])
                    .ok_or_else(invalid)?;
                parts.push(segment);
                rest = after;
                if rest.is_empty() {
                    break;
                }
                rest = rest.strip_prefix(self.separator).ok_or_else(invalid)?;
                if rest.is_empty() {
                    return Err(invalid());
                }
            } else if let Some(index) = rest.find(self.separator) {
                parts.push(rest[..index].to_string());
                rest = &rest[index + self.separator.len()..];
                if rest.is_empty() {
                    return Err(invalid());
                }
            } else {
                parts.push(rest.to_string());
                rest = "";
            }
        }
        Ok(parts)
    }

    /// Reads a quoted body up to its close quote, unescaping doubled close
    /// quotes. Returns the name and the text after the close quote.
    fn split_quoted<'a>(&self, body: &'a str) -> Option<(String, &'a str)> {
        let close = self.close_quote;
        let mut name = String::new();
        let mut rest = body;
        loop {
            let end = rest.find(close)?;
            name.push_str(&rest[..end]);
            rest = &rest[end + close.len()..];
            match rest.strip_prefix(close) {
                Some(after) => {
                    name.push_str(close);
                    rest = after;
                }
                None => return Some((name, rest)),
            }
        }
    }
}

/// Quoting and case-folding policy for one dialect instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierPolicy {
    rules: IdentifierRules,
    quote_method: QuoteMethod,
    fold: CaseFold,
}

impl IdentifierPolicy {
    /// Creates a policy.
    ///
    /// `canonical_fold` only takes effect when quoting is disabled; quoted
    /// names keep their case.
    #[must_use]
    pub fn new(
        rules: IdentifierRules,
        quote_method: QuoteMethod,
        canonical_fold: CaseFold,
    ) -> Self {
        let fold = match quote_method {
            QuoteMethod::Never => canonical_fold,
            QuoteMethod::Always => CaseFold::Preserve,
        };
        Self {
            rules,
            quote_method,
            fold,
        }
    }

    /// Returns the identifier rules.
    #[must_use]
    pub const fn rules(&self) -> &IdentifierRules {
        &self.rules
    }

    /// Returns the quote method.
    #[must_use]
    pub const fn quote_method(&self) -> QuoteMethod {
        self.quote_method
    }

    /// Returns the effective case fold.
    #[must_use]
    pub const fn fold(&self) -> CaseFold {
        self.fold
    }

    /// Quotes a single name part according to the quote method.
    #[must_use]
    pub fn quote(&self, name: &str) -> String {
        match self.quote_method {
            QuoteMethod::Always => {
                let close = self.rules.close_quote;
                let escaped = name.replace(close, &format!("{close}{close}"));
                format!("{}{escaped}{close}", self.rules.open_quote)
            }
            QuoteMethod::Never => name.to_string(),
        }
    }

    /// Renders a qualified table name.
    #[must_use]
    pub fn quote_table(&self, table: &TableId) -> String {
        table
            .parts()
            .map(|part| self.quote(part))
            .collect::<Vec<_>>()
            .join(self.rules.separator)
    }

    /// Renders a column, qualified by its table when it has one.
    #[must_use]
    pub fn quote_column(&self, column: &ColumnId) -> String {
        match &column.table {
            Some(table) => format!(
                "{}{}{}",
                self.quote_table(table),
                self.rules.separator,
                self.quote(&column.name)
            ),
            None => self.quote(&column.name),
        }
    }

    /// Folds the table name to the policy's case.
    #[must_use]
    pub fn normalize_case(&self, table: TableId) -> TableId {
        match self.fold {
            CaseFold::Preserve => table,
            fold => TableId {
                table: fold.apply(&table.table),
                ..table
            },
        }
    }

    /// Parses a (possibly quoted, possibly qualified) table name.
    ///
    /// One part is a table, two are `schema.table`, three are
    /// `catalog.schema.table`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidIdentifier`] for malformed input or
    /// more than three parts.
    pub fn parse_table_identifier(&self, fqn: &str) -> Result<TableId> {
        let mut parts = self.rules.parse_qualified(fqn)?;
        let table = match parts.len() {
            1 => TableId {
                catalog: None,
                schema: None,
                table: parts.remove(0),
            },
            2 => {
                let table = parts.remove(1);
                TableId {
                    catalog: None,
                    schema: Some(parts.remove(0)),
                    table,
                }
            }
            3 => {
                let table = parts.remove(2);
                let schema = parts.remove(1);
                TableId {
                    catalog: Some(parts.remove(0)),
                    schema: Some(schema),
                    table,
                }
            }
            _ => return Err(DialectError::InvalidIdentifier(fqn.to_string())),
        };
        Ok(self.normalize_case(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(method: QuoteMethod) -> IdentifierPolicy {
        IdentifierPolicy::new(IdentifierRules::ANSI, method, CaseFold::Upper)
    }

    #[test]
    fn test_quote() {
        assert_eq!(policy(QuoteMethod::Always).quote("Orders"), "\"Orders\"");
        assert_eq!(policy(QuoteMethod::Never).quote("Orders"), "Orders");
        assert_eq!(policy(QuoteMethod::Always).quote("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_parse_qualified_with_quoted_separator() {
        let parts = IdentifierRules::ANSI
            .parse_qualified("\"my.schema\".orders")
            .unwrap();
        assert_eq!(parts, vec!["my.schema", "orders"]);
    }

    #[test]
    fn test_parse_qualified_errors() {
        let rules = IdentifierRules::ANSI;
        assert!(rules.parse_qualified("").is_err());
        assert!(rules.parse_qualified("a.").is_err());
        assert!(rules.parse_qualified("\"a\".").is_err());
        assert!(rules.parse_qualified("\"unterminated").is_err());
        assert!(rules.parse_qualified("\"app\"orders").is_err());
        assert!(rules.parse_qualified("\"app\"\"orders").is_err());
    }

    #[test]
    fn test_parse_qualified_reads_back_quoted_names() {
        let p = policy(QuoteMethod::Always);
        for name in ["a\"b", "\"", "x.\"y\"", "plain"] {
            let rendered = p.quote(name);
            assert_eq!(
                IdentifierRules::ANSI.parse_qualified(&rendered).unwrap(),
                vec![name.to_string()]
            );
        }

        let table = TableId::new(None, Some("sch\"x"), "t.\"1\"");
        let parsed = p.parse_table_identifier(&p.quote_table(&table)).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_parse_table_identifier_parts() {
        let p = policy(QuoteMethod::Always);
        assert_eq!(
            p.parse_table_identifier("cat.sch.tbl").unwrap(),
            TableId::new(Some("cat"), Some("sch"), "tbl")
        );
        assert_eq!(
            p.parse_table_identifier("sch.tbl").unwrap(),
            TableId::new(None, Some("sch"), "tbl")
        );
        assert!(p.parse_table_identifier("a.b.c.d").is_err());
    }

    #[test]
    fn test_case_fold_only_when_unquoted() {
        let quoted = policy(QuoteMethod::Always);
        assert_eq!(quoted.parse_table_identifier("orders").unwrap().table, "orders");
        assert_eq!(quoted.fold(), CaseFold::Preserve);

        let unquoted = policy(QuoteMethod::Never);
        let id = unquoted.parse_table_identifier("app.orders").unwrap();
        assert_eq!(id.table, "ORDERS");
        assert_eq!(id.schema.as_deref(), Some("app"));
    }

    #[test]
    fn test_quote_column_with_table() {
        let p = policy(QuoteMethod::Always);
        let table = TableId::new(None, Some("app"), "orders");
        assert_eq!(
            p.quote_column(&ColumnId::new(&table, "id")),
            "\"app\".\"orders\".\"id\""
        );
        assert_eq!(p.quote_column(&ColumnId::unqualified("id")), "\"id\"");
    }

    #[test]
    fn test_quote_method_parse() {
        assert_eq!("ALWAYS".parse::<QuoteMethod>().unwrap(), QuoteMethod::Always);
        assert_eq!(" never ".parse::<QuoteMethod>().unwrap(), QuoteMethod::Never);
        assert!("sometimes".parse::<QuoteMethod>().is_err());
    }
}
