//! DDL re-serialization via `fmt::Display` for AST nodes.
//!
//! The output is canonical DDL that `ddl-parser` reads back to the same AST
//! for every retained field. Dialect-only details the parser drops
//! (character sets, collations, schema prefixes, storage options) cannot be
//! reproduced.

#[allow(clippy::wildcard_imports)]
use crate::*;
use std::fmt;

// ---------------------------------------------------------------------------
// Helper: write a comma-separated list
// ---------------------------------------------------------------------------

fn comma_list_fn<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    fmt_item: impl Fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_item(item, f)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helper: quoting
// ---------------------------------------------------------------------------

/// Identifiers are always backtick-quoted so that names spelled like
/// keywords (`date`, `key`, `comment`) read back as identifiers.
fn write_ident(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    write!(f, "`{}`", name.replace('`', "``"))
}

/// Single-quote `value` as a SQL string literal. Both `'` and `\` are
/// escaped, since the lexer reads backslash escapes inside strings.
#[must_use]
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str(&quote_string(value))
}

fn write_ident_list(f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
    f.write_str("(")?;
    comma_list_fn(f, names, |n, f| write_ident(f, n))?;
    f.write_str(")")
}

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable(t) => write!(f, "{t}"),
        }
    }
}

// ---------------------------------------------------------------------------
// CreateTable
// ---------------------------------------------------------------------------

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE TABLE ")?;
        write_ident(f, &self.name)?;
        f.write_str(" (")?;

        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_str(", ")
            }
        };

        for col in &self.columns {
            sep(f)?;
            write!(f, "{col}")?;
        }

        // Primary keys are emitted table-level so that composite keys and
        // single-column keys read back identically.
        let pk: Vec<String> = self
            .primary_key_columns()
            .map(str::to_owned)
            .collect();
        if !pk.is_empty() {
            sep(f)?;
            f.write_str("PRIMARY KEY ")?;
            write_ident_list(f, &pk)?;
        }

        for index in &self.indexes {
            sep(f)?;
            write!(f, "{index}")?;
        }
        for fk in &self.foreign_keys {
            sep(f)?;
            write!(f, "{fk}")?;
        }
        f.write_str(")")?;

        if !self.comment.is_empty() {
            f.write_str(" COMMENT=")?;
            write_string(f, &self.comment)?;
        }
        Ok(())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.name)?;
        if !self.data_type.is_empty() {
            write!(f, " {}", self.data_type)?;
        }
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        if !self.default.is_empty() {
            write!(f, " DEFAULT {}", self.default)?;
        }
        if self.auto_increment {
            f.write_str(" AUTO_INCREMENT")?;
        }
        if self.unique {
            f.write_str(" UNIQUE")?;
        }
        if !self.comment.is_empty() {
            f.write_str(" COMMENT ")?;
            write_string(f, &self.comment)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IndexColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.name)?;
        if self.sort == SortOrder::Desc {
            f.write_str(" DESC")?;
        }
        Ok(())
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unique {
            f.write_str("UNIQUE ")?;
        }
        f.write_str("INDEX ")?;
        write_ident(f, &self.name)?;
        f.write_str(" (")?;
        comma_list_fn(f, &self.columns, |c, f| write!(f, "{c}"))?;
        f.write_str(")")
    }
}

// ---------------------------------------------------------------------------
// ForeignKey
// ---------------------------------------------------------------------------

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FOREIGN KEY ")?;
        write_ident_list(f, &self.column_names)?;
        f.write_str(" REFERENCES ")?;
        write_ident(f, &self.ref_table_name)?;
        f.write_str(" ")?;
        write_ident_list(f, &self.ref_column_names)
    }
}
