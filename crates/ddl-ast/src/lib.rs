//! Schema AST node types for `CREATE TABLE` extraction.
//!
//! The parser in `ddl-parser` turns one `CREATE TABLE` statement into a
//! [`CreateTable`]: the table name and comment plus ordered lists of columns,
//! indexes and foreign keys. These are plain records; the only sum type is
//! [`Statement`], whose serialized `type` tag (`"create.table"`) is what
//! downstream renderers switch on.
//!
//! Serialized field names are part of the output contract (`dataType`,
//! `primaryKey`, `foreignKeys`, ...), so every record uses camelCase.

mod display;

pub use display::quote_string;

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Span: source location tracking
// ---------------------------------------------------------------------------

/// A byte-offset range into the SQL source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character (inclusive).
    pub start: u32,
    /// Byte offset one past the last character (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span from start (inclusive) to end (exclusive) byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Top-level statement
// ---------------------------------------------------------------------------

/// A single extracted DDL statement.
///
/// Only `CREATE TABLE` produces a statement; everything else in a script is
/// skipped by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    #[serde(rename = "create.table")]
    CreateTable(CreateTable),
}

impl Statement {
    /// The serialized discriminant tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "create.table",
        }
    }

    /// The table definition, if this is a `CREATE TABLE`.
    #[must_use]
    pub const fn as_create_table(&self) -> Option<&CreateTable> {
        match self {
            Self::CreateTable(t) => Some(t),
        }
    }
}

impl From<CreateTable> for Statement {
    fn from(table: CreateTable) -> Self {
        Self::CreateTable(table)
    }
}

// ---------------------------------------------------------------------------
// DDL: CREATE TABLE
// ---------------------------------------------------------------------------

/// The schema description of one `CREATE TABLE` statement.
///
/// The schema qualifier of `schema.table` is never retained; `name` is the
/// final segment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTable {
    /// Table name.
    pub name: String,
    /// Table comment (`COMMENT 'x'` or `COMMENT = 'x'`).
    pub comment: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// `INDEX` / `KEY` clauses in declaration order.
    pub indexes: Vec<Index>,
    /// Well-formed `FOREIGN KEY` constraints in declaration order.
    pub foreign_keys: Vec<ForeignKey>,
}

impl CreateTable {
    /// Create an empty table description with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// First column whose name matches case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Names of the columns flagged as part of the primary key, in column order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Canonical upper-case type name, with any parenthesized arguments kept
    /// as written: `VARCHAR(100)`, `DECIMAL(10,2)`, `ENUM('a','b')`.
    pub data_type: String,
    /// Default value in storage form. Quoted strings are single-quoted
    /// (`'abc'`); numbers, identifiers and keywords are bare.
    pub default: String,
    /// Column comment.
    pub comment: String,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
    /// False only when `NOT NULL` was declared.
    pub nullable: bool,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: String::new(),
            default: String::new(),
            comment: String::new(),
            primary_key: false,
            auto_increment: false,
            unique: false,
            nullable: true,
        }
    }
}

impl Column {
    /// Create a nullable column with a name and data type.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    /// Whether the column carries a name or a data type.
    ///
    /// Body items without either (stray commas, bare constraints) never
    /// become columns.
    #[must_use]
    pub fn is_declared(&self) -> bool {
        !self.name.is_empty() || !self.data_type.is_empty()
    }
}

/// Sort order of an index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    /// The SQL keyword for this order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One column of an [`Index`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexColumn {
    pub name: String,
    pub sort: SortOrder,
}

impl IndexColumn {
    #[must_use]
    pub fn new(name: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            name: name.into(),
            sort,
        }
    }
}

/// A table-level `INDEX name (...)` / `KEY name (...)` clause.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Always false for parsed `INDEX`/`KEY` clauses. Uniqueness is recorded
    /// on the columns instead (see [`Column::unique`]).
    pub unique: bool,
    /// Indexed columns, in order.
    pub columns: Vec<IndexColumn>,
}

/// A `FOREIGN KEY (...) REFERENCES table (...)` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForeignKey {
    /// Local (referencing) columns.
    pub column_names: Vec<String>,
    /// Referenced table, without schema qualifier.
    pub ref_table_name: String,
    /// Referenced columns, paired positionally with `column_names`.
    pub ref_column_names: Vec<String>,
}

impl ForeignKey {
    /// Whether both column lists are non-empty and of equal length.
    #[must_use]
    pub fn has_matching_arity(&self) -> bool {
        !self.column_names.is_empty() && self.column_names.len() == self.ref_column_names.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
