// SQL token types and classifier predicates.
//
// Every token carries a discriminant and a byte-offset Span. Keywords the
// parser dispatches on are their own variants; data-type names share one
// variant because the parser only ever asks "is this a type?".

use std::fmt;

use ddl_ast::{quote_string, Span};

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token discriminant.
    pub kind: TokenKind,
    /// Byte-offset span into the source text.
    pub span: Span,
    /// Line number (1-based) at the start of the token.
    pub line: u32,
    /// Column number (1-based) at the start of the token.
    pub col: u32,
}

/// Token discriminant.
///
/// Organized by category: literals, identifiers, keywords, operators,
/// punctuation, and special tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // === Literals ===
    /// Numeric literal, kept as written: `42`, `3.50`, `1e10`, `0xFF`.
    Number(String),
    /// String literal (single-quoted), unescaped: `'it''s'` -> `it's`.
    String(String),

    // === Identifiers ===
    /// Unquoted identifier.
    Id(String),
    /// Quoted identifier (`"name"`, `[name]`, `` `name` ``).
    /// The bool is true if double-quoted; such tokens also serve as string
    /// values in `COMMENT` and `DEFAULT` positions.
    QuotedId(String, bool),
    /// Data-type name (`INT`, `varchar`, `ENUM`, ...), spelled as written.
    TypeName(String),

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Tilde,
    ShiftLeft,
    ShiftRight,
    Eq,   // `=`
    EqEq, // `==`
    Ne,   // `!=`
    LtGt, // `<>`
    Lt,
    Le,
    Gt,
    Ge,
    Concat, // `||`

    // === Punctuation ===
    Dot,
    Comma,
    Colon,
    Semicolon,
    LeftParen,
    RightParen,

    // === Keywords ===
    KwAction,
    KwAs,
    KwAsc,
    /// `AUTO_INCREMENT` or `AUTOINCREMENT`.
    KwAutoIncrement,
    KwCascade,
    KwCharacter,
    KwCheck,
    KwCollate,
    KwComment,
    KwConstraint,
    KwCreate,
    KwDefault,
    KwDeferrable,
    KwDelete,
    KwDesc,
    KwExists,
    KwForeign,
    KwFulltext,
    KwIf,
    KwIndex,
    KwInitially,
    KwKey,
    KwMatch,
    KwNo,
    KwNot,
    KwNull,
    KwOn,
    KwPartition,
    KwPrimary,
    KwReferences,
    KwRestrict,
    /// `SET`: both the `CHARACTER SET` keyword and the MySQL `SET(...)` type.
    KwSet,
    KwSpatial,
    KwTable,
    KwTemp,
    KwTemporary,
    KwUnique,
    KwUpdate,
    KwUsing,
    KwView,

    // === Special ===
    /// End of input.
    Eof,
    /// Lexer error (invalid input).
    Error(String),
}

impl TokenKind {
    /// Look up an identifier string to see if it's a keyword.
    /// Returns the keyword variant if so, else `None`.
    #[must_use]
    pub fn lookup_keyword(s: &str) -> Option<Self> {
        // Case-insensitive keyword matching.
        match s.to_ascii_uppercase().as_str() {
            "ACTION" => Some(Self::KwAction),
            "AS" => Some(Self::KwAs),
            "ASC" => Some(Self::KwAsc),
            "AUTO_INCREMENT" | "AUTOINCREMENT" => Some(Self::KwAutoIncrement),
            "CASCADE" => Some(Self::KwCascade),
            "CHARACTER" => Some(Self::KwCharacter),
            "CHECK" => Some(Self::KwCheck),
            "COLLATE" => Some(Self::KwCollate),
            "COMMENT" => Some(Self::KwComment),
            "CONSTRAINT" => Some(Self::KwConstraint),
            "CREATE" => Some(Self::KwCreate),
            "DEFAULT" => Some(Self::KwDefault),
            "DEFERRABLE" => Some(Self::KwDeferrable),
            "DELETE" => Some(Self::KwDelete),
            "DESC" => Some(Self::KwDesc),
            "EXISTS" => Some(Self::KwExists),
            "FOREIGN" => Some(Self::KwForeign),
            "FULLTEXT" => Some(Self::KwFulltext),
            "IF" => Some(Self::KwIf),
            "INDEX" => Some(Self::KwIndex),
            "INITIALLY" => Some(Self::KwInitially),
            "KEY" => Some(Self::KwKey),
            "MATCH" => Some(Self::KwMatch),
            "NO" => Some(Self::KwNo),
            "NOT" => Some(Self::KwNot),
            "NULL" => Some(Self::KwNull),
            "ON" => Some(Self::KwOn),
            "PARTITION" => Some(Self::KwPartition),
            "PRIMARY" => Some(Self::KwPrimary),
            "REFERENCES" => Some(Self::KwReferences),
            "RESTRICT" => Some(Self::KwRestrict),
            "SET" => Some(Self::KwSet),
            "SPATIAL" => Some(Self::KwSpatial),
            "TABLE" => Some(Self::KwTable),
            "TEMP" => Some(Self::KwTemp),
            "TEMPORARY" => Some(Self::KwTemporary),
            "UNIQUE" => Some(Self::KwUnique),
            "UPDATE" => Some(Self::KwUpdate),
            "USING" => Some(Self::KwUsing),
            "VIEW" => Some(Self::KwView),
            _ => None,
        }
    }

    /// Whether `s` names a column data type (case-insensitive).
    #[must_use]
    pub fn is_type_name(s: &str) -> bool {
        matches!(
            s.to_ascii_uppercase().as_str(),
            "BIGINT"
                | "BIGSERIAL"
                | "BINARY"
                | "BIT"
                | "BLOB"
                | "BOOL"
                | "BOOLEAN"
                | "BYTEA"
                | "CHAR"
                | "CLOB"
                | "DATE"
                | "DATETIME"
                | "DEC"
                | "DECIMAL"
                | "DOUBLE"
                | "ENUM"
                | "FLOAT"
                | "GEOMETRY"
                | "GEOMETRYCOLLECTION"
                | "INT"
                | "INTEGER"
                | "INTERVAL"
                | "JSON"
                | "JSONB"
                | "LINESTRING"
                | "LONGBLOB"
                | "LONGTEXT"
                | "MEDIUMBLOB"
                | "MEDIUMINT"
                | "MEDIUMTEXT"
                | "MONEY"
                | "MULTILINESTRING"
                | "MULTIPOINT"
                | "MULTIPOLYGON"
                | "NCHAR"
                | "NUMERIC"
                | "NVARCHAR"
                | "POINT"
                | "POLYGON"
                | "REAL"
                | "SERIAL"
                | "SMALLINT"
                | "SMALLSERIAL"
                | "TEXT"
                | "TIME"
                | "TIMESTAMP"
                | "TIMESTAMPTZ"
                | "TINYBLOB"
                | "TINYINT"
                | "TINYTEXT"
                | "UUID"
                | "VARBINARY"
                | "VARCHAR"
                | "YEAR"
        )
    }

    // -----------------------------------------------------------------------
    // Classifier predicates
    // -----------------------------------------------------------------------

    /// Plain or quoted identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Id(_) | Self::QuotedId(_, _))
    }

    /// Anything usable as an object name: identifiers plus data-type names,
    /// which are never reserved.
    #[must_use]
    pub const fn is_name(&self) -> bool {
        self.is_identifier() || self.is_type_keyword()
    }

    /// Data-type name token (`INT`, `TEXT`, ...).
    #[must_use]
    pub const fn is_type_keyword(&self) -> bool {
        matches!(self, Self::TypeName(_))
    }

    /// Anything that can start a column data type, including `SET(...)`.
    #[must_use]
    pub const fn is_data_type(&self) -> bool {
        matches!(self, Self::TypeName(_) | Self::KwSet)
    }

    /// A quoted value usable as a string: `'x'` or `"x"`.
    #[must_use]
    pub const fn is_quoted_value(&self) -> bool {
        matches!(self, Self::String(_) | Self::QuotedId(_, true))
    }

    /// Any keyword, data-type names included.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        match self {
            Self::TypeName(_) => true,
            Self::Number(_)
            | Self::String(_)
            | Self::Id(_)
            | Self::QuotedId(_, _)
            | Self::Plus
            | Self::Minus
            | Self::Star
            | Self::Slash
            | Self::Percent
            | Self::Ampersand
            | Self::Pipe
            | Self::Tilde
            | Self::ShiftLeft
            | Self::ShiftRight
            | Self::Eq
            | Self::EqEq
            | Self::Ne
            | Self::LtGt
            | Self::Lt
            | Self::Le
            | Self::Gt
            | Self::Ge
            | Self::Concat
            | Self::Dot
            | Self::Comma
            | Self::Colon
            | Self::Semicolon
            | Self::LeftParen
            | Self::RightParen
            | Self::Eof
            | Self::Error(_) => false,
            _ => true,
        }
    }

    /// Keywords that may still name a column when a data type follows
    /// (`comment TEXT`, `desc VARCHAR(10)`).
    #[must_use]
    pub const fn is_nonreserved_keyword(&self) -> bool {
        matches!(
            self,
            Self::KwAction
                | Self::KwAsc
                | Self::KwCascade
                | Self::KwComment
                | Self::KwDesc
                | Self::KwFulltext
                | Self::KwNo
                | Self::KwPartition
                | Self::KwRestrict
                | Self::KwSpatial
                | Self::KwTable
                | Self::KwTemp
                | Self::KwTemporary
                | Self::KwView
        )
    }

    /// The token's literal value: string and identifier contents unescaped,
    /// everything else as rendered by `Display`.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::Number(s) | Self::String(s) | Self::Id(s) | Self::QuotedId(s, _) | Self::TypeName(s) => {
                s.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Renders the token as SQL text. Literals and quoted identifiers are
/// re-quoted, so data-type arguments like `ENUM('a','b')` read as written.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Number(s) | Self::Id(s) | Self::TypeName(s) => return f.write_str(s),
            Self::String(s) => return f.write_str(&quote_string(s)),
            Self::QuotedId(s, true) => return write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Self::QuotedId(s, false) => return write!(f, "`{}`", s.replace('`', "``")),
            Self::Error(msg) => return write!(f, "<error: {msg}>"),
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Tilde => "~",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::Ne => "!=",
            Self::LtGt => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Concat => "||",
            Self::Dot => ".",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Eof => "",
            Self::KwAutoIncrement => "AUTO_INCREMENT",
            kw => return f.write_str(&kw_to_str(kw)),
        };
        f.write_str(s)
    }
}

/// Upper-case spelling of a keyword variant.
pub(crate) fn kw_to_str(k: &TokenKind) -> String {
    let dbg = format!("{k:?}");
    dbg.strip_prefix("Kw").unwrap_or(&dbg).to_ascii_uppercase()
}
