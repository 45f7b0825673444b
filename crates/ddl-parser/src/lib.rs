//! Tolerant recursive-descent parser for `CREATE TABLE` statements.
//!
//! Tokens are classified by [`Lexer`] and walked by a single shared
//! [`Cursor`]. Unknown tokens are skipped rather than rejected, so dialect
//! clauses (storage engines, charsets, partitioning) never fail a parse; the
//! worst outcome of bad input is an under-populated [`ddl_ast::CreateTable`].
//!
//! ```
//! let stmts = ddl_parser::parse_ddl("CREATE TABLE t (id INT PRIMARY KEY)");
//! let table = stmts[0].as_create_table().unwrap();
//! assert_eq!(table.name, "t");
//! assert!(table.columns[0].primary_key);
//! ```

pub mod columns;
pub mod cursor;
pub mod foreign_key;
pub mod lexer;
pub mod options;
mod scan;
pub mod statement;
pub mod table;
pub mod token;

pub use columns::{parse_column_section, resolve_constraints, ColumnSection, DeferredConstraints};
pub use cursor::Cursor;
pub use foreign_key::{parse_foreign_key, parse_references, References};
pub use lexer::Lexer;
pub use options::{ParenSkip, ParseOptions};
pub use statement::{parse_ddl, parse_tokens, try_parse_ddl};
pub use table::{parse_create_table, parse_create_table_with};
pub use token::{Token, TokenKind};
