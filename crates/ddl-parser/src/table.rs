// CREATE TABLE driver: table name, table options and the column section.

use ddl_ast::CreateTable;
use tracing::{debug, trace};

use crate::columns::parse_column_section;
use crate::cursor::Cursor;
use crate::options::ParseOptions;
use crate::scan::qualified_name;
use crate::token::{Token, TokenKind};

/// Parse one `CREATE TABLE` statement with default options.
///
/// `tokens` may start at the table name or at `CREATE`; leading keywords are
/// skipped. Never fails: malformed input yields a partially filled table.
#[must_use]
pub fn parse_create_table(tokens: &[Token]) -> CreateTable {
    parse_create_table_with(tokens, &ParseOptions::default())
}

/// Parse one `CREATE TABLE` statement.
#[must_use]
pub fn parse_create_table_with(tokens: &[Token], options: &ParseOptions) -> CreateTable {
    let mut cursor = Cursor::new();
    let mut table = CreateTable::default();

    while let Some(token) = cursor.token(tokens) {
        match &token.kind {
            TokenKind::LeftParen => {
                cursor.advance(tokens);
                let section = parse_column_section(tokens, &mut cursor, options);
                if !table.columns.is_empty() {
                    debug!(table = %table.name, "second column section replaces the first");
                }
                table.columns = section.columns;
                table.indexes = section.indexes;
                table.foreign_keys = section.foreign_keys;
            }
            kind if table.name.is_empty() && kind.is_name() => {
                table.name = qualified_name(tokens, &mut cursor);
            }
            TokenKind::KwComment => {
                cursor.advance(tokens);
                table_comment(tokens, &mut cursor, &mut table);
            }
            TokenKind::KwPartition => {
                trace!(table = %table.name, "ignoring partition clause");
                cursor.finish(tokens);
            }
            _ => cursor.advance(tokens),
        }
    }

    debug!(
        table = %table.name,
        columns = table.columns.len(),
        indexes = table.indexes.len(),
        foreign_keys = table.foreign_keys.len(),
        "parsed CREATE TABLE"
    );
    table
}

/// `COMMENT 'text'` or `COMMENT = value`, cursor just past `COMMENT`.
fn table_comment(tokens: &[Token], cursor: &mut Cursor, table: &mut CreateTable) {
    let kind = cursor.kind(tokens);
    if kind.is_quoted_value() || kind.is_identifier() {
        table.comment = kind.value();
        cursor.advance(tokens);
    } else if cursor.eat(tokens, &TokenKind::Eq) && cursor.in_bounds(tokens) {
        table.comment = cursor.kind(tokens).value();
        cursor.advance(tokens);
    }
}
