// Script-level entry points: lex, split on `;`, parse each CREATE TABLE.

use ddl_ast::Statement;
use ddl_error::{DdlError, Result};
use tracing::debug;

use crate::lexer::Lexer;
use crate::options::ParseOptions;
use crate::table::parse_create_table_with;
use crate::token::{Token, TokenKind};

/// Parse every `CREATE TABLE` in a script with default options.
///
/// Other statements and lexer errors are skipped.
#[must_use]
pub fn parse_ddl(sql: &str) -> Vec<Statement> {
    parse_tokens(&Lexer::tokenize(sql), &ParseOptions::default())
}

/// Parse every `CREATE TABLE` in a script.
///
/// # Errors
///
/// With [`ParseOptions::strict_lexing`], returns [`DdlError::Lex`] for the
/// first character the lexer could not classify.
pub fn try_parse_ddl(sql: &str, options: &ParseOptions) -> Result<Vec<Statement>> {
    let tokens = Lexer::tokenize(sql);
    if options.strict_lexing {
        let first_error = tokens.iter().find_map(|t| match &t.kind {
            TokenKind::Error(detail) => Some((t, detail)),
            _ => None,
        });
        if let Some((bad, detail)) = first_error {
            return Err(DdlError::lex(bad.line, bad.col, detail.clone()));
        }
    }
    Ok(parse_tokens(&tokens, options))
}

/// Parse an already-lexed script.
#[must_use]
pub fn parse_tokens(tokens: &[Token], options: &ParseOptions) -> Vec<Statement> {
    let mut statements = Vec::new();
    for (index, stmt) in split_statements(tokens).enumerate() {
        match create_table_body(stmt) {
            Some(body) => {
                statements.push(Statement::CreateTable(parse_create_table_with(body, options)));
            }
            None => debug!(
                statement = index,
                leading = %stmt[0].kind,
                "skipping statement other than CREATE TABLE"
            ),
        }
    }
    statements
}

/// Non-empty statement slices between `;` separators, Eof excluded.
fn split_statements(tokens: &[Token]) -> impl Iterator<Item = &[Token]> {
    tokens
        .split(|t| matches!(t.kind, TokenKind::Semicolon | TokenKind::Eof))
        .filter(|stmt| !stmt.is_empty())
}

/// If `stmt` is `CREATE [modifiers] TABLE [IF NOT EXISTS] ...`, the tokens
/// from the table name on.
///
/// Modifiers are `TEMP`, `TEMPORARY` and bare words such as `OR REPLACE`,
/// `GLOBAL` or `UNLOGGED`.
fn create_table_body(stmt: &[Token]) -> Option<&[Token]> {
    let (first, rest) = stmt.split_first()?;
    if first.kind != TokenKind::KwCreate {
        return None;
    }
    let table_at = rest
        .iter()
        .position(|t| !matches!(t.kind, TokenKind::KwTemp | TokenKind::KwTemporary | TokenKind::Id(_)))?;
    if rest[table_at].kind != TokenKind::KwTable {
        return None;
    }

    let body = &rest[table_at + 1..];
    let if_not_exists = matches!(
        body,
        [
            Token { kind: TokenKind::KwIf, .. },
            Token { kind: TokenKind::KwNot, .. },
            Token { kind: TokenKind::KwExists, .. },
            ..
        ]
    );
    Some(if if_not_exists { &body[3..] } else { body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParenSkip;

    fn names(statements: &[Statement]) -> Vec<&str> {
        statements
            .iter()
            .filter_map(Statement::as_create_table)
            .map(|t| t.name.as_str())
            .collect()
    }

    #[test]
    fn test_multiple_statements() {
        let stmts = parse_ddl(
            "CREATE TABLE a (x INT);\n\
             INSERT INTO a VALUES (1);\n\
             DROP TABLE b;\n\
             CREATE TABLE c (y TEXT)",
        );
        assert_eq!(names(&stmts), vec!["a", "c"]);
    }

    #[test]
    fn test_create_modifiers() {
        let stmts = parse_ddl(
            "CREATE TEMPORARY TABLE t1 (a INT); CREATE OR REPLACE TABLE t2 (a INT); \
             CREATE TABLE IF NOT EXISTS t3 (a INT); CREATE UNLOGGED TABLE t4 (a INT)",
        );
        assert_eq!(names(&stmts), vec!["t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn test_other_create_statements_skipped() {
        let stmts = parse_ddl("CREATE INDEX i ON t (a); CREATE VIEW v AS SELECT 1; CREATE UNIQUE INDEX u ON t (b)");
        assert!(stmts.is_empty());
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_ddl("").is_empty());
        assert!(parse_ddl(" ;; -- nothing\n").is_empty());
    }

    #[test]
    fn test_lex_errors_tolerated_by_default() {
        let stmts = parse_ddl("CREATE TABLE t (a INT @, b INT)");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].as_create_table().unwrap().columns.len(), 2);
    }

    #[test]
    fn test_strict_lexing_reports_position() {
        let err = try_parse_ddl("CREATE TABLE t (\n  a INT @\n)", &ParseOptions::strict()).unwrap_err();
        match err {
            DdlError::Lex { line, col, .. } => {
                assert_eq!(line, 2);
                assert_eq!(col, 9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_try_parse_passes_options_through() {
        let sql = "CREATE TABLE t (a INT DEFAULT (f(1)), b INT)";
        let nested = try_parse_ddl(sql, &ParseOptions::default()).unwrap();
        assert_eq!(nested[0].as_create_table().unwrap().columns.len(), 2);

        let shallow = try_parse_ddl(sql, &ParseOptions::default().with_paren_skip(ParenSkip::SingleLevel)).unwrap();
        assert_eq!(shallow[0].as_create_table().unwrap().columns.len(), 1);
    }
}
