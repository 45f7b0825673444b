// FOREIGN KEY and REFERENCES clauses.

use ddl_ast::ForeignKey;
use tracing::debug;

use crate::cursor::Cursor;
use crate::options::ParenSkip;
use crate::scan::{collect_names, qualified_name};
use crate::token::{Token, TokenKind};

/// Target of a `REFERENCES` clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    pub table: String,
    pub columns: Vec<String>,
}

/// Parse `FOREIGN KEY [name] (cols) REFERENCES table (cols) [actions]` with
/// the cursor on `FOREIGN`.
///
/// Returns `None` when `KEY` does not follow (only `FOREIGN` is consumed) or
/// when the local and referenced column lists differ in length. In the
/// latter case the whole clause is still consumed.
pub fn parse_foreign_key(tokens: &[Token], cursor: &mut Cursor, paren: ParenSkip) -> Option<ForeignKey> {
    debug_assert!(cursor.check(tokens, &TokenKind::KwForeign));
    cursor.advance(tokens);
    if !cursor.eat(tokens, &TokenKind::KwKey) {
        return None;
    }

    // MySQL allows an index name between KEY and the column list.
    if cursor.kind(tokens).is_name() {
        cursor.advance(tokens);
    }

    let column_names = if cursor.check(tokens, &TokenKind::LeftParen) {
        collect_names(tokens, cursor, paren)
    } else {
        Vec::new()
    };

    let references = if cursor.check(tokens, &TokenKind::KwReferences) {
        parse_references(tokens, cursor, paren)
    } else {
        References::default()
    };

    let fk = ForeignKey {
        column_names,
        ref_table_name: references.table,
        ref_column_names: references.columns,
    };
    if fk.has_matching_arity() {
        Some(fk)
    } else {
        debug!(
            local = fk.column_names.len(),
            referenced = fk.ref_column_names.len(),
            ref_table = %fk.ref_table_name,
            "dropping foreign key with mismatched column lists"
        );
        None
    }
}

/// Parse `REFERENCES table [(cols)]` and any trailing referential actions,
/// with the cursor on `REFERENCES`.
pub fn parse_references(tokens: &[Token], cursor: &mut Cursor, paren: ParenSkip) -> References {
    debug_assert!(cursor.check(tokens, &TokenKind::KwReferences));
    cursor.advance(tokens);

    let mut references = References::default();
    if cursor.kind(tokens).is_name() {
        references.table = qualified_name(tokens, cursor);
    }
    if cursor.check(tokens, &TokenKind::LeftParen) {
        references.columns = collect_names(tokens, cursor, paren);
    }
    skip_referential_actions(tokens, cursor);
    references
}

/// Consume `ON DELETE|UPDATE <action>`, `MATCH <name>` and
/// `[NOT] DEFERRABLE [INITIALLY <mode>]` in any order.
fn skip_referential_actions(tokens: &[Token], cursor: &mut Cursor) {
    loop {
        match cursor.kind(tokens) {
            TokenKind::KwOn
                if matches!(
                    cursor.peek_kind(tokens, 1),
                    TokenKind::KwDelete | TokenKind::KwUpdate
                ) =>
            {
                cursor.advance(tokens);
                cursor.advance(tokens);
                skip_action_type(tokens, cursor);
            }
            TokenKind::KwMatch => {
                cursor.advance(tokens);
                if cursor.kind(tokens).is_name() {
                    cursor.advance(tokens);
                }
            }
            TokenKind::KwNot if cursor.peek_kind(tokens, 1) == &TokenKind::KwDeferrable => {
                cursor.advance(tokens);
            }
            TokenKind::KwDeferrable => {
                cursor.advance(tokens);
                if cursor.eat(tokens, &TokenKind::KwInitially) && cursor.kind(tokens).is_name() {
                    cursor.advance(tokens);
                }
            }
            _ => return,
        }
    }
}

fn skip_action_type(tokens: &[Token], cursor: &mut Cursor) {
    match cursor.kind(tokens) {
        TokenKind::KwCascade | TokenKind::KwRestrict => cursor.advance(tokens),
        TokenKind::KwSet
            if matches!(
                cursor.peek_kind(tokens, 1),
                TokenKind::KwNull | TokenKind::KwDefault
            ) =>
        {
            cursor.advance(tokens);
            cursor.advance(tokens);
        }
        TokenKind::KwNo if cursor.peek_kind(tokens, 1) == &TokenKind::KwAction => {
            cursor.advance(tokens);
            cursor.advance(tokens);
        }
        _ => {}
    }
}
