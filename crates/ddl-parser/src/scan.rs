// Shared scanning helpers: parenthesized groups and qualified names.

use crate::cursor::Cursor;
use crate::options::ParenSkip;
use crate::token::{Token, TokenKind};

/// Walk a parenthesized group with the cursor on its `(`.
///
/// `visit` sees every token inside the group together with its depth (1 for
/// direct members). The closing `)` is consumed; truncated input simply ends
/// the walk. Under [`ParenSkip::SingleLevel`] an inner `(` is an ordinary
/// depth-1 token and the first `)` closes the group.
pub(crate) fn walk_group(
    tokens: &[Token],
    cursor: &mut Cursor,
    paren: ParenSkip,
    mut visit: impl FnMut(&TokenKind, usize),
) {
    debug_assert!(cursor.check(tokens, &TokenKind::LeftParen));
    cursor.advance(tokens);

    let mut depth = 1_usize;
    while let Some(token) = cursor.token(tokens) {
        match token.kind {
            TokenKind::RightParen if depth == 1 => {
                cursor.advance(tokens);
                return;
            }
            TokenKind::RightParen => {
                depth -= 1;
                visit(&token.kind, depth);
            }
            TokenKind::LeftParen if paren == ParenSkip::Nested => {
                visit(&token.kind, depth);
                depth += 1;
            }
            _ => visit(&token.kind, depth),
        }
        cursor.advance(tokens);
    }
}

/// Skip a parenthesized group without looking at it.
pub(crate) fn skip_group(tokens: &[Token], cursor: &mut Cursor, paren: ParenSkip) {
    walk_group(tokens, cursor, paren, |_, _| {});
}

/// Collect the names directly inside a parenthesized group.
///
/// Keywords and nested expressions are ignored: `(a DESC, b(10))` yields
/// `["a", "b"]` under nested scanning.
pub(crate) fn collect_names(tokens: &[Token], cursor: &mut Cursor, paren: ParenSkip) -> Vec<String> {
    let mut names = Vec::new();
    walk_group(tokens, cursor, paren, |kind, depth| {
        if depth == 1 && kind.is_name() {
            names.push(kind.value());
        }
    });
    names
}

/// Read `name` or `qualifier.name` with the cursor on the first segment,
/// keeping only the last segment.
pub(crate) fn qualified_name(tokens: &[Token], cursor: &mut Cursor) -> String {
    let mut name = cursor.kind(tokens).value();
    cursor.advance(tokens);

    if cursor.eat(tokens, &TokenKind::Dot) && cursor.kind(tokens).is_name() {
        name = cursor.kind(tokens).value();
        cursor.advance(tokens);
    }
    name
}

/// Consume MySQL's `USING BTREE` / `USING HASH` index-type clause.
pub(crate) fn skip_index_type(tokens: &[Token], cursor: &mut Cursor) {
    if cursor.check(tokens, &TokenKind::KwUsing) && cursor.peek_kind(tokens, 1).is_name() {
        cursor.advance(tokens);
        cursor.advance(tokens);
    }
}
