// Shared token position.
//
// One `Cursor` is created per top-level parse and passed by `&mut` through
// every nested parser, so sibling and child parsers advance a single
// position without threading it back through return values.

use crate::token::{Token, TokenKind};

/// Position into a token slice. Never moves backwards.
///
/// Not `Clone`: a cursor belongs to exactly one parse.
#[derive(Debug, Default)]
pub struct Cursor {
    pos: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self { pos: 0 }
    }

    /// Current index.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Whether the cursor points at a real token. `Eof` counts as exhausted.
    #[must_use]
    pub fn in_bounds(&self, tokens: &[Token]) -> bool {
        tokens
            .get(self.pos)
            .is_some_and(|t| t.kind != TokenKind::Eof)
    }

    /// The token under the cursor, if in bounds.
    #[must_use]
    pub fn token<'t>(&self, tokens: &'t [Token]) -> Option<&'t Token> {
        tokens.get(self.pos).filter(|t| t.kind != TokenKind::Eof)
    }

    /// Kind of the token under the cursor; `Eof` when exhausted.
    #[must_use]
    pub fn kind<'t>(&self, tokens: &'t [Token]) -> &'t TokenKind {
        self.peek_kind(tokens, 0)
    }

    /// Kind of the token `n` positions ahead; `Eof` past the end.
    #[must_use]
    pub fn peek_kind<'t>(&self, tokens: &'t [Token], n: usize) -> &'t TokenKind {
        const EOF: &TokenKind = &TokenKind::Eof;
        tokens.get(self.pos + n).map_or(EOF, |t| &t.kind)
    }

    /// Whether the current token is exactly `kind`.
    #[must_use]
    pub fn check(&self, tokens: &[Token], kind: &TokenKind) -> bool {
        self.kind(tokens) == kind
    }

    /// Move forward one token. Stops at the end of the slice.
    pub fn advance(&mut self, tokens: &[Token]) {
        if self.pos < tokens.len() {
            self.pos += 1;
        }
    }

    /// Advance past the current token if it is exactly `kind`.
    pub fn eat(&mut self, tokens: &[Token], kind: &TokenKind) -> bool {
        if self.check(tokens, kind) {
            self.advance(tokens);
            true
        } else {
            false
        }
    }

    /// Advance to the end of the slice.
    pub fn finish(&mut self, tokens: &[Token]) {
        self.pos = self.pos.max(tokens.len());
    }
}
