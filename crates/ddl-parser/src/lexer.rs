// SQL lexer for DDL scripts.
//
// Converts SQL text into a stream of tokens. Uses memchr for accelerated
// string scanning. Tracks line/column for error reporting. Comment
// stripping and the string-vs-identifier split both happen here, so the
// parser only ever sees classified tokens.

use ddl_ast::Span;
use memchr::{memchr, memchr2};

use crate::token::{Token, TokenKind};

/// SQL lexer that produces a stream of tokens from source text.
pub struct Lexer<'a> {
    /// The source bytes (UTF-8).
    src: &'a [u8],
    /// Current byte offset into src.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given SQL source text.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the entire input into a Vec of tokens, ending with `Eof`.
    #[must_use]
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        if self.pos >= self.src.len() {
            return self.make_token(TokenKind::Eof, self.pos, self.pos);
        }

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let ch = self.src[self.pos];

        let kind = match ch {
            // String literal (single-quoted)
            b'\'' => self.lex_string(),

            // Quoted identifiers
            b'"' => self.lex_quoted_id(b'"', true),
            b'`' => self.lex_quoted_id(b'`', false),
            b'[' => self.lex_bracket_id(),

            // Numbers
            b'0'..=b'9' => self.lex_number(),
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),

            // Identifiers and keywords
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_identifier(),
            c if c >= 0x80 => self.lex_identifier(),

            // Operators and punctuation
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'*' => self.single(TokenKind::Star),
            b'/' => self.single(TokenKind::Slash),
            b'%' => self.single(TokenKind::Percent),
            b'&' => self.single(TokenKind::Ampersand),
            b'~' => self.single(TokenKind::Tilde),
            b',' => self.single(TokenKind::Comma),
            b':' => self.single(TokenKind::Colon),
            b';' => self.single(TokenKind::Semicolon),
            b'(' => self.single(TokenKind::LeftParen),
            b')' => self.single(TokenKind::RightParen),
            b'.' => self.single(TokenKind::Dot),

            // Multi-character operators
            b'<' => self.lex_lt(),
            b'>' => self.lex_gt(),
            b'=' => self.lex_eq(),
            b'!' => self.lex_bang(),
            b'|' => self.lex_pipe(),

            _ => {
                self.advance();
                let s = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                TokenKind::Error(format!("unexpected character: {s}"))
            }
        };

        Token {
            kind,
            span: Span::new(start as u32, self.pos as u32),
            line: start_line,
            col: start_col,
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn advance(&mut self) -> u8 {
        let ch = self.src[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if ch & 0xC0 != 0x80 {
            // UTF-8 continuation bytes do not start a new column.
            self.col += 1;
        }
        ch
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn make_token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        Token {
            kind,
            span: Span::new(start as u32, end as u32),
            line: self.line,
            col: self.col,
        }
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.src[start..end]).into_owned()
    }

    /// Skip whitespace, line comments (`--`, `#`), and block comments (`/* */`).
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
                self.advance();
            }

            if self.pos >= self.src.len() {
                break;
            }

            // Line comment: `-- ...` or MySQL `# ...`
            if (self.src[self.pos] == b'-' && self.peek_at(1) == Some(b'-'))
                || self.src[self.pos] == b'#'
            {
                let src = self.src;
                let rest = &src[self.pos..];
                let len = memchr(b'\n', rest).unwrap_or(rest.len());
                self.advance_by(len);
                continue;
            }

            // Block comment: `/* ... */`, including MySQL `/*!40101 ... */`
            if self.src[self.pos] == b'/' && self.peek_at(1) == Some(b'*') {
                self.advance(); // skip /
                self.advance(); // skip *
                while self.pos < self.src.len() {
                    if self.src[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    // -----------------------------------------------------------------------
    // Literal tokenizers
    // -----------------------------------------------------------------------

    /// Lex a single-quoted string literal. Accepts both `''` and the MySQL
    /// backslash escapes.
    fn lex_string(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance(); // skip opening quote

        let src = self.src;
        let mut value = String::new();
        loop {
            let remaining = &src[self.pos..];
            let Some(offset) = memchr2(b'\'', b'\\', remaining) else {
                self.advance_by(remaining.len());
                return TokenKind::Error(format!(
                    "unterminated string literal starting at byte {start}"
                ));
            };
            value.push_str(&String::from_utf8_lossy(&remaining[..offset]));
            self.advance_by(offset);

            if self.advance() == b'\\' {
                match self.peek() {
                    Some(escaped) if escaped.is_ascii() => {
                        self.advance();
                        value.push(match escaped {
                            b'n' => '\n',
                            b't' => '\t',
                            b'r' => '\r',
                            b'0' => '\0',
                            other => char::from(other),
                        });
                    }
                    // A multi-byte character after the backslash is picked up
                    // verbatim by the next scan.
                    Some(_) => {}
                    None => {
                        return TokenKind::Error(format!(
                            "unterminated string literal starting at byte {start}"
                        ));
                    }
                }
                continue;
            }

            // Check for escaped quote ('')
            if self.peek() == Some(b'\'') {
                value.push('\'');
                self.advance();
            } else {
                return TokenKind::String(value);
            }
        }
    }

    /// Lex a `"..."` or `` `...` `` identifier; a doubled closing quote
    /// escapes itself.
    fn lex_quoted_id(&mut self, quote: u8, double_quoted: bool) -> TokenKind {
        let start = self.pos;
        self.advance(); // skip opening quote

        let src = self.src;
        let mut value = String::new();
        loop {
            let remaining = &src[self.pos..];
            match memchr(quote, remaining) {
                Some(offset) => {
                    value.push_str(&String::from_utf8_lossy(&remaining[..offset]));
                    self.advance_by(offset);
                    self.advance(); // the quote

                    if self.peek() == Some(quote) {
                        value.push(char::from(quote));
                        self.advance();
                    } else {
                        return TokenKind::QuotedId(value, double_quoted);
                    }
                }
                None => {
                    self.advance_by(remaining.len());
                    return TokenKind::Error(format!(
                        "unterminated quoted identifier at byte {start}"
                    ));
                }
            }
        }
    }

    /// Lex a bracket-quoted identifier `[name]`.
    fn lex_bracket_id(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance(); // skip [

        let src = self.src;
        let remaining = &src[self.pos..];
        match memchr(b']', remaining) {
            Some(offset) => {
                let value = String::from_utf8_lossy(&remaining[..offset]).into_owned();
                self.advance_by(offset);
                self.advance(); // skip ]
                TokenKind::QuotedId(value, false)
            }
            None => {
                self.advance_by(remaining.len());
                TokenKind::Error(format!("unterminated bracket identifier at byte {start}"))
            }
        }
    }

    /// Lex a number: integer, hex integer, or float. The text is kept as
    /// written so type arguments and defaults survive unchanged.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;

        if self.src[self.pos] == b'0' && self.peek_at(1).is_some_and(|c| c == b'x' || c == b'X') {
            self.advance(); // 0
            self.advance(); // x
            let hex_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            if self.pos == hex_start {
                return TokenKind::Error("empty hex literal".to_owned());
            }
            return TokenKind::Number(self.text(start, self.pos));
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // Fractional part
        if self.peek() == Some(b'.') && !self.peek_at(1).is_some_and(|c| c.is_ascii_alphabetic() || c == b'_') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent
        if self.peek().is_some_and(|c| c == b'e' || c == b'E') {
            let sign = self.peek_at(1).is_some_and(|c| c == b'+' || c == b'-');
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.advance_by(digit_at);
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        TokenKind::Number(self.text(start, self.pos))
    }

    /// Lex an identifier, keyword, or data-type name.
    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance(); // first character already validated

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' || ch >= 0x80 {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.text(start, self.pos);

        if let Some(kw) = TokenKind::lookup_keyword(&text) {
            kw
        } else if TokenKind::is_type_name(&text) {
            TokenKind::TypeName(text)
        } else {
            TokenKind::Id(text)
        }
    }

    // -----------------------------------------------------------------------
    // Multi-character operator tokenizers
    // -----------------------------------------------------------------------

    /// Lex `<`, `<=`, `<>`, or `<<`.
    fn lex_lt(&mut self) -> TokenKind {
        self.advance(); // skip <
        match self.peek() {
            Some(b'=') => self.single(TokenKind::Le),
            Some(b'>') => self.single(TokenKind::LtGt),
            Some(b'<') => self.single(TokenKind::ShiftLeft),
            _ => TokenKind::Lt,
        }
    }

    /// Lex `>`, `>=`, or `>>`.
    fn lex_gt(&mut self) -> TokenKind {
        self.advance(); // skip >
        match self.peek() {
            Some(b'=') => self.single(TokenKind::Ge),
            Some(b'>') => self.single(TokenKind::ShiftRight),
            _ => TokenKind::Gt,
        }
    }

    /// Lex `=` or `==`.
    fn lex_eq(&mut self) -> TokenKind {
        self.advance(); // skip =
        if self.peek() == Some(b'=') {
            self.single(TokenKind::EqEq)
        } else {
            TokenKind::Eq
        }
    }

    /// Lex `!=`.
    fn lex_bang(&mut self) -> TokenKind {
        self.advance(); // skip !
        if self.peek() == Some(b'=') {
            self.single(TokenKind::Ne)
        } else {
            TokenKind::Error("unexpected '!', did you mean '!='?".to_owned())
        }
    }

    /// Lex `|` or `||`.
    fn lex_pipe(&mut self) -> TokenKind {
        self.advance(); // skip |
        if self.peek() == Some(b'|') {
            self.single(TokenKind::Concat)
        } else {
            TokenKind::Pipe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        Lexer::tokenize(src)
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).into_iter().map(|t| t.kind).collect()
    }

    fn num(s: &str) -> TokenKind {
        TokenKind::Number(s.to_owned())
    }

    #[test]
    fn test_lex_numbers_keep_source_text() {
        let tokens = kinds("42 3.50 .5 1e10 2E-3 0xFF 7.");
        assert_eq!(
            tokens,
            vec![
                num("42"),
                num("3.50"),
                num(".5"),
                num("1e10"),
                num("2E-3"),
                num("0xFF"),
                num("7."),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_string_literals() {
        let tokens = kinds(r"'hello' 'it''s' '' 'a\'b' 'tab\there'");
        assert_eq!(tokens[0], TokenKind::String("hello".to_owned()));
        assert_eq!(tokens[1], TokenKind::String("it's".to_owned()));
        assert_eq!(tokens[2], TokenKind::String(String::new()));
        assert_eq!(tokens[3], TokenKind::String("a'b".to_owned()));
        assert_eq!(tokens[4], TokenKind::String("tab\there".to_owned()));
        assert_eq!(tokens[5], TokenKind::Eof);
    }

    #[test]
    fn test_lex_quoted_identifiers() {
        let tokens = kinds("\"table_name\" [column] `back``tick`");
        assert_eq!(tokens[0], TokenKind::QuotedId("table_name".to_owned(), true));
        assert_eq!(tokens[1], TokenKind::QuotedId("column".to_owned(), false));
        assert_eq!(tokens[2], TokenKind::QuotedId("back`tick".to_owned(), false));
    }

    #[test]
    fn test_lex_keywords_and_types() {
        let tokens = kinds("CREATE table Primary KEY varchar Users auto_increment SET");
        assert_eq!(tokens[0], TokenKind::KwCreate);
        assert_eq!(tokens[1], TokenKind::KwTable);
        assert_eq!(tokens[2], TokenKind::KwPrimary);
        assert_eq!(tokens[3], TokenKind::KwKey);
        assert_eq!(tokens[4], TokenKind::TypeName("varchar".to_owned()));
        assert_eq!(tokens[5], TokenKind::Id("Users".to_owned()));
        assert_eq!(tokens[6], TokenKind::KwAutoIncrement);
        assert_eq!(tokens[7], TokenKind::KwSet);
    }

    #[test]
    fn test_lex_punctuation_and_operators() {
        let tokens = kinds("( , ) . ; = == != <> < <= > >= || : -");
        assert_eq!(
            tokens,
            vec![
                TokenKind::LeftParen,
                TokenKind::Comma,
                TokenKind::RightParen,
                TokenKind::Dot,
                TokenKind::Semicolon,
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::Ne,
                TokenKind::LtGt,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::Concat,
                TokenKind::Colon,
                TokenKind::Minus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_schema_qualified_backticks() {
        let tokens = kinds("`myschema`.`mytable`");
        assert_eq!(tokens[0], TokenKind::QuotedId("myschema".to_owned(), false));
        assert_eq!(tokens[1], TokenKind::Dot);
        assert_eq!(tokens[2], TokenKind::QuotedId("mytable".to_owned(), false));
    }

    #[test]
    fn test_lex_error_unterminated_string() {
        let tokens = kinds("'hello");
        assert!(matches!(tokens[0], TokenKind::Error(_)));
        assert_eq!(tokens[1], TokenKind::Eof);
    }

    #[test]
    fn test_lex_error_unexpected_character() {
        let tokens = kinds("a @ b");
        assert_eq!(tokens[0], TokenKind::Id("a".to_owned()));
        assert!(matches!(tokens[1], TokenKind::Error(_)));
        assert_eq!(tokens[2], TokenKind::Id("b".to_owned()));
    }

    #[test]
    fn test_lex_line_column_tracking() {
        let tokens = lex("CREATE\n  a,\n  b");
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
        assert_eq!((tokens[2].line, tokens[2].col), (2, 4));
        assert_eq!((tokens[3].line, tokens[3].col), (3, 3));
    }

    #[test]
    fn test_lex_spans() {
        let tokens = lex("id INT");
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].span, Span::new(3, 6));
    }

    #[test]
    fn test_lex_comments_skipped() {
        let tokens = kinds("a -- line\n # hash\n b /* block */ c /*!40101 SET x */ d");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Id("a".to_owned()),
                TokenKind::Id("b".to_owned()),
                TokenKind::Id("c".to_owned()),
                TokenKind::Id("d".to_owned()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_non_ascii_identifier() {
        let tokens = kinds("café INT");
        assert_eq!(tokens[0], TokenKind::Id("café".to_owned()));
        assert_eq!(tokens[1], TokenKind::TypeName("INT".to_owned()));
    }
}
