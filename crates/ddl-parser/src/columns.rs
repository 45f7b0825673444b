// Column section of CREATE TABLE: everything between the outer parentheses.
//
// A single loop walks the section one token at a time. Every construct the
// loop recognises consumes exactly its own tokens; anything else is skipped.
// Table-level PRIMARY KEY and UNIQUE lists are deferred and folded into the
// column flags once the whole section has been read, so their position in
// the section does not matter.

use std::collections::HashSet;
use std::mem;

use ddl_ast::{quote_string, Column, ForeignKey, Index, IndexColumn, SortOrder};
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::foreign_key::{parse_foreign_key, parse_references};
use crate::options::{ParenSkip, ParseOptions};
use crate::scan::{collect_names, skip_group, skip_index_type, walk_group};
use crate::token::{Token, TokenKind};

/// Result of parsing a column section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSection {
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
}

/// Table-level constraint lists, upper-cased for case-insensitive matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredConstraints {
    pub primary_key: Vec<String>,
    pub unique: Vec<String>,
}

/// Parse a column section with the cursor just past its opening `(`.
///
/// Stops after the matching `)` or at the end of the tokens.
pub fn parse_column_section(tokens: &[Token], cursor: &mut Cursor, options: &ParseOptions) -> ColumnSection {
    SectionParser::new(tokens, cursor, options.paren_skip).run()
}

/// Apply deferred table-level constraints to already-built columns.
///
/// A column named in the primary-key list gets `primary_key = true`; a
/// column named in the unique list gets `unique = true`. `nullable` is left
/// as declared. Names match case-insensitively. Names that match no
/// column are ignored.
pub fn resolve_constraints(columns: &mut [Column], deferred: &DeferredConstraints) {
    let pk: HashSet<&str> = deferred.primary_key.iter().map(String::as_str).collect();
    let unique: HashSet<&str> = deferred.unique.iter().map(String::as_str).collect();

    for column in columns {
        let key = column.name.to_ascii_uppercase();
        if pk.contains(key.as_str()) {
            column.primary_key = true;
        }
        if unique.contains(key.as_str()) {
            column.unique = true;
        }
    }
}

struct SectionParser<'a> {
    tokens: &'a [Token],
    cursor: &'a mut Cursor,
    paren: ParenSkip,
    section: ColumnSection,
    deferred: DeferredConstraints,
    column: Column,
}

impl<'a> SectionParser<'a> {
    fn new(tokens: &'a [Token], cursor: &'a mut Cursor, paren: ParenSkip) -> Self {
        Self {
            tokens,
            cursor,
            paren,
            section: ColumnSection::default(),
            deferred: DeferredConstraints::default(),
            column: Column::default(),
        }
    }

    fn kind(&self) -> &'a TokenKind {
        self.cursor.kind(self.tokens)
    }

    fn peek(&self, n: usize) -> &'a TokenKind {
        self.cursor.peek_kind(self.tokens, n)
    }

    fn advance(&mut self) {
        self.cursor.advance(self.tokens);
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        self.cursor.eat(self.tokens, kind)
    }

    fn run(mut self) -> ColumnSection {
        while self.cursor.in_bounds(self.tokens) {
            if self.column.name.is_empty() && self.starts_column_name() {
                self.column.name = self.kind().value();
                self.advance();
                continue;
            }

            match self.kind() {
                TokenKind::LeftParen => skip_group(self.tokens, self.cursor, self.paren),
                TokenKind::KwConstraint => {
                    self.advance();
                    if self.kind().is_name() {
                        self.advance();
                    }
                }
                TokenKind::KwPrimary => self.primary_key(),
                TokenKind::KwForeign => {
                    if let Some(fk) = parse_foreign_key(self.tokens, self.cursor, self.paren) {
                        self.section.foreign_keys.push(fk);
                    }
                }
                TokenKind::KwIndex | TokenKind::KwKey => self.index(),
                TokenKind::KwUnique => self.unique(),
                TokenKind::KwNot => {
                    self.advance();
                    if self.eat(&TokenKind::KwNull) {
                        self.column.nullable = false;
                    }
                }
                TokenKind::KwDefault => self.default_value(),
                TokenKind::KwComment => {
                    self.advance();
                    let kind = self.kind();
                    if kind.is_quoted_value() || kind.is_identifier() {
                        self.column.comment = kind.value();
                        self.advance();
                    }
                }
                TokenKind::KwCharacter if self.peek(1) == &TokenKind::KwSet => {
                    self.advance();
                    self.advance();
                    let kind = self.kind();
                    if kind.is_name() || kind.is_quoted_value() {
                        self.advance();
                    }
                }
                TokenKind::KwCharacter => self.data_type(),
                TokenKind::KwCollate => {
                    self.advance();
                    let kind = self.kind();
                    if kind.is_name() || kind.is_quoted_value() {
                        self.advance();
                    }
                }
                TokenKind::KwReferences => {
                    // Inline references are recognised but not recorded.
                    let target = parse_references(self.tokens, self.cursor, self.paren);
                    trace!(column = %self.column.name, table = %target.table, "skipped inline REFERENCES");
                }
                TokenKind::KwAutoIncrement => {
                    self.column.auto_increment = true;
                    self.advance();
                }
                kind if kind.is_data_type() => self.data_type(),
                TokenKind::Comma => {
                    self.flush_column();
                    self.advance();
                }
                TokenKind::RightParen => {
                    self.advance();
                    break;
                }
                _ => self.advance(),
            }
        }

        self.flush_column();
        resolve_constraints(&mut self.section.columns, &self.deferred);

        trace!(
            columns = self.section.columns.len(),
            indexes = self.section.indexes.len(),
            foreign_keys = self.section.foreign_keys.len(),
            deferred_pk = self.deferred.primary_key.len(),
            "column section parsed"
        );
        self.section
    }

    /// A name token, or a non-reserved keyword directly followed by a type.
    fn starts_column_name(&self) -> bool {
        let kind = self.kind();
        kind.is_name() || (kind.is_nonreserved_keyword() && self.peek(1).is_data_type())
    }

    fn flush_column(&mut self) {
        let column = mem::take(&mut self.column);
        if column.is_declared() {
            self.section.columns.push(column);
        }
    }

    fn upper_names(&mut self) -> Vec<String> {
        collect_names(self.tokens, self.cursor, self.paren)
            .into_iter()
            .map(|n| n.to_ascii_uppercase())
            .collect()
    }

    /// `PRIMARY KEY (a, b)` at table level or `PRIMARY KEY` inline.
    fn primary_key(&mut self) {
        self.advance();
        if !self.eat(&TokenKind::KwKey) {
            return;
        }
        skip_index_type(self.tokens, self.cursor);
        if self.kind() == &TokenKind::LeftParen {
            let names = self.upper_names();
            self.deferred.primary_key.extend(names);
            skip_index_type(self.tokens, self.cursor);
        } else {
            self.column.primary_key = true;
        }
    }

    /// `UNIQUE [KEY|INDEX] [name] (a, b)` at table level or `UNIQUE` inline.
    fn unique(&mut self) {
        self.advance();
        if matches!(self.kind(), TokenKind::KwKey | TokenKind::KwIndex) {
            self.advance();
        }
        // Only a name followed by a list (or its index type) belongs to a
        // table-level constraint.
        if self.kind().is_name() && matches!(self.peek(1), TokenKind::LeftParen | TokenKind::KwUsing) {
            self.advance();
        }
        skip_index_type(self.tokens, self.cursor);
        if self.kind() == &TokenKind::LeftParen {
            let names = self.upper_names();
            self.deferred.unique.extend(names);
            skip_index_type(self.tokens, self.cursor);
        } else {
            self.column.unique = true;
        }
    }

    /// `INDEX|KEY name [USING x] (col [ASC|DESC], ...) [USING x]`.
    fn index(&mut self) {
        self.advance();
        if !self.kind().is_name() {
            return;
        }
        let name = self.kind().value();
        self.advance();
        skip_index_type(self.tokens, self.cursor);
        if self.kind() != &TokenKind::LeftParen {
            return;
        }

        let mut columns = Vec::new();
        let mut entry = IndexColumn::default();
        walk_group(self.tokens, self.cursor, self.paren, |kind, depth| {
            if depth != 1 {
                return;
            }
            match kind {
                TokenKind::KwDesc => entry.sort = SortOrder::Desc,
                TokenKind::KwAsc => entry.sort = SortOrder::Asc,
                TokenKind::Comma => {
                    let done = mem::take(&mut entry);
                    if !done.name.is_empty() {
                        columns.push(done);
                    }
                }
                k if k.is_name() => entry.name = k.value(),
                _ => {}
            }
        });
        if !entry.name.is_empty() {
            columns.push(entry);
        }
        skip_index_type(self.tokens, self.cursor);

        if columns.is_empty() {
            debug!(index = %name, "dropping index without columns");
            return;
        }
        self.section.indexes.push(Index {
            name,
            unique: false,
            columns,
        });
    }

    /// `DEFAULT <value>`. Quoted values are stored quoted; numbers,
    /// identifiers and keywords are stored as written. A parenthesized
    /// expression is left for the generic group skip.
    fn default_value(&mut self) {
        self.advance();
        let kind = self.kind();
        let value = match kind {
            k if k.is_quoted_value() => quote_string(&k.value()),
            TokenKind::Number(n) => n.clone(),
            TokenKind::Minus | TokenKind::Plus => match self.peek(1) {
                TokenKind::Number(n) => {
                    self.advance();
                    format!("{kind}{n}")
                }
                _ => return,
            },
            k if k.is_identifier() => k.value(),
            k if k.is_keyword() => k.to_string(),
            _ => return,
        };
        self.column.default = value;
        self.advance();
    }

    /// Data type name plus its verbatim argument list, e.g. `DECIMAL(10,2)`.
    /// `CHARACTER VARYING` keeps both words.
    fn data_type(&mut self) {
        let mut data_type = self.kind().value().to_ascii_uppercase();
        let character = self.kind() == &TokenKind::KwCharacter;
        self.advance();
        if character {
            if let TokenKind::Id(word) = self.kind() {
                if word.eq_ignore_ascii_case("VARYING") {
                    data_type.push_str(" VARYING");
                    self.advance();
                }
            }
        }
        if self.kind() == &TokenKind::LeftParen {
            data_type.push('(');
            walk_group(self.tokens, self.cursor, self.paren, |kind, _| {
                data_type.push_str(&kind.to_string());
            });
            data_type.push(')');
        }
        self.column.data_type = data_type;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn section(sql: &str) -> ColumnSection {
        section_with(sql, ParseOptions::default())
    }

    fn section_with(sql: &str, options: ParseOptions) -> ColumnSection {
        let tokens = Lexer::tokenize(sql);
        let mut cursor = Cursor::new();
        assert!(cursor.eat(&tokens, &TokenKind::LeftParen), "test input must open a section");
        parse_column_section(&tokens, &mut cursor, &options)
    }

    #[test]
    fn test_basic_columns() {
        let s = section("(id INT PRIMARY KEY AUTO_INCREMENT, name VARCHAR(255) NOT NULL)");
        assert_eq!(s.columns.len(), 2);
        let id = &s.columns[0];
        assert_eq!(id.name, "id");
        assert_eq!(id.data_type, "INT");
        assert!(id.primary_key);
        assert!(id.auto_increment);
        assert!(id.nullable);
        let name = &s.columns[1];
        assert_eq!(name.data_type, "VARCHAR(255)");
        assert!(!name.nullable);
    }

    #[test]
    fn test_type_arguments_kept_verbatim() {
        let s = section("(price DECIMAL(10, 2), kind ENUM('a', 'b'), flags SET('x','y'), t int unsigned)");
        let types: Vec<&str> = s.columns.iter().map(|c| c.data_type.as_str()).collect();
        assert_eq!(types, vec!["DECIMAL(10,2)", "ENUM('a','b')", "SET('x','y')", "INT"]);
    }

    #[test]
    fn test_defaults() {
        let s = section(
            "(a INT DEFAULT 0, b VARCHAR(10) DEFAULT 'it''s', c INT DEFAULT -1, \
             d TIMESTAMP DEFAULT CURRENT_TIMESTAMP, e INT DEFAULT NULL, f TEXT DEFAULT \"x\", g INT)",
        );
        let defaults: Vec<&str> = s.columns.iter().map(|c| c.default.as_str()).collect();
        assert_eq!(
            defaults,
            vec!["0", "'it''s'", "-1", "CURRENT_TIMESTAMP", "NULL", "'x'", ""]
        );
    }

    #[test]
    fn test_parenthesized_default_is_skipped() {
        let s = section("(a INT DEFAULT (1 + 2) NOT NULL, b INT)");
        assert_eq!(s.columns.len(), 2);
        assert!(s.columns[0].default.is_empty());
        assert!(!s.columns[0].nullable);
    }

    #[test]
    fn test_comment_charset_collate() {
        let s = section(
            "(`title` varchar(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL COMMENT 'Title', x INT)",
        );
        let title = &s.columns[0];
        assert_eq!(title.name, "title");
        assert_eq!(title.data_type, "VARCHAR(64)");
        assert_eq!(title.comment, "Title");
        assert!(!title.nullable);
        assert_eq!(s.columns[1].name, "x");
    }

    #[test]
    fn test_table_level_primary_key_any_position() {
        let before = section("(PRIMARY KEY (`Id`), id INT, name TEXT)");
        let after = section("(id INT, name TEXT, PRIMARY KEY (ID))");
        for s in [before, after] {
            assert_eq!(s.columns.len(), 2);
            assert!(s.columns[0].primary_key);
            assert!(s.columns[0].nullable);
            assert!(!s.columns[1].primary_key);
        }
    }

    #[test]
    fn test_composite_primary_key_and_unknown_names() {
        let s = section("(a INT, b INT, PRIMARY KEY (a, b, missing))");
        assert!(s.columns.iter().all(|c| c.primary_key));
        assert_eq!(s.columns.len(), 2);
    }

    #[test]
    fn test_unique_inline_and_table_level() {
        let s = section("(email VARCHAR(100) UNIQUE, a INT, b INT, UNIQUE KEY uk_ab (a, b) USING BTREE)");
        assert!(s.columns.iter().all(|c| c.unique));
        assert!(s.indexes.is_empty());

        let s = section("(a INT, UNIQUE INDEX ux (A))");
        assert!(s.columns[0].unique);
    }

    #[test]
    fn test_unique_key_with_index_type_before_list() {
        let s = section("(a INT, UNIQUE KEY uk USING BTREE (a))");
        let names: Vec<&str> = s.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
        assert!(s.columns[0].unique);
        assert!(s.indexes.is_empty());
    }

    #[test]
    fn test_collation_spelled_like_a_type() {
        let s = section("(a VARCHAR(5) COLLATE binary NOT NULL, b TEXT CHARACTER SET binary)");
        assert_eq!(s.columns[0].data_type, "VARCHAR(5)");
        assert!(!s.columns[0].nullable);
        assert_eq!(s.columns[1].data_type, "TEXT");
    }

    #[test]
    fn test_not_without_null_keeps_column_nullable() {
        let s = section("(a INT NOT DEFAULT 5, b INT NOT)");
        assert_eq!(s.columns.len(), 2);
        assert!(s.columns[0].nullable);
        assert_eq!(s.columns[0].default, "5");
        assert!(s.columns[1].nullable);
    }

    #[test]
    fn test_character_data_types() {
        let s = section("(a CHARACTER VARYING(20) NOT NULL, b character(3), c VARCHAR(8) CHARACTER SET utf8)");
        let types: Vec<&str> = s.columns.iter().map(|c| c.data_type.as_str()).collect();
        assert_eq!(types, vec!["CHARACTER VARYING(20)", "CHARACTER(3)", "VARCHAR(8)"]);
        assert!(!s.columns[0].nullable);
    }

    #[test]
    fn test_default_backslash_is_requoted() {
        let s = section(r"(a TEXT DEFAULT 'x\y')");
        assert_eq!(s.columns[0].default, r"'x\y'");
    }

    #[test]
    fn test_indexes() {
        let s = section("(a INT, b INT, INDEX idx_ab (a, b DESC), KEY `k_a` USING BTREE (`a` ASC))");
        assert_eq!(s.columns.len(), 2);
        assert_eq!(s.indexes.len(), 2);
        let ab = &s.indexes[0];
        assert_eq!(ab.name, "idx_ab");
        assert!(!ab.unique);
        assert_eq!(ab.columns, vec![IndexColumn::new("a", SortOrder::Asc), IndexColumn::new("b", SortOrder::Desc)]);
        assert_eq!(s.indexes[1].name, "k_a");
        assert_eq!(s.indexes[1].columns.len(), 1);
    }

    #[test]
    fn test_index_prefix_length_is_ignored() {
        let s = section("(a TEXT, INDEX ia (a(10)))");
        assert_eq!(s.indexes[0].columns, vec![IndexColumn::new("a", SortOrder::Asc)]);
    }

    #[test]
    fn test_empty_index_is_dropped() {
        let s = section("(a INT, INDEX empty ())");
        assert!(s.indexes.is_empty());
        assert_eq!(s.columns.len(), 1);
    }

    #[test]
    fn test_foreign_keys() {
        let s = section(
            "(a INT, b INT, FOREIGN KEY (a) REFERENCES u(x) ON DELETE SET NULL, \
             FOREIGN KEY (a, b) REFERENCES v(y))",
        );
        assert_eq!(s.columns.len(), 2);
        assert_eq!(s.foreign_keys.len(), 1);
        assert_eq!(s.foreign_keys[0].ref_table_name, "u");
    }

    #[test]
    fn test_inline_references_not_recorded() {
        let s = section("(user_id INT REFERENCES users(id) ON DELETE CASCADE, b INT)");
        assert_eq!(s.columns.len(), 2);
        assert!(s.foreign_keys.is_empty());
        assert_eq!(s.columns[0].data_type, "INT");
    }

    #[test]
    fn test_constraint_names_are_skipped() {
        let s = section("(a INT, CONSTRAINT pk_a PRIMARY KEY (a), CONSTRAINT chk CHECK (a > 0))");
        assert_eq!(s.columns.len(), 1);
        assert!(s.columns[0].primary_key);
    }

    #[test]
    fn test_keyword_column_names() {
        let s = section("(comment TEXT, `desc` VARCHAR(10), date DATE)");
        let names: Vec<&str> = s.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["COMMENT", "desc", "date"]);
        assert_eq!(s.columns[2].data_type, "DATE");
    }

    #[test]
    fn test_empty_and_truncated_sections() {
        assert!(section("()").columns.is_empty());
        let s = section("(a INT, b VARCHAR(10");
        assert_eq!(s.columns.len(), 2);
        assert_eq!(s.columns[1].data_type, "VARCHAR(10)");
    }

    #[test]
    fn test_double_commas_do_not_create_columns() {
        let s = section("(a INT,, b INT,)");
        assert_eq!(s.columns.len(), 2);
    }

    #[test]
    fn test_stops_after_closing_paren() {
        let tokens = Lexer::tokenize("(a INT) ENGINE=InnoDB");
        let mut cursor = Cursor::new();
        cursor.advance(&tokens);
        let s = parse_column_section(&tokens, &mut cursor, &ParseOptions::default());
        assert_eq!(s.columns.len(), 1);
        assert_eq!(cursor.kind(&tokens), &TokenKind::Id("ENGINE".to_owned()));
    }

    #[test]
    fn test_single_level_paren_skip() {
        let sql = "(a INT DEFAULT (COALESCE(1, 2)), b INT)";
        let nested = section(sql);
        assert_eq!(nested.columns.len(), 2);

        let shallow = section_with(sql, ParseOptions::default().with_paren_skip(ParenSkip::SingleLevel));
        // The group ends at the first `)`, so the tail closes the section early.
        assert_eq!(shallow.columns.len(), 1);
        assert_eq!(shallow.columns[0].name, "a");
    }

    #[test]
    fn test_resolve_constraints_directly() {
        let mut columns = vec![Column::new("Id", "INT"), Column::new("code", "TEXT")];
        let deferred = DeferredConstraints {
            primary_key: vec!["ID".to_owned()],
            unique: vec!["CODE".to_owned()],
        };
        resolve_constraints(&mut columns, &deferred);
        assert!(columns[0].primary_key && columns[0].nullable);
        assert!(columns[1].unique && !columns[1].primary_key);
    }
}
