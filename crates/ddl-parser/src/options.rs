// Parser configuration.

use serde::{Deserialize, Serialize};

/// How parenthesized groups are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParenSkip {
    /// Track nesting depth; a group ends at its matching `)`.
    #[default]
    Nested,
    /// A group ends at the first `)`, even inside a nested call such as
    /// `DEFAULT (COALESCE(a, b))`. Matches older schema importers.
    SingleLevel,
}

/// Options for [`try_parse_ddl`](crate::try_parse_ddl) and the
/// `parse_*_with` entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Fail on the first lexer error token instead of skipping it.
    pub strict_lexing: bool,
    /// Parenthesis scanning mode.
    pub paren_skip: ParenSkip,
}

impl ParseOptions {
    /// Options with strict lexing switched on.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            strict_lexing: true,
            paren_skip: ParenSkip::Nested,
        }
    }

    #[must_use]
    pub const fn with_paren_skip(mut self, paren_skip: ParenSkip) -> Self {
        self.paren_skip = paren_skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ParseOptions::default();
        assert!(!opts.strict_lexing);
        assert_eq!(opts.paren_skip, ParenSkip::Nested);
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: ParseOptions = serde_json::from_str(r#"{"paren_skip":"single_level"}"#).unwrap();
        assert_eq!(opts.paren_skip, ParenSkip::SingleLevel);
        assert!(!opts.strict_lexing);
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        let err = serde_json::from_str::<ParseOptions>(r#"{"strict":true}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_builders() {
        let opts = ParseOptions::strict().with_paren_skip(ParenSkip::SingleLevel);
        assert!(opts.strict_lexing);
        assert_eq!(opts.paren_skip, ParenSkip::SingleLevel);
    }
}
