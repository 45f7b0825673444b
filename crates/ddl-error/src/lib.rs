use std::path::PathBuf;

use thiserror::Error;

/// Error type for the outer surfaces of the DDL toolchain.
///
/// The `CREATE TABLE` parser itself never fails: bad input produces an
/// under-populated schema. These variants cover what sits around it: strict
/// lexing, configuration files, input/output, and JSON encoding.
#[derive(Error, Debug)]
pub enum DdlError {
    // === Input Errors ===
    /// The lexer produced an error token while strict lexing was enabled.
    #[error("lexical error at {line}:{col}: {detail}")]
    Lex { line: u32, col: u32, detail: String },

    // === Configuration Errors ===
    /// Configuration content is invalid.
    #[error("invalid configuration: {detail}")]
    Config { detail: String },

    /// Configuration file could not be read.
    #[error("cannot read configuration file '{path}': {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File or stream I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Encoding Errors ===
    /// JSON encoding or decoding failed.
    #[error("JSON error: {detail}")]
    Json { detail: String },
}

impl DdlError {
    /// Whether the user can likely fix this by changing their input or config.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Lex { .. } | Self::Config { .. } | Self::ConfigUnreadable { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Lex { .. } => {
                Some("Close the string or quoted identifier, or disable strict_lexing")
            }
            Self::Config { .. } | Self::ConfigUnreadable { .. } => {
                Some("Check the configuration file against the documented keys")
            }
            _ => None,
        }
    }

    /// Process exit code for this error (for CLI use).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::ConfigUnreadable { .. } => 2,
            _ => 1,
        }
    }

    /// Create a lexical error.
    pub fn lex(line: u32, col: u32, detail: impl Into<String>) -> Self {
        Self::Lex {
            line,
            col,
            detail: detail.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// Create a JSON error.
    pub fn json(detail: impl Into<String>) -> Self {
        Self::Json {
            detail: detail.into(),
        }
    }
}

/// Result type alias using `DdlError`.
pub type Result<T> = std::result::Result<T, DdlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_lex() {
        let err = DdlError::lex(3, 14, "unterminated string literal");
        assert_eq!(
            err.to_string(),
            "lexical error at 3:14: unterminated string literal"
        );
    }

    #[test]
    fn error_display_config_unreadable() {
        let err = DdlError::ConfigUnreadable {
            path: PathBuf::from("/nope/ddl.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "cannot read configuration file '/nope/ddl.json': missing"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: DdlError = io.into();
        assert!(matches!(err, DdlError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: pipe closed");
    }

    #[test]
    fn user_recoverable() {
        assert!(DdlError::lex(1, 1, "x").is_user_recoverable());
        assert!(DdlError::config("bad key").is_user_recoverable());
        assert!(!DdlError::json("eof").is_user_recoverable());
    }

    #[test]
    fn suggestions_and_exit_codes() {
        assert!(DdlError::lex(1, 1, "x").suggestion().is_some());
        assert!(DdlError::json("x").suggestion().is_none());
        assert_eq!(DdlError::config("x").exit_code(), 2);
        assert_eq!(DdlError::json("x").exit_code(), 1);
    }
}
