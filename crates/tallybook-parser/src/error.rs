//! Parse error types.

use std::fmt;

/// A parse error with its source position.
///
/// Errors are reported through the builder's `error` hook as
/// `(message, filename, line)` and are never fatal: the driver resumes at
/// the next line and the caller receives a possibly partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// File the error was found in.
    pub file: String,
    /// 1-based line of the error, including the session's line offset.
    pub line: u32,
}

impl ParseError {
    /// Create a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ParseError::new("expected end of line, found number", "main.ledger", 12);
        assert_eq!(
            format!("{err}"),
            "main.ledger:12: expected end of line, found number"
        );
    }
}
