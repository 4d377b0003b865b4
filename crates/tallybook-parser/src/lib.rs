//! Ledger parser for tallybook.
//!
//! This crate provides the parsing core for the tallybook plain-text
//! ledger format. It produces a stream of [`Directive`]s from source text,
//! along with any parse errors.
//!
//! # Architecture
//!
//! ```text
//! Source (&str) -> raw scanner -> contextual Lexer -> Parser -> Builder
//! ```
//!
//! The lexer handles the line-sensitive token rules (indentation, heading
//! lines, comments); the parser drives the grammar with one token of
//! lookahead; and every value the pipeline produces is constructed through
//! the [`Builder`] trait, so callers with their own representation can
//! supply their own builder. [`LedgerBuilder`] is the default and produces
//! `tallybook-core` records.
//!
//! # Features
//!
//! - All nine directive types, plus `pushtag`/`poptag`/`option`
//! - Error recovery (continues parsing after errors, at the next line)
//! - Source locations with a configurable first-line offset for callers
//!   that splice included files
//! - Ignores org-mode section headings and other non-directive lines
//!
//! # Example
//!
//! ```
//! use tallybook_parser::parse;
//!
//! let source = r#"
//! 2014-02-03 * "Cafe Mogador" | "Lamb tagine with wine"
//!   Liabilities:CreditCard  -37.45 USD
//!   Expenses:Restaurant
//! "#;
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! assert_eq!(result.directives.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod error;
mod lexer;
mod location;
mod parser;
mod token;

pub use builder::{Builder, LedgerBuilder};
pub use error::ParseError;
pub use lexer::{Lexer, Token, TokenKind};
pub use location::{Located, Location};
pub use parser::Parser;

use tallybook_core::Directive;

/// Result of parsing a ledger source.
#[derive(Debug)]
pub struct ParseResult {
    /// Successfully parsed directives, in source order.
    pub directives: Vec<Located<Directive>>,
    /// `option` directives found in the source, in order.
    pub options: Vec<(String, String)>,
    /// Parse errors encountered. Never fatal: the surrounding directives
    /// are still present in `directives`.
    pub errors: Vec<ParseError>,
}

/// Parse ledger source with the default builder.
///
/// Errors are collected, not raised; the result always carries whatever
/// directives parsed cleanly.
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    parse_named(source, "<input>", 0)
}

/// Parse ledger source labeled with a filename.
///
/// `first_line_offset` is added to every reported line number so callers
/// that splice included files can report the lines of the including file;
/// pass 0 for a standalone source.
#[must_use]
pub fn parse_named(source: &str, filename: &str, first_line_offset: u32) -> ParseResult {
    let mut builder = LedgerBuilder::new();
    Parser::new(source, filename, first_line_offset, &mut builder).run();
    builder.finish()
}

/// Parse ledger source, returning only directives and errors.
///
/// A simpler interface when the options are not needed.
#[must_use]
pub fn parse_directives(source: &str) -> (Vec<Located<Directive>>, Vec<ParseError>) {
    let result = parse(source);
    (result.directives, result.errors)
}
