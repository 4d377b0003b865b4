//! Raw lexeme classification using Logos.
//!
//! This module provides the DFA half of the lexer: longest-match lexeme
//! classes over the source bytes. It is deliberately context-free --
//! whitespace, newlines, and flag characters come out as plain tokens, and
//! the contextual rules (indentation, heading lines, per-line counters)
//! are applied by the [`Lexer`](crate::Lexer) wrapper in `lexer.rs`.

use logos::Logos;

/// Raw token classes produced by the scanner.
///
/// Patterns are matched longest-first; literal keywords take precedence
/// over the generic account/currency classes when the lexeme is an exact
/// keyword. Keywords are lowercase and currencies are uppercase, so the
/// two never collide.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    // ===== Layout =====
    /// A run of horizontal whitespace. Leading runs become indentation or
    /// skipped lines; interior runs are discarded by the wrapper.
    #[regex(r"[ \t\r]+")]
    Whitespace,

    /// Newline (significant: the grammar is line-terminated).
    #[token("\n")]
    Newline,

    /// A comment from `;` to the end of the line.
    #[regex(r";[^\n]*")]
    Comment,

    // ===== Punctuation =====
    /// Pipe `|` between payee and narration.
    #[token("|")]
    Pipe,
    /// Double at-sign `@@` for total prices.
    #[token("@@")]
    AtAt,
    /// At-sign `@` for per-unit prices.
    #[token("@")]
    At,
    /// Left brace `{` opening lot information.
    #[token("{")]
    Lcurl,
    /// Right brace `}` closing lot information.
    #[token("}")]
    Rcurl,
    /// Equals sign `=`.
    #[token("=")]
    Equal,
    /// Comma `,` separating declared currencies.
    #[token(",")]
    Comma,
    /// Slash `/` between lot cost and lot date.
    #[token("/")]
    Slash,

    /// A flag character. At the start of a line this is a heading glyph
    /// and the wrapper skips the whole line instead.
    #[regex(r"[*!&#?%]")]
    Flag,

    // ===== Keywords =====
    /// The `txn` keyword for transactions.
    #[token("txn")]
    Txn,
    /// The `check` directive keyword.
    #[token("check")]
    Check,
    /// The `open` directive keyword.
    #[token("open")]
    Open,
    /// The `close` directive keyword.
    #[token("close")]
    Close,
    /// The `pad` directive keyword.
    #[token("pad")]
    Pad,
    /// The `event` directive keyword.
    #[token("event")]
    Event,
    /// The `price` directive keyword.
    #[token("price")]
    Price,
    /// The `note` directive keyword.
    #[token("note")]
    Note,
    /// The `document` directive keyword.
    #[token("document")]
    Document,
    /// The `pushtag` directive keyword.
    #[token("pushtag")]
    Pushtag,
    /// The `poptag` directive keyword.
    #[token("poptag")]
    Poptag,
    /// The `option` directive keyword.
    #[token("option")]
    Option_,

    // ===== Literals =====
    /// A date in `YYYY-MM-DD` form; either separator may independently be
    /// `-` or `/`.
    #[regex(r"[0-9]{4}[-/][0-9]{2}[-/][0-9]{2}")]
    Date,

    /// A number lexeme. The class is loose on purpose: the builder parses
    /// the text and rejects malformed lexemes like `1.2.3`.
    #[regex(r"[-+]?[0-9.]+")]
    Number,

    /// A double-quoted string. No escape processing, no embedded quotes.
    #[regex(r#""[^"]*""#)]
    Str,

    /// An account name like `Assets:Bank:Checking`. Anchored at one of the
    /// five root categories, with at least one capitalized component.
    #[regex(r"(Assets|Liabilities|Equity|Income|Expenses)(:[A-Z][A-Za-z0-9\-]*)+")]
    Account,

    /// A currency code like `USD` or `GOOG`: 2 to 11 characters, uppercase
    /// first.
    #[regex(r"[A-Z][A-Z0-9'.]{1,10}")]
    Currency,

    /// A tag like `#berlin-trip-2014`, including the sigil.
    #[regex(r"#[A-Za-z0-9\-_/.]+")]
    Tag,

    /// A link like `^invoice-231`, including the sigil.
    #[regex(r"\^[A-Za-z0-9\-_/.]+")]
    Link,
}
