//! Contextual lexer.
//!
//! The raw scanner in `token.rs` only classifies lexemes; this module layers
//! the line-sensitive rules on top:
//!
//! - every raw match bumps a tokens-on-line counter, reset at each newline;
//! - a whitespace run that is the first match on its line is leading
//!   indentation, classified as [`Token::Indent`] or [`Token::Skipped`] by
//!   one byte of lookahead at the unconsumed remainder;
//! - a flag character that is the first match on its line is a heading
//!   glyph (`* Section`), and the whole line is skipped unlexed;
//! - interior whitespace is discarded without emitting anything.
//!
//! Semantic values (dates, accounts, currencies, strings, numbers, tags,
//! links) are constructed through the [`Builder`] so the same lexer serves
//! any host representation. A date or number the builder rejects degrades
//! to [`Token::Error`]; the lexer itself never fails.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::builder::Builder;
use crate::location::Location;
use crate::token::RawToken;

/// A lexical token with builder-constructed semantic values.
pub enum Token<B: Builder> {
    /// End of line.
    Eol,
    /// Leading whitespace on a line that carries content.
    Indent,
    /// A line the lexer chose to discard (blank-ish or heading).
    Skipped,
    /// A `;` comment running to the end of the line.
    Comment,
    /// `|`
    Pipe,
    /// `@@`
    AtAt,
    /// `@`
    At,
    /// `{`
    Lcurl,
    /// `}`
    Rcurl,
    /// `=`
    Equal,
    /// `,`
    Comma,
    /// `/`
    Slash,
    /// A flag character appearing after the start of the line.
    Flag(char),
    /// The `txn` keyword.
    Txn,
    /// The `check` keyword.
    Check,
    /// The `open` keyword.
    Open,
    /// The `close` keyword.
    Close,
    /// The `pad` keyword.
    Pad,
    /// The `event` keyword.
    Event,
    /// The `price` keyword.
    Price,
    /// The `note` keyword.
    Note,
    /// The `document` keyword.
    Document,
    /// The `pushtag` keyword.
    Pushtag,
    /// The `poptag` keyword.
    Poptag,
    /// The `option` keyword.
    Option_,
    /// A date value.
    Date(B::Date),
    /// An account value.
    Account(B::Account),
    /// A currency value.
    Currency(B::Currency),
    /// A string value, quotes stripped.
    Str(B::Str),
    /// A number value.
    Number(B::Number),
    /// A tag value, sigil stripped.
    Tag(B::Tag),
    /// A link value, sigil stripped.
    Link(B::Link),
    /// Unrecognized or rejected input, carrying its text.
    Error(String),
}

impl<B: Builder> Token<B> {
    /// The payload-free kind of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Eol => TokenKind::Eol,
            Self::Indent => TokenKind::Indent,
            Self::Skipped => TokenKind::Skipped,
            Self::Comment => TokenKind::Comment,
            Self::Pipe => TokenKind::Pipe,
            Self::AtAt => TokenKind::AtAt,
            Self::At => TokenKind::At,
            Self::Lcurl => TokenKind::Lcurl,
            Self::Rcurl => TokenKind::Rcurl,
            Self::Equal => TokenKind::Equal,
            Self::Comma => TokenKind::Comma,
            Self::Slash => TokenKind::Slash,
            Self::Flag(_) => TokenKind::Flag,
            Self::Txn => TokenKind::Txn,
            Self::Check => TokenKind::Check,
            Self::Open => TokenKind::Open,
            Self::Close => TokenKind::Close,
            Self::Pad => TokenKind::Pad,
            Self::Event => TokenKind::Event,
            Self::Price => TokenKind::Price,
            Self::Note => TokenKind::Note,
            Self::Document => TokenKind::Document,
            Self::Pushtag => TokenKind::Pushtag,
            Self::Poptag => TokenKind::Poptag,
            Self::Option_ => TokenKind::Option_,
            Self::Date(_) => TokenKind::Date,
            Self::Account(_) => TokenKind::Account,
            Self::Currency(_) => TokenKind::Currency,
            Self::Str(_) => TokenKind::Str,
            Self::Number(_) => TokenKind::Number,
            Self::Tag(_) => TokenKind::Tag,
            Self::Link(_) => TokenKind::Link,
            Self::Error(_) => TokenKind::Error,
        }
    }
}

impl<B: Builder> fmt::Debug for Token<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(c) => f.debug_tuple("Flag").field(c).finish(),
            Self::Date(d) => f.debug_tuple("Date").field(d).finish(),
            Self::Account(a) => f.debug_tuple("Account").field(a).finish(),
            Self::Currency(c) => f.debug_tuple("Currency").field(c).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Tag(t) => f.debug_tuple("Tag").field(t).finish(),
            Self::Link(l) => f.debug_tuple("Link").field(l).finish(),
            Self::Error(text) => f.debug_tuple("Error").field(text).finish(),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

/// Payload-free token kinds, used for dispatch and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TokenKind {
    Eol,
    Indent,
    Skipped,
    Comment,
    Pipe,
    AtAt,
    At,
    Lcurl,
    Rcurl,
    Equal,
    Comma,
    Slash,
    Flag,
    Txn,
    Check,
    Open,
    Close,
    Pad,
    Event,
    Price,
    Note,
    Document,
    Pushtag,
    Poptag,
    Option_,
    Date,
    Account,
    Currency,
    Str,
    Number,
    Tag,
    Link,
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Eol => "end of line",
            Self::Indent => "indentation",
            Self::Skipped => "skipped line",
            Self::Comment => "comment",
            Self::Pipe => "'|'",
            Self::AtAt => "'@@'",
            Self::At => "'@'",
            Self::Lcurl => "'{'",
            Self::Rcurl => "'}'",
            Self::Equal => "'='",
            Self::Comma => "','",
            Self::Slash => "'/'",
            Self::Flag => "flag",
            Self::Txn => "'txn'",
            Self::Check => "'check'",
            Self::Open => "'open'",
            Self::Close => "'close'",
            Self::Pad => "'pad'",
            Self::Event => "'event'",
            Self::Price => "'price'",
            Self::Note => "'note'",
            Self::Document => "'document'",
            Self::Pushtag => "'pushtag'",
            Self::Poptag => "'poptag'",
            Self::Option_ => "'option'",
            Self::Date => "date",
            Self::Account => "account",
            Self::Currency => "currency",
            Self::Str => "string",
            Self::Number => "number",
            Self::Tag => "tag",
            Self::Link => "link",
            Self::Error => "invalid input",
        };
        write!(f, "{name}")
    }
}

/// The contextual lexer session.
///
/// Owns the raw scanner and the per-line counters. All state is local to
/// the session, so parsing several sources only needs several sessions.
pub struct Lexer<'src> {
    raw: logos::Lexer<'src, RawToken>,
    /// Current 1-based line, before the offset.
    line: u32,
    /// Byte offset where the current line starts.
    line_start: usize,
    /// Raw matches consumed on the current line so far.
    line_tokens: u32,
    /// Added to every reported line number.
    first_line_offset: u32,
}

impl<'src> Lexer<'src> {
    /// Create a lexer over `source`.
    ///
    /// `first_line_offset` is added to every reported line number so that
    /// callers splicing included files can report lines of the including
    /// file; pass 0 for a standalone source.
    #[must_use]
    pub fn new(source: &'src str, first_line_offset: u32) -> Self {
        Self {
            raw: RawToken::lexer(source),
            line: 1,
            line_start: 0,
            line_tokens: 0,
            first_line_offset,
        }
    }

    /// The line number the lexer is currently on, offset included.
    #[must_use]
    pub const fn current_line(&self) -> u32 {
        self.line + self.first_line_offset
    }

    fn location(&self, span: &Range<usize>) -> Location {
        let line = self.current_line();
        let column = (span.start - self.line_start) as u32 + 1;
        Location::new(line, column, line, column + span.len() as u32)
    }

    /// Produce the next token, constructing semantic values through
    /// `builder`. Returns `None` at end of input.
    pub fn next_token<B: Builder>(
        &mut self,
        builder: &mut B,
    ) -> Option<(Token<B>, Location)> {
        loop {
            let raw = self.raw.next()?;
            let span = self.raw.span();
            self.line_tokens += 1;
            let loc = self.location(&span);

            let token = match raw {
                Ok(RawToken::Whitespace) => {
                    if self.line_tokens == 1 {
                        // Leading indentation: one byte of lookahead decides
                        // whether the line carries content.
                        match self.raw.remainder().as_bytes().first().copied() {
                            None | Some(b'\n' | b'\r' | b'\0' | b';') => Token::Skipped,
                            Some(_) => Token::Indent,
                        }
                    } else {
                        continue;
                    }
                }
                Ok(RawToken::Newline) => {
                    self.line += 1;
                    self.line_tokens = 0;
                    self.line_start = span.end;
                    Token::Eol
                }
                Ok(RawToken::Flag) => {
                    if self.line_tokens == 1 {
                        // Heading glyph at the start of a line: discard the
                        // rest of the line without lexing it.
                        let rest = self.raw.remainder();
                        let cut = rest.find('\n').unwrap_or(rest.len());
                        self.raw.bump(cut);
                        Token::Skipped
                    } else {
                        Token::Flag(self.raw.slice().as_bytes()[0] as char)
                    }
                }
                Ok(RawToken::Comment) => Token::Comment,
                Ok(RawToken::Pipe) => Token::Pipe,
                Ok(RawToken::AtAt) => Token::AtAt,
                Ok(RawToken::At) => Token::At,
                Ok(RawToken::Lcurl) => Token::Lcurl,
                Ok(RawToken::Rcurl) => Token::Rcurl,
                Ok(RawToken::Equal) => Token::Equal,
                Ok(RawToken::Comma) => Token::Comma,
                Ok(RawToken::Slash) => Token::Slash,
                Ok(RawToken::Txn) => Token::Txn,
                Ok(RawToken::Check) => Token::Check,
                Ok(RawToken::Open) => Token::Open,
                Ok(RawToken::Close) => Token::Close,
                Ok(RawToken::Pad) => Token::Pad,
                Ok(RawToken::Event) => Token::Event,
                Ok(RawToken::Price) => Token::Price,
                Ok(RawToken::Note) => Token::Note,
                Ok(RawToken::Document) => Token::Document,
                Ok(RawToken::Pushtag) => Token::Pushtag,
                Ok(RawToken::Poptag) => Token::Poptag,
                Ok(RawToken::Option_) => Token::Option_,
                Ok(RawToken::Date) => self.date_token(&mut *builder),
                Ok(RawToken::Number) => {
                    let text = self.raw.slice();
                    match builder.number(text) {
                        Some(number) => Token::Number(number),
                        None => Token::Error(text.to_string()),
                    }
                }
                Ok(RawToken::Str) => {
                    let text = self.raw.slice();
                    Token::Str(builder.string(&text[1..text.len() - 1]))
                }
                Ok(RawToken::Account) => Token::Account(builder.account(self.raw.slice())),
                Ok(RawToken::Currency) => Token::Currency(builder.currency(self.raw.slice())),
                Ok(RawToken::Tag) => Token::Tag(builder.tag(&self.raw.slice()[1..])),
                Ok(RawToken::Link) => Token::Link(builder.link(&self.raw.slice()[1..])),
                Err(()) => Token::Error(self.raw.slice().to_string()),
            };
            return Some((token, loc));
        }
    }

    /// The date fields sit at fixed lexeme offsets; the separators at 4 and
    /// 7 were already checked by the pattern.
    fn date_token<B: Builder>(&mut self, builder: &mut B) -> Token<B> {
        let text = self.raw.slice();
        let fields = (
            text[0..4].parse::<i32>(),
            text[5..7].parse::<u32>(),
            text[8..10].parse::<u32>(),
        );
        if let (Ok(year), Ok(month), Ok(day)) = fields {
            if let Some(date) = builder.date(year, month, day) {
                return Token::Date(date);
            }
        }
        Token::Error(text.to_string())
    }
}
