//! The grammar driver.
//!
//! A shift-style walk over the lexer's token stream with a single token of
//! lookahead (a pushback slot). Each grammar production is a method;
//! reductions are expressed as calls into the [`Builder`], so the driver
//! itself owns nothing but the lookahead.
//!
//! Error handling follows the recovery contract of the grammar: on a syntax
//! error the builder's `error` hook is called exactly once, tokens are
//! discarded through the next end-of-line, and the walk resumes at
//! declaration level. Every declaration begins with a date or a keyword
//! that only appears at declaration start, so resynchronization is
//! unambiguous. A trailing comment is always consumed together with the
//! line it ends.

use crate::builder::Builder;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::location::Location;

/// An internal syntax-error event, reported through the builder at the
/// recovery point.
struct Syntax {
    message: String,
    line: u32,
}

type Parse<T> = Result<T, Syntax>;

/// Outcome of one declaration.
enum Decl<E> {
    /// A directive record was produced.
    Entry(E),
    /// A blank, skipped, or side-effect-only line.
    Empty,
    /// End of input.
    End,
}

/// A parse session over one source.
///
/// The session drives the lexer on demand and hands every constructed
/// value to the builder; dropping the session between files leaves no
/// shared state behind.
pub struct Parser<'src, 'b, B: Builder> {
    lexer: Lexer<'src>,
    builder: &'b mut B,
    filename: &'src str,
    peeked: Option<Option<(Token<B>, Location)>>,
}

impl<'src, 'b, B: Builder> Parser<'src, 'b, B> {
    /// Create a session over `source`.
    ///
    /// `filename` is only used for reporting; `first_line_offset` is added
    /// to every reported line number.
    pub fn new(
        source: &'src str,
        filename: &'src str,
        first_line_offset: u32,
        builder: &'b mut B,
    ) -> Self {
        Self {
            lexer: Lexer::new(source, first_line_offset),
            builder,
            filename,
            peeked: None,
        }
    }

    /// Parse the whole source.
    ///
    /// Ends with exactly one `store_result` call on the builder carrying
    /// the declarations in source order; errors have already been reported
    /// through the `error` hook by then.
    pub fn run(mut self) {
        let mut entries = Vec::new();
        loop {
            match self.declaration() {
                Ok(Decl::Entry(entry)) => entries.push(entry),
                Ok(Decl::Empty) => {}
                Ok(Decl::End) => break,
                Err(err) => {
                    self.builder.error(&err.message, self.filename, err.line);
                    self.recover();
                }
            }
        }
        self.builder.store_result(entries);
    }

    // ===== Token plumbing =====

    fn advance(&mut self) -> Option<(Token<B>, Location)> {
        match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token(&mut *self.builder),
        }
    }

    fn push_back(&mut self, token: Option<(Token<B>, Location)>) {
        self.peeked = Some(token);
    }

    /// Consume a payload-free token of the given kind, if it is next.
    fn eat(&mut self, kind: TokenKind) -> bool {
        let token = self.advance();
        if matches!(&token, Some((t, _)) if t.kind() == kind) {
            true
        } else {
            self.push_back(token);
            false
        }
    }

    /// Require a payload-free token of the given kind.
    fn expect(&mut self, kind: TokenKind) -> Parse<()> {
        let token = self.advance();
        if matches!(&token, Some((t, _)) if t.kind() == kind) {
            Ok(())
        } else {
            Err(self.expected(&kind.to_string(), token))
        }
    }

    /// Build a syntax error for an unexpected token and push it back so
    /// recovery sees it.
    fn expected(&mut self, what: &str, got: Option<(Token<B>, Location)>) -> Syntax {
        let (found, line) = match &got {
            Some((Token::Error(text), loc)) => {
                (format!("invalid input '{text}'"), loc.first_line)
            }
            Some((token, loc)) => (token.kind().to_string(), loc.first_line),
            None => ("end of input".to_string(), self.lexer.current_line()),
        };
        self.push_back(got);
        Syntax {
            message: format!("expected {what}, found {found}"),
            line,
        }
    }

    /// Discard tokens through the next end-of-line.
    fn recover(&mut self) {
        loop {
            match self.advance() {
                None | Some((Token::Eol, _)) => break,
                Some(_) => {}
            }
        }
    }

    // ===== Terminal helpers =====

    fn eat_flag(&mut self) -> Option<char> {
        match self.advance() {
            Some((Token::Flag(c), _)) => Some(c),
            other => {
                self.push_back(other);
                None
            }
        }
    }

    fn eat_tag(&mut self) -> Option<B::Tag> {
        match self.advance() {
            Some((Token::Tag(tag), _)) => Some(tag),
            other => {
                self.push_back(other);
                None
            }
        }
    }

    fn eat_link(&mut self) -> Option<B::Link> {
        match self.advance() {
            Some((Token::Link(link), _)) => Some(link),
            other => {
                self.push_back(other);
                None
            }
        }
    }

    fn eat_number(&mut self) -> Option<B::Number> {
        match self.advance() {
            Some((Token::Number(number), _)) => Some(number),
            other => {
                self.push_back(other);
                None
            }
        }
    }

    fn eat_currency(&mut self) -> Option<B::Currency> {
        match self.advance() {
            Some((Token::Currency(currency), _)) => Some(currency),
            other => {
                self.push_back(other);
                None
            }
        }
    }

    fn expect_account(&mut self) -> Parse<B::Account> {
        match self.advance() {
            Some((Token::Account(account), _)) => Ok(account),
            other => Err(self.expected("an account name", other)),
        }
    }

    fn expect_currency(&mut self) -> Parse<B::Currency> {
        match self.advance() {
            Some((Token::Currency(currency), _)) => Ok(currency),
            other => Err(self.expected("a currency", other)),
        }
    }

    fn expect_number(&mut self) -> Parse<B::Number> {
        match self.advance() {
            Some((Token::Number(number), _)) => Ok(number),
            other => Err(self.expected("a number", other)),
        }
    }

    fn expect_string(&mut self) -> Parse<B::Str> {
        match self.advance() {
            Some((Token::Str(string), _)) => Ok(string),
            other => Err(self.expected("a quoted string", other)),
        }
    }

    fn expect_tag(&mut self) -> Parse<B::Tag> {
        match self.advance() {
            Some((Token::Tag(tag), _)) => Ok(tag),
            other => Err(self.expected("a tag", other)),
        }
    }

    fn expect_date(&mut self) -> Parse<B::Date> {
        match self.advance() {
            Some((Token::Date(date), _)) => Ok(date),
            other => Err(self.expected("a date", other)),
        }
    }

    /// The line terminator: end of line, a trailing comment followed by end
    /// of line, or end of input.
    fn eol(&mut self) -> Parse<()> {
        match self.advance() {
            None | Some((Token::Eol, _)) => Ok(()),
            Some((Token::Comment, _)) => match self.advance() {
                None | Some((Token::Eol, _)) => Ok(()),
                other => Err(self.expected("end of line", other)),
            },
            other => Err(self.expected("end of line", other)),
        }
    }

    // ===== Productions =====

    fn declaration(&mut self) -> Parse<Decl<B::Entry>> {
        match self.advance() {
            None => Ok(Decl::End),
            Some((Token::Eol | Token::Skipped, _)) => Ok(Decl::Empty),
            Some((Token::Comment, _)) => {
                self.eat(TokenKind::Eol);
                Ok(Decl::Empty)
            }
            Some((Token::Indent, _)) => {
                // An indented line outside a transaction: blank is fine,
                // content (an orphaned posting) is not.
                match self.advance() {
                    None | Some((Token::Eol, _)) => Ok(Decl::Empty),
                    other => Err(self.expected("end of line", other)),
                }
            }
            Some((Token::Pushtag, _)) => {
                let tag = self.expect_tag()?;
                self.eol()?;
                self.builder.pushtag(tag);
                Ok(Decl::Empty)
            }
            Some((Token::Poptag, _)) => {
                let tag = self.expect_tag()?;
                self.eol()?;
                self.builder.poptag(tag);
                Ok(Decl::Empty)
            }
            Some((Token::Option_, _)) => {
                let name = self.expect_string()?;
                let value = self.expect_string()?;
                self.eol()?;
                self.builder.option(name, value);
                Ok(Decl::Empty)
            }
            Some((Token::Date(date), loc)) => {
                self.entry(date, loc.first_line).map(Decl::Entry)
            }
            other => Err(self.expected(
                "a date, 'pushtag', 'poptag', or 'option'",
                other,
            )),
        }
    }

    fn entry(&mut self, date: B::Date, line: u32) -> Parse<B::Entry> {
        match self.advance() {
            Some((Token::Txn, _)) => self.transaction(date, line, tallybook_core::flags::COMPLETE),
            Some((Token::Flag(flag), _)) => self.transaction(date, line, flag),
            Some((Token::Open, _)) => self.open(date, line),
            Some((Token::Close, _)) => {
                let account = self.expect_account()?;
                self.eol()?;
                Ok(self.builder.close(self.filename, line, date, account))
            }
            Some((Token::Pad, _)) => {
                let account = self.expect_account()?;
                let source_account = self.expect_account()?;
                self.eol()?;
                Ok(self
                    .builder
                    .pad(self.filename, line, date, account, source_account))
            }
            Some((Token::Check, _)) => {
                let account = self.expect_account()?;
                let amount = self.amount()?;
                self.eol()?;
                Ok(self
                    .builder
                    .check(self.filename, line, date, account, amount))
            }
            Some((Token::Price, _)) => {
                let currency = self.expect_currency()?;
                let amount = self.amount()?;
                self.eol()?;
                Ok(self
                    .builder
                    .price(self.filename, line, date, currency, amount))
            }
            Some((Token::Event, _)) => {
                let event_type = self.expect_string()?;
                let description = self.expect_string()?;
                self.eol()?;
                Ok(self
                    .builder
                    .event(self.filename, line, date, event_type, description))
            }
            Some((Token::Note, _)) => {
                let account = self.expect_account()?;
                let comment = self.expect_string()?;
                self.eol()?;
                Ok(self
                    .builder
                    .note(self.filename, line, date, account, comment))
            }
            Some((Token::Document, _)) => {
                let account = self.expect_account()?;
                let path = self.expect_string()?;
                self.eol()?;
                Ok(self
                    .builder
                    .document(self.filename, line, date, account, path))
            }
            other => Err(self.expected("a directive keyword or transaction flag", other)),
        }
    }

    fn transaction(&mut self, date: B::Date, line: u32, flag: char) -> Parse<B::Entry> {
        let first = self.expect_string()?;
        let (payee, narration) = if self.eat(TokenKind::Pipe) {
            (Some(first), self.expect_string()?)
        } else {
            (None, first)
        };

        let mut tags = Vec::new();
        while let Some(tag) = self.eat_tag() {
            tags.push(tag);
        }
        let mut links = Vec::new();
        while let Some(link) = self.eat_link() {
            links.push(link);
        }
        self.eol()?;

        let mut postings = Vec::new();
        while self.eat(TokenKind::Indent) {
            match self.posting() {
                Ok(posting) => postings.push(posting),
                Err(err) => {
                    // A bad posting line loses only itself; the transaction
                    // keeps the postings that parsed.
                    self.builder.error(&err.message, self.filename, err.line);
                    self.recover();
                }
            }
        }

        Ok(self.builder.transaction(
            self.filename,
            line,
            date,
            flag,
            payee,
            narration,
            tags,
            links,
            postings,
        ))
    }

    fn posting(&mut self) -> Parse<B::Posting> {
        let flag = self.eat_flag();
        let account = self.expect_account()?;

        let position = match self.eat_number() {
            Some(number) => {
                let currency = self.expect_currency()?;
                let units = self.builder.amount(number, currency);
                let lot = if self.eat(TokenKind::Lcurl) {
                    let cost = self.amount()?;
                    let date = if self.eat(TokenKind::Slash) {
                        Some(self.expect_date()?)
                    } else {
                        None
                    };
                    self.expect(TokenKind::Rcurl)?;
                    Some(self.builder.lot(cost, date))
                } else {
                    None
                };
                Some(self.builder.position(units, lot))
            }
            None => None,
        };

        // A price annotation is only grammatical after a position.
        let (price, price_is_total) = if position.is_some() {
            if self.eat(TokenKind::At) {
                (Some(self.amount()?), false)
            } else if self.eat(TokenKind::AtAt) {
                (Some(self.amount()?), true)
            } else {
                (None, false)
            }
        } else {
            (None, false)
        };

        self.eol()?;
        Ok(self
            .builder
            .posting(account, position, price, price_is_total, flag))
    }

    fn open(&mut self, date: B::Date, line: u32) -> Parse<B::Entry> {
        let account = self.expect_account()?;
        let mut currencies = Vec::new();
        if let Some(currency) = self.eat_currency() {
            currencies.push(currency);
            while self.eat(TokenKind::Comma) {
                currencies.push(self.expect_currency()?);
            }
        }
        self.eol()?;
        Ok(self
            .builder
            .open(self.filename, line, date, account, currencies))
    }

    fn amount(&mut self) -> Parse<B::Amount> {
        let number = self.expect_number()?;
        let currency = self.expect_currency()?;
        Ok(self.builder.amount(number, currency))
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn test_empty_source() {
        let result = parse("");
        assert!(result.directives.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_blank_and_comment_lines_only() {
        let result = parse("\n\n; a comment\n   \n");
        assert!(result.directives.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_heading_lines_are_ignored() {
        let result = parse("* Personal ledger\n** 2014\n");
        assert!(result.directives.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_option_collected() {
        let result = parse("option \"title\" \"My Ledger\"\n");
        assert!(result.errors.is_empty());
        assert_eq!(
            result.options,
            vec![("title".to_string(), "My Ledger".to_string())]
        );
    }

    #[test]
    fn test_trailing_comment_consumed_with_line() {
        let result = parse("2014-01-01 close Assets:Cash ; done with this one\n");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.directives.len(), 1);
    }

    #[test]
    fn test_missing_final_newline() {
        let result = parse("2014-01-01 close Assets:Cash");
        assert!(result.errors.is_empty());
        assert_eq!(result.directives.len(), 1);
    }

    #[test]
    fn test_orphaned_posting_is_an_error() {
        let result = parse("  Assets:Cash  100.00 USD\n");
        assert_eq!(result.errors.len(), 1);
        assert!(result.directives.is_empty());
    }

    #[test]
    fn test_error_line_number() {
        let result = parse("2014-01-01 close Assets:Cash\nnonsense\n2014-01-02 close Assets:Two\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 2);
        assert_eq!(result.directives.len(), 2);
    }
}
