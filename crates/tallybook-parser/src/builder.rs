//! The builder interface.
//!
//! The lexer and the grammar driver never materialize host-side values
//! themselves: every semantic value and every directive record is
//! constructed through a [`Builder`] supplied by the caller. The driver
//! only concatenates and forwards, so the same parsing core serves any
//! host representation.
//!
//! [`LedgerBuilder`] is the default implementation, producing the
//! `tallybook-core` record types.

use std::fmt::Debug;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tallybook_core::{
    Amount, Check, Close, Directive, Document, Event, Lot, Note, Open, Pad, Position, Posting,
    Price, Transaction,
};

use crate::error::ParseError;
use crate::location::Located;

/// Construction callbacks invoked by the lexer and the grammar driver.
///
/// The methods fall into three groups:
///
/// - **value constructors**, called by the lexer with text slices (and for
///   dates, the three parsed fields). `date` and `number` may reject their
///   input, in which case the lexer emits an error token;
/// - **aggregate constructors**, called by the driver as productions
///   reduce. Every directive constructor receives `(filename, line)` as its
///   first two arguments;
/// - **side-effecting hooks**: `pushtag`/`poptag` mutate the tag stack,
///   `option` records an option, `error` reports a syntax error, and
///   `store_result` receives the final declaration list exactly once per
///   parse.
pub trait Builder {
    /// A calendar date.
    type Date: Debug;
    /// An account name.
    type Account: Debug;
    /// A currency code.
    type Currency: Debug;
    /// A quoted-string value.
    type Str: Debug;
    /// A decimal number.
    type Number: Debug;
    /// A tag (without the `#` sigil).
    type Tag: Debug;
    /// A link (without the `^` sigil).
    type Link: Debug;
    /// A number/currency pair.
    type Amount: Debug;
    /// Lot information in braces.
    type Lot: Debug;
    /// Units plus optional lot.
    type Position: Debug;
    /// One leg of a transaction.
    type Posting: Debug;
    /// A finished directive record.
    type Entry: Debug;

    /// Construct a date, or reject it (e.g. month 13).
    fn date(&mut self, year: i32, month: u32, day: u32) -> Option<Self::Date>;
    /// Construct an account from its full text.
    fn account(&mut self, text: &str) -> Self::Account;
    /// Construct a currency from its text.
    fn currency(&mut self, text: &str) -> Self::Currency;
    /// Construct a string from the text between the quotes.
    fn string(&mut self, text: &str) -> Self::Str;
    /// Construct a number from its verbatim lexeme, or reject it.
    fn number(&mut self, text: &str) -> Option<Self::Number>;
    /// Construct a tag from its text, sigil already stripped.
    fn tag(&mut self, text: &str) -> Self::Tag;
    /// Construct a link from its text, sigil already stripped.
    fn link(&mut self, text: &str) -> Self::Link;

    /// Construct an amount from a number and a currency.
    fn amount(&mut self, number: Self::Number, currency: Self::Currency) -> Self::Amount;
    /// Construct lot information from a cost and an optional date.
    fn lot(&mut self, cost: Self::Amount, date: Option<Self::Date>) -> Self::Lot;
    /// Construct a position from units and an optional lot.
    fn position(&mut self, units: Self::Amount, lot: Option<Self::Lot>) -> Self::Position;
    /// Construct a posting. `price_is_total` is true for `@@` prices.
    fn posting(
        &mut self,
        account: Self::Account,
        position: Option<Self::Position>,
        price: Option<Self::Amount>,
        price_is_total: bool,
        flag: Option<char>,
    ) -> Self::Posting;

    /// Construct a transaction directive. In the unpiped form `payee` is
    /// `None` and the single string is the narration.
    #[allow(clippy::too_many_arguments)]
    fn transaction(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        flag: char,
        payee: Option<Self::Str>,
        narration: Self::Str,
        tags: Vec<Self::Tag>,
        links: Vec<Self::Link>,
        postings: Vec<Self::Posting>,
    ) -> Self::Entry;
    /// Construct an open directive.
    fn open(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        account: Self::Account,
        currencies: Vec<Self::Currency>,
    ) -> Self::Entry;
    /// Construct a close directive.
    fn close(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        account: Self::Account,
    ) -> Self::Entry;
    /// Construct a pad directive.
    fn pad(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        account: Self::Account,
        source_account: Self::Account,
    ) -> Self::Entry;
    /// Construct a check directive.
    fn check(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        account: Self::Account,
        amount: Self::Amount,
    ) -> Self::Entry;
    /// Construct a price directive.
    fn price(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        currency: Self::Currency,
        amount: Self::Amount,
    ) -> Self::Entry;
    /// Construct an event directive.
    fn event(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        event_type: Self::Str,
        description: Self::Str,
    ) -> Self::Entry;
    /// Construct a note directive.
    fn note(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        account: Self::Account,
        comment: Self::Str,
    ) -> Self::Entry;
    /// Construct a document directive. The path stays opaque; the parser
    /// never touches the filesystem.
    fn document(
        &mut self,
        filename: &str,
        line: u32,
        date: Self::Date,
        account: Self::Account,
        path: Self::Str,
    ) -> Self::Entry;

    /// Push a tag onto the tag stack.
    fn pushtag(&mut self, tag: Self::Tag);
    /// Pop a tag from the tag stack.
    fn poptag(&mut self, tag: Self::Tag);
    /// Record an `option "name" "value"` directive.
    fn option(&mut self, name: Self::Str, value: Self::Str);
    /// Report a syntax error. Called once per error event.
    fn error(&mut self, message: &str, filename: &str, line: u32);
    /// Receive the final declaration list. Called once per parse.
    fn store_result(&mut self, entries: Vec<Self::Entry>);
}

/// The default builder, producing `tallybook-core` records.
///
/// Tags pushed with `pushtag` are added to every transaction constructed
/// while they remain on the stack, matching the source-order semantics of
/// the directive stream.
#[derive(Debug, Default)]
pub struct LedgerBuilder {
    tag_stack: Vec<String>,
    options: Vec<(String, String)>,
    errors: Vec<ParseError>,
    result: Vec<Located<Directive>>,
}

impl LedgerBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags currently on the stack, in push order.
    #[must_use]
    pub fn pushed_tags(&self) -> &[String] {
        &self.tag_stack
    }

    /// Consume the builder, producing the parse result.
    #[must_use]
    pub fn finish(self) -> crate::ParseResult {
        crate::ParseResult {
            directives: self.result,
            options: self.options,
            errors: self.errors,
        }
    }
}

impl Builder for LedgerBuilder {
    type Date = NaiveDate;
    type Account = String;
    type Currency = String;
    type Str = String;
    type Number = Decimal;
    type Tag = String;
    type Link = String;
    type Amount = Amount;
    type Lot = Lot;
    type Position = Position;
    type Posting = Posting;
    type Entry = Located<Directive>;

    fn date(&mut self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn account(&mut self, text: &str) -> String {
        text.to_string()
    }

    fn currency(&mut self, text: &str) -> String {
        text.to_string()
    }

    fn string(&mut self, text: &str) -> String {
        text.to_string()
    }

    fn number(&mut self, text: &str) -> Option<Decimal> {
        Decimal::from_str(text).ok()
    }

    fn tag(&mut self, text: &str) -> String {
        text.to_string()
    }

    fn link(&mut self, text: &str) -> String {
        text.to_string()
    }

    fn amount(&mut self, number: Decimal, currency: String) -> Amount {
        Amount::new(number, currency)
    }

    fn lot(&mut self, cost: Amount, date: Option<NaiveDate>) -> Lot {
        Lot { cost, date }
    }

    fn position(&mut self, units: Amount, lot: Option<Lot>) -> Position {
        Position { units, lot }
    }

    fn posting(
        &mut self,
        account: String,
        position: Option<Position>,
        price: Option<Amount>,
        price_is_total: bool,
        flag: Option<char>,
    ) -> Posting {
        Posting {
            account,
            position,
            price,
            price_is_total,
            flag,
        }
    }

    fn transaction(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        flag: char,
        payee: Option<String>,
        narration: String,
        mut tags: Vec<String>,
        links: Vec<String>,
        postings: Vec<Posting>,
    ) -> Located<Directive> {
        for tag in &self.tag_stack {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        let txn = Transaction {
            date,
            flag,
            payee,
            narration,
            tags,
            links,
            postings,
        };
        Located::new(Directive::Transaction(txn), line)
    }

    fn open(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        account: String,
        currencies: Vec<String>,
    ) -> Located<Directive> {
        Located::new(
            Directive::Open(Open::new(date, account).with_currencies(currencies)),
            line,
        )
    }

    fn close(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        account: String,
    ) -> Located<Directive> {
        Located::new(Directive::Close(Close::new(date, account)), line)
    }

    fn pad(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        account: String,
        source_account: String,
    ) -> Located<Directive> {
        Located::new(Directive::Pad(Pad::new(date, account, source_account)), line)
    }

    fn check(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        account: String,
        amount: Amount,
    ) -> Located<Directive> {
        Located::new(Directive::Check(Check::new(date, account, amount)), line)
    }

    fn price(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        currency: String,
        amount: Amount,
    ) -> Located<Directive> {
        Located::new(Directive::Price(Price::new(date, currency, amount)), line)
    }

    fn event(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        event_type: String,
        description: String,
    ) -> Located<Directive> {
        Located::new(
            Directive::Event(Event::new(date, event_type, description)),
            line,
        )
    }

    fn note(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        account: String,
        comment: String,
    ) -> Located<Directive> {
        Located::new(Directive::Note(Note::new(date, account, comment)), line)
    }

    fn document(
        &mut self,
        _filename: &str,
        line: u32,
        date: NaiveDate,
        account: String,
        path: String,
    ) -> Located<Directive> {
        Located::new(Directive::Document(Document::new(date, account, path)), line)
    }

    fn pushtag(&mut self, tag: String) {
        self.tag_stack.push(tag);
    }

    fn poptag(&mut self, tag: String) {
        // Popping a tag that was never pushed is ignored; the stack must
        // still match for the tags that were.
        if let Some(index) = self.tag_stack.iter().rposition(|t| t == &tag) {
            self.tag_stack.remove(index);
        }
    }

    fn option(&mut self, name: String, value: String) {
        self.options.push((name, value));
    }

    fn error(&mut self, message: &str, filename: &str, line: u32) {
        self.errors.push(ParseError::new(message, filename, line));
    }

    fn store_result(&mut self, entries: Vec<Located<Directive>>) {
        self.result = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(builder: &mut LedgerBuilder, text: &str) -> String {
        Builder::tag(builder, text)
    }

    #[test]
    fn test_push_and_pop() {
        let mut builder = LedgerBuilder::new();
        let trip = tag(&mut builder, "trip");
        builder.pushtag(trip);
        assert_eq!(builder.pushed_tags(), ["trip"]);
        let trip = tag(&mut builder, "trip");
        builder.poptag(trip);
        assert!(builder.pushed_tags().is_empty());
        assert!(builder.errors.is_empty());
    }

    #[test]
    fn test_pop_absent_tag_is_ignored() {
        let mut builder = LedgerBuilder::new();
        let missing = tag(&mut builder, "missing");
        builder.poptag(missing);
        assert!(builder.errors.is_empty());
        assert!(builder.pushed_tags().is_empty());
    }

    #[test]
    fn test_pop_removes_most_recent_duplicate() {
        let mut builder = LedgerBuilder::new();
        for text in ["a", "b", "a"] {
            let t = tag(&mut builder, text);
            builder.pushtag(t);
        }
        let a = tag(&mut builder, "a");
        builder.poptag(a);
        assert_eq!(builder.pushed_tags(), ["a", "b"]);
    }

    #[test]
    fn test_pushed_tags_applied_to_transaction() {
        let mut builder = LedgerBuilder::new();
        let trip = tag(&mut builder, "trip");
        builder.pushtag(trip);
        let date = Builder::date(&mut builder, 2014, 1, 1).unwrap();
        let narration = Builder::string(&mut builder, "x");
        let entry = builder.transaction(
            "test.ledger",
            1,
            date,
            '*',
            None,
            narration,
            vec!["explicit".to_string()],
            Vec::new(),
            Vec::new(),
        );
        let txn = entry.value.as_transaction().unwrap().clone();
        assert_eq!(txn.tags, vec!["explicit", "trip"]);
    }

    #[test]
    fn test_pushed_tag_not_duplicated() {
        let mut builder = LedgerBuilder::new();
        let trip = tag(&mut builder, "trip");
        builder.pushtag(trip);
        let date = Builder::date(&mut builder, 2014, 1, 1).unwrap();
        let narration = Builder::string(&mut builder, "x");
        let entry = builder.transaction(
            "test.ledger",
            1,
            date,
            '*',
            None,
            narration,
            vec!["trip".to_string()],
            Vec::new(),
            Vec::new(),
        );
        let txn = entry.value.as_transaction().unwrap().clone();
        assert_eq!(txn.tags, vec!["trip"]);
    }
}
