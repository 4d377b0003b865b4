//! Directive types representing all ledger directives.
//!
//! A ledger source file is a sequence of directives, one per logical line
//! (plus indented postings for transactions):
//!
//! - [`Transaction`] - The most common directive, recording transfers between accounts
//! - [`Open`] - Open an account for use
//! - [`Close`] - Close an account
//! - [`Pad`] - Automatically pad an account towards a later check
//! - [`Check`] - Assert that an account holds a specific amount
//! - [`Price`] - Record a price for a currency
//! - [`Event`] - Record a dated event value
//! - [`Note`] - Attach a note to an account
//! - [`Document`] - Link a document file to an account

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, Position};

/// A posting within a transaction.
///
/// Postings are the individual legs of a transaction. Each posting names an
/// account and optionally a position (units plus lot) and a price. A posting
/// with no position is inferred by the downstream balancing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// The account for this posting
    pub account: String,
    /// The position (units and optional lot), if written
    pub position: Option<Position>,
    /// The price annotation (`@` or `@@`), if written
    pub price: Option<Amount>,
    /// Whether the price is a total (`@@`) rather than per-unit (`@`)
    pub price_is_total: bool,
    /// Per-posting flag, if written
    pub flag: Option<char>,
}

impl Posting {
    /// Create a posting with no position (to be inferred downstream).
    #[must_use]
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            position: None,
            price: None,
            price_is_total: false,
            flag: None,
        }
    }

    /// Set the units of this posting, without lot information.
    #[must_use]
    pub fn with_units(mut self, units: Amount) -> Self {
        self.position = Some(Position::new(units));
        self
    }

    /// Set the full position of this posting.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set a per-unit price (`@`).
    #[must_use]
    pub fn with_price(mut self, price: Amount) -> Self {
        self.price = Some(price);
        self.price_is_total = false;
        self
    }

    /// Set a total price (`@@`).
    #[must_use]
    pub fn with_total_price(mut self, price: Amount) -> Self {
        self.price = Some(price);
        self.price_is_total = true;
        self
    }

    /// Set the per-posting flag.
    #[must_use]
    pub const fn with_flag(mut self, flag: char) -> Self {
        self.flag = Some(flag);
        self
    }

    /// The units of this posting, if a position was written.
    #[must_use]
    pub fn units(&self) -> Option<&Amount> {
        self.position.as_ref().map(|p| &p.units)
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        if let Some(flag) = self.flag {
            write!(f, "{flag} ")?;
        }
        write!(f, "{}", self.account)?;
        if let Some(position) = &self.position {
            write!(f, "  {position}")?;
        }
        if let Some(price) = &self.price {
            let sigil = if self.price_is_total { "@@" } else { "@" };
            write!(f, " {sigil} {price}")?;
        }
        Ok(())
    }
}

/// All directive types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Transaction directive - records transfers between accounts
    Transaction(Transaction),
    /// Open account - opens an account for use
    Open(Open),
    /// Close account - closes an account
    Close(Close),
    /// Pad directive - auto-pad an account towards a later check
    Pad(Pad),
    /// Check directive - asserts an account holds an amount
    Check(Check),
    /// Price directive - records a currency price
    Price(Price),
    /// Event directive - records a dated event value
    Event(Event),
    /// Note directive - attaches a note to an account
    Note(Note),
    /// Document directive - links a document file to an account
    Document(Document),
}

impl Directive {
    /// Get the date of this directive.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Transaction(t) => t.date,
            Self::Open(o) => o.date,
            Self::Close(c) => c.date,
            Self::Pad(p) => p.date,
            Self::Check(c) => c.date,
            Self::Price(p) => p.date,
            Self::Event(e) => e.date,
            Self::Note(n) => n.date,
            Self::Document(d) => d.date,
        }
    }

    /// Check if this is a transaction.
    #[must_use]
    pub const fn is_transaction(&self) -> bool {
        matches!(self, Self::Transaction(_))
    }

    /// Get as a transaction, if this is one.
    #[must_use]
    pub const fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Transaction(t) => Some(t),
            _ => None,
        }
    }

    /// Get the directive type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "transaction",
            Self::Open(_) => "open",
            Self::Close(_) => "close",
            Self::Pad(_) => "pad",
            Self::Check(_) => "check",
            Self::Price(_) => "price",
            Self::Event(_) => "event",
            Self::Note(_) => "note",
            Self::Document(_) => "document",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transaction(t) => write!(f, "{t}"),
            Self::Open(o) => write!(f, "{o}"),
            Self::Close(c) => write!(f, "{c}"),
            Self::Pad(p) => write!(f, "{p}"),
            Self::Check(c) => write!(f, "{c}"),
            Self::Price(p) => write!(f, "{p}"),
            Self::Event(e) => write!(f, "{e}"),
            Self::Note(n) => write!(f, "{n}"),
            Self::Document(d) => write!(f, "{d}"),
        }
    }
}

/// A transaction directive.
///
/// Transactions record transfers between accounts. The payee is optional;
/// when both strings are written they are separated by `|` in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date
    pub date: NaiveDate,
    /// Transaction flag (`*`, `!`, ...); `txn` in the source means `*`
    pub flag: char,
    /// Payee (optional)
    pub payee: Option<String>,
    /// Narration (description)
    pub narration: String,
    /// Tags attached to this transaction
    pub tags: Vec<String>,
    /// Links attached to this transaction
    pub links: Vec<String>,
    /// Postings (account entries)
    pub postings: Vec<Posting>,
}

impl Transaction {
    /// Create a new transaction.
    #[must_use]
    pub fn new(date: NaiveDate, narration: impl Into<String>) -> Self {
        Self {
            date,
            flag: crate::flags::COMPLETE,
            payee: None,
            narration: narration.into(),
            tags: Vec::new(),
            links: Vec::new(),
            postings: Vec::new(),
        }
    }

    /// Set the flag.
    #[must_use]
    pub const fn with_flag(mut self, flag: char) -> Self {
        self.flag = flag;
        self
    }

    /// Set the payee.
    #[must_use]
    pub fn with_payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = Some(payee.into());
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a link.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.links.push(link.into());
        self
    }

    /// Add a posting.
    #[must_use]
    pub fn with_posting(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }

    /// Check if this transaction is marked as complete (`*`).
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.flag == crate::flags::COMPLETE
    }

    /// Check if this transaction is marked as pending (`!`).
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.flag == crate::flags::INCOMPLETE
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.date, self.flag)?;
        if let Some(payee) = &self.payee {
            write!(f, "\"{payee}\" | ")?;
        }
        write!(f, "\"{}\"", self.narration)?;
        for tag in &self.tags {
            write!(f, " #{tag}")?;
        }
        for link in &self.links {
            write!(f, " ^{link}")?;
        }
        for posting in &self.postings {
            write!(f, "\n{posting}")?;
        }
        Ok(())
    }
}

/// An open account directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Open {
    /// Date the account was opened
    pub date: NaiveDate,
    /// Account name (e.g., "Assets:Bank:Checking")
    pub account: String,
    /// Declared currencies (empty = any currency allowed)
    pub currencies: Vec<String>,
}

impl Open {
    /// Create a new open directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
            currencies: Vec::new(),
        }
    }

    /// Set the declared currencies.
    #[must_use]
    pub fn with_currencies(mut self, currencies: Vec<String>) -> Self {
        self.currencies = currencies;
        self
    }
}

impl fmt::Display for Open {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} open {}", self.date, self.account)?;
        if !self.currencies.is_empty() {
            write!(f, " {}", self.currencies.join(","))?;
        }
        Ok(())
    }
}

/// A close account directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Close {
    /// Date the account was closed
    pub date: NaiveDate,
    /// Account name
    pub account: String,
}

impl Close {
    /// Create a new close directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
        }
    }
}

impl fmt::Display for Close {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} close {}", self.date, self.account)
    }
}

/// A pad directive.
///
/// Directs the downstream processor to insert whatever amount is needed on
/// `account` (from `source_account`) to satisfy the next check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    /// Pad date
    pub date: NaiveDate,
    /// Account to pad
    pub account: String,
    /// Source account for the padding amount
    pub source_account: String,
}

impl Pad {
    /// Create a new pad directive.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        account: impl Into<String>,
        source_account: impl Into<String>,
    ) -> Self {
        Self {
            date,
            account: account.into(),
            source_account: source_account.into(),
        }
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pad {} {}",
            self.date, self.account, self.source_account
        )
    }
}

/// A check directive.
///
/// Asserts that an account holds the given amount at the date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Assertion date
    pub date: NaiveDate,
    /// Account to check
    pub account: String,
    /// Expected amount
    pub amount: Amount,
}

impl Check {
    /// Create a new check directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>, amount: Amount) -> Self {
        Self {
            date,
            account: account.into(),
            amount,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} check {} {}", self.date, self.account, self.amount)
    }
}

/// A price directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Price date
    pub date: NaiveDate,
    /// Currency being priced
    pub currency: String,
    /// Price amount (in another currency)
    pub amount: Amount,
}

impl Price {
    /// Create a new price directive.
    #[must_use]
    pub fn new(date: NaiveDate, currency: impl Into<String>, amount: Amount) -> Self {
        Self {
            date,
            currency: currency.into(),
            amount,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} price {} {}", self.date, self.currency, self.amount)
    }
}

/// An event directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event date
    pub date: NaiveDate,
    /// Event type (e.g., "location", "employer")
    pub event_type: String,
    /// Event description
    pub description: String,
}

impl Event {
    /// Create a new event directive.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        event_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            event_type: event_type.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} event \"{}\" \"{}\"",
            self.date, self.event_type, self.description
        )
    }
}

/// A note directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note date
    pub date: NaiveDate,
    /// Account
    pub account: String,
    /// Note text
    pub comment: String,
}

impl Note {
    /// Create a new note directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
            comment: comment.into(),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} note {} \"{}\"",
            self.date, self.account, self.comment
        )
    }
}

/// A document directive.
///
/// The path is an opaque string; the parser never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document date
    pub date: NaiveDate,
    /// Account
    pub account: String,
    /// File path of the document
    pub path: String,
}

impl Document {
    /// Create a new document directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} document {} \"{}\"",
            self.date, self.account, self.path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lot;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_transaction() {
        let txn = Transaction::new(date(2014, 2, 3), "Lamb tagine with wine")
            .with_payee("Cafe Mogador")
            .with_flag('*')
            .with_tag("food")
            .with_posting(
                Posting::new("Expenses:Restaurant").with_units(Amount::new(dec!(37.45), "USD")),
            )
            .with_posting(Posting::new("Liabilities:CreditCard"));

        assert_eq!(txn.flag, '*');
        assert_eq!(txn.payee, Some("Cafe Mogador".to_string()));
        assert_eq!(txn.postings.len(), 2);
        assert!(txn.is_complete());
        assert!(!txn.is_pending());
    }

    #[test]
    fn test_posting_price() {
        let unit = Posting::new("Assets:X")
            .with_units(Amount::new(dec!(1), "USD"))
            .with_price(Amount::new(dec!(2), "CAD"));
        assert!(!unit.price_is_total);

        let total = Posting::new("Assets:X")
            .with_units(Amount::new(dec!(1), "USD"))
            .with_total_price(Amount::new(dec!(2), "CAD"));
        assert!(total.price_is_total);
    }

    #[test]
    fn test_posting_display() {
        let posting = Posting::new("Assets:Checking").with_units(Amount::new(dec!(100.00), "USD"));
        assert_eq!(format!("{posting}"), "  Assets:Checking  100.00 USD");

        let with_lot = Posting::new("Assets:Invest")
            .with_position(
                crate::Position::new(Amount::new(dec!(10), "GOOG"))
                    .with_lot(Lot::new(Amount::new(dec!(518.73), "USD"))),
            )
            .with_total_price(Amount::new(dec!(5187.30), "USD"));
        assert_eq!(
            format!("{with_lot}"),
            "  Assets:Invest  10 GOOG {518.73 USD} @@ 5187.30 USD"
        );
    }

    #[test]
    fn test_directive_date() {
        let txn = Transaction::new(date(2014, 1, 15), "Test");
        let dir = Directive::Transaction(txn);

        assert_eq!(dir.date(), date(2014, 1, 15));
        assert!(dir.is_transaction());
        assert!(dir.as_transaction().is_some());
        assert_eq!(dir.type_name(), "transaction");
    }

    #[test]
    fn test_open_display() {
        let open = Open::new(date(2014, 1, 1), "Assets:Bank:Checking")
            .with_currencies(vec!["USD".to_string(), "EUR".to_string()]);
        assert_eq!(
            format!("{open}"),
            "2014-01-01 open Assets:Bank:Checking USD,EUR"
        );
    }

    #[test]
    fn test_check_display() {
        let check = Check::new(
            date(2014, 8, 9),
            "Assets:Cash",
            Amount::new(dec!(562.00), "USD"),
        );
        assert_eq!(format!("{check}"), "2014-08-09 check Assets:Cash 562.00 USD");
    }

    #[test]
    fn test_event_display() {
        let event = Event::new(date(2014, 7, 9), "location", "Paris, France");
        assert_eq!(
            format!("{event}"),
            "2014-07-09 event \"location\" \"Paris, France\""
        );
    }

    #[test]
    fn test_transaction_display_piped() {
        let txn = Transaction::new(date(2014, 5, 5), "Lamb tagine").with_payee("Cafe Mogador");
        assert_eq!(
            format!("{txn}"),
            "2014-05-05 * \"Cafe Mogador\" | \"Lamb tagine\""
        );
    }
}
