//! Core types for tallybook
//!
//! This crate provides the record types that the tallybook parser produces:
//!
//! - [`Amount`] - A decimal number with a currency
//! - [`Lot`] - Acquisition cost of a position, optionally dated
//! - [`Position`] - Units held at an optional lot
//! - [`Posting`] - One leg of a transaction
//! - [`Directive`] - All directive types (Transaction, Open, Check, etc.)
//!
//! # Example
//!
//! ```
//! use tallybook_core::{Amount, Directive, Posting, Transaction};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2014, 2, 3).unwrap();
//! let txn = Transaction::new(date, "Lamb tagine with wine")
//!     .with_payee("Cafe Mogador")
//!     .with_posting(Posting::new("Liabilities:CreditCard").with_units(Amount::new(dec!(-37.45), "USD")))
//!     .with_posting(Posting::new("Expenses:Restaurant"));
//!
//! let directive = Directive::Transaction(txn);
//! assert_eq!(directive.type_name(), "transaction");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod directive;
pub mod flags;
pub mod position;

pub use amount::Amount;
pub use directive::{
    Check, Close, Directive, Document, Event, Note, Open, Pad, Posting, Price, Transaction,
};
pub use position::{Lot, Position};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
