//! Positions and lots.
//!
//! A [`Position`] is the units of a posting together with the optional lot
//! information written in braces after the units, e.g.
//! `10 GOOG {518.73 USD / 2014-05-01}`. The [`Lot`] carries the per-unit
//! acquisition cost and an optional acquisition date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Amount;

/// The cost attached to a position, optionally dated.
///
/// # Examples
///
/// ```
/// use tallybook_core::{Amount, Lot};
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let lot = Lot::new(Amount::new(dec!(518.73), "USD"))
///     .with_date(NaiveDate::from_ymd_opt(2014, 5, 1).unwrap());
/// assert_eq!(format!("{lot}"), "{518.73 USD / 2014-05-01}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Per-unit acquisition cost
    pub cost: Amount,
    /// Acquisition date, when written as `{cost / date}`
    pub date: Option<NaiveDate>,
}

impl Lot {
    /// Create a new lot with the given cost.
    #[must_use]
    pub const fn new(cost: Amount) -> Self {
        Self { cost, date: None }
    }

    /// Add an acquisition date to this lot.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.cost)?;
        if let Some(date) = self.date {
            write!(f, " / {date}")?;
        }
        write!(f, "}}")
    }
}

/// Units held at an optional lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// The units of the position
    pub units: Amount,
    /// Lot information, when written in braces after the units
    pub lot: Option<Lot>,
}

impl Position {
    /// Create a simple position without lot information.
    #[must_use]
    pub const fn new(units: Amount) -> Self {
        Self { units, lot: None }
    }

    /// Attach lot information to this position.
    #[must_use]
    pub fn with_lot(mut self, lot: Lot) -> Self {
        self.lot = Some(lot);
        self
    }

    /// The currency of the units.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.units.currency
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.units)?;
        if let Some(lot) = &self.lot {
            write!(f, " {lot}")?;
        }
        Ok(())
    }
}
