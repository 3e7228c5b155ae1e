//! Unit normalization at the interface boundary
//!
//! Everything inside the engine is exact decimal dollars ([`Money`]) and
//! fractional rates ([`Rate`]). Wire records carry [`Dollars`],
//! [`Thousands`] and [`Percent`] so that every value is tagged with its unit
//! and converted exactly once.

use crate::error::{DealError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// All currency amounts, in dollars
pub type Money = Decimal;

/// Months per year, used for every annual <-> monthly conversion
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

const ONE_HUNDRED: Decimal = dec!(100);
const ONE_THOUSAND: Decimal = dec!(1000);

/// Lossy view of a decimal for ratio metrics and log lines
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// A rate held as a fraction (0.05 = 5%)
///
/// The only way in from a 0-100 value is [`Rate::from_percent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// Convert a 0-100 percentage
    pub fn from_percent(percent: Decimal) -> Self {
        Rate(percent / ONE_HUNDRED)
    }

    /// Wrap a value that is already a fraction
    pub fn from_fraction(fraction: Decimal) -> Self {
        Rate(fraction)
    }

    pub fn fraction(self) -> Decimal {
        self.0
    }

    pub fn as_percent(self) -> Decimal {
        self.0 * ONE_HUNDRED
    }

    /// Monthly rate for an annual nominal rate
    pub fn monthly(self) -> Decimal {
        self.0 / MONTHS_PER_YEAR
    }

    /// Apply the rate to an amount
    pub fn of(self, amount: Money) -> Money {
        self.0 * amount
    }

    /// 1 - rate
    pub fn complement(self) -> Rate {
        Rate(Decimal::ONE - self.0)
    }
}

impl Add for Rate {
    type Output = Rate;

    fn add(self, rhs: Rate) -> Rate {
        Rate(self.0 + rhs.0)
    }
}

/// Wire value expressed as a 0-100 percentage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub Decimal);

impl Percent {
    pub fn to_rate(self) -> Rate {
        Rate::from_percent(self.0)
    }
}

/// Wire currency value in raw dollars
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dollars(pub Money);

impl Dollars {
    pub fn to_dollars(self) -> Money {
        self.0
    }
}

/// Wire currency value in thousands of dollars
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thousands(pub Money);

impl Thousands {
    /// Saturates instead of overflowing; validation rejects the result
    pub fn to_dollars(self) -> Money {
        self.0.saturating_mul(ONE_THOUSAND)
    }
}

/// Resolve a currency field that a client may send either in dollars or in
/// thousands. Supplying both is ambiguous and rejected.
pub fn resolve_amount(
    field: &'static str,
    dollars: Option<Dollars>,
    thousands: Option<Thousands>,
) -> Result<Option<Money>> {
    match (dollars, thousands) {
        (Some(_), Some(_)) => Err(DealError::invalid(
            field,
            "given both in dollars and in thousands; send exactly one",
        )),
        (Some(d), None) => Ok(Some(d.to_dollars())),
        (None, Some(t)) => Ok(Some(t.to_dollars())),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_converts_once() {
        let rate = Percent(dec!(7.5)).to_rate();
        assert_eq!(rate.fraction(), dec!(0.075));
        assert_eq!(rate.as_percent(), dec!(7.5));
        assert_eq!(rate.monthly(), dec!(0.00625));
    }

    #[test]
    fn test_thousands_scale_to_dollars() {
        assert_eq!(Thousands(dec!(250)).to_dollars(), dec!(250000));
        assert_eq!(Thousands(dec!(2.95)).to_dollars(), dec!(2950));
        assert_eq!(Dollars(dec!(250)).to_dollars(), dec!(250));
        assert_eq!(Thousands(Decimal::MAX).to_dollars(), Decimal::MAX);
    }

    #[test]
    fn test_resolve_amount_rejects_ambiguity() {
        let err = resolve_amount("arv", Some(Dollars(dec!(300000))), Some(Thousands(dec!(300))))
            .unwrap_err();
        assert_eq!(err.violations()[0].field, "arv");

        let arv = resolve_amount("arv", None, Some(Thousands(dec!(300)))).unwrap();
        assert_eq!(arv, Some(dec!(300000)));
        assert_eq!(resolve_amount("arv", None, None).unwrap(), None);
    }

    #[test]
    fn test_wire_wrappers_read_json_numbers() {
        let t: Thousands = serde_json::from_str("180.5").unwrap();
        assert_eq!(t.to_dollars(), dec!(180500));
        let p: Percent = serde_json::from_str("3").unwrap();
        assert_eq!(p.to_rate().fraction(), dec!(0.03));
        // Decimal parsing keeps 0.1 exact
        let d: Dollars = serde_json::from_str("0.1").unwrap();
        assert_eq!(d.to_dollars() * dec!(3), dec!(0.3));
    }
}
