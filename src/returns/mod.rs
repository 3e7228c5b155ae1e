//! Return metrics for both strategies
//!
//! Currency results are exact decimals. Ratio metrics are reported as `f64`
//! and never fail on a zero denominator: "no cash left in the deal" is a
//! legitimate outcome, so they report a signed infinity instead.

mod brrrr;
mod flip;

pub use brrrr::{BrrrrMetricInputs, BrrrrReturns};
pub use flip::{FlipMetricInputs, FlipReturns, SaleAssumptions};

use crate::units::{to_f64, Money, MONTHS_PER_YEAR};
use rust_decimal::Decimal;

/// numerator / denominator, or a signed infinity when the denominator is 0.
/// 0 / 0 is reported as 0.
pub fn ratio(numerator: Money, denominator: Money) -> f64 {
    if denominator.is_zero() {
        if numerator > Decimal::ZERO {
            f64::INFINITY
        } else if numerator < Decimal::ZERO {
            f64::NEG_INFINITY
        } else {
            0.0
        }
    } else {
        to_f64(numerator) / to_f64(denominator)
    }
}

/// Scale a holding-period return to a 12-month rate (simple, not compounded)
pub fn annualize(period_return: f64, months: Decimal) -> f64 {
    if months.is_zero() {
        return if period_return > 0.0 {
            f64::INFINITY
        } else if period_return < 0.0 {
            f64::NEG_INFINITY
        } else {
            0.0
        };
    }
    period_return * to_f64(MONTHS_PER_YEAR) / to_f64(months)
}
