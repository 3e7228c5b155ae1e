//! Input validation
//!
//! Two tiers:
//! - hard violations (non-positive ARV, rates outside 0-100%, loan terms
//!   outside 1-50 years, amounts past the supported range, ...) abort the
//!   call with `InvalidInput`
//! - soft violations (unusual but usable values) become [`Advisory`]
//!   messages returned alongside a normally computed result

use crate::analyzer::{BrrrrInputs, DealBase, FlipInputs};
use crate::acquisition::{AcquisitionFees, AcquisitionInputs};
use crate::config::AdvisoryThresholds;
use crate::error::{DealError, FieldViolation, Result};
use crate::financing::MAX_LOAN_TERM_YEARS;
use crate::units::{Money, Rate};
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Largest currency amount accepted on any field
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Largest annual interest rate accepted (1000%)
pub const MAX_INTEREST_RATE: Decimal = dec!(10);

/// Longest holding period accepted, in months
pub const MAX_HOLDING_MONTHS: Decimal = dec!(1200);

/// A non-fatal note about the inputs or the outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub field: &'static str,
    pub message: String,
}

impl Advisory {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Collects hard violations and advisories for one request
#[derive(Debug)]
pub struct Validator<'a> {
    thresholds: &'a AdvisoryThresholds,
    violations: Vec<FieldViolation>,
    advisories: Vec<Advisory>,
}

impl<'a> Validator<'a> {
    pub fn new(thresholds: &'a AdvisoryThresholds) -> Self {
        Self {
            thresholds,
            violations: Vec::new(),
            advisories: Vec::new(),
        }
    }

    pub fn reject(&mut self, field: &'static str, reason: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, reason));
    }

    pub fn advise(&mut self, field: &'static str, message: impl Into<String>) {
        self.advisories.push(Advisory::new(field, message));
    }

    fn within_range(&mut self, field: &'static str, value: Money) -> bool {
        if value > MAX_AMOUNT {
            self.reject(field, format!("cannot exceed {}", MAX_AMOUNT));
            false
        } else {
            true
        }
    }

    /// Must be strictly positive
    pub fn positive(&mut self, field: &'static str, value: Money) {
        if self.within_range(field, value) && value <= Decimal::ZERO {
            self.reject(field, "must be greater than 0");
        }
    }

    /// Must not be negative
    pub fn non_negative(&mut self, field: &'static str, value: Money) {
        if self.within_range(field, value) && value < Decimal::ZERO {
            self.reject(field, "cannot be negative");
        }
    }

    /// A rate that only makes sense between 0% and 100%
    pub fn bounded_rate(&mut self, field: &'static str, rate: Rate) {
        if rate < Rate::ZERO || rate > Rate::ONE {
            self.reject(field, "must be between 0% and 100%");
        }
    }

    /// A charge taken as a share of some base. 100% is accepted but flagged.
    pub fn cost_rate(&mut self, field: &'static str, rate: Rate) {
        self.bounded_rate(field, rate);
        if rate == Rate::ONE {
            self.advise(field, format!("{} is 100%; it consumes the entire amount it applies to", field));
        }
    }

    /// An interest rate: capped at 1000%, flagged past `soft_max`
    pub fn interest_rate(&mut self, field: &'static str, rate: Rate, soft_max: Rate) {
        if rate < Rate::ZERO {
            self.reject(field, "cannot be negative");
        } else if rate.fraction() > MAX_INTEREST_RATE {
            self.reject(field, "cannot exceed 1000%");
        } else if rate > soft_max {
            self.advise(
                field,
                format!(
                    "{} of {:.2}% is unusually high (above {:.2}%)",
                    field,
                    rate.as_percent(),
                    soft_max.as_percent()
                ),
            );
        }
    }

    /// A holding period in months, 0 to 1200
    pub fn months(&mut self, field: &'static str, months: Decimal) {
        if months < Decimal::ZERO {
            self.reject(field, "cannot be negative");
        } else if months > MAX_HOLDING_MONTHS {
            self.reject(field, format!("cannot exceed {} months", MAX_HOLDING_MONTHS));
        }
    }

    pub fn thresholds(&self) -> &AdvisoryThresholds {
        self.thresholds
    }

    /// Fail with every collected violation, or hand back the advisories
    pub fn finish(self) -> Result<Vec<Advisory>> {
        if self.violations.is_empty() {
            Ok(self.advisories)
        } else {
            warn!(
                "Rejected deal input with {} violation(s): {}",
                self.violations.len(),
                self.violations
                    .iter()
                    .map(|v| v.field)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            Err(DealError::InvalidInput(self.violations))
        }
    }
}

fn check_fees(v: &mut Validator<'_>, fees: &AcquisitionFees) {
    v.cost_rate("origination_points_percent", fees.origination_points);
    v.cost_rate("transfer_tax_rate", fees.transfer_tax_rate);
    for (field, amount) in fees.named_amounts() {
        v.non_negative(field, amount);
    }
}

fn check_acquisition(v: &mut Validator<'_>, arv: Money, inputs: &AcquisitionInputs) {
    v.positive("arv", arv);
    v.positive("purchase_price", inputs.purchase_price);
    v.non_negative("rehab_cost", inputs.rehab_cost);
    v.non_negative("rehab_utilities_cost", inputs.rehab_utilities_cost);
    check_fees(v, &inputs.fees);
}

fn check_base(v: &mut Validator<'_>, base: &DealBase) {
    v.positive("purchase_price", base.purchase_price);
    v.non_negative("rehab_cost", base.rehab_cost);
    v.bounded_rate("down_payment", base.down_payment);

    let hml = &base.hard_money;
    v.cost_rate("hml_points", hml.points);
    v.bounded_rate("hml_rehab_financed_percent", hml.rehab_financed);
    let max_hml = v.thresholds().max_hml_rate;
    v.interest_rate("hml_interest_rate", hml.annual_rate, max_hml);

    v.non_negative("annual_property_taxes", base.carrying.annual_taxes);
    v.non_negative("annual_insurance", base.carrying.annual_insurance);
    v.non_negative("monthly_hoa", base.carrying.monthly_hoa);
}

/// Validate the inputs of a stand-alone 70% rule check
pub fn validate_acquisition(
    arv: Money,
    inputs: &AcquisitionInputs,
    thresholds: &AdvisoryThresholds,
) -> Result<Vec<Advisory>> {
    let mut v = Validator::new(thresholds);
    check_acquisition(&mut v, arv, inputs);
    v.finish()
}

/// Validate a BRRRR deal before analysis
pub fn validate_brrrr(inputs: &BrrrrInputs, thresholds: &AdvisoryThresholds) -> Result<Vec<Advisory>> {
    let mut v = Validator::new(thresholds);
    check_base(&mut v, &inputs.base);
    v.positive("arv", inputs.arv);
    v.non_negative("rehab_utilities_cost", inputs.rehab_utilities_cost);
    check_fees(&mut v, &inputs.fees);

    // The HML has to be carried for some time, at some cost
    v.months("months_until_refi", inputs.months_until_refi);
    if inputs.months_until_refi.is_zero() {
        v.reject("months_until_refi", "must be greater than 0");
    }
    if inputs.base.hard_money.annual_rate == Rate::ZERO {
        v.reject("hml_interest_rate", "must be greater than 0%");
    }

    let refi = &inputs.refinance;
    v.bounded_rate("ltv", refi.ltv);
    if refi.ltv == Rate::ZERO {
        v.reject("ltv", "must be greater than 0%");
    } else if refi.ltv == Rate::ONE {
        v.advise("ltv", "LTV is 100%; the refinance leaves no equity in the property");
    } else if refi.ltv > thresholds.max_ltv {
        v.advise(
            "ltv",
            format!(
                "LTV of {:.1}% is above the usual {:.1}% refinance limit",
                refi.ltv.as_percent(),
                thresholds.max_ltv.as_percent()
            ),
        );
    }
    v.interest_rate("interest_rate", refi.annual_rate, thresholds.max_refinance_rate);
    if !(1..=MAX_LOAN_TERM_YEARS).contains(&refi.term_years) {
        v.reject(
            "loan_term_years",
            format!("must be between 1 and {} years", MAX_LOAN_TERM_YEARS),
        );
    }
    v.non_negative("closing_costs_refi", refi.closing_costs);

    let op = &inputs.operating;
    v.positive("rent", op.monthly_rent);
    v.cost_rate("vacancy_percent", op.vacancy);
    v.cost_rate("property_management_percent", op.management_fee);
    v.cost_rate("maintenance_percent", op.maintenance);
    v.cost_rate("capex_percent", op.capex);

    if op.vacancy > thresholds.max_vacancy {
        v.advise(
            "vacancy_percent",
            format!(
                "vacancy of {:.1}% is above {:.1}%",
                op.vacancy.as_percent(),
                thresholds.max_vacancy.as_percent()
            ),
        );
    }
    if op.management_fee > thresholds.max_management_fee {
        v.advise(
            "property_management_percent",
            format!(
                "property management fee of {:.1}% is above {:.1}%",
                op.management_fee.as_percent(),
                thresholds.max_management_fee.as_percent()
            ),
        );
    }
    let rent_rates = [op.vacancy, op.management_fee, op.maintenance, op.capex];
    let rent_share = rent_rates
        .iter()
        .filter(|r| (Rate::ZERO..=Rate::ONE).contains(*r))
        .fold(Rate::ZERO, |sum, r| sum + *r);
    if rent_share >= Rate::ONE {
        v.advise(
            "rent",
            format!(
                "vacancy, management, maintenance and capex consume {:.1}% of rent",
                rent_share.as_percent()
            ),
        );
    }

    v.finish()
}

/// Validate a flip before analysis
pub fn validate_flip(inputs: &FlipInputs, thresholds: &AdvisoryThresholds) -> Result<Vec<Advisory>> {
    let mut v = Validator::new(thresholds);
    check_base(&mut v, &inputs.base);
    v.non_negative("closing_costs_buy", inputs.closing_costs_buy);
    v.non_negative("monthly_utilities", inputs.monthly_utilities);

    let sale = &inputs.sale;
    v.positive("sale_price", sale.sale_price);
    v.months("holding_time", sale.holding_months);
    if sale.holding_months.is_zero() {
        v.advise("holding_time", "holding_time is 0; no carry costs are accrued");
    }
    v.cost_rate("buyer_agent_selling_fee", sale.buyer_agent_fee);
    v.cost_rate("seller_agent_selling_fee", sale.seller_agent_fee);
    v.non_negative("selling_closing_costs", sale.selling_closing_costs);
    v.bounded_rate("capital_gains_tax", sale.capital_gains_tax);

    if sale.capital_gains_tax == Rate::ONE {
        v.advise("capital_gains_tax", "capital gains tax is 100%; all profit is taxed away");
    }

    v.finish()
}
