//! `POST /analyzeDeal`: BRRRR analysis

use super::{messages, rehab_financed, required, Conversions};
use crate::acquisition::AcquisitionFees;
use crate::analyzer::{BrrrrAnalysis, BrrrrAnalyzer, BrrrrInputs, DealBase};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::financing::{HardMoneyTerms, RefinanceTerms};
use crate::operating::{CarryingExpenses, OperatingInputs};
use crate::units::{resolve_amount, Dollars, Money, Percent, Thousands};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const DEFAULT_LOAN_TERM_YEARS: u32 = 30;

/// BRRRR request as sent by the calculator front end.
///
/// Purchase, rehab and closing amounts are in thousands; ARV may come in
/// either unit but not both. Percentages are 0-100. Every field is optional
/// at the serde level so that missing required fields are reported together
/// with the other violations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeDealRequest {
    #[serde(default)]
    pub arv: Option<Dollars>,
    #[serde(default)]
    pub arv_in_thousands: Option<Thousands>,

    #[serde(default, rename = "purchasePrice", alias = "purchase_price_in_thousands")]
    pub purchase_price: Option<Thousands>,
    #[serde(default, rename = "rehabCost", alias = "rehab_cost_in_thousands")]
    pub rehab_cost: Option<Thousands>,
    /// Utilities during rehab, raw dollars
    #[serde(default)]
    pub rehab_utilities_cost: Option<Dollars>,

    /// Down payment on the purchase (0-100)
    #[serde(default)]
    pub down_payment: Option<Percent>,
    #[serde(default, rename = "closingCostsBuy", alias = "closing_costs_buy_in_thousands")]
    pub closing_costs_buy: Option<Thousands>,

    /// Legacy toggle: lender funds all of the rehab
    #[serde(default, rename = "use_HM_for_rehab")]
    pub use_hm_for_rehab: Option<bool>,
    /// Share of rehab the lender funds (0-100)
    #[serde(default)]
    pub hml_rehab_financed_percent: Option<Percent>,
    #[serde(default, rename = "hmlPoints", alias = "HML_points")]
    pub hml_points: Option<Percent>,
    #[serde(default, rename = "monthsUntilRefi", alias = "Months_until_refi")]
    pub months_until_refi: Option<Decimal>,
    #[serde(default, rename = "HMLInterestRate", alias = "HML_interest_rate")]
    pub hml_interest_rate: Option<Percent>,

    #[serde(default, rename = "closingCostsRefi", alias = "closing_cost_refi_in_thousands")]
    pub closing_costs_refi: Option<Thousands>,
    #[serde(default, rename = "loanTermYears", alias = "loan_term_years")]
    pub loan_term_years: Option<u32>,
    #[serde(default, rename = "ltv_as_precent")]
    pub ltv: Option<Percent>,
    #[serde(default, rename = "interestRate", alias = "interest_rate")]
    pub interest_rate: Option<Percent>,

    /// Monthly rent, raw dollars
    #[serde(default)]
    pub rent: Option<Dollars>,
    #[serde(default, rename = "vacancyPercent", alias = "vacancy_percent")]
    pub vacancy: Option<Percent>,
    #[serde(default, rename = "property_managment_fee_precentages_from_rent")]
    pub property_management: Option<Percent>,
    #[serde(default, rename = "maintenancePercent", alias = "maintenance_percent")]
    pub maintenance: Option<Percent>,
    #[serde(default, rename = "capexPercent", alias = "capex_percent_of_rent")]
    pub capex: Option<Percent>,

    #[serde(default)]
    pub annual_property_taxes: Option<Dollars>,
    #[serde(default)]
    pub annual_insurance: Option<Dollars>,
    #[serde(default, rename = "montly_hoa")]
    pub monthly_hoa: Option<Dollars>,
}

fn or_zero<T: Default>(value: Option<T>) -> T {
    value.unwrap_or_default()
}

impl AnalyzeDealRequest {
    pub fn into_inputs(&self) -> Result<BrrrrInputs> {
        let mut c = Conversions::new();
        let arv = c.take(resolve_amount("arv", self.arv, self.arv_in_thousands).and_then(|v| required("arv", v)));
        let purchase_price = c.take(required("purchasePrice", self.purchase_price)).to_dollars();
        let down_payment = c.take(required("down_payment", self.down_payment)).to_rate();
        let rehab_financed = c.take(rehab_financed(self.use_hm_for_rehab, self.hml_rehab_financed_percent));
        let months_until_refi = c.take(required("monthsUntilRefi", self.months_until_refi));
        let hml_rate = c.take(required("HMLInterestRate", self.hml_interest_rate)).to_rate();
        let ltv = c.take(required("ltv_as_precent", self.ltv)).to_rate();
        let interest_rate = c.take(required("interestRate", self.interest_rate)).to_rate();
        let rent = c.take(required("rent", self.rent)).to_dollars();
        c.finish()?;

        Ok(BrrrrInputs {
            base: DealBase {
                purchase_price,
                rehab_cost: or_zero(self.rehab_cost).to_dollars(),
                down_payment,
                hard_money: HardMoneyTerms {
                    points: or_zero(self.hml_points).to_rate(),
                    annual_rate: hml_rate,
                    rehab_financed,
                },
                carrying: CarryingExpenses {
                    annual_taxes: or_zero(self.annual_property_taxes).to_dollars(),
                    annual_insurance: or_zero(self.annual_insurance).to_dollars(),
                    monthly_hoa: or_zero(self.monthly_hoa).to_dollars(),
                },
            },
            arv,
            rehab_utilities_cost: or_zero(self.rehab_utilities_cost).to_dollars(),
            fees: AcquisitionFees {
                other_closing_costs: or_zero(self.closing_costs_buy).to_dollars(),
                ..Default::default()
            },
            refinance: RefinanceTerms {
                ltv,
                annual_rate: interest_rate,
                term_years: self.loan_term_years.unwrap_or(DEFAULT_LOAN_TERM_YEARS),
                closing_costs: or_zero(self.closing_costs_refi).to_dollars(),
            },
            months_until_refi,
            operating: OperatingInputs {
                monthly_rent: rent,
                vacancy: or_zero(self.vacancy).to_rate(),
                management_fee: or_zero(self.property_management).to_rate(),
                maintenance: or_zero(self.maintenance).to_rate(),
                capex: or_zero(self.capex).to_rate(),
            },
        })
    }

    pub fn analyze(&self, config: &AnalysisConfig) -> Result<AnalyzeDealResponse> {
        let inputs = self.into_inputs()?;
        BrrrrAnalyzer::new(config)
            .analyze(&inputs)
            .map(|a| AnalyzeDealResponse::from(&a))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeDealResponse {
    pub cash_flow: Money,
    #[serde(with = "super::ratio")]
    pub dscr: f64,
    /// Rent over PITIA
    #[serde(with = "super::ratio")]
    pub lender_dscr: f64,
    pub cash_out: Money,
    pub cash_invested: Money,
    #[serde(with = "super::ratio")]
    pub cash_on_cash: f64,
    #[serde(with = "super::ratio")]
    pub roi: f64,
    pub equity: Money,
    pub net_profit: Money,
    pub total_cash_needed_for_deal: Money,
    pub messages: Option<Vec<String>>,
}

impl From<&BrrrrAnalysis> for AnalyzeDealResponse {
    fn from(analysis: &BrrrrAnalysis) -> Self {
        let r = &analysis.returns;
        Self {
            cash_flow: r.cash_flow,
            dscr: r.dscr,
            lender_dscr: r.lender_dscr,
            cash_out: r.cash_out,
            cash_invested: r.cash_invested,
            cash_on_cash: r.cash_on_cash,
            roi: r.roi,
            equity: r.equity_build_up,
            net_profit: r.net_profit,
            total_cash_needed_for_deal: r.total_cash_needed,
            messages: messages(&analysis.advisories),
        }
    }
}
