//! `POST /analyzeFlip`: fix-and-flip analysis

use super::{messages, rehab_financed, required, Conversions};
use crate::analyzer::{DealBase, FlipAnalysis, FlipAnalyzer, FlipInputs};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::financing::HardMoneyTerms;
use crate::operating::CarryingExpenses;
use crate::returns::SaleAssumptions;
use crate::units::{Dollars, Money, Percent, Thousands};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Purchase, rehab, sale and closing amounts in thousands; percentages 0-100
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeFlipRequest {
    #[serde(default, rename = "purchasePrice", alias = "purchase_price_in_thousands")]
    pub purchase_price: Option<Thousands>,
    #[serde(default, rename = "rehabCost", alias = "rehab_cost_in_thousands")]
    pub rehab_cost: Option<Thousands>,
    /// Projected sale price (ARV)
    #[serde(default, rename = "salePrice", alias = "sale_price_in_thousands")]
    pub sale_price: Option<Thousands>,

    #[serde(default)]
    pub down_payment: Option<Percent>,
    #[serde(default, rename = "closingCostsBuy", alias = "closing_costs_buy_in_thousands")]
    pub closing_costs_buy: Option<Thousands>,

    #[serde(default, rename = "use_HM_for_rehab")]
    pub use_hm_for_rehab: Option<bool>,
    #[serde(default)]
    pub hml_rehab_financed_percent: Option<Percent>,
    #[serde(default, rename = "hmlPoints", alias = "HML_points")]
    pub hml_points: Option<Percent>,
    #[serde(default, rename = "HMLInterestRate", alias = "HML_interest_rate")]
    pub hml_interest_rate: Option<Percent>,

    /// Months from purchase to sale
    #[serde(default, rename = "holdingTime", alias = "holding_time_months")]
    pub holding_time: Option<Decimal>,

    #[serde(default, rename = "buyerAgentSellingFee", alias = "buyer_agent_selling_fee")]
    pub buyer_agent_fee: Option<Percent>,
    #[serde(default, rename = "sellerAgentSellingFee", alias = "seller_agent_selling_fee")]
    pub seller_agent_fee: Option<Percent>,
    #[serde(default, rename = "sellingClosingCosts", alias = "selling_closing_costs_in_thousands")]
    pub selling_closing_costs: Option<Thousands>,

    #[serde(default)]
    pub annual_property_taxes: Option<Dollars>,
    #[serde(default)]
    pub annual_insurance: Option<Dollars>,
    #[serde(default, rename = "montly_hoa")]
    pub monthly_hoa: Option<Dollars>,
    #[serde(default)]
    pub monthly_utilities: Option<Dollars>,

    #[serde(default, rename = "capitalGainsTax", alias = "capital_gains_tax_rate")]
    pub capital_gains_tax: Option<Percent>,
}

fn or_zero<T: Default>(value: Option<T>) -> T {
    value.unwrap_or_default()
}

impl AnalyzeFlipRequest {
    pub fn into_inputs(&self) -> Result<FlipInputs> {
        let mut c = Conversions::new();
        let purchase_price = c.take(required("purchasePrice", self.purchase_price)).to_dollars();
        let sale_price = c.take(required("salePrice", self.sale_price)).to_dollars();
        let down_payment = c.take(required("down_payment", self.down_payment)).to_rate();
        let rehab_financed = c.take(rehab_financed(self.use_hm_for_rehab, self.hml_rehab_financed_percent));
        let hml_rate = c.take(required("HMLInterestRate", self.hml_interest_rate)).to_rate();
        let holding_months = c.take(required("holdingTime", self.holding_time));
        c.finish()?;

        Ok(FlipInputs {
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
            closing_costs_buy: or_zero(self.closing_costs_buy).to_dollars(),
            sale: SaleAssumptions {
                sale_price,
                holding_months,
                buyer_agent_fee: or_zero(self.buyer_agent_fee).to_rate(),
                seller_agent_fee: or_zero(self.seller_agent_fee).to_rate(),
                selling_closing_costs: or_zero(self.selling_closing_costs).to_dollars(),
                capital_gains_tax: or_zero(self.capital_gains_tax).to_rate(),
            },
            monthly_utilities: or_zero(self.monthly_utilities).to_dollars(),
        })
    }

    pub fn analyze(&self, config: &AnalysisConfig) -> Result<AnalyzeFlipResponse> {
        let inputs = self.into_inputs()?;
        FlipAnalyzer::new(config)
            .analyze(&inputs)
            .map(|a| AnalyzeFlipResponse::from(&a))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeFlipResponse {
    pub net_profit: Money,
    #[serde(with = "super::ratio")]
    pub roi: f64,
    #[serde(with = "super::ratio")]
    pub annualized_roi: f64,
    pub total_cash_needed: Money,
    pub total_holding_costs: Money,
    pub total_hml_interest: Money,
    pub messages: Option<Vec<String>>,
}

impl From<&FlipAnalysis> for AnalyzeFlipResponse {
    fn from(analysis: &FlipAnalysis) -> Self {
        let r = &analysis.returns;
        Self {
            net_profit: r.net_profit,
            roi: r.roi,
            annualized_roi: r.annualized_roi,
            total_cash_needed: r.total_cash_needed,
            total_holding_costs: r.total_holding_costs,
            total_hml_interest: r.total_hml_interest,
            messages: messages(&analysis.advisories),
        }
    }
}
