//! `POST /CalcPrecentageOfARV`: the stand-alone 70% rule screen

use super::{messages, required, Conversions};
use crate::acquisition::{AcquisitionFees, AcquisitionInputs, DEFAULT_TRANSFER_TAX_RATE};
use crate::analyzer::{analyze_acquisition, AcquisitionAnalysis};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::units::{Dollars, Money, Percent, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All amounts in raw dollars. Omitted fees fall back to the typical
/// schedule, so a bare `{arv, purchase_price}` request is meaningful.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcquisitionRequest {
    pub arv: Option<Dollars>,
    #[serde(alias = "purchasePrice")]
    pub purchase_price: Option<Dollars>,

    /// Adds 0.7% of purchase price in transfer taxes (doc stamps)
    pub is_transfer_taxes: bool,

    pub title_fees: Dollars,
    pub attorney_fees: Dollars,
    pub title_insurance: Dollars,
    pub recording_fees: Dollars,
    pub transfer_taxes: Dollars,
    pub lender_underwriting_fees: Dollars,
    pub survey_cost: Dollars,
    pub inspection_costs: Dollars,

    /// Origination points, 0-100 percent of purchase price
    pub origination_points_percent: Percent,

    pub hml_underwriting_fee: Dollars,
    pub hml_processing_fee: Dollars,
    pub hml_appraisal_fee: Dollars,
    pub draw_setup_fee: Dollars,

    pub rehab_cost: Dollars,
    /// Utilities and holding costs during rehab
    pub rehab_utilities_cost: Dollars,
    pub builders_risk_insurance_cost: Dollars,
}

impl Default for AcquisitionRequest {
    fn default() -> Self {
        let fees = AcquisitionFees::typical();
        Self {
            arv: None,
            purchase_price: None,
            is_transfer_taxes: false,
            title_fees: Dollars(fees.title_fees),
            attorney_fees: Dollars(fees.attorney_fees),
            title_insurance: Dollars(fees.title_insurance),
            recording_fees: Dollars(fees.recording_fees),
            transfer_taxes: Dollars(fees.transfer_taxes),
            lender_underwriting_fees: Dollars(fees.lender_underwriting_fees),
            survey_cost: Dollars(fees.survey_cost),
            inspection_costs: Dollars(fees.inspection_costs),
            origination_points_percent: Percent(fees.origination_points.as_percent()),
            hml_underwriting_fee: Dollars(fees.hml_underwriting_fee),
            hml_processing_fee: Dollars(fees.hml_processing_fee),
            hml_appraisal_fee: Dollars(fees.hml_appraisal_fee),
            draw_setup_fee: Dollars(fees.draw_setup_fee),
            rehab_cost: Dollars(Decimal::ZERO),
            rehab_utilities_cost: Dollars(dec!(1000)),
            builders_risk_insurance_cost: Dollars(fees.builders_risk_insurance),
        }
    }
}

impl AcquisitionRequest {
    /// Convert to engine inputs, returning ARV alongside
    pub fn into_inputs(&self) -> Result<(Money, AcquisitionInputs)> {
        let mut c = Conversions::new();
        let arv = c.take(required("arv", self.arv)).to_dollars();
        let purchase_price = c.take(required("purchase_price", self.purchase_price)).to_dollars();
        c.finish()?;

        let transfer_tax_rate = if self.is_transfer_taxes {
            Rate::from_fraction(DEFAULT_TRANSFER_TAX_RATE)
        } else {
            Rate::ZERO
        };

        let fees = AcquisitionFees {
            origination_points: self.origination_points_percent.to_rate(),
            transfer_tax_rate,
            title_fees: self.title_fees.to_dollars(),
            attorney_fees: self.attorney_fees.to_dollars(),
            recording_fees: self.recording_fees.to_dollars(),
            transfer_taxes: self.transfer_taxes.to_dollars(),
            lender_underwriting_fees: self.lender_underwriting_fees.to_dollars(),
            title_insurance: self.title_insurance.to_dollars(),
            survey_cost: self.survey_cost.to_dollars(),
            inspection_costs: self.inspection_costs.to_dollars(),
            hml_underwriting_fee: self.hml_underwriting_fee.to_dollars(),
            hml_processing_fee: self.hml_processing_fee.to_dollars(),
            hml_appraisal_fee: self.hml_appraisal_fee.to_dollars(),
            draw_setup_fee: self.draw_setup_fee.to_dollars(),
            builders_risk_insurance: self.builders_risk_insurance_cost.to_dollars(),
            other_closing_costs: Decimal::ZERO,
        };

        let inputs = AcquisitionInputs {
            purchase_price,
            rehab_cost: self.rehab_cost.to_dollars(),
            rehab_utilities_cost: self.rehab_utilities_cost.to_dollars(),
            fees,
        };
        Ok((arv, inputs))
    }

    pub fn analyze(&self, config: &AnalysisConfig) -> Result<AcquisitionResponse> {
        let (arv, inputs) = self.into_inputs()?;
        analyze_acquisition(arv, &inputs, config).map(|a| AcquisitionResponse::from(&a))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AcquisitionResponse {
    pub total_purchase_costs: Money,
    #[serde(rename = "alllInPrecentFromARV")]
    pub all_in_percent_from_arv: Decimal,
    pub passes_70_rule: bool,
    /// Never below 0
    pub max_allowed_purchase_price_to_meet_70_rule: Money,
    /// -1 when the price already meets the rule; the full price when no
    /// price can meet it
    pub difference_in_purchase_price_to_meet_70_rule: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
}

impl From<&AcquisitionAnalysis> for AcquisitionResponse {
    fn from(analysis: &AcquisitionAnalysis) -> Self {
        let rule = &analysis.seventy_rule;
        Self {
            total_purchase_costs: analysis.costs.total_purchase_costs,
            all_in_percent_from_arv: rule.all_in_percent,
            passes_70_rule: rule.passes,
            max_allowed_purchase_price_to_meet_70_rule: rule.max_allowed_purchase_price.max(Decimal::ZERO),
            difference_in_purchase_price_to_meet_70_rule: rule
                .price_gap
                .to_wire(analysis.costs.purchase_price),
            messages: messages(&analysis.advisories),
        }
    }
}
