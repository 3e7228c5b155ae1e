//! Strategy orchestration
//!
//! [`analyze`] is the single entry point: a [`Deal`] is either a BRRRR or a
//! Flip, both built on a shared [`DealBase`]. Every call is a pure function
//! of its input and the [`AnalysisConfig`].

mod brrrr;
mod flip;
mod screen;

pub use brrrr::{BrrrrAnalysis, BrrrrAnalyzer, BrrrrInputs};
pub use flip::{FlipAnalysis, FlipAnalyzer, FlipInputs};
pub use screen::{analyze_acquisition, AcquisitionAnalysis};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::financing::HardMoneyTerms;
use crate::operating::CarryingExpenses;
use crate::units::{Money, Rate};

/// Fields shared by both strategies
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DealBase {
    pub purchase_price: Money,
    pub rehab_cost: Money,
    /// Down payment as a fraction of purchase price
    pub down_payment: Rate,
    pub hard_money: HardMoneyTerms,
    pub carrying: CarryingExpenses,
}

/// Investment strategy and its inputs
#[derive(Debug, Clone, PartialEq)]
pub enum Deal {
    Brrrr(BrrrrInputs),
    Flip(FlipInputs),
}

impl Deal {
    pub fn base_mut(&mut self) -> &mut DealBase {
        match self {
            Deal::Brrrr(inputs) => &mut inputs.base,
            Deal::Flip(inputs) => &mut inputs.base,
        }
    }
}

/// Result of [`analyze`], one variant per strategy
#[derive(Debug, Clone, PartialEq)]
pub enum DealAnalysis {
    Brrrr(BrrrrAnalysis),
    Flip(FlipAnalysis),
}

/// Analyze a deal under its strategy
pub fn analyze(deal: &Deal, config: &AnalysisConfig) -> Result<DealAnalysis> {
    match deal {
        Deal::Brrrr(inputs) => BrrrrAnalyzer::new(config).analyze(inputs).map(DealAnalysis::Brrrr),
        Deal::Flip(inputs) => FlipAnalyzer::new(config).analyze(inputs).map(DealAnalysis::Flip),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_strategy() {
        let config = AnalysisConfig::default();

        let brrrr = analyze(&Deal::Brrrr(fixtures::brrrr()), &config).unwrap();
        assert!(matches!(brrrr, DealAnalysis::Brrrr(_)));

        let flip = analyze(&Deal::Flip(fixtures::flip()), &config).unwrap();
        match flip {
            DealAnalysis::Flip(a) => assert!((a.returns.roi - 0.5).abs() < 1e-9),
            other => panic!("expected flip analysis, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_inputs_give_identical_outputs() {
        let config = AnalysisConfig::default();
        let deal = Deal::Brrrr(fixtures::brrrr());
        let first = analyze(&deal, &config).unwrap();
        let second = analyze(&deal, &config).unwrap();
        assert_eq!(first, second);

        if let (DealAnalysis::Brrrr(a), DealAnalysis::Brrrr(b)) = (&first, &second) {
            assert_eq!(a.returns.roi.to_bits(), b.returns.roi.to_bits());
            assert_eq!(a.returns.cash_flow.serialize(), b.returns.cash_flow.serialize());
        }
    }

    #[test]
    fn test_engine_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Deal>();
        assert_send_sync::<DealAnalysis>();
        assert_send_sync::<AnalysisConfig>();
    }
}
