//! Runs many deals against one configuration
//!
//! Each deal is independent, so batches fan out over rayon. Results come
//! back in input order, one `Result` per deal: a rejected row never aborts
//! the rest of the batch.

use crate::analyzer::{analyze, Deal, DealAnalysis};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::units::Money;
use crate::wire::{AnalyzeDealRequest, AnalyzeDealResponse, AnalyzeFlipRequest, AnalyzeFlipResponse};
use log::info;
use rayon::prelude::*;

/// Pre-configured runner for batches and offer-price sweeps
///
/// # Example
/// ```ignore
/// let runner = DealRunner::new(AnalysisConfig::from_env());
/// for (price, result) in runner.sweep_purchase_price(&deal, &[dec!(150000), dec!(160000)]) {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DealRunner {
    config: AnalysisConfig,
}

impl DealRunner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(&self, deal: &Deal) -> Result<DealAnalysis> {
        analyze(deal, &self.config)
    }

    /// Analyze every deal in parallel
    pub fn run_batch(&self, deals: &[Deal]) -> Vec<Result<DealAnalysis>> {
        let results: Vec<_> = deals.par_iter().map(|deal| self.run(deal)).collect();
        log_summary(&results);
        results
    }

    /// Convert and analyze BRRRR wire requests in parallel
    pub fn run_deal_requests(&self, requests: &[AnalyzeDealRequest]) -> Vec<Result<AnalyzeDealResponse>> {
        let results: Vec<_> = requests.par_iter().map(|r| r.analyze(&self.config)).collect();
        log_summary(&results);
        results
    }

    /// Convert and analyze flip wire requests in parallel
    pub fn run_flip_requests(&self, requests: &[AnalyzeFlipRequest]) -> Vec<Result<AnalyzeFlipResponse>> {
        let results: Vec<_> = requests.par_iter().map(|r| r.analyze(&self.config)).collect();
        log_summary(&results);
        results
    }

    /// Analyze the same deal at several offer prices
    pub fn sweep_purchase_price(&self, deal: &Deal, prices: &[Money]) -> Vec<(Money, Result<DealAnalysis>)> {
        prices
            .par_iter()
            .map(|&price| {
                let mut candidate = deal.clone();
                candidate.base_mut().purchase_price = price;
                (price, self.run(&candidate))
            })
            .collect()
    }
}

fn log_summary<T>(results: &[Result<T>]) {
    let rejected = results.iter().filter(|r| r.is_err()).count();
    info!("Analyzed {} deals, {} rejected", results.len(), rejected);
}
