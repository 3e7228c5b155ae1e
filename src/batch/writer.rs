//! Write batch results as CSV, one row per input deal

use super::BatchError;
use crate::error::Result;
use crate::units::Money;
use crate::wire::{AnalyzeDealResponse, AnalyzeFlipResponse};
use csv::Writer;
use serde::Serialize;
use std::io::Write;

fn ratio_cell(value: f64) -> String {
    if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{:.6}", value)
    }
}

fn messages_cell(messages: &Option<Vec<String>>) -> String {
    messages.as_ref().map(|m| m.join("; ")).unwrap_or_default()
}

#[derive(Debug, Default, Serialize)]
struct DealResultRow {
    row: usize,
    cash_flow: Option<Money>,
    dscr: Option<String>,
    lender_dscr: Option<String>,
    cash_out: Option<Money>,
    cash_invested: Option<Money>,
    cash_on_cash: Option<String>,
    roi: Option<String>,
    equity: Option<Money>,
    net_profit: Option<Money>,
    total_cash_needed_for_deal: Option<Money>,
    messages: String,
    error: String,
}

impl DealResultRow {
    fn new(row: usize, result: &Result<AnalyzeDealResponse>) -> Self {
        match result {
            Ok(r) => Self {
                row,
                cash_flow: Some(r.cash_flow),
                dscr: Some(ratio_cell(r.dscr)),
                lender_dscr: Some(ratio_cell(r.lender_dscr)),
                cash_out: Some(r.cash_out),
                cash_invested: Some(r.cash_invested),
                cash_on_cash: Some(ratio_cell(r.cash_on_cash)),
                roi: Some(ratio_cell(r.roi)),
                equity: Some(r.equity),
                net_profit: Some(r.net_profit),
                total_cash_needed_for_deal: Some(r.total_cash_needed_for_deal),
                messages: messages_cell(&r.messages),
                error: String::new(),
            },
            Err(e) => Self {
                row,
                error: e.to_string(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct FlipResultRow {
    row: usize,
    net_profit: Option<Money>,
    roi: Option<String>,
    annualized_roi: Option<String>,
    total_cash_needed: Option<Money>,
    total_holding_costs: Option<Money>,
    total_hml_interest: Option<Money>,
    messages: String,
    error: String,
}

impl FlipResultRow {
    fn new(row: usize, result: &Result<AnalyzeFlipResponse>) -> Self {
        match result {
            Ok(r) => Self {
                row,
                net_profit: Some(r.net_profit),
                roi: Some(ratio_cell(r.roi)),
                annualized_roi: Some(ratio_cell(r.annualized_roi)),
                total_cash_needed: Some(r.total_cash_needed),
                total_holding_costs: Some(r.total_holding_costs),
                total_hml_interest: Some(r.total_hml_interest),
                messages: messages_cell(&r.messages),
                error: String::new(),
            },
            Err(e) => Self {
                row,
                error: e.to_string(),
                ..Default::default()
            },
        }
    }
}

/// Rows are numbered from 1 in input order
pub fn write_deal_results<W: Write>(
    writer: W,
    results: &[Result<AnalyzeDealResponse>],
) -> std::result::Result<(), BatchError> {
    let mut csv_writer = Writer::from_writer(writer);
    for (i, result) in results.iter().enumerate() {
        csv_writer.serialize(DealResultRow::new(i + 1, result))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_flip_results<W: Write>(
    writer: W,
    results: &[Result<AnalyzeFlipResponse>],
) -> std::result::Result<(), BatchError> {
    let mut csv_writer = Writer::from_writer(writer);
    for (i, result) in results.iter().enumerate() {
        csv_writer.serialize(FlipResultRow::new(i + 1, result))?;
    }
    csv_writer.flush()?;
    Ok(())
}
