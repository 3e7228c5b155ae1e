//! Analyze every deal in a CSV file
//!
//! Usage: run_batch <deals.csv> [--flip] [--output results.csv]
//!
//! Headers are the wire field names. Output has one row per input deal, in
//! input order, with an `error` column for rejected rows.

use anyhow::Context;
use clap::Parser;
use deal_analyzer::batch::{
    load_deals, load_flips, write_deal_results, write_flip_results, DealRunner,
};
use deal_analyzer::AnalysisConfig;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Analyze a CSV of deals in parallel")]
struct BatchArgs {
    /// CSV of analyzeDeal (or analyzeFlip with --flip) requests
    deals: PathBuf,

    /// Rows are flips rather than BRRRR deals
    #[arg(long)]
    flip: bool,

    /// Output CSV path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = BatchArgs::parse();

    let start = Instant::now();
    let runner = DealRunner::new(AnalysisConfig::from_env());

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let (total, rejected) = if args.flip {
        let requests = load_flips(&args.deals).context("Failed to load flips")?;
        let results = runner.run_flip_requests(&requests);
        write_flip_results(out, &results).context("Failed to write results")?;
        (results.len(), results.iter().filter(|r| r.is_err()).count())
    } else {
        let requests = load_deals(&args.deals).context("Failed to load deals")?;
        let results = runner.run_deal_requests(&requests);
        write_deal_results(out, &results).context("Failed to write results")?;
        (results.len(), results.iter().filter(|r| r.is_err()).count())
    };

    eprintln!(
        "Analyzed {} deals ({} rejected) in {:?}",
        total,
        rejected,
        start.elapsed()
    );
    if let Some(path) = &args.output {
        eprintln!("Output written to {}", path.display());
    }
    Ok(())
}
