//! Deal Analyzer CLI
//!
//! Reads one wire request as JSON (from `--input` or stdin) and prints the
//! response as JSON. Rejected input prints the 400 error body to stderr and
//! exits with status 2.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use deal_analyzer::error::DealError;
use deal_analyzer::wire::{
    AcquisitionRequest, AnalyzeDealRequest, AnalyzeDealResponse, AnalyzeFlipRequest, AnalyzeFlipResponse,
    ErrorBody,
};
use deal_analyzer::units::Thousands;
use deal_analyzer::{AnalysisConfig, Deal, DealAnalysis, DealRunner, EquityPolicy, Rate};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deal_analyzer", version, about = "Analyze BRRRR and fix-and-flip deals")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// All-in cost ceiling as a percent of ARV (default 70)
    #[arg(long, global = true)]
    seventy_rule_percent: Option<Decimal>,

    /// How BRRRR equity is measured: at-refinance or first-year-paydown
    #[arg(long, global = true)]
    equity_policy: Option<EquityPolicy>,

    /// DSCR below this is flagged
    #[arg(long, global = true)]
    min_dscr: Option<f64>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 70% rule screen (CalcPrecentageOfARV request)
    Seventy(InputArgs),
    /// BRRRR analysis (analyzeDeal request)
    Brrrr(InputArgs),
    /// Fix-and-flip analysis (analyzeFlip request)
    Flip(InputArgs),
    /// BRRRR analysis repeated at several purchase prices
    Sweep {
        #[command(flatten)]
        input: InputArgs,

        /// Purchase prices in thousands, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        prices: Vec<Decimal>,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path to JSON input file; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
}

impl Cli {
    /// Environment first, then flags
    fn config(&self) -> AnalysisConfig {
        let mut config = AnalysisConfig::from_env();
        if let Some(pct) = self.seventy_rule_percent {
            config.seventy_rule_threshold = Rate::from_percent(pct);
        }
        if let Some(policy) = self.equity_policy {
            config.equity_policy = policy;
        }
        if let Some(dscr) = self.min_dscr {
            config.advisories.min_dscr = dscr;
        }
        config
    }
}

fn read_request<T: DeserializeOwned>(args: &InputArgs) -> anyhow::Result<T> {
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    if raw.trim().is_empty() {
        bail!("--input <file.json> or a JSON request on stdin is required");
    }
    serde_json::from_str(&raw).context("Request is not valid JSON for this command")
}

fn response_json(analysis: &DealAnalysis) -> Value {
    match analysis {
        DealAnalysis::Brrrr(a) => json!(AnalyzeDealResponse::from(a)),
        DealAnalysis::Flip(a) => json!(AnalyzeFlipResponse::from(a)),
    }
}

fn sweep(request: &AnalyzeDealRequest, prices: &[Decimal], config: AnalysisConfig) -> Result<Value, DealError> {
    let deal = Deal::Brrrr(request.into_inputs()?);
    let prices: Vec<Decimal> = prices.iter().map(|&p| Thousands(p).to_dollars()).collect();

    let rows = DealRunner::new(config)
        .sweep_purchase_price(&deal, &prices)
        .into_iter()
        .map(|(price, result)| match result {
            Ok(analysis) => json!({
                "purchase_price": price,
                "result": response_json(&analysis),
            }),
            Err(e) => json!({
                "purchase_price": price,
                "error": ErrorBody::from(&e),
            }),
        })
        .collect();
    Ok(Value::Array(rows))
}

fn run(cli: &Cli) -> anyhow::Result<Result<Value, DealError>> {
    let config = cli.config();
    let outcome = match &cli.command {
        Command::Seventy(args) => read_request::<AcquisitionRequest>(args)?
            .analyze(&config)
            .map(|r| json!(r)),
        Command::Brrrr(args) => read_request::<AnalyzeDealRequest>(args)?
            .analyze(&config)
            .map(|r| json!(r)),
        Command::Flip(args) => read_request::<AnalyzeFlipRequest>(args)?
            .analyze(&config)
            .map(|r| json!(r)),
        Command::Sweep { input, prices } => {
            let request = read_request::<AnalyzeDealRequest>(input)?;
            sweep(&request, prices, config)
        }
    };
    Ok(outcome)
}

fn render(value: &Value, pretty: bool) -> anyhow::Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli)? {
        Ok(value) => {
            println!("{}", render(&value, cli.pretty)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", render(&json!(ErrorBody::from(&e)), cli.pretty)?);
            std::process::exit(2);
        }
    }
}
