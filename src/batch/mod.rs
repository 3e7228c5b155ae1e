//! CSV batch loading, parallel analysis and result output

mod loader;
mod runner;
mod writer;

pub use loader::{load_deals, load_deals_from_reader, load_flips, load_flips_from_reader};
pub use runner::DealRunner;
pub use writer::{write_deal_results, write_flip_results};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad CSV row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
