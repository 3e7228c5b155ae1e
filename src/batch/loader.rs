//! Load deal requests from CSV
//!
//! Headers are the wire field names (`arv_in_thousands`, `purchasePrice`,
//! `rent`, ...). Empty cells are treated as omitted fields.

use super::BatchError;
use crate::wire::{AnalyzeDealRequest, AnalyzeFlipRequest};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn load_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, BatchError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        // Row 1 is the header
        let row: T = result.map_err(|source| BatchError::Row { row: index + 2, source })?;
        rows.push(row);
    }

    Ok(rows)
}

fn open(path: &Path) -> Result<File, BatchError> {
    File::open(path).map_err(|source| BatchError::Open {
        path: path.display().to_string(),
        source,
    })
}

/// Load BRRRR deals from a CSV file
pub fn load_deals<P: AsRef<Path>>(path: P) -> Result<Vec<AnalyzeDealRequest>, BatchError> {
    load_rows(open(path.as_ref())?)
}

/// Load BRRRR deals from any reader (e.g., string buffer, stdin)
pub fn load_deals_from_reader<R: Read>(reader: R) -> Result<Vec<AnalyzeDealRequest>, BatchError> {
    load_rows(reader)
}

/// Load flips from a CSV file
pub fn load_flips<P: AsRef<Path>>(path: P) -> Result<Vec<AnalyzeFlipRequest>, BatchError> {
    load_rows(open(path.as_ref())?)
}

pub fn load_flips_from_reader<R: Read>(reader: R) -> Result<Vec<AnalyzeFlipRequest>, BatchError> {
    load_rows(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Percent, Thousands};
    use rust_decimal_macros::dec;

    const DEALS: &str = "\
arv_in_thousands,purchasePrice,rehabCost,down_payment,use_HM_for_rehab,monthsUntilRefi,HMLInterestRate,ltv_as_precent,interestRate,rent,vacancyPercent
240,120,40,10,true,6,11,75,7,2100,5
300,180,,20,,4,12,70,6.5,2400,
";

    #[test]
    fn test_load_deals_from_reader() {
        let deals = load_deals_from_reader(DEALS.as_bytes()).unwrap();
        assert_eq!(deals.len(), 2);

        assert_eq!(deals[0].arv_in_thousands, Some(Thousands(dec!(240))));
        assert_eq!(deals[0].use_hm_for_rehab, Some(true));
        assert_eq!(deals[0].vacancy, Some(Percent(dec!(5))));
        assert_eq!(deals[1].interest_rate, Some(Percent(dec!(6.5))));

        // Blank cells are omitted fields
        assert_eq!(deals[1].rehab_cost, None);
        assert_eq!(deals[1].use_hm_for_rehab, None);
        assert_eq!(deals[1].vacancy, None);
        assert!(deals[1].into_inputs().is_ok());
    }

    #[test]
    fn test_bad_cell_reports_row() {
        let csv = "purchasePrice,rent\n100,1500\n100,lots\n";
        match load_deals_from_reader(csv.as_bytes()) {
            Err(BatchError::Row { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected row error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_deals("no/such/deals.csv").unwrap_err();
        assert!(matches!(err, BatchError::Open { .. }));
    }

    #[test]
    fn test_load_flips_from_reader() {
        let csv = "purchasePrice,rehabCost,salePrice,down_payment,HMLInterestRate,holdingTime\n200,30,265,20,0,6\n";
        let flips = load_flips_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(flips.len(), 1);
        assert_eq!(flips[0].sale_price, Some(Thousands(dec!(265))));
    }
}
