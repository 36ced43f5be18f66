//! Read-only reference data: products and state tax rates.
//!
//! Each catalog is one comma-separated file with a header line. Files are
//! re-read on every call, so edits made outside the program show up
//! immediately.

mod product;
mod tax;

pub use product::ProductCatalog;
pub use tax::TaxCatalog;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::FlooringError;

const DELIMITER: char = ',';
const FIELD_COUNT: usize = 3;

pub trait Catalog {
    type Record;

    /// Every record, ordered by key.
    fn get_all(&self) -> Result<Vec<Self::Record>, FlooringError>;

    /// The record for `key`, or the catalog's not-found error.
    fn get(&self, key: &str) -> Result<Self::Record, FlooringError>;
}

fn read_catalog<R, F>(path: &Path, what: &str, parse: F) -> Result<Vec<R>, FlooringError>
where
    F: Fn(&[&str]) -> Result<R, FlooringError>,
{
    let file = File::open(path).map_err(|e| {
        FlooringError::IoError(format!("loading {} data from {}: {}", what, path.display(), e))
    })?;

    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if idx == 0 || line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(DELIMITER).collect();
        if parts.len() != FIELD_COUNT {
            return Err(FlooringError::MalformedData(format!(
                "{} line {} requires {} fields, but received {}",
                what,
                idx + 1,
                FIELD_COUNT,
                parts.len()
            )));
        }
        records.push(parse(&parts)?);
    }
    Ok(records)
}
