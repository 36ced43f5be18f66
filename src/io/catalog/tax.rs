use std::path::PathBuf;

use crate::core::FlooringError;
use crate::model::StateTax;
use crate::model::money::parse_decimal;

use super::{Catalog, read_catalog};

/// `State,StateName,TaxRate`
pub struct TaxCatalog {
    path: PathBuf,
}

impl TaxCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Vec<StateTax>, FlooringError> {
        read_catalog(&self.path, "state tax", |parts| {
            Ok(StateTax::new(
                parts[0].trim(),
                parts[1].trim(),
                parse_decimal(parts[2])?,
            ))
        })
    }
}

impl Catalog for TaxCatalog {
    type Record = StateTax;

    fn get_all(&self) -> Result<Vec<StateTax>, FlooringError> {
        let mut taxes = self.load()?;
        taxes.sort_by(|a, b| a.abbreviation.cmp(&b.abbreviation));
        Ok(taxes)
    }

    fn get(&self, abbreviation: &str) -> Result<StateTax, FlooringError> {
        self.load()?
            .into_iter()
            .find(|t| t.abbreviation == abbreviation)
            .ok_or_else(|| FlooringError::StateTaxNotFound(abbreviation.to_string()))
    }
}
