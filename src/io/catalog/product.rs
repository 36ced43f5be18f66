use std::path::PathBuf;

use crate::core::FlooringError;
use crate::model::Product;
use crate::model::money::parse_decimal;

use super::{Catalog, read_catalog};

/// `ProductType,CostPerSquareFoot,LaborCostPerSquareFoot`
pub struct ProductCatalog {
    path: PathBuf,
}

impl ProductCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Vec<Product>, FlooringError> {
        read_catalog(&self.path, "product", |parts| {
            Ok(Product::new(
                parts[0].trim(),
                parse_decimal(parts[1])?,
                parse_decimal(parts[2])?,
            ))
        })
    }
}

impl Catalog for ProductCatalog {
    type Record = Product;

    fn get_all(&self) -> Result<Vec<Product>, FlooringError> {
        let mut products = self.load()?;
        products.sort_by(|a, b| a.product_type.cmp(&b.product_type));
        Ok(products)
    }

    fn get(&self, product_type: &str) -> Result<Product, FlooringError> {
        self.load()?
            .into_iter()
            .find(|p| p.product_type == product_type)
            .ok_or_else(|| FlooringError::ProductNotFound(product_type.to_string()))
    }
}
