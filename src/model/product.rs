use std::fmt;

use rust_decimal::Decimal;

/// Catalog entry for a flooring material, keyed by `product_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Product {
    pub product_type: String,
    pub cost_per_area: Decimal,
    pub labor_cost_per_area: Decimal,
}

impl Product {
    pub fn new(
        product_type: impl Into<String>,
        cost_per_area: Decimal,
        labor_cost_per_area: Decimal,
    ) -> Self {
        Self {
            product_type: product_type.into(),
            cost_per_area,
            labor_cost_per_area,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (${}/sqft material, ${}/sqft labor)",
            self.product_type, self.cost_per_area, self.labor_cost_per_area
        )
    }
}
