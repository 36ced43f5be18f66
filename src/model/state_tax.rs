use std::fmt;

use rust_decimal::Decimal;

/// Display name carried by tax snapshots decoded from order files, which only
/// store the abbreviation and rate.
pub const PLACEHOLDER_STATE_NAME: &str = "Not Loaded";

/// Catalog entry for a state's tax rate, keyed by `abbreviation`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateTax {
    pub abbreviation: String,
    pub state_name: String,
    /// Percentage, e.g. `25.00` for 25%.
    pub tax_rate: Decimal,
}

impl StateTax {
    pub fn new(
        abbreviation: impl Into<String>,
        state_name: impl Into<String>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            state_name: state_name.into(),
            tax_rate,
        }
    }

    pub fn unresolved(abbreviation: impl Into<String>, tax_rate: Decimal) -> Self {
        Self::new(abbreviation, PLACEHOLDER_STATE_NAME, tax_rate)
    }

    pub fn is_resolved(&self) -> bool {
        self.state_name != PLACEHOLDER_STATE_NAME
    }
}

impl fmt::Display for StateTax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {:.2}%",
            self.state_name, self.abbreviation, self.tax_rate
        )
    }
}
