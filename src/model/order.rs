use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::FlooringError;

use super::money::round2;
use super::{Product, StateTax};

/// An installation order. Immutable once built; edits go through the
/// `with_*` methods, which return a modified copy.
///
/// `number` is `None` for drafts that have not been persisted yet. The order
/// store assigns it on add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    date: NaiveDate,
    number: Option<u32>,
    customer_name: String,
    area: Decimal,
    product: Product,
    state_tax: StateTax,
}

impl Order {
    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn area(&self) -> Decimal {
        self.area
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn state_tax(&self) -> &StateTax {
        &self.state_tax
    }

    pub fn material_cost(&self) -> Decimal {
        round2(self.area * self.product.cost_per_area)
    }

    pub fn labor_cost(&self) -> Decimal {
        round2(self.area * self.product.labor_cost_per_area)
    }

    pub fn tax(&self) -> Decimal {
        let subtotal = self.material_cost() + self.labor_cost();
        round2(subtotal * self.state_tax.tax_rate / Decimal::ONE_HUNDRED)
    }

    pub fn total(&self) -> Decimal {
        round2(self.material_cost() + self.labor_cost() + self.tax())
    }

    /// Fails when any derived amount would not fit in a `Decimal`. The cost
    /// methods above assume this holds.
    pub fn check_amounts(&self) -> Result<(), FlooringError> {
        self.checked_total().map(|_| ()).ok_or_else(|| {
            FlooringError::MalformedData(format!(
                "amounts are too large: area {}, costs {} and {} per sqft, tax rate {}",
                self.area,
                self.product.cost_per_area,
                self.product.labor_cost_per_area,
                self.state_tax.tax_rate
            ))
        })
    }

    fn checked_total(&self) -> Option<Decimal> {
        let material = round2(self.area.checked_mul(self.product.cost_per_area)?);
        let labor = round2(self.area.checked_mul(self.product.labor_cost_per_area)?);
        let subtotal = material.checked_add(labor)?;
        let tax = round2(
            subtotal
                .checked_mul(self.state_tax.tax_rate)?
                .checked_div(Decimal::ONE_HUNDRED)?,
        );
        Some(round2(subtotal.checked_add(tax)?))
    }

    pub fn with_number(&self, number: u32) -> Self {
        Self {
            number: Some(number),
            ..self.clone()
        }
    }

    pub fn with_customer_name(&self, customer_name: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            ..self.clone()
        }
    }

    pub fn with_area(&self, area: Decimal) -> Self {
        Self {
            area: round2(area),
            ..self.clone()
        }
    }

    pub fn with_product(&self, product: Product) -> Self {
        Self {
            product,
            ..self.clone()
        }
    }

    pub fn with_state_tax(&self, state_tax: StateTax) -> Self {
        Self {
            state_tax,
            ..self.clone()
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(number) => write!(f, "Order #{}", number)?,
            None => write!(f, "New order")?,
        }
        writeln!(
            f,
            " on {} for {} | Area: {}",
            self.date.format("%m/%d/%Y"),
            self.customer_name,
            self.area
        )?;
        writeln!(f, "\tState Tax: {}", self.state_tax)?;
        writeln!(f, "\tProduct: {}", self.product)?;
        write!(
            f,
            "\tMaterial: ${} | Labor: ${} | Tax: ${} | Total: ${}",
            self.material_cost(),
            self.labor_cost(),
            self.tax(),
            self.total()
        )
    }
}

/// Collects the fields of an order. `build` refuses to produce an order with
/// any required field unset.
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    date: Option<NaiveDate>,
    number: Option<u32>,
    customer_name: Option<String>,
    area: Option<Decimal>,
    product: Option<Product>,
    state_tax: Option<StateTax>,
}

impl OrderBuilder {
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn customer_name(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = Some(customer_name.into());
        self
    }

    pub fn area(mut self, area: Decimal) -> Self {
        self.area = Some(area);
        self
    }

    pub fn product(mut self, product: Product) -> Self {
        self.product = Some(product);
        self
    }

    pub fn state_tax(mut self, state_tax: StateTax) -> Self {
        self.state_tax = Some(state_tax);
        self
    }

    pub fn build(self) -> Result<Order, FlooringError> {
        Ok(Order {
            date: self.date.ok_or(FlooringError::MissingField("order date"))?,
            number: self.number,
            customer_name: self
                .customer_name
                .ok_or(FlooringError::MissingField("customer name"))?,
            area: round2(self.area.ok_or(FlooringError::MissingField("area"))?),
            product: self.product.ok_or(FlooringError::MissingField("product"))?,
            state_tax: self
                .state_tax
                .ok_or(FlooringError::MissingField("state tax"))?,
        })
    }
}
