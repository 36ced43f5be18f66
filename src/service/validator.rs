//! Field-level business rules checked before an order reaches the store.

use rust_decimal::Decimal;

use crate::core::FlooringError;
use crate::io::catalog::Catalog;
use crate::io::directory::{MAX_PARTITION_YEAR, MIN_PARTITION_YEAR, is_partitionable};
use crate::model::{Order, Product, StateTax};

pub const MAX_CUSTOMER_NAME_CHARS: usize = 50;
pub const MIN_AREA: Decimal = Decimal::from_parts(10000, 0, 0, false, 2);
pub const MAX_AREA: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 2);

fn invalid(msg: impl Into<String>) -> FlooringError {
    FlooringError::Validation(msg.into())
}

/// 1 to 50 characters of `[A-Za-z0-9., ]`, not starting with a space.
pub fn validate_customer_name(name: &str) -> Result<(), FlooringError> {
    if name.trim().is_empty() {
        return Err(invalid("customer name is blank"));
    }
    if name.starts_with(' ') {
        return Err(invalid("customer name starts with a space"));
    }
    if name.chars().count() > MAX_CUSTOMER_NAME_CHARS {
        return Err(invalid(format!(
            "customer name is longer than {} characters",
            MAX_CUSTOMER_NAME_CHARS
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | ',' | ' ')))
    {
        return Err(invalid(format!(
            "customer name contains '{}'; only letters, digits, periods, commas and spaces are allowed",
            c
        )));
    }
    Ok(())
}

pub fn validate_area(area: Decimal) -> Result<(), FlooringError> {
    if area < MIN_AREA {
        return Err(invalid(format!("area of {} is less than {}", area, MIN_AREA)));
    }
    if area > MAX_AREA {
        return Err(invalid(format!("area of {} is more than {}", area, MAX_AREA)));
    }
    Ok(())
}

fn validate_product_fields(product: &Product) -> Result<(), FlooringError> {
    if product.product_type.trim().is_empty() {
        return Err(invalid("product has no type"));
    }
    if product.cost_per_area.is_sign_negative() {
        return Err(invalid(format!(
            "product has a cost per sqft of {}",
            product.cost_per_area
        )));
    }
    if product.labor_cost_per_area.is_sign_negative() {
        return Err(invalid(format!(
            "product has a labor cost per sqft of {}",
            product.labor_cost_per_area
        )));
    }
    Ok(())
}

fn validate_state_tax_fields(tax: &StateTax) -> Result<(), FlooringError> {
    if tax.abbreviation.trim().is_empty() {
        return Err(invalid("state tax has no abbreviation"));
    }
    if tax.state_name.trim().is_empty() {
        return Err(invalid("state tax has no state name"));
    }
    if tax.tax_rate.is_sign_negative() {
        return Err(invalid(format!("state tax has a rate of {}", tax.tax_rate)));
    }
    Ok(())
}

/// Checks `order`'s own fields, then that its product and tax snapshots
/// match the catalogs exactly. Catalog read failures are reported as
/// validation failures.
pub fn validate_order<P, T>(order: &Order, products: &P, taxes: &T) -> Result<(), FlooringError>
where
    P: Catalog<Record = Product>,
    T: Catalog<Record = StateTax>,
{
    check_order(order, None, products, taxes)
}

/// Like [`validate_order`], but a product or tax rate carried over unchanged
/// from `stored` is accepted even if the catalog price has moved since, as
/// long as the catalog still lists that product type or state.
pub fn validate_edited_order<P, T>(
    order: &Order,
    stored: &Order,
    products: &P,
    taxes: &T,
) -> Result<(), FlooringError>
where
    P: Catalog<Record = Product>,
    T: Catalog<Record = StateTax>,
{
    check_order(order, Some(stored), products, taxes)
}

fn check_order<P, T>(
    order: &Order,
    stored: Option<&Order>,
    products: &P,
    taxes: &T,
) -> Result<(), FlooringError>
where
    P: Catalog<Record = Product>,
    T: Catalog<Record = StateTax>,
{
    if !is_partitionable(order.date()) {
        return Err(invalid(format!(
            "order date {} is outside the years {:04} to {}",
            order.date(),
            MIN_PARTITION_YEAR,
            MAX_PARTITION_YEAR
        )));
    }
    validate_customer_name(order.customer_name())?;
    validate_area(order.area())?;

    let product = order.product();
    validate_product_fields(product)?;
    let kept_product = stored.is_some_and(|s| s.product() == product);
    match products.get(&product.product_type) {
        Ok(found) if &found == product || kept_product => {}
        Ok(_) => {
            return Err(invalid(format!(
                "product {} does not match the catalog",
                product.product_type
            )));
        }
        Err(FlooringError::ProductNotFound(t)) => {
            return Err(invalid(format!("product {} does not exist", t)));
        }
        Err(e) => {
            return Err(invalid(format!("product could not be checked: {}", e)));
        }
    }

    let tax = order.state_tax();
    validate_state_tax_fields(tax)?;
    let kept_rate = stored.is_some_and(|s| {
        s.state_tax().abbreviation == tax.abbreviation && s.state_tax().tax_rate == tax.tax_rate
    });
    match taxes.get(&tax.abbreviation) {
        Ok(found) if &found == tax => {}
        Ok(found) if kept_rate && found.state_name == tax.state_name => {}
        Ok(_) => {
            return Err(invalid(format!(
                "state tax {} does not match the catalog",
                tax.abbreviation
            )));
        }
        Err(FlooringError::StateTaxNotFound(a)) => {
            return Err(invalid(format!("state tax {} does not exist", a)));
        }
        Err(e) => {
            return Err(invalid(format!("state tax could not be checked: {}", e)));
        }
    }

    order
        .check_amounts()
        .map_err(|_| invalid("order amounts are too large to total"))
}
