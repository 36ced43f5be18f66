//! Fixtures for integration tests.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::TempDir;

use crate::conf::{Config, StorageConfig};
use crate::io::directory::partition_file_name;
use crate::io::record::HEADER;
use crate::model::{Order, Product, StateTax};

pub const PRODUCTS_HEADER: &str = "ProductType,CostPerSquareFoot,LaborCostPerSquareFoot";
pub const TAXES_HEADER: &str = "State,StateName,TaxRate";

pub const PRODUCT_LINES: [&str; 4] = [
    "Carpet,2.25,2.10",
    "Laminate,1.75,2.10",
    "Tile,3.50,4.15",
    "Wood,5.15,4.75",
];

pub const TAX_LINES: [&str; 4] = [
    "CA,California,25.00",
    "KY,Kentucky,6.00",
    "TX,Texas,4.45",
    "WA,Washington,9.25",
];

pub const ADA_LINE: &str =
    "1,Ada Lovelace,CA,25.00,Tile,249.00,3.50,4.15,871.50,1033.35,476.21,2381.06";
pub const WHO_LINE: &str =
    "2,Doctor Who,WA,9.25,Wood,243.00,5.15,4.75,1251.45,1154.25,222.53,2628.23";
pub const EINSTEIN_LINE: &str =
    "3,Albert Einstein,KY,6.00,Carpet,217.00,2.25,2.10,488.25,455.70,56.64,1000.59";

pub fn date(month: u32, day: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn sample_product() -> Product {
    Product::new("Tile", Decimal::new(350, 2), Decimal::new(415, 2))
}

pub fn sample_tax() -> StateTax {
    StateTax::new("CA", "California", Decimal::new(2500, 2))
}

/// An unnumbered Tile order in California.
pub fn sample_order(on: NaiveDate, customer_name: &str, area: Decimal) -> Order {
    Order::builder()
        .date(on)
        .customer_name(customer_name)
        .area(area)
        .product(sample_product())
        .state_tax(sample_tax())
        .build()
        .unwrap()
}

pub fn write_partition(orders_dir: &Path, on: NaiveDate, lines: &[&str]) {
    fs::create_dir_all(orders_dir).unwrap();
    let mut content = format!("{}\n", HEADER);
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(orders_dir.join(partition_file_name(on).unwrap()), content).unwrap();
}

/// Order #1 on 06/01/2013, orders #2 and #3 on 06/02/2013.
pub fn write_sample_orders(orders_dir: &Path) {
    write_partition(orders_dir, date(6, 1, 2013), &[ADA_LINE]);
    write_partition(orders_dir, date(6, 2, 2013), &[WHO_LINE, EINSTEIN_LINE]);
}

pub fn write_sample_catalogs(storage: &StorageConfig) {
    write_lines(&storage.products_file, PRODUCTS_HEADER, &PRODUCT_LINES);
    write_lines(&storage.taxes_file, TAXES_HEADER, &TAX_LINES);
}

fn write_lines(path: &Path, header: &str, lines: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut content = format!("{}\n", header);
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content).unwrap();
}

/// A temporary data root with catalogs in place. Keep the value alive for
/// as long as the files are needed.
pub struct TestEnv {
    pub dir: TempDir,
    pub config: Config,
}

/// Catalogs only, no order files.
pub fn empty_env() -> TestEnv {
    let dir = TempDir::new().unwrap();
    let config = Config {
        storage: StorageConfig::default().rooted_at(dir.path()),
        ..Config::default()
    };
    write_sample_catalogs(&config.storage);
    config.storage.prepare_orders_dir().unwrap();
    TestEnv { dir, config }
}

/// Catalogs plus the three sample orders.
pub fn sample_env() -> TestEnv {
    let env = empty_env();
    write_sample_orders(&env.config.storage.orders_dir);
    env
}
