use std::fs;

use rust_decimal_macros::dec;

use flooring::core::{ErrorKind, FlooringError};
use flooring::io::catalog::{Catalog, ProductCatalog};
use flooring::model::{PLACEHOLDER_STATE_NAME, Product, StateTax};
use flooring::service::FlooringService;
use flooring::store::OrderStore;
use flooring::testutil::{
    TAXES_HEADER, TestEnv, date, empty_env, sample_env, sample_order,
};

/// A tax table held in memory, for catalogs that drift from the order files.
struct FixedTaxes(Vec<StateTax>);

impl Catalog for FixedTaxes {
    type Record = StateTax;

    fn get_all(&self) -> Result<Vec<StateTax>, FlooringError> {
        Ok(self.0.clone())
    }

    fn get(&self, abbreviation: &str) -> Result<StateTax, FlooringError> {
        self.0
            .iter()
            .find(|t| t.abbreviation == abbreviation)
            .cloned()
            .ok_or_else(|| FlooringError::StateTaxNotFound(abbreviation.to_string()))
    }
}

fn with_taxes(env: &TestEnv, taxes: Vec<StateTax>) -> FlooringService<ProductCatalog, FixedTaxes> {
    let storage = &env.config.storage;
    FlooringService::new(
        OrderStore::from_config(&env.config),
        ProductCatalog::new(&storage.products_file),
        FixedTaxes(taxes),
        storage.export_file.clone(),
    )
}

#[test]
fn test_orders_for_date_resolve_state_names() {
    let env = sample_env();
    let service = FlooringService::from_config(&env.config);
    let orders = service.orders_for_date(date(6, 2, 2013)).unwrap();
    let names: Vec<&str> = orders
        .iter()
        .map(|o| o.state_tax().state_name.as_str())
        .collect();
    assert_eq!(names, vec!["Washington", "Kentucky"]);
}

#[test]
fn test_add_order_scenario() {
    let env = empty_env();
    let service = FlooringService::from_config(&env.config);
    let draft = sample_order(date(6, 1, 2013), "Ada Lovelace", dec!(249.00));

    let added = service.add_order(&draft).unwrap();
    assert_eq!(added.number(), Some(1));
    assert_eq!(added.state_tax().state_name, "California");
    assert_eq!(added.material_cost(), dec!(871.50));
    assert_eq!(added.labor_cost(), dec!(1033.35));
    assert_eq!(added.tax(), dec!(476.21));
    assert_eq!(added.total(), dec!(2381.06));

    assert_eq!(service.get_order(date(6, 1, 2013), 1).unwrap(), added);
}

#[test]
fn test_add_order_rejects_unknown_product() {
    let env = empty_env();
    let service = FlooringService::from_config(&env.config);
    let draft = sample_order(date(6, 1, 2013), "Ada Lovelace", dec!(249.00))
        .with_product(Product::new("Marble", dec!(9.00), dec!(9.00)));

    let err = service.add_order(&draft).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(service.total_order_count().unwrap(), 0);
    assert!(
        !service
            .store()
            .directory()
            .partition_path(date(6, 1, 2013))
            .unwrap()
            .exists()
    );
}

#[test]
fn test_add_order_rejects_rate_not_in_catalog() {
    let env = empty_env();
    let service = FlooringService::from_config(&env.config);
    let draft = sample_order(date(6, 1, 2013), "Ada Lovelace", dec!(249.00))
        .with_state_tax(StateTax::new("CA", "California", dec!(20.00)));
    assert!(matches!(
        service.add_order(&draft),
        Err(FlooringError::Validation(_))
    ));
}

#[test]
fn test_add_order_rejects_bad_fields() {
    let env = empty_env();
    let service = FlooringService::from_config(&env.config);
    for draft in [
        sample_order(date(6, 1, 2013), "Ada; DROP", dec!(249.00)),
        sample_order(date(6, 1, 2013), "Ada Lovelace", dec!(99.99)),
    ] {
        assert_eq!(service.add_order(&draft).unwrap_err().kind(), ErrorKind::Validation);
    }
}

#[test]
fn test_edit_order_recomputes_tax() {
    let env = sample_env();
    let service = FlooringService::from_config(&env.config);
    let ada = service.get_order(date(6, 1, 2013), 1).unwrap();

    service.edit_order(&ada.with_area(dec!(300.00))).unwrap();
    let edited = service.get_order(date(6, 1, 2013), 1).unwrap();
    assert_eq!(edited.tax(), dec!(573.75));
    assert_eq!(edited.total(), dec!(2868.75));
    assert_eq!(edited.customer_name(), "Ada Lovelace");
}

#[test]
fn test_edit_keeps_stored_rate_after_catalog_change() {
    let env = sample_env();
    let taxes = format!("{}\nCA,California,26.00\n", TAXES_HEADER);
    fs::write(&env.config.storage.taxes_file, taxes).unwrap();
    let service = FlooringService::from_config(&env.config);
    let cur = service.get_order(date(6, 1, 2013), 1).unwrap();

    service.edit_order(&cur.with_customer_name("Ada King")).unwrap();
    let edited = service.get_order(date(6, 1, 2013), 1).unwrap();
    assert_eq!(edited.customer_name(), "Ada King");
    assert_eq!(edited.state_tax().tax_rate, dec!(25.00));
    assert_eq!(edited.total(), dec!(2381.06));

    // a rate that is neither stored nor listed is still refused
    let other = cur.with_state_tax(StateTax::new("CA", "California", dec!(20.00)));
    assert_eq!(service.edit_order(&other).unwrap_err().kind(), ErrorKind::Validation);
    // moving to the current rate works
    let current = cur.with_state_tax(StateTax::new("CA", "California", dec!(26.00)));
    service.edit_order(&current).unwrap();
    assert_eq!(
        service.get_order(date(6, 1, 2013), 1).unwrap().state_tax().tax_rate,
        dec!(26.00)
    );
}

#[test]
fn test_edit_unsaved_order_is_refused() {
    let env = sample_env();
    let service = FlooringService::from_config(&env.config);
    let draft = sample_order(date(6, 1, 2013), "Ada Lovelace", dec!(249.00));
    assert_eq!(
        service.edit_order(&draft),
        Err(FlooringError::MissingField("order number"))
    );
}

#[test]
fn test_add_order_rejects_five_digit_year() {
    let env = empty_env();
    let service = FlooringService::from_config(&env.config);
    let draft = sample_order(date(1, 1, 10000), "Ada Lovelace", dec!(249.00));
    assert!(matches!(
        service.add_order(&draft),
        Err(FlooringError::Validation(msg)) if msg.contains("outside the years")
    ));
    assert_eq!(service.total_order_count().unwrap(), 0);
}

#[test]
fn test_remove_order_returns_resolved_order() {
    let env = sample_env();
    let service = FlooringService::from_config(&env.config);
    let removed = service.remove_order(date(6, 2, 2013), 3).unwrap();
    assert_eq!(removed.customer_name(), "Albert Einstein");
    assert_eq!(removed.state_tax().state_name, "Kentucky");
    assert!(
        service
            .get_order(date(6, 2, 2013), 3)
            .unwrap_err()
            .is_not_found()
    );
}

#[test]
fn test_snapshot_rate_survives_catalog_change() {
    let env = sample_env();
    let service = with_taxes(
        &env,
        vec![StateTax::new("CA", "California", dec!(30.00))],
    );
    let ada = service.get_order(date(6, 1, 2013), 1).unwrap();
    assert_eq!(ada.state_tax().state_name, "California");
    assert_eq!(ada.state_tax().tax_rate, dec!(25.00));
    assert_eq!(ada.total(), dec!(2381.06));
}

#[test]
fn test_stale_state_reference() {
    let env = sample_env();
    let service = with_taxes(&env, vec![StateTax::new("TX", "Texas", dec!(4.45))]);

    assert!(matches!(
        service.orders_for_date(date(6, 1, 2013)),
        Err(FlooringError::StaleCatalog(_))
    ));
    // removal still goes through
    let removed = service.remove_order(date(6, 1, 2013), 1).unwrap();
    assert_eq!(removed.state_tax().state_name, PLACEHOLDER_STATE_NAME);
}

#[test]
fn test_missing_catalog_file() {
    let env = empty_env();
    fs::remove_file(&env.config.storage.products_file).unwrap();
    let service = FlooringService::from_config(&env.config);

    assert!(matches!(service.products(), Err(FlooringError::IoError(_))));
    let draft = sample_order(date(6, 1, 2013), "Ada Lovelace", dec!(249.00));
    assert_eq!(service.add_order(&draft).unwrap_err().kind(), ErrorKind::Validation);
}

#[test]
fn test_catalogs_sorted_by_key() {
    let env = empty_env();
    let service = FlooringService::from_config(&env.config);
    let types: Vec<String> = service
        .products()
        .unwrap()
        .into_iter()
        .map(|p| p.product_type)
        .collect();
    assert_eq!(types, vec!["Carpet", "Laminate", "Tile", "Wood"]);
    assert_eq!(service.state_tax("TX").unwrap().state_name, "Texas");
    assert_eq!(
        service.product("Stone"),
        Err(FlooringError::ProductNotFound("Stone".to_string()))
    );
}

#[test]
fn test_export_all() {
    let env = sample_env();
    let service = FlooringService::from_config(&env.config);
    assert_eq!(service.export_all().unwrap(), 3);
    let lines = fs::read_to_string(service.export_path()).unwrap();
    assert_eq!(lines.lines().count(), 4);
}
