pub mod validator;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::warn;

use crate::conf::Config;
use crate::core::FlooringError;
use crate::io::catalog::{Catalog, ProductCatalog, TaxCatalog};
use crate::model::{Order, Product, StateTax};
use crate::store::OrderStore;

/// Entry point for the menu layer: validates orders against the catalogs
/// before they reach the store, and fills in the state names the order files
/// do not keep.
pub struct FlooringService<P = ProductCatalog, T = TaxCatalog> {
    store: OrderStore,
    products: P,
    taxes: T,
    export_file: PathBuf,
}

impl FlooringService {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            OrderStore::from_config(config),
            ProductCatalog::new(&config.storage.products_file),
            TaxCatalog::new(&config.storage.taxes_file),
            config.storage.export_file.clone(),
        )
    }
}

impl<P, T> FlooringService<P, T>
where
    P: Catalog<Record = Product>,
    T: Catalog<Record = StateTax>,
{
    pub fn new(store: OrderStore, products: P, taxes: T, export_file: PathBuf) -> Self {
        Self {
            store,
            products,
            taxes,
            export_file,
        }
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    pub fn export_path(&self) -> &Path {
        &self.export_file
    }

    pub fn products(&self) -> Result<Vec<Product>, FlooringError> {
        self.products.get_all()
    }

    pub fn state_taxes(&self) -> Result<Vec<StateTax>, FlooringError> {
        self.taxes.get_all()
    }

    pub fn product(&self, product_type: &str) -> Result<Product, FlooringError> {
        self.products.get(product_type)
    }

    pub fn state_tax(&self, abbreviation: &str) -> Result<StateTax, FlooringError> {
        self.taxes.get(abbreviation)
    }

    pub fn validate_order(&self, order: &Order) -> Result<(), FlooringError> {
        validator::validate_order(order, &self.products, &self.taxes)
    }

    pub fn orders_for_date(&self, date: NaiveDate) -> Result<Vec<Order>, FlooringError> {
        let orders = self.store.list(date)?;
        self.resolve_state_names(orders)
    }

    pub fn all_orders(&self) -> Result<Vec<Order>, FlooringError> {
        let orders = self.store.list_all()?;
        self.resolve_state_names(orders)
    }

    pub fn get_order(&self, date: NaiveDate, number: u32) -> Result<Order, FlooringError> {
        let order = self.store.get(date, number)?;
        let mut resolved = self.resolve_state_names(vec![order])?;
        resolved
            .pop()
            .ok_or(FlooringError::OrderNotFound { date, number })
    }

    pub fn add_order(&self, order: &Order) -> Result<Order, FlooringError> {
        self.validate_order(order)?;
        let added = self.store.add(order)?;
        Ok(added.with_state_tax(order.state_tax().clone()))
    }

    /// Checks an edited order against the catalogs. A product price or tax
    /// rate kept from the stored order stays valid after the catalog moves.
    pub fn validate_edit(&self, order: &Order) -> Result<(), FlooringError> {
        let number = order
            .number()
            .ok_or(FlooringError::MissingField("order number"))?;
        let stored = self.store.get(order.date(), number)?;
        validator::validate_edited_order(order, &stored, &self.products, &self.taxes)
    }

    pub fn edit_order(&self, order: &Order) -> Result<Order, FlooringError> {
        self.validate_edit(order)?;
        self.store.edit(order)
    }

    /// Removes the order and returns it. The state name is resolved when the
    /// catalog still knows the state; a stale reference does not block removal.
    pub fn remove_order(&self, date: NaiveDate, number: u32) -> Result<Order, FlooringError> {
        let removed = self.store.remove(date, number)?;
        match self.resolve_state_names(vec![removed.clone()]) {
            Ok(mut resolved) => Ok(resolved.pop().unwrap_or(removed)),
            Err(e) => {
                warn!("removed order #{} has an unresolvable state: {}", number, e);
                Ok(removed)
            }
        }
    }

    /// Writes every order to the configured export file.
    pub fn export_all(&self) -> Result<usize, FlooringError> {
        self.store.export_all(&self.export_file)
    }

    pub fn total_order_count(&self) -> Result<usize, FlooringError> {
        self.store.count()
    }

    /// Swaps the placeholder state name for the catalog's. The tax rate the
    /// order was placed with is kept even if the catalog rate has changed.
    fn resolve_state_names(&self, orders: Vec<Order>) -> Result<Vec<Order>, FlooringError> {
        let names: HashMap<String, String> = self
            .taxes
            .get_all()?
            .into_iter()
            .map(|t| (t.abbreviation, t.state_name))
            .collect();

        orders
            .into_iter()
            .map(|order| {
                let snapshot = order.state_tax();
                let name = names.get(&snapshot.abbreviation).ok_or_else(|| {
                    FlooringError::StaleCatalog(format!(
                        "order #{} references state tax \"{}\" which no longer exists",
                        order.number().unwrap_or_default(),
                        snapshot.abbreviation
                    ))
                })?;
                let resolved = StateTax {
                    state_name: name.clone(),
                    ..snapshot.clone()
                };
                Ok(order.with_state_tax(resolved))
            })
            .collect()
    }
}
