mod index;

use std::path::Path;

use chrono::NaiveDate;
use log::info;

use crate::conf::Config;
use crate::core::FlooringError;
use crate::io::directory::{LocalDirectory, write_file};
use crate::io::record::RecordCodec;
use crate::model::Order;

use index::Index;

/// File-backed order store, one file per order date.
///
/// The store is the only component that touches order files. Every call
/// rebuilds the index it needs from disk before acting on it; nothing is
/// cached between calls. Decoded orders carry the placeholder state name,
/// resolving it is the caller's job.
///
/// There is no locking: concurrent callers, in or across processes, can
/// overwrite each other's partitions.
pub struct OrderStore {
    dir: LocalDirectory,
    codec: RecordCodec,
}

impl OrderStore {
    pub fn new(dir: LocalDirectory, codec: RecordCodec) -> Self {
        Self { dir, codec }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            LocalDirectory::new(&config.storage.orders_dir)
                .with_atomic_writes(config.storage.atomic_writes),
            RecordCodec::new(&config.codec),
        )
    }

    pub fn directory(&self) -> &LocalDirectory {
        &self.dir
    }

    /// Orders for one date, by number.
    pub fn list(&self, date: NaiveDate) -> Result<Vec<Order>, FlooringError> {
        let mut index = Index::new();
        index.load_one(&self.dir, &self.codec, date)?;
        Ok(index.for_date(date).into_iter().cloned().collect())
    }

    /// Every stored order, by date then number.
    pub fn list_all(&self) -> Result<Vec<Order>, FlooringError> {
        let mut index = Index::new();
        index.load_all(&self.dir, &self.codec)?;
        Ok(index.sorted().into_iter().cloned().collect())
    }

    pub fn get(&self, date: NaiveDate, number: u32) -> Result<Order, FlooringError> {
        let mut index = Index::new();
        index.load_one(&self.dir, &self.codec, date)?;
        index
            .get(number)
            .cloned()
            .ok_or(FlooringError::OrderNotFound { date, number })
    }

    /// Persists a new order under the next free number and returns it as read
    /// back from disk. Any number already set on `order` is ignored.
    pub fn add(&self, order: &Order) -> Result<Order, FlooringError> {
        let mut index = Index::new();
        index.load_all(&self.dir, &self.codec)?;

        let number = index.next_number()?;
        if index.contains(number) {
            return Err(FlooringError::OrderExists(number));
        }
        let date = order.date();
        index.insert(number, order.with_number(number));
        self.write_partition(&index, date)?;

        index.load_one(&self.dir, &self.codec, date)?;
        let stored = index
            .get(number)
            .cloned()
            .ok_or(FlooringError::OrderNotFound { date, number })?;
        info!("added order #{} for {}", number, date);
        Ok(stored)
    }

    /// Replaces an existing order, keyed by its date and number, and rewrites
    /// the whole partition.
    pub fn edit(&self, order: &Order) -> Result<Order, FlooringError> {
        let number = order
            .number()
            .ok_or(FlooringError::MissingField("order number"))?;
        let date = order.date();

        let mut index = Index::new();
        index.load_one(&self.dir, &self.codec, date)?;
        if !index.contains(number) {
            return Err(FlooringError::OrderNotFound { date, number });
        }
        index.insert(number, order.clone());
        self.write_partition(&index, date)?;

        info!("edited order #{} for {}", number, date);
        Ok(order.clone())
    }

    /// Deletes an order. The partition file stays behind, header only, when
    /// its last order is removed.
    pub fn remove(&self, date: NaiveDate, number: u32) -> Result<Order, FlooringError> {
        let mut index = Index::new();
        index.load_one(&self.dir, &self.codec, date)?;
        let removed = index
            .remove(number)
            .ok_or(FlooringError::OrderNotFound { date, number })?;
        let remaining = self.write_partition(&index, date)?;

        info!(
            "removed order #{} for {} ({} remaining that day)",
            number, date, remaining
        );
        Ok(removed)
    }

    /// Writes every stored order into one file at `path`, in the partition
    /// line format. Partitions are not modified.
    pub fn export_all(&self, path: &Path) -> Result<usize, FlooringError> {
        let mut index = Index::new();
        index.load_all(&self.dir, &self.codec)?;
        let orders = index.sorted();
        let written = write_file(path, self.dir.atomic_writes(), |w| {
            self.codec.write_records(w, orders)
        })?;

        info!("exported {} orders to {}", written, path.display());
        Ok(written)
    }

    /// Number of orders across all partitions.
    pub fn count(&self) -> Result<usize, FlooringError> {
        let mut index = Index::new();
        index.load_all(&self.dir, &self.codec)?;
        Ok(index.len())
    }

    fn write_partition(&self, index: &Index, date: NaiveDate) -> Result<usize, FlooringError> {
        let orders = index.for_date(date);
        self.dir
            .write_partition(date, |w| self.codec.write_records(w, orders))
    }
}
