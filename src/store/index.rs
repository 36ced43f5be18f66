use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;

use crate::core::FlooringError;
use crate::io::directory::LocalDirectory;
use crate::io::record::RecordCodec;
use crate::model::Order;

/// Orders loaded from one or more partitions, keyed by order number.
///
/// Built fresh inside each store call and dropped when it returns; nothing in
/// it is trusted across calls.
#[derive(Debug, Default)]
pub(crate) struct Index {
    orders: HashMap<u32, Order>,
}

impl Index {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces every indexed order dated `date` with the partition's current
    /// content. Returns the number of orders read.
    pub(crate) fn load_one(
        &mut self,
        dir: &LocalDirectory,
        codec: &RecordCodec,
        date: NaiveDate,
    ) -> Result<usize, FlooringError> {
        let path = dir.partition_path(date)?;
        let reader = dir.open(date)?;
        let loaded = codec.read_records(reader, date).map_err(|e| match e {
            FlooringError::MalformedData(msg) => {
                FlooringError::MalformedData(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        self.orders.retain(|_, order| order.date() != date);
        let count = loaded.len();
        for order in loaded {
            // decoded orders always carry a number
            let number = order.number().ok_or(FlooringError::MissingField("order number"))?;
            if let Some(existing) = self.orders.get(&number) {
                return Err(FlooringError::MalformedData(format!(
                    "order number {} appears more than once (dated {} and {})",
                    number,
                    existing.date(),
                    date
                )));
            }
            self.orders.insert(number, order);
        }
        debug!("loaded {} orders for {}", count, date);
        Ok(count)
    }

    /// Clears the index and loads every partition in the directory. Stops at
    /// the first partition that cannot be read or decoded.
    pub(crate) fn load_all(
        &mut self,
        dir: &LocalDirectory,
        codec: &RecordCodec,
    ) -> Result<(), FlooringError> {
        self.orders.clear();
        for partition in dir.scan_partitions()? {
            self.load_one(dir, codec, partition.date)?;
        }
        debug!("loaded {} orders across all partitions", self.orders.len());
        Ok(())
    }

    /// One past the highest number indexed, or 1 when empty.
    pub(crate) fn next_number(&self) -> Result<u32, FlooringError> {
        match self.orders.keys().max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                FlooringError::MalformedData(format!(
                    "order numbers exhausted: highest stored number is {}",
                    max
                ))
            }),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.orders.len()
    }

    pub(crate) fn contains(&self, number: u32) -> bool {
        self.orders.contains_key(&number)
    }

    pub(crate) fn get(&self, number: u32) -> Option<&Order> {
        self.orders.get(&number)
    }

    pub(crate) fn insert(&mut self, number: u32, order: Order) -> Option<Order> {
        self.orders.insert(number, order)
    }

    pub(crate) fn remove(&mut self, number: u32) -> Option<Order> {
        self.orders.remove(&number)
    }

    /// Orders dated `date`, by number.
    pub(crate) fn for_date(&self, date: NaiveDate) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self
            .orders
            .values()
            .filter(|order| order.date() == date)
            .collect();
        orders.sort_by_key(|order| order.number());
        orders
    }

    /// Every order, by date then number.
    pub(crate) fn sorted(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.values().collect();
        orders.sort_by_key(|order| (order.date(), order.number()));
        orders
    }
}
