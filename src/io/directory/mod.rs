mod local;

pub use local::{LocalDirectory, write_file};

use chrono::{Datelike, NaiveDate};

use crate::core::FlooringError;

const PARTITION_PREFIX: &str = "Orders_";
const PARTITION_SUFFIX: &str = ".txt";
const PARTITION_DATE_FORMAT: &str = "%m%d%Y";

/// Years that fit the four digits of a partition name.
pub const MIN_PARTITION_YEAR: i32 = 1;
pub const MAX_PARTITION_YEAR: i32 = 9999;

/// Whether orders dated `date` can be stored under a partition name.
pub fn is_partitionable(date: NaiveDate) -> bool {
    (MIN_PARTITION_YEAR..=MAX_PARTITION_YEAR).contains(&date.year())
}

/// An order partition discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartitionInfo {
    pub date: NaiveDate,
    pub file_name: String,
}

/// `Orders_MMDDYYYY.txt` for the given date. Dates whose year does not fit
/// in four digits have no partition name.
pub fn partition_file_name(date: NaiveDate) -> Result<String, FlooringError> {
    if !is_partitionable(date) {
        return Err(FlooringError::Validation(format!(
            "order date {} is outside the years {:04} to {}",
            date, MIN_PARTITION_YEAR, MAX_PARTITION_YEAR
        )));
    }
    Ok(format!(
        "{}{}{}",
        PARTITION_PREFIX,
        date.format(PARTITION_DATE_FORMAT),
        PARTITION_SUFFIX
    ))
}

/// Parses a file name written by `partition_file_name`.
/// Returns None for anything else, including names with a valid shape but an
/// impossible date.
pub fn parse_partition_file_name(file_name: &str) -> Option<NaiveDate> {
    let digits = file_name
        .strip_prefix(PARTITION_PREFIX)?
        .strip_suffix(PARTITION_SUFFIX)?;
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(digits, PARTITION_DATE_FORMAT).ok()
}
