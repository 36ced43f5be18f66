use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::debug;

use crate::core::FlooringError;

use super::{PartitionInfo, parse_partition_file_name, partition_file_name};

/// A directory of `Orders_MMDDYYYY.txt` partition files.
///
/// Every handle it opens lives only as long as the call that opened it.
pub struct LocalDirectory {
    path: PathBuf,
    atomic_writes: bool,
}

impl LocalDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic_writes: true,
        }
    }

    /// When disabled, files are truncated and rewritten in place.
    pub fn with_atomic_writes(mut self, atomic_writes: bool) -> Self {
        self.atomic_writes = atomic_writes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn atomic_writes(&self) -> bool {
        self.atomic_writes
    }

    pub fn partition_path(&self, date: NaiveDate) -> Result<PathBuf, FlooringError> {
        Ok(self.path.join(partition_file_name(date)?))
    }

    /// Lists the partition files in the directory, oldest first. Files that
    /// do not follow the partition naming pattern are ignored; entries that
    /// cannot be inspected are an error.
    pub fn scan_partitions(&self) -> Result<Vec<PartitionInfo>, FlooringError> {
        let io_err = |e: std::io::Error| {
            FlooringError::IoError(format!(
                "reading directory {}: {}",
                self.path.display(),
                e
            ))
        };

        let entries = std::fs::read_dir(&self.path).map_err(io_err)?.map(|entry| {
            entry.map(|e| (e.file_name(), e.file_type().map(|t| t.is_file())))
        });
        let partitions = collect_partitions(entries).map_err(io_err)?;
        debug!(
            "found {} partitions in {}",
            partitions.len(),
            self.path.display()
        );
        Ok(partitions)
    }

    /// Opens the partition for `date`. A missing file means there are no
    /// orders for that date.
    pub fn open(&self, date: NaiveDate) -> Result<BufReader<File>, FlooringError> {
        let path = self.partition_path(date)?;
        match File::open(&path) {
            Ok(file) => Ok(BufReader::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FlooringError::NoOrdersForDate { date })
            }
            Err(e) => Err(FlooringError::IoError(format!(
                "opening {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Replaces the partition for `date` with whatever `fill` writes.
    pub fn write_partition<T, F>(&self, date: NaiveDate, fill: F) -> Result<T, FlooringError>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<T, FlooringError>,
    {
        let path = self.partition_path(date)?;
        write_file(&path, self.atomic_writes, fill)
    }
}

/// Picks the partition files out of `(name, is_file)` directory entries and
/// sorts them by date. Names that are not UTF-8 or do not match the pattern
/// are skipped; any error on a matching entry is returned.
fn collect_partitions<I>(entries: I) -> std::io::Result<Vec<PartitionInfo>>
where
    I: IntoIterator<Item = std::io::Result<(OsString, std::io::Result<bool>)>>,
{
    let mut partitions = Vec::new();
    for entry in entries {
        let (name, is_file) = entry?;
        let Ok(file_name) = name.into_string() else {
            continue;
        };
        let Some(date) = parse_partition_file_name(&file_name) else {
            continue;
        };
        if is_file? {
            partitions.push(PartitionInfo { date, file_name });
        }
    }
    partitions.sort();
    Ok(partitions)
}

/// Replaces `path` with the bytes produced by `fill`, creating parent
/// directories as needed.
///
/// With `atomic` set the data goes to a hidden sibling (`.<name>.tmp`) that is
/// renamed over the target once fully written, so readers never observe a
/// half-written file. The temp name never matches the partition pattern.
pub fn write_file<T, F>(path: &Path, atomic: bool, fill: F) -> Result<T, FlooringError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T, FlooringError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            FlooringError::IoError(format!("creating directory {}: {}", parent.display(), e))
        })?;
    }

    if !atomic {
        return write_through(path, fill);
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FlooringError::IoError(format!("invalid file name: {}", path.display())))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let result = write_through(&tmp_path, fill).and_then(|value| {
        std::fs::rename(&tmp_path, path).map_err(|e| {
            FlooringError::IoError(format!(
                "renaming {} to {}: {}",
                tmp_path.display(),
                path.display(),
                e
            ))
        })?;
        Ok(value)
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

fn write_through<T, F>(path: &Path, fill: F) -> Result<T, FlooringError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T, FlooringError>,
{
    let file = File::create(path)
        .map_err(|e| FlooringError::IoError(format!("creating {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    let value = fill(&mut writer)?;
    writer
        .flush()
        .map_err(|e| FlooringError::IoError(format!("writing {}: {}", path.display(), e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FlooringError::IoError(format!("syncing {}: {}", path.display(), e)))?;
    Ok(value)
}
