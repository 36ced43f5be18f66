use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::FlooringError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_orders_dir")]
    pub orders_dir: PathBuf,
    #[serde(default = "StorageConfig::default_products_file")]
    pub products_file: PathBuf,
    #[serde(default = "StorageConfig::default_taxes_file")]
    pub taxes_file: PathBuf,
    #[serde(default = "StorageConfig::default_export_file")]
    pub export_file: PathBuf,
    #[serde(default = "StorageConfig::default_atomic_writes")]
    pub atomic_writes: bool,
}

impl StorageConfig {
    fn default_orders_dir() -> PathBuf {
        PathBuf::from("Data/Orders")
    }

    fn default_products_file() -> PathBuf {
        PathBuf::from("Data/Products.txt")
    }

    fn default_taxes_file() -> PathBuf {
        PathBuf::from("Data/Taxes.txt")
    }

    fn default_export_file() -> PathBuf {
        PathBuf::from("Backup/DataExport.txt")
    }

    fn default_atomic_writes() -> bool {
        true
    }

    /// Rebases every relative path onto `root`. Absolute paths are kept.
    pub fn rooted_at(&self, root: &Path) -> Self {
        let rebase = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        Self {
            orders_dir: rebase(&self.orders_dir),
            products_file: rebase(&self.products_file),
            taxes_file: rebase(&self.taxes_file),
            export_file: rebase(&self.export_file),
            atomic_writes: self.atomic_writes,
        }
    }

    /// Creates the orders directory when absent and checks that it accepts writes.
    pub fn prepare_orders_dir(&self) -> Result<(), FlooringError> {
        let dir = &self.orders_dir;
        if !dir.is_dir() {
            std::fs::create_dir_all(dir).map_err(|e| {
                FlooringError::IoError(format!("creating {}: {}", dir.display(), e))
            })?;
            info!("Created orders dir: {}", dir.display());
        }
        if !is_dir_writable(dir) {
            return Err(FlooringError::IoError(format!(
                "{}: not writable",
                dir.display()
            )));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            orders_dir: Self::default_orders_dir(),
            products_file: Self::default_products_file(),
            taxes_file: Self::default_taxes_file(),
            export_file: Self::default_export_file(),
            atomic_writes: Self::default_atomic_writes(),
        }
    }
}

fn is_dir_writable(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let probe = path.join(".flooring_write_probe");
    let ok = std::fs::write(&probe, b"").is_ok();
    let _ = std::fs::remove_file(&probe);
    ok
}
