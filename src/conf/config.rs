use std::path::Path;

use crate::{
    conf::{CodecConfig, StorageConfig},
    core::FlooringError::{self, ConfigParsingError},
};
use config::{Config as CConfig, ConfigBuilder, Environment, builder::DefaultState};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "FLOORING";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub codec: CodecConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, FlooringError> {
        Self::build(
            CConfig::builder()
                .add_source(config::File::from_str(toml_str, config::FileFormat::Toml)),
        )
    }

    /// Reads an optional TOML file, then applies `FLOORING_*` environment
    /// overrides (`FLOORING_STORAGE__ORDERS_DIR=...`).
    pub fn load(path: Option<&Path>) -> Result<Config, FlooringError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigParsingError(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            builder = builder.add_source(
                config::File::from(path).format(config::FileFormat::Toml),
            );
        }
        Self::build(
            builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
        )
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, FlooringError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        config.codec.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn load_correct_toml() {
        let toml = r#"
        [storage]
        orders_dir = "/srv/orders"
        atomic_writes = false

        [codec]
        comma_escape = "|"
        "#;
        let conf = Config::from_str(toml).unwrap();
        assert_eq!(conf.storage.orders_dir, PathBuf::from("/srv/orders"));
        assert!(!conf.storage.atomic_writes);
        assert_eq!(conf.storage.products_file, PathBuf::from("Data/Products.txt"));
        assert_eq!(conf.codec.comma_escape, '|');
    }

    #[test]
    fn load_empty_toml_uses_defaults() {
        let conf = Config::from_str("").unwrap();
        assert_eq!(conf, Config::default());
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
        [storage]
        cache_dir = "/tmp"
        "#;
        assert!(matches!(
            Config::from_str(toml),
            Err(FlooringError::ConfigParsingError(_))
        ));
    }

    #[test]
    fn reject_separator_as_comma_escape() {
        for toml in [
            "[codec]\ncomma_escape = \",\"",
            "[codec]\ncomma_escape = \"\\n\"",
            "[codec]\ncomma_escape = \"\\r\"",
        ] {
            assert!(matches!(
                Config::from_str(toml),
                Err(FlooringError::ConfigParsingError(msg)) if msg.contains("comma_escape")
            ));
        }
    }

    #[test]
    fn load_missing_file_errors() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(FlooringError::ConfigParsingError(_))));
    }
}
