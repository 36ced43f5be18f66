use serde::{Deserialize, Serialize};

use crate::core::FlooringError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Written in place of literal commas inside customer names.
    #[serde(default = "CodecConfig::default_comma_escape")]
    pub comma_escape: char,
}

impl CodecConfig {
    fn default_comma_escape() -> char {
        '#'
    }

    /// The escape has to survive a round trip through a record line, so it
    /// can be neither a field or line separator nor a character that
    /// customer names may contain.
    pub fn validate(&self) -> Result<(), FlooringError> {
        let c = self.comma_escape;
        if c == ',' || c.is_control() || c.is_ascii_alphanumeric() || matches!(c, '.' | ' ') {
            return Err(FlooringError::ConfigParsingError(format!(
                "codec.comma_escape cannot be {:?}",
                c
            )));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            comma_escape: Self::default_comma_escape(),
        }
    }
}
