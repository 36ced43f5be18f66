use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FlooringError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Malformed data: {0}")]
    MalformedData(String),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Order #{0} already exists")]
    OrderExists(u32),
    #[error("Stale catalog: {0}")]
    StaleCatalog(String),
    #[error("No orders found for {date}")]
    NoOrdersForDate { date: NaiveDate },
    #[error("No order found for {date} with number {number}")]
    OrderNotFound { date: NaiveDate, number: u32 },
    #[error("No product found for type {0}")]
    ProductNotFound(String),
    #[error("No state tax found for abbreviation {0}")]
    StateTaxNotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Input closed")]
    InputClosed,
}

/// Coarse classification used by the menu layer to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Persistence,
    NotFound,
    Validation,
    Config,
    Input,
}

impl FlooringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlooringError::IoError(_)
            | FlooringError::MalformedData(_)
            | FlooringError::MissingField(_)
            | FlooringError::OrderExists(_)
            | FlooringError::StaleCatalog(_) => ErrorKind::Persistence,
            FlooringError::NoOrdersForDate { .. }
            | FlooringError::OrderNotFound { .. }
            | FlooringError::ProductNotFound(_)
            | FlooringError::StateTaxNotFound(_) => ErrorKind::NotFound,
            FlooringError::Validation(_) => ErrorKind::Validation,
            FlooringError::ConfigParsingError(_) => ErrorKind::Config,
            FlooringError::InputClosed => ErrorKind::Input,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<std::io::Error> for FlooringError {
    fn from(err: std::io::Error) -> Self {
        FlooringError::IoError(err.to_string())
    }
}

impl From<rust_decimal::Error> for FlooringError {
    fn from(err: rust_decimal::Error) -> Self {
        FlooringError::MalformedData(err.to_string())
    }
}
