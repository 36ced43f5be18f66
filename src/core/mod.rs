mod args;
mod error;
mod logger;

pub use args::CliArgs;
pub use error::{ErrorKind, FlooringError};
pub use logger::setup_logging;
