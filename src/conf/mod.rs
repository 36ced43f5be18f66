mod codec;
mod config;
mod storage;

pub use codec::CodecConfig;
pub use config::Config;
pub use storage::StorageConfig;
