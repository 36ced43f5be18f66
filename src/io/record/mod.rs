mod codec;
pub(crate) mod format;

pub use codec::RecordCodec;
pub use format::HEADER;
