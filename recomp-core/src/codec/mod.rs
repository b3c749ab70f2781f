use crate::error::{RecompError, Result};
use crate::format::Format;
use std::io::{self, Read, Write};

/// Streaming decode/encode for one [`Format`].
pub trait Codec: Send + Sync {
    fn format(&self) -> Format;

    /// Level used by `encode`, if the format has one.
    fn level(&self) -> Option<i32>;

    /// Reads `src` to exhaustion and returns the uncompressed bytes.
    fn decode(&self, src: &mut dyn Read) -> Result<Vec<u8>>;

    /// Writes the compressed form of `data` to `dst`, finishing the stream.
    fn encode(&self, data: &[u8], dst: &mut dyn Write) -> Result<()>;
}

/// Decode error for bytes left over after a complete stream.
pub(crate) fn trailing_data(format: Format) -> RecompError {
    RecompError::Decode {
        format,
        source: io::Error::new(io::ErrorKind::InvalidData, "trailing data after end of stream"),
    }
}

pub mod brotlic;
pub mod deflate;
pub mod registry;
pub mod store;
pub mod zstdc;

pub use registry::CodecRegistry;
