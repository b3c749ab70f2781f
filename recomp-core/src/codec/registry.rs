//! Format -> codec lookup table, built once per batch.

use super::brotlic::BrotliCodec;
use super::deflate::{GzipCodec, ZlibCodec};
use super::store::Store;
use super::zstdc::ZstdCodec;
use super::Codec;
use crate::format::Format;

pub struct CodecRegistry {
    // indexed by `Format as usize`
    codecs: Vec<Box<dyn Codec>>,
}

fn build(format: Format, level: Option<i32>) -> Box<dyn Codec> {
    match format {
        Format::Identity => Box::new(Store),
        Format::GZip => Box::new(GzipCodec::new(level)),
        Format::ZLib => Box::new(ZlibCodec::new(level)),
        Format::ZStd => Box::new(ZstdCodec::new(level)),
        Format::Brotli => Box::new(BrotliCodec::new(level)),
    }
}

impl CodecRegistry {
    /// Every codec at its strongest setting.
    pub fn new() -> Self {
        Self::with_level(None)
    }

    /// `level` overrides the default for every codec, clamped to each codec's range.
    pub fn with_level(level: Option<i32>) -> Self {
        let codecs = Format::ALL.iter().map(|&f| build(f, level)).collect();
        Self { codecs }
    }

    pub fn get(&self, format: Format) -> &dyn Codec {
        match self.codecs.get(format as usize) {
            Some(codec) => {
                debug_assert_eq!(codec.format(), format);
                codec.as_ref()
            }
            None => unreachable!("no codec registered for {format}"),
        }
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
