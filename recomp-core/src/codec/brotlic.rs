use super::{Codec, trailing_data};
use crate::error::{RecompError, Result};
use crate::format::Format;
use brotli::enc::backward_references::BrotliEncoderParams;
use std::io::{Read, Write};

pub const MAX_QUALITY: i32 = 11;
const WINDOW_BITS: i32 = 22;
const BUFFER_SIZE: usize = 64 * 1024;

pub struct BrotliCodec {
    quality: i32,
}

impl BrotliCodec {
    pub fn new(level: Option<i32>) -> Self {
        Self {
            quality: level.unwrap_or(MAX_QUALITY).clamp(0, MAX_QUALITY),
        }
    }
}

impl Codec for BrotliCodec {
    fn format(&self) -> Format {
        Format::Brotli
    }

    fn level(&self) -> Option<i32> {
        Some(self.quality)
    }

    fn decode(&self, src: &mut dyn Read) -> Result<Vec<u8>> {
        let err = |source: std::io::Error| RecompError::Decode {
            format: Format::Brotli,
            source,
        };
        let mut out = Vec::new();
        let mut dec = brotli::Decompressor::new(src, BUFFER_SIZE);
        dec.read_to_end(&mut out).map_err(err)?;
        // Once finished, the decompressor only flags leftover input it has
        // already buffered, and only on a read after the one returning 0.
        let mut byte = [0u8; 1];
        if dec.read(&mut byte).map_err(err)? != 0 {
            return Err(trailing_data(Format::Brotli));
        }
        if dec.into_inner().read(&mut byte).map_err(err)? != 0 {
            return Err(trailing_data(Format::Brotli));
        }
        Ok(out)
    }

    fn encode(&self, data: &[u8], mut dst: &mut dyn Write) -> Result<()> {
        let params = BrotliEncoderParams {
            quality: self.quality,
            lgwin: WINDOW_BITS,
            ..Default::default()
        };
        brotli::BrotliCompress(&mut &data[..], &mut dst, &params).map_err(|source| {
            RecompError::Encode {
                format: Format::Brotli,
                source,
            }
        })?;
        Ok(())
    }
}
