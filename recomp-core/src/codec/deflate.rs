//! GZip and ZLib, both DEFLATE-based, via flate2.

use super::{Codec, trailing_data};
use crate::error::{RecompError, Result};
use crate::format::Format;
use flate2::Compression;
use flate2::bufread::ZlibDecoder;
use flate2::read::MultiGzDecoder;
use flate2::write::{GzEncoder, ZlibEncoder};
use std::io::{BufRead, BufReader, Read, Write};

pub const MAX_LEVEL: i32 = 9;

fn compression(level: i32) -> Compression {
    Compression::new(level as u32)
}

pub struct GzipCodec {
    level: i32,
}

impl GzipCodec {
    pub fn new(level: Option<i32>) -> Self {
        Self {
            level: level.unwrap_or(MAX_LEVEL).clamp(0, MAX_LEVEL),
        }
    }
}

impl Codec for GzipCodec {
    fn format(&self) -> Format {
        Format::GZip
    }

    fn level(&self) -> Option<i32> {
        Some(self.level)
    }

    // Concatenated members decode as one stream.
    fn decode(&self, src: &mut dyn Read) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        MultiGzDecoder::new(src)
            .read_to_end(&mut out)
            .map_err(|source| RecompError::Decode {
                format: Format::GZip,
                source,
            })?;
        Ok(out)
    }

    fn encode(&self, data: &[u8], dst: &mut dyn Write) -> Result<()> {
        let err = |source: std::io::Error| RecompError::Encode {
            format: Format::GZip,
            source,
        };
        let mut enc = GzEncoder::new(dst, compression(self.level));
        enc.write_all(data).map_err(err)?;
        enc.finish().map_err(err)?;
        Ok(())
    }
}

pub struct ZlibCodec {
    level: i32,
}

impl ZlibCodec {
    pub fn new(level: Option<i32>) -> Self {
        Self {
            level: level.unwrap_or(MAX_LEVEL).clamp(0, MAX_LEVEL),
        }
    }
}

impl Codec for ZlibCodec {
    fn format(&self) -> Format {
        Format::ZLib
    }

    fn level(&self) -> Option<i32> {
        Some(self.level)
    }

    // A ZLib stream ends on its own; anything after it is an error.
    fn decode(&self, src: &mut dyn Read) -> Result<Vec<u8>> {
        let err = |source: std::io::Error| RecompError::Decode {
            format: Format::ZLib,
            source,
        };
        let mut out = Vec::new();
        let mut dec = ZlibDecoder::new(BufReader::new(src));
        dec.read_to_end(&mut out).map_err(err)?;
        if !dec.into_inner().fill_buf().map_err(err)?.is_empty() {
            return Err(trailing_data(Format::ZLib));
        }
        Ok(out)
    }

    fn encode(&self, data: &[u8], dst: &mut dyn Write) -> Result<()> {
        let err = |source: std::io::Error| RecompError::Encode {
            format: Format::ZLib,
            source,
        };
        let mut enc = ZlibEncoder::new(dst, compression(self.level));
        enc.write_all(data).map_err(err)?;
        enc.finish().map_err(err)?;
        Ok(())
    }
}
