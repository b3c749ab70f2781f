use super::Codec;
use crate::error::{RecompError, Result};
use crate::format::Format;
use std::io::{Read, Write};

/// Highest level reachable without the ultra flag.
pub const MAX_LEVEL: i32 = 19;

pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    pub fn new(level: Option<i32>) -> Self {
        Self {
            level: level.unwrap_or(MAX_LEVEL).clamp(1, MAX_LEVEL),
        }
    }
}

impl Codec for ZstdCodec {
    fn format(&self) -> Format {
        Format::ZStd
    }

    fn level(&self) -> Option<i32> {
        Some(self.level)
    }

    fn decode(&self, src: &mut dyn Read) -> Result<Vec<u8>> {
        let err = |source: std::io::Error| RecompError::Decode {
            format: Format::ZStd,
            source,
        };
        let mut dec = zstd::stream::Decoder::new(src).map_err(err)?;
        let mut out = Vec::new();
        dec.read_to_end(&mut out).map_err(err)?;
        Ok(out)
    }

    fn encode(&self, data: &[u8], dst: &mut dyn Write) -> Result<()> {
        let err = |source: std::io::Error| RecompError::Encode {
            format: Format::ZStd,
            source,
        };
        let mut enc = zstd::stream::Encoder::new(dst, self.level).map_err(err)?;
        enc.write_all(data).map_err(err)?;
        enc.finish().map_err(err)?;
        Ok(())
    }
}
