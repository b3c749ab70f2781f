use super::Codec;
use crate::error::{RecompError, Result};
use crate::format::Format;
use std::io::{Read, Write};

/// Uncompressed passthrough.
pub struct Store;

impl Codec for Store {
    fn format(&self) -> Format {
        Format::Identity
    }

    fn level(&self) -> Option<i32> {
        None
    }

    fn decode(&self, src: &mut dyn Read) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        src.read_to_end(&mut out)
            .map_err(|source| RecompError::Decode {
                format: Format::Identity,
                source,
            })?;
        Ok(out)
    }

    fn encode(&self, data: &[u8], dst: &mut dyn Write) -> Result<()> {
        dst.write_all(data).map_err(|source| RecompError::Encode {
            format: Format::Identity,
            source,
        })
    }
}
