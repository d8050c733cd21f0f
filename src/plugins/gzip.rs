use std::io::{Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use crate::{
    coder::{ObjectCoder, Role},
    error::Result,
    object::Object,
};

use super::byte_payload;

/// Compresses byte and string objects with gzip. Decoding yields bytes.
#[derive(Debug, Clone, Copy)]
pub struct GzipCoder {
    level: Compression,
}

impl GzipCoder {
    pub fn new(level: u32) -> Self {
        GzipCoder {
            level: Compression::new(level),
        }
    }
}

impl Default for GzipCoder {
    fn default() -> Self {
        GzipCoder {
            level: Compression::default(),
        }
    }
}

impl ObjectCoder for GzipCoder {
    fn name(&self) -> &str {
        "gzip"
    }

    fn role(&self) -> Role {
        Role::OBJECT_COMPRESSOR
    }

    fn encode(&self, w: &mut dyn Write, obj: &Object) -> Result<()> {
        let data = byte_payload(self.name(), obj)?;
        let mut encoder = GzEncoder::new(w, self.level);
        encoder.write_all(data)?;
        encoder.finish()?;
        Ok(())
    }

    fn decode(&self, r: &mut dyn Read) -> Result<Object> {
        let mut out = Vec::new();
        GzDecoder::new(r).read_to_end(&mut out)?;
        Ok(Object::Bytes(out))
    }
}
