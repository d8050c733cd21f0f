use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

use crate::{
    coder::{ObjectCoder, Role},
    error::Result,
    object::Object,
};

use super::byte_payload;

/// Compresses byte and string objects with zlib. Decoding yields bytes.
#[derive(Debug, Clone, Copy)]
pub struct ZlibCoder {
    level: Compression,
}

impl ZlibCoder {
    pub fn new(level: u32) -> Self {
        ZlibCoder {
            level: Compression::new(level),
        }
    }
}

impl Default for ZlibCoder {
    fn default() -> Self {
        ZlibCoder {
            level: Compression::default(),
        }
    }
}

impl ObjectCoder for ZlibCoder {
    fn name(&self) -> &str {
        "zlib"
    }

    fn role(&self) -> Role {
        Role::OBJECT_COMPRESSOR
    }

    fn encode(&self, w: &mut dyn Write, obj: &Object) -> Result<()> {
        let data = byte_payload(self.name(), obj)?;
        let mut encoder = ZlibEncoder::new(w, self.level);
        encoder.write_all(data)?;
        encoder.finish()?;
        Ok(())
    }

    fn decode(&self, r: &mut dyn Read) -> Result<Object> {
        let mut out = Vec::new();
        ZlibDecoder::new(r).read_to_end(&mut out)?;
        Ok(Object::Bytes(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let coder = ZlibCoder::new(1);
        let obj = Object::from("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let buf = coder.encode_to_vec(&obj).unwrap();
        assert!(buf.len() < 40);
        assert_eq!(coder.decode_from_slice(&buf).unwrap(), Object::from(obj.as_byte_slice().unwrap().to_vec()));
    }

    #[test]
    fn rejects_non_zlib_input() {
        assert!(ZlibCoder::default().decode_from_slice(b"{\"a\":1}").is_err());
    }
}
