use crate::{coder::KeyCoder, encoding, error::Result, key::Key};

/// Key coder backed by the order-preserving tuple encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct TupleCoder;

impl TupleCoder {
    pub fn new() -> Self {
        TupleCoder
    }
}

impl KeyCoder for TupleCoder {
    fn name(&self) -> &str {
        "tuple"
    }

    fn encode_key(&self, key: &Key) -> Result<Vec<u8>> {
        encoding::encode(key)
    }

    fn decode_key(&self, buf: &[u8]) -> Result<Key> {
        encoding::decode(buf)
    }
}
