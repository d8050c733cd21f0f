use std::io::{Read, Write};

use crate::{
    coder::{ObjectCoder, Role},
    error::Result,
    object::Object,
};

/// Serializes objects as MessagePack. Byte strings survive the round trip,
/// and a decode consumes exactly one value from the stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackCoder;

impl MsgPackCoder {
    pub fn new() -> Self {
        MsgPackCoder
    }
}

impl ObjectCoder for MsgPackCoder {
    fn name(&self) -> &str {
        "msgpack"
    }

    fn role(&self) -> Role {
        Role::OBJECT_SERIALIZER
    }

    fn encode(&self, w: &mut dyn Write, obj: &Object) -> Result<()> {
        rmp_serde::encode::write(w, obj)?;
        Ok(())
    }

    fn decode(&self, r: &mut dyn Read) -> Result<Object> {
        Ok(rmp_serde::decode::from_read(r)?)
    }
}
