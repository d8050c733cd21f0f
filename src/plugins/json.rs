use std::io::{self, Read, Write};

use crate::{
    coder::{ObjectCoder, Role},
    error::Result,
    object::Object,
};

/// Serializes objects as JSON. Exactly one JSON value is read per decode.
///
/// JSON has no byte string type, so `Object::Bytes` is written as an array of
/// numbers and does not come back as bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCoder;

impl JsonCoder {
    pub fn new() -> Self {
        JsonCoder
    }
}

impl ObjectCoder for JsonCoder {
    fn name(&self) -> &str {
        "json"
    }

    fn role(&self) -> Role {
        Role::OBJECT_SERIALIZER
    }

    fn encode(&self, w: &mut dyn Write, obj: &Object) -> Result<()> {
        serde_json::to_writer(w, obj)?;
        Ok(())
    }

    fn decode(&self, r: &mut dyn Read) -> Result<Object> {
        let mut values = serde_json::Deserializer::from_reader(r).into_iter::<Object>();
        match values.next() {
            Some(v) => Ok(v?),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no json value in input").into()),
        }
    }
}
