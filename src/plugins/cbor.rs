use std::io::{Read, Write};

use crate::{
    coder::{ObjectCoder, Role},
    error::Result,
    object::Object,
};

/// Serializes objects as CBOR. Byte strings stay byte strings, and a decode
/// reads one data item from the stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct CborCoder;

impl CborCoder {
    pub fn new() -> Self {
        CborCoder
    }
}

impl ObjectCoder for CborCoder {
    fn name(&self) -> &str {
        "cbor"
    }

    fn role(&self) -> Role {
        Role::OBJECT_SERIALIZER
    }

    fn encode(&self, w: &mut dyn Write, obj: &Object) -> Result<()> {
        ciborium::ser::into_writer(obj, w)?;
        Ok(())
    }

    fn decode(&self, r: &mut dyn Read) -> Result<Object> {
        Ok(ciborium::de::from_reader(r)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::Error;

    #[test]
    fn round_trip() {
        let mut m = BTreeMap::new();
        m.insert("raw".to_owned(), Object::from(vec![0_u8, 0xff, 0x00]));
        m.insert("big".to_owned(), Object::UInt(u64::MAX));
        m.insert("min".to_owned(), Object::Int(i64::MIN));
        m.insert("f".to_owned(), Object::Float(-2.5));
        m.insert(
            "list".to_owned(),
            Object::from(vec![Object::Null, Object::Bool(false), Object::from("s")]),
        );
        let obj = Object::Map(m);

        let coder = CborCoder::new();
        let buf = coder.encode_to_vec(&obj).unwrap();
        let decoded = coder.decode_from_slice(&buf).unwrap();
        assert_eq!(decoded, obj);
        match decoded {
            Object::Map(m) => assert!(matches!(m["raw"], Object::Bytes(_))),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn wire_bytes() {
        let coder = CborCoder::new();
        assert_eq!(coder.encode_to_vec(&Object::from("a")).unwrap(), [0x61, b'a']);
        assert_eq!(coder.encode_to_vec(&Object::from(vec![1_u8, 2])).unwrap(), [0x42, 1, 2]);
    }

    #[test]
    fn back_to_back_units() {
        let coder = CborCoder::new();
        let mut buf = Vec::new();
        coder.encode(&mut buf, &Object::from("first")).unwrap();
        coder.encode(&mut buf, &Object::Int(-2)).unwrap();
        coder.encode(&mut buf, &Object::from(vec![Object::Int(3)])).unwrap();

        let mut r = buf.as_slice();
        assert_eq!(coder.decode(&mut r).unwrap(), Object::from("first"));
        assert_eq!(coder.decode(&mut r).unwrap(), Object::Int(-2));
        assert_eq!(coder.decode(&mut r).unwrap(), Object::from(vec![Object::Int(3)]));
        assert!(r.is_empty());
    }

    #[test]
    fn empty_input_fails() {
        let err = CborCoder::new().decode_from_slice(&[]).unwrap_err();
        assert!(matches!(err, Error::CborDecode(_)), "{:?}", err);
    }
}
