use std::{collections::BTreeMap, fmt};

use serde::{
    de::{self, MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::numeric::{self, Num};

/// A structured value carried through object coders.
#[derive(Debug, Clone)]
pub enum Object {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Object>),
    Map(BTreeMap<String, Object>),
}

impl Object {
    /// Short name of this object's shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Object::Null => "null",
            Object::Bool(_) => "bool",
            Object::Int(_) => "int",
            Object::UInt(_) => "uint",
            Object::Float(_) => "float",
            Object::String(_) => "string",
            Object::Bytes(_) => "bytes",
            Object::Array(_) => "array",
            Object::Map(_) => "map",
        }
    }

    /// The raw bytes of a byte-like object (`Bytes` or `String`).
    pub fn as_byte_slice(&self) -> Option<&[u8]> {
        match self {
            Object::Bytes(b) => Some(b),
            Object::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, Object> {
        match self {
            Object::Bytes(b) => Ok(b),
            Object::String(s) => Ok(s.into_bytes()),
            other => Err(other),
        }
    }

    fn num(&self) -> Option<Num> {
        match self {
            Object::Int(v) => Some((*v).into()),
            Object::UInt(v) => Some((*v).into()),
            Object::Float(v) => Some((*v).into()),
            _ => None,
        }
    }
}

// Structural equality; numbers compare by value regardless of representation,
// since serializers are free to pick any of them when reading a value back.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.num(), other.num()) {
            return numeric::equal(a, b);
        }
        match (self, other) {
            (Object::Null, Object::Null) => true,
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Bytes(a), Object::Bytes(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Map(a), Object::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Bool(v) => write!(f, "{}", v),
            Object::Int(v) => write!(f, "{}", v),
            Object::UInt(v) => write!(f, "{}", v),
            Object::Float(v) => write!(f, "{:?}", v),
            Object::String(v) => write!(f, "{:?}", v),
            Object::Bytes(v) => {
                write!(f, "x'")?;
                for b in v {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, "'")
            }
            Object::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Object::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Object::Null => serializer.serialize_unit(),
            Object::Bool(v) => serializer.serialize_bool(*v),
            Object::Int(v) => serializer.serialize_i64(*v),
            Object::UInt(v) => serializer.serialize_u64(*v),
            Object::Float(v) => serializer.serialize_f64(*v),
            Object::String(v) => serializer.serialize_str(v),
            Object::Bytes(v) => serializer.serialize_bytes(v),
            Object::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Object::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

struct ObjectVisitor;

impl<'de> Visitor<'de> for ObjectVisitor {
    type Value = Object;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any object value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Object, E> {
        Ok(Object::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Object, E> {
        Ok(Object::Null)
    }

    fn visit_some<D>(self, d: D) -> Result<Object, D::Error>
    where
        D: Deserializer<'de>,
    {
        Object::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Object, E> {
        Ok(Object::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Object, E> {
        Ok(Object::Int(v))
    }

    // Formats do not agree on whether small positive integers are signed, so
    // anything that fits is read back as `Int`.
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Object, E> {
        Ok(i64::try_from(v).map_or(Object::UInt(v), Object::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Object, E> {
        Ok(Object::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Object, E> {
        Ok(Object::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Object, E> {
        Ok(Object::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Object, E> {
        Ok(Object::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Object, E> {
        Ok(Object::Bytes(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Object, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Object::Array(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Object, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut m = BTreeMap::new();
        while let Some((k, v)) = access.next_entry::<String, Object>()? {
            m.insert(k, v);
        }
        Ok(Object::Map(m))
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ObjectVisitor)
    }
}

macro_rules! object_from {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Object {
                fn from(v: $t) -> Self {
                    Object::$variant(<$target>::from(v))
                }
            }
        )*
    };
}

object_from!(Int, i64, i8, i16, i32, i64);
object_from!(UInt, u64, u8, u16, u32, u64);
object_from!(Float, f64, f32, f64);

impl From<bool> for Object {
    fn from(v: bool) -> Self {
        Object::Bool(v)
    }
}

impl From<&str> for Object {
    fn from(v: &str) -> Self {
        Object::String(v.to_owned())
    }
}

impl From<String> for Object {
    fn from(v: String) -> Self {
        Object::String(v)
    }
}

impl From<Vec<u8>> for Object {
    fn from(v: Vec<u8>) -> Self {
        Object::Bytes(v)
    }
}

impl From<Vec<Object>> for Object {
    fn from(v: Vec<Object>) -> Self {
        Object::Array(v)
    }
}

impl From<BTreeMap<String, Object>> for Object {
    fn from(v: BTreeMap<String, Object>) -> Self {
        Object::Map(v)
    }
}
