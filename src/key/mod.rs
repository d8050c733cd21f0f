use std::{cmp::Ordering, fmt};

use crate::{
    error::{Error, Result},
    numeric::{self, Num},
    object::Object,
};

pub(crate) const MARKER_NULL: u8 = 0x00;
pub(crate) const MARKER_TRUE: u8 = 0x01;
pub(crate) const MARKER_FALSE: u8 = 0x02;
pub(crate) const MARKER_INT: u8 = 0x10;
pub(crate) const MARKER_UINT: u8 = 0x11;
pub(crate) const MARKER_FLOAT: u8 = 0x20;
pub(crate) const MARKER_STRING: u8 = 0x30;
pub(crate) const MARKER_BYTES: u8 = 0x40;

/// A single key element.
///
/// `Opaque` holds a value of a kind the codec has no marker for. It is
/// rendered to its display string and encoded as a string, so it decodes back
/// as `Element::String`.
#[derive(Debug, Clone)]
pub enum Element {
    Null,
    Bool(bool),
    SignedInt(i64),
    UnsignedInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Opaque { type_name: String, display: String },
}

impl Element {
    pub fn opaque<T>(type_name: &str, value: &T) -> Self
    where
        T: fmt::Display + ?Sized,
    {
        Element::Opaque {
            type_name: type_name.to_owned(),
            display: value.to_string(),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Element::Null => "null",
            Element::Bool(_) => "bool",
            Element::SignedInt(_) => "int",
            Element::UnsignedInt(_) => "uint",
            Element::Float(_) => "float",
            Element::String(_) => "string",
            Element::Bytes(_) => "bytes",
            Element::Opaque { type_name, .. } => type_name,
        }
    }

    /// The marker byte this element is written with.
    pub fn marker(&self) -> u8 {
        match self {
            Element::Null => MARKER_NULL,
            Element::Bool(true) => MARKER_TRUE,
            Element::Bool(false) => MARKER_FALSE,
            Element::SignedInt(_) => MARKER_INT,
            Element::UnsignedInt(_) => MARKER_UINT,
            Element::Float(_) => MARKER_FLOAT,
            Element::String(_) | Element::Opaque { .. } => MARKER_STRING,
            Element::Bytes(_) => MARKER_BYTES,
        }
    }

    fn num(&self) -> Option<Num> {
        match self {
            Element::SignedInt(v) => Some((*v).into()),
            Element::UnsignedInt(v) => Some((*v).into()),
            Element::Float(v) => Some((*v).into()),
            _ => None,
        }
    }

    pub fn equal(&self, other: &Element) -> bool {
        if let (Some(a), Some(b)) = (self.num(), other.num()) {
            return numeric::equal(a, b);
        }
        match (self, other) {
            (Element::Null, Element::Null) => true,
            (Element::Bool(a), Element::Bool(b)) => a == b,
            (Element::String(a), Element::String(b)) => a == b,
            (Element::Bytes(a), Element::Bytes(b)) => a == b,
            (
                Element::Opaque {
                    type_name: t1,
                    display: d1,
                },
                Element::Opaque {
                    type_name: t2,
                    display: d2,
                },
            ) => t1 == t2 && d1 == d2,
            _ => false,
        }
    }

    pub fn compare(&self, other: &Element) -> Result<Ordering> {
        if let (Some(a), Some(b)) = (self.num(), other.num()) {
            return Ok(numeric::compare(a, b));
        }
        match (self, other) {
            (
                Element::Opaque {
                    type_name: t1,
                    display: d1,
                },
                Element::Opaque {
                    type_name: t2,
                    display: d2,
                },
            ) if t1 == t2 => Ok(d1.as_bytes().cmp(d2.as_bytes())),
            (Element::Opaque { .. }, _) | (_, Element::Opaque { .. }) => Err(Error::TypeMismatch {
                left: self.kind().to_owned(),
                right: other.kind().to_owned(),
            }),
            (Element::String(a), Element::String(b)) => Ok(a.as_bytes().cmp(b.as_bytes())),
            // Length first, as the length prefix is what the bytes sort on.
            (Element::Bytes(a), Element::Bytes(b)) => Ok(a.len().cmp(&b.len()).then_with(|| a.cmp(b))),
            // Everything else (including the two bools) orders by marker.
            _ => Ok(self.marker().cmp(&other.marker())),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Null => write!(f, "null"),
            Element::Bool(v) => write!(f, "{}", v),
            Element::SignedInt(v) => write!(f, "{}", v),
            Element::UnsignedInt(v) => write!(f, "{}", v),
            Element::Float(v) => write!(f, "{:?}", v),
            Element::String(v) => write!(f, "{:?}", v),
            Element::Bytes(v) => {
                write!(f, "x'")?;
                for b in v {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, "'")
            }
            Element::Opaque { display, .. } => write!(f, "{}", display),
        }
    }
}

macro_rules! element_from {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Element {
                fn from(v: $t) -> Self {
                    Element::$variant(<$target>::from(v))
                }
            }
        )*
    };
}

element_from!(SignedInt, i64, i8, i16, i32, i64);
element_from!(UnsignedInt, u64, u8, u16, u32, u64);
element_from!(Float, f64, f32, f64);

impl From<bool> for Element {
    fn from(v: bool) -> Self {
        Element::Bool(v)
    }
}

impl From<&str> for Element {
    fn from(v: &str) -> Self {
        Element::String(v.to_owned())
    }
}

impl From<String> for Element {
    fn from(v: String) -> Self {
        Element::String(v)
    }
}

impl From<Vec<u8>> for Element {
    fn from(v: Vec<u8>) -> Self {
        Element::Bytes(v)
    }
}

impl From<&[u8]> for Element {
    fn from(v: &[u8]) -> Self {
        Element::Bytes(v.to_vec())
    }
}

impl<T: Into<Element>> From<Option<T>> for Element {
    fn from(v: Option<T>) -> Self {
        v.map_or(Element::Null, Into::into)
    }
}

impl From<&Object> for Element {
    fn from(obj: &Object) -> Self {
        match obj {
            Object::Null => Element::Null,
            Object::Bool(v) => Element::Bool(*v),
            Object::Int(v) => Element::SignedInt(*v),
            Object::UInt(v) => Element::UnsignedInt(*v),
            Object::Float(v) => Element::Float(*v),
            Object::String(v) => Element::String(v.clone()),
            Object::Bytes(v) => Element::Bytes(v.clone()),
            Object::Array(_) | Object::Map(_) => Element::opaque(obj.shape(), obj),
        }
    }
}

/// An ordered tuple of elements identifying a document.
#[derive(Debug, Clone, Default)]
pub struct Key {
    elems: Vec<Element>,
}

impl Key {
    pub fn new() -> Self {
        Key { elems: Vec::new() }
    }

    pub fn with<I>(elems: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Element>,
    {
        Key {
            elems: elems.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, e: impl Into<Element>) {
        self.elems.push(e.into());
    }

    pub fn elements(&self) -> &[Element] {
        &self.elems
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn equal(&self, other: &Key) -> bool {
        self.len() == other.len()
            && self
                .elems
                .iter()
                .zip(other.elems.iter())
                .all(|(a, b)| a.equal(b))
    }

    /// Lexicographic comparison. A key that is a strict prefix of another
    /// sorts first.
    pub fn compare(&self, other: &Key) -> Result<Ordering> {
        for (a, b) in self.elems.iter().zip(other.elems.iter()) {
            match a.compare(b)? {
                Ordering::Equal => {}
                o => return Ok(o),
            }
        }
        Ok(self.len().cmp(&other.len()))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl From<Vec<Element>> for Key {
    fn from(elems: Vec<Element>) -> Self {
        Key { elems }
    }
}

impl IntoIterator for Key {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elems.into_iter()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, e) in self.elems.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, ")")
    }
}

/// Builds a [`Key`] from heterogeneous values.
#[macro_export]
macro_rules! key {
    () => { $crate::Key::new() };
    ($($e:expr),+ $(,)?) => {
        $crate::Key::from(vec![$($crate::Element::from($e)),+])
    };
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn numeric_elements_coerce() {
        assert_eq!(Element::from(5_i8), Element::from(5_u16));
        assert_eq!(Element::from(5_u16), Element::from(5.0_f32));
        assert_ne!(Element::from(5_i8), Element::from("5"));
        assert_eq!(key![5_i8, "a"], key![5.0_f64, "a"]);
    }

    #[test]
    fn equal_requires_same_length() {
        assert_ne!(key!["p"], key!["p", 1_i64]);
        assert_eq!(Key::new(), key![]);
        assert!(Key::new().is_empty());
    }

    #[test]
    fn tuple_order() {
        let ordered = [
            key![1_i64, "a"],
            key![1_i64, "b"],
            key![2_i64, "a"],
            key!["a", 1_i64],
            key!["a", 2_i64],
            key!["b", 1_i64],
        ];
        for pair in ordered[..3].windows(2).chain(ordered[3..].windows(2)) {
            assert_eq!(pair[0].compare(&pair[1]).unwrap(), Ordering::Less, "{} < {}", pair[0], pair[1]);
            assert_eq!(pair[1].compare(&pair[0]).unwrap(), Ordering::Greater);
        }
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(key!["p"].compare(&key!["p", 1_i64]).unwrap(), Ordering::Less);
        assert_eq!(Key::new().compare(&key![Element::Null]).unwrap(), Ordering::Less);
        assert_eq!(key!["p", 1_i64].compare(&key!["p", 1_u64]).unwrap(), Ordering::Equal);
    }

    #[test]
    fn kinds_order_by_marker() {
        let ordered = [
            Element::Null,
            Element::Bool(true),
            Element::Bool(false),
            Element::SignedInt(i64::MAX),
            Element::from(""),
            Element::from(Vec::<u8>::new()),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(pair[0].compare(&pair[1]).unwrap(), Ordering::Less, "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn opaque_against_number_is_a_type_error() {
        let mut m = BTreeMap::new();
        m.insert("a".to_owned(), Object::Int(1));
        let map = Element::from(&Object::Map(m));
        assert_eq!(map.kind(), "map");

        let err = map.compare(&Element::from(1_i64)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }), "{:?}", err);

        let err = key![1_i64, map.clone()].compare(&key![1_i64, 2_i64]).unwrap_err();
        assert_eq!(err.to_string(), "cannot compare map with int");
        assert!(key![map.clone()].partial_cmp(&key![0_i64]).is_none());
        assert_eq!(map.compare(&map).unwrap(), Ordering::Equal);
    }

    #[test]
    fn display() {
        let k = key![Element::Null, true, -3_i64, 1.5_f64, "a\0b", vec![0x01_u8, 0xff]];
        assert_eq!(k.to_string(), r#"(null, true, -3, 1.5, "a\0b", x'01ff')"#);
    }
}
