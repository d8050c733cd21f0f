// Order-preserving tuple encoding.
//
// Every element is written as a marker byte followed by a payload. Markers
// are ordered so that elements of different kinds sort by kind, and payloads
// are transformed so that byte order matches value order within a kind:
//
// * signed integers are big-endian with the sign bit flipped,
// * floats are big-endian with the sign bit flipped when non-negative and
//   all bits flipped when negative,
// * strings have every 0x00 escaped as 0x00 0xff and end in 0x00 0x00, so a
//   string sorts before all of its extensions,
// * byte strings are length-prefixed. This does NOT preserve order between
//   byte strings of different lengths; changing it would change the format.

use crate::{
    error::{Error, Result},
    key::{
        Element, Key, MARKER_BYTES, MARKER_FALSE, MARKER_FLOAT, MARKER_INT, MARKER_NULL,
        MARKER_STRING, MARKER_TRUE, MARKER_UINT,
    },
};

#[cfg(test)]
mod sortable_test;

const TERMINATOR: [u8; 2] = [0x00, 0x00];
const ESCAPED_00: [u8; 2] = [0x00, 0xff];
const SIGN_BIT: u64 = 1 << 63;

fn copy_escaped(mut from: &[u8], to: &mut Vec<u8>) {
    while !from.is_empty() {
        match from.iter().position(|x| *x == 0x00) {
            Some(idx) => {
                to.extend(&from[..idx]);
                to.extend(ESCAPED_00);
                from = &from[(idx + 1)..];
            }
            None => {
                to.extend(from);
                return;
            }
        }
    }
}

fn float_to_ordered(v: f64) -> u64 {
    let bits = v.to_bits();
    if bits & SIGN_BIT == 0 {
        bits ^ SIGN_BIT
    } else {
        !bits
    }
}

fn float_from_ordered(bits: u64) -> f64 {
    if bits & SIGN_BIT != 0 {
        f64::from_bits(bits ^ SIGN_BIT)
    } else {
        f64::from_bits(!bits)
    }
}

#[derive(Debug, Default)]
pub struct KeyWriter {
    pub(crate) buf: Vec<u8>,
}

impl KeyWriter {
    pub fn new() -> Self {
        KeyWriter { buf: Vec::new() }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn marker(&mut self, m: u8) {
        self.buf.push(m);
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend(v.to_be_bytes());
    }

    fn write_escaped(&mut self, s: &[u8]) {
        copy_escaped(s, &mut self.buf);
        self.buf.extend(TERMINATOR);
    }

    fn write_len_prefixed(&mut self, b: &[u8]) -> Result<()> {
        let len = u32::try_from(b.len())
            .map_err(|_| Error::unsupported("tuple", "bytes element longer than u32::MAX"))?;
        self.buf.extend(len.to_be_bytes());
        self.buf.extend(b);
        Ok(())
    }
}

/// Reads elements back out of an encoded key. The reader never looks past
/// the end of the element it is decoding.
#[derive(Debug)]
pub struct KeyReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> KeyReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        KeyReader { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8]> {
        let remaining = self.buf.len() - self.pos;
        if remaining < n {
            return Err(Error::Truncated {
                what,
                offset: self.pos,
                needed: n - remaining,
            });
        }
        let buf = self.buf;
        let out = &buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_u64(&mut self, what: &'static str) -> Result<u64> {
        let b = self.take(8, what)?;
        let mut arr = [0_u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_be_bytes(arr))
    }

    fn read_u32(&mut self, what: &'static str) -> Result<u32> {
        let b = self.take(4, what)?;
        let mut arr = [0_u8; 4];
        arr.copy_from_slice(b);
        Ok(u32::from_be_bytes(arr))
    }

    fn read_escaped(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut i = self.pos;
        loop {
            let idx = match self.buf[i..].iter().position(|x| *x == 0x00) {
                Some(idx) => i + idx,
                None => {
                    return Err(Error::Truncated {
                        what: "string",
                        offset: self.buf.len(),
                        needed: 2,
                    })
                }
            };
            out.extend(&self.buf[i..idx]);
            match self.buf.get(idx + 1) {
                Some(0x00) => {
                    self.pos = idx + 2;
                    return Ok(out);
                }
                Some(0xff) => {
                    out.push(0x00);
                    i = idx + 2;
                }
                Some(b) => {
                    return Err(Error::InvalidEscape {
                        byte: *b,
                        offset: idx,
                    })
                }
                None => {
                    return Err(Error::Truncated {
                        what: "string",
                        offset: self.buf.len(),
                        needed: 1,
                    })
                }
            }
        }
    }

    /// Decodes the next element, or returns `None` at the end of input.
    pub fn next_element(&mut self) -> Result<Option<Element>> {
        if self.is_empty() {
            return Ok(None);
        }
        Element::decode(self).map(Some)
    }
}

pub trait Encode: std::fmt::Debug {
    fn write_bytes(&self, kw: &mut KeyWriter) -> Result<()>;
}

pub trait Decode: Sized {
    fn decode(kr: &mut KeyReader) -> Result<Self>;
}

impl Encode for Element {
    fn write_bytes(&self, kw: &mut KeyWriter) -> Result<()> {
        kw.marker(self.marker());
        match self {
            Element::Null | Element::Bool(_) => {}
            Element::SignedInt(v) => kw.write_u64((*v as u64) ^ SIGN_BIT),
            Element::UnsignedInt(v) => kw.write_u64(*v),
            Element::Float(v) => kw.write_u64(float_to_ordered(*v)),
            Element::String(s) => kw.write_escaped(s.as_bytes()),
            Element::Opaque { display, .. } => kw.write_escaped(display.as_bytes()),
            Element::Bytes(b) => kw.write_len_prefixed(b)?,
        }
        Ok(())
    }
}

impl Decode for Element {
    fn decode(kr: &mut KeyReader) -> Result<Self> {
        let offset = kr.position();
        let marker = kr.take(1, "marker")?[0];
        let elem = match marker {
            MARKER_NULL => Element::Null,
            MARKER_TRUE => Element::Bool(true),
            MARKER_FALSE => Element::Bool(false),
            MARKER_INT => Element::SignedInt((kr.read_u64("int")? ^ SIGN_BIT) as i64),
            MARKER_UINT => Element::UnsignedInt(kr.read_u64("uint")?),
            MARKER_FLOAT => Element::Float(float_from_ordered(kr.read_u64("float")?)),
            MARKER_STRING => {
                let start = kr.position();
                let raw = kr.read_escaped()?;
                let s = String::from_utf8(raw).map_err(|_| Error::InvalidUtf8 { offset: start })?;
                Element::String(s)
            }
            MARKER_BYTES => {
                let len = kr.read_u32("bytes length")?;
                Element::Bytes(kr.take(len as usize, "bytes")?.to_vec())
            }
            _ => return Err(Error::InvalidMarker { marker, offset }),
        };
        Ok(elem)
    }
}

impl Encode for Key {
    fn write_bytes(&self, kw: &mut KeyWriter) -> Result<()> {
        for e in self.elements() {
            e.write_bytes(kw)?;
        }
        Ok(())
    }
}

impl Decode for Key {
    fn decode(kr: &mut KeyReader) -> Result<Self> {
        let mut key = Key::new();
        while let Some(e) = kr.next_element()? {
            key.push(e);
        }
        Ok(key)
    }
}

impl<A> Encode for &A
where
    A: Encode,
{
    fn write_bytes(&self, kw: &mut KeyWriter) -> Result<()> {
        (*self).write_bytes(kw)
    }
}

/// Appends the encoding of `key` to `out`.
pub fn encode_into(key: &Key, out: &mut Vec<u8>) -> Result<()> {
    let mut kw = KeyWriter {
        buf: std::mem::take(out),
    };
    let res = key.write_bytes(&mut kw);
    *out = kw.into_bytes();
    res
}

pub fn encode(key: &Key) -> Result<Vec<u8>> {
    let mut kw = KeyWriter::new();
    key.write_bytes(&mut kw)?;
    Ok(kw.into_bytes())
}

pub fn decode(buf: &[u8]) -> Result<Key> {
    Key::decode(&mut KeyReader::new(buf))
}

#[test]
fn test_escaping() {
    for str in [
        vec![0x00_u8, 0x00, 0x01, 0x02, 0x00],
        vec![0x01, 0x01, 0x00],
        vec![0xff, 0x00, 0xff],
        vec![],
    ] {
        let mut kw = KeyWriter::new();
        kw.write_escaped(&str);
        let mut kr = KeyReader::new(&kw.buf);
        assert_eq!(str, kr.read_escaped().unwrap());
        assert!(kr.is_empty());
    }
}

#[test]
fn test_float_transform_inverts() {
    for v in [0.0, -0.0, 1.5, -1.5, f64::MAX, f64::MIN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(float_from_ordered(float_to_ordered(v)).to_bits(), v.to_bits());
    }
}

#[test]
fn test_encode_into_appends() {
    let mut out = vec![0xaa];
    encode_into(&crate::key![1_u64], &mut out).unwrap();
    assert_eq!(out, [0xaa, 0x11, 0, 0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn test_reader_stops_at_element_boundary() {
    let buf = encode(&crate::key!["ab", 7_i64]).unwrap();
    let mut kr = KeyReader::new(&buf);
    assert_eq!(kr.next_element().unwrap(), Some(Element::from("ab")));
    assert_eq!(kr.position(), 5);
    assert_eq!(kr.next_element().unwrap(), Some(Element::from(7_i64)));
    assert_eq!(kr.next_element().unwrap(), None);
}
