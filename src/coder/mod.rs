use std::{
    fmt,
    io::{Read, Write},
    ops::{BitOr, BitOrAssign},
    sync::Arc,
};

use crate::{error::Result, key::Key, object::Object};

pub mod chain;
pub mod multi;


/// The set of roles a coder plays.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Role(u8);

impl Role {
    pub const NONE: Role = Role(0);
    pub const KEY_SERIALIZER: Role = Role(0x01);
    pub const OBJECT_SERIALIZER: Role = Role(0x02);
    pub const OBJECT_COMPRESSOR: Role = Role(0x04);

    const OBJECT: Role = Role(0x02 | 0x04);

    pub fn contains(self, other: Role) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: Role) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether a coder with this role can sit in an object pipeline.
    pub fn is_object_role(self) -> bool {
        self.intersects(Role::OBJECT)
    }
}

impl BitOr for Role {
    type Output = Role;

    fn bitor(self, rhs: Role) -> Role {
        Role(self.0 | rhs.0)
    }
}

impl BitOrAssign for Role {
    fn bitor_assign(&mut self, rhs: Role) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Role({})", self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Role::KEY_SERIALIZER, "key_serializer"),
            (Role::OBJECT_SERIALIZER, "object_serializer"),
            (Role::OBJECT_COMPRESSOR, "object_compressor"),
        ];
        let mut first = true;
        for (role, name) in names {
            if self.contains(role) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}

/// A bidirectional transform between an [`Object`] and a byte stream.
///
/// Coders are stateless; a single instance may be shared across threads.
pub trait ObjectCoder: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn role(&self) -> Role;

    fn encode(&self, w: &mut dyn Write, obj: &Object) -> Result<()>;

    fn decode(&self, r: &mut dyn Read) -> Result<Object>;

    fn encode_to_vec(&self, obj: &Object) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out, obj)?;
        Ok(out)
    }

    fn decode_from_slice(&self, mut buf: &[u8]) -> Result<Object> {
        self.decode(&mut buf)
    }
}

pub trait KeyCoder: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn role(&self) -> Role {
        Role::KEY_SERIALIZER
    }

    fn encode_key(&self, key: &Key) -> Result<Vec<u8>>;

    fn decode_key(&self, buf: &[u8]) -> Result<Key>;
}

pub type SharedCoder = Arc<dyn ObjectCoder>;

pub(crate) fn composite_name(prefix: &str, coders: &[SharedCoder]) -> String {
    let names: Vec<&str> = coders.iter().map(|c| c.name()).collect();
    format!("{}({})", prefix, names.join(","))
}

pub(crate) fn union_role(coders: &[SharedCoder]) -> Role {
    coders.iter().fold(Role::NONE, |acc, c| acc | c.role())
}

/// Runs `obj` through every stage in order. Each stage writes into a buffer
/// of its own, which is handed to the next stage as `Object::Bytes`.
pub(crate) fn encode_pipeline(stages: &[SharedCoder], w: &mut dyn Write, obj: &Object) -> Result<()> {
    let mut current: Option<Object> = None;
    for stage in stages {
        let input = current.as_ref().unwrap_or(obj);
        let mut out = Vec::new();
        stage
            .encode(&mut out, input)
            .map_err(|e| e.in_stage(stage.name()))?;
        tracing::trace!(stage = stage.name(), len = out.len(), "encoded stage");
        current = Some(Object::Bytes(out));
    }
    if let Some(Object::Bytes(out)) = current {
        w.write_all(&out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_flags() {
        let r = Role::OBJECT_SERIALIZER | Role::OBJECT_COMPRESSOR;
        assert!(r.contains(Role::OBJECT_COMPRESSOR));
        assert!(!r.contains(Role::KEY_SERIALIZER));
        assert!(r.is_object_role());
        assert!(!Role::KEY_SERIALIZER.is_object_role());
        assert_eq!(r.to_string(), "object_serializer|object_compressor");
        assert_eq!(Role::NONE.to_string(), "none");

        let mut acc = Role::NONE;
        acc |= Role::KEY_SERIALIZER;
        assert_eq!(acc, Role::KEY_SERIALIZER);
    }
}
