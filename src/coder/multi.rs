use std::io::{Read, Write};

use crate::{
    error::{Error, Result},
    object::Object,
};

use super::{composite_name, encode_pipeline, union_role, ObjectCoder, Role, SharedCoder};

/// Encodes like [`ChainCoder`](super::chain::ChainCoder) but decodes by
/// trial: each candidate, last first, gets the same raw input on its own and
/// the first one to decode all of it wins.
///
/// Decoding owns the rest of the stream it is handed, since every candidate
/// needs to see the whole unit from the start.
#[derive(Debug)]
pub struct MultiCoder {
    name: String,
    role: Role,
    coders: Vec<SharedCoder>,
}

impl MultiCoder {
    pub fn new(coders: Vec<SharedCoder>) -> Result<Self> {
        if coders.is_empty() {
            return Err(Error::InvalidPipeline("multi needs at least one candidate".into()));
        }
        if let Some(c) = coders.iter().find(|c| !c.role().is_object_role()) {
            return Err(Error::InvalidPipeline(format!(
                "{} ({}) cannot encode objects",
                c.name(),
                c.role()
            )));
        }
        Ok(MultiCoder {
            name: composite_name("multi", &coders),
            role: union_role(&coders),
            coders,
        })
    }

    pub fn candidates(&self) -> &[SharedCoder] {
        &self.coders
    }
}

impl ObjectCoder for MultiCoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Role {
        self.role
    }

    fn encode(&self, w: &mut dyn Write, obj: &Object) -> Result<()> {
        encode_pipeline(&self.coders, w, obj)
    }

    fn decode(&self, r: &mut dyn Read) -> Result<Object> {
        let mut raw = Vec::new();
        r.read_to_end(&mut raw)?;

        let mut failures = Vec::new();
        for coder in self.coders.iter().rev() {
            let mut rest = raw.as_slice();
            let res = coder.decode(&mut rest).and_then(|obj| {
                if rest.is_empty() {
                    Ok(obj)
                } else {
                    Err(Error::TrailingBytes {
                        offset: raw.len() - rest.len(),
                        remaining: rest.len(),
                    })
                }
            });
            match res {
                Ok(obj) => return Ok(obj),
                Err(e) => {
                    tracing::debug!(coder = coder.name(), error = %e, "decode candidate failed");
                    failures.push((coder.name().to_owned(), e));
                }
            }
        }
        Err(Error::Aggregate(failures))
    }
}
