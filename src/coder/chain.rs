use std::io::{Cursor, Read, Write};

use crate::{
    error::{Error, Result},
    object::Object,
};

use super::{composite_name, encode_pipeline, union_role, ObjectCoder, Role, SharedCoder};

/// Runs its stages as a pipeline: encode goes first to last, decode goes
/// last to first, with bytes threaded between stages.
#[derive(Debug)]
pub struct ChainCoder {
    name: String,
    role: Role,
    stages: Vec<SharedCoder>,
}

impl ChainCoder {
    pub fn new(stages: Vec<SharedCoder>) -> Result<Self> {
        if stages.is_empty() {
            return Err(Error::InvalidPipeline("chain needs at least one stage".into()));
        }
        for (i, stage) in stages.iter().enumerate() {
            if !stage.role().is_object_role() {
                return Err(Error::InvalidPipeline(format!(
                    "{} ({}) cannot encode objects",
                    stage.name(),
                    stage.role()
                )));
            }
            // Every stage but the first is fed the previous stage's bytes.
            if i > 0 && !stage.role().contains(Role::OBJECT_COMPRESSOR) {
                return Err(Error::InvalidPipeline(format!(
                    "{} ({}) cannot follow {}: only compressors accept encoded bytes",
                    stage.name(),
                    stage.role(),
                    stages[i - 1].name()
                )));
            }
        }
        Ok(ChainCoder {
            name: composite_name("chain", &stages),
            role: union_role(&stages),
            stages,
        })
    }

    pub fn stages(&self) -> &[SharedCoder] {
        &self.stages
    }
}

impl ObjectCoder for ChainCoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Role {
        self.role
    }

    fn encode(&self, w: &mut dyn Write, obj: &Object) -> Result<()> {
        encode_pipeline(&self.stages, w, obj)
    }

    fn decode(&self, r: &mut dyn Read) -> Result<Object> {
        let mut stages = self.stages.iter().rev();
        let last = match stages.next() {
            Some(s) => s,
            None => return Err(Error::InvalidPipeline("chain has no stages".into())),
        };
        let mut obj = last.decode(r).map_err(|e| e.in_stage(last.name()))?;
        let mut produced_by = last;
        for stage in stages {
            let bytes = obj.into_bytes().map_err(|o| {
                Error::unsupported(produced_by.name(), o.shape()).in_stage(produced_by.name())
            })?;
            tracing::trace!(stage = stage.name(), len = bytes.len(), "decoding stage");
            let len = bytes.len();
            let mut cursor = Cursor::new(bytes);
            obj = stage
                .decode(&mut cursor)
                .map_err(|e| e.in_stage(stage.name()))?;
            // Intermediate payloads hold exactly one unit.
            let offset = cursor.position() as usize;
            if offset < len {
                return Err(Error::TrailingBytes {
                    offset,
                    remaining: len - offset,
                }
                .in_stage(stage.name()));
            }
            produced_by = stage;
        }
        Ok(obj)
    }
}
