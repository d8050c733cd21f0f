use std::{collections::BTreeMap, sync::Arc};

use crate::{
    coder::{chain::ChainCoder, multi::MultiCoder, KeyCoder, Role, SharedCoder},
    config::{CoderConfig, PipelineConfig, PipelineKind},
    error::{Error, Result},
    object::Object,
};

pub mod cbor;
pub mod gzip;
pub mod json;
pub mod msgpack;
pub mod tuple;
pub mod zlib;

pub use cbor::CborCoder;
pub use gzip::GzipCoder;
pub use json::JsonCoder;
pub use msgpack::MsgPackCoder;
pub use tuple::TupleCoder;
pub use zlib::ZlibCoder;

// Compressors only take byte-like payloads.
pub(crate) fn byte_payload<'a>(coder: &str, obj: &'a Object) -> Result<&'a [u8]> {
    obj.as_byte_slice()
        .ok_or_else(|| Error::unsupported(coder, obj.shape()))
}

/// An explicit set of available coders, looked up by name.
///
/// Nothing is registered globally; whoever assembles pipelines builds a
/// registry and passes it along.
#[derive(Debug, Default)]
pub struct Registry {
    key_coders: Vec<Arc<dyn KeyCoder>>,
    object_coders: Vec<SharedCoder>,
    pipelines: BTreeMap<String, PipelineConfig>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// A registry holding every bundled coder, plus the pipelines named in
    /// `config`.
    pub fn with_defaults(config: &CoderConfig) -> Result<Self> {
        config.validate()?;
        let mut registry = Registry::new();
        registry.register_key(Arc::new(TupleCoder::new()))?;
        registry.register_object(Arc::new(CborCoder::new()))?;
        registry.register_object(Arc::new(JsonCoder::new()))?;
        registry.register_object(Arc::new(MsgPackCoder::new()))?;
        registry.register_object(Arc::new(GzipCoder::new(config.compression_level)))?;
        registry.register_object(Arc::new(ZlibCoder::new(config.compression_level)))?;
        registry.pipelines = config.pipelines.clone();
        Ok(registry)
    }

    pub fn register_object(&mut self, coder: SharedCoder) -> Result<()> {
        if self.object_coder(coder.name()).is_some() {
            return Err(Error::DuplicateCoder(coder.name().to_owned()));
        }
        tracing::debug!(name = coder.name(), role = %coder.role(), "registered object coder");
        self.object_coders.push(coder);
        Ok(())
    }

    pub fn register_key(&mut self, coder: Arc<dyn KeyCoder>) -> Result<()> {
        if self.key_coder(coder.name()).is_some() {
            return Err(Error::DuplicateCoder(coder.name().to_owned()));
        }
        tracing::debug!(name = coder.name(), "registered key coder");
        self.key_coders.push(coder);
        Ok(())
    }

    pub fn object_coder(&self, name: &str) -> Option<SharedCoder> {
        self.object_coders.iter().find(|c| c.name() == name).cloned()
    }

    pub fn key_coder(&self, name: &str) -> Option<Arc<dyn KeyCoder>> {
        self.key_coders.iter().find(|c| c.name() == name).cloned()
    }

    pub fn object_coders(&self) -> &[SharedCoder] {
        &self.object_coders
    }

    pub fn key_coders(&self) -> &[Arc<dyn KeyCoder>] {
        &self.key_coders
    }

    pub fn object_coders_with_role(&self, role: Role) -> impl Iterator<Item = &SharedCoder> + '_ {
        self.object_coders
            .iter()
            .filter(move |c| c.role().contains(role))
    }

    fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<SharedCoder>> {
        names
            .iter()
            .map(|n| {
                self.object_coder(n.as_ref())
                    .ok_or_else(|| Error::UnknownCoder(n.as_ref().to_owned()))
            })
            .collect()
    }

    pub fn chain<S: AsRef<str>>(&self, names: &[S]) -> Result<ChainCoder> {
        ChainCoder::new(self.resolve(names)?)
    }

    pub fn multi<S: AsRef<str>>(&self, names: &[S]) -> Result<MultiCoder> {
        MultiCoder::new(self.resolve(names)?)
    }

    /// Builds the pipeline configured under `name`.
    pub fn pipeline(&self, name: &str) -> Result<SharedCoder> {
        let cfg = self
            .pipelines
            .get(name)
            .ok_or_else(|| Error::UnknownCoder(name.to_owned()))?;
        let coder: SharedCoder = match cfg.kind {
            PipelineKind::Chain => Arc::new(self.chain(cfg.stages.as_slice())?),
            PipelineKind::Multi => Arc::new(self.multi(cfg.stages.as_slice())?),
        };
        Ok(coder)
    }
}
