use std::{collections::BTreeMap, fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

fn default_compression_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Chain,
    Multi,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub kind: PipelineKind,
    pub stages: Vec<String>,
}

/// Settings for the bundled coders and the named pipelines built from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoderConfig {
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
    #[serde(default)]
    pub pipelines: BTreeMap<String, PipelineConfig>,
}

impl Default for CoderConfig {
    fn default() -> Self {
        CoderConfig {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            pipelines: BTreeMap::new(),
        }
    }
}

impl CoderConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let config: CoderConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file. A missing file yields the defaults.
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => Self::from_json(&contents).map_err(|e| {
                tracing::warn!(path = %path.as_ref().display(), error = %e, "bad coder config");
                e
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CoderConfig::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(Error::InvalidConfig(format!(
                "compression_level must be in 0..=9, got {}",
                self.compression_level
            )));
        }
        for (name, p) in &self.pipelines {
            if p.stages.is_empty() {
                return Err(Error::InvalidConfig(format!("pipeline {:?} has no stages", name)));
            }
        }
        Ok(())
    }
}
