use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{coder}: unsupported object shape {shape}")]
    UnsupportedShape { coder: String, shape: &'static str },

    #[error("truncated input at offset {offset}: needed {needed} more bytes for {what}")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
    },

    #[error("{remaining} unread bytes left after offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    #[error("invalid marker 0x{marker:02x} at offset {offset}")]
    InvalidMarker { marker: u8, offset: usize },

    #[error("invalid escape 0x00 0x{byte:02x} at offset {offset}")]
    InvalidEscape { byte: u8, offset: usize },

    #[error("string element at offset {offset} is not valid utf-8")]
    InvalidUtf8 { offset: usize },

    #[error("cannot compare {left} with {right}")]
    TypeMismatch { left: String, right: String },

    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: Box<Error>,
    },

    #[error("{}", Attempts(.0))]
    Aggregate(Vec<(String, Error)>),

    #[error("invalid pipeline: {0}")]
    InvalidPipeline(String),

    #[error("unknown coder {0:?}")]
    UnknownCoder(String),

    #[error("coder {0:?} is already registered")]
    DuplicateCoder(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    #[error(transparent)]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    #[error(transparent)]
    CborEncode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error(transparent)]
    CborDecode(#[from] ciborium::de::Error<std::io::Error>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Attributes this error to the named pipeline stage.
    pub fn in_stage(self, stage: &str) -> Self {
        Error::Stage {
            stage: stage.to_owned(),
            source: Box::new(self),
        }
    }

    pub(crate) fn unsupported(coder: &str, shape: &'static str) -> Self {
        Error::UnsupportedShape {
            coder: coder.to_owned(),
            shape,
        }
    }
}

struct Attempts<'a>(&'a [(String, Error)]);

impl fmt::Display for Attempts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} candidates failed", self.0.len())?;
        for (name, err) in self.0 {
            write!(f, "; {}: {}", name, err)?;
        }
        Ok(())
    }
}
