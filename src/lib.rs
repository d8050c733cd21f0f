//! Pluggable object and key coders.
//!
//! Keys are encoded with an order-preserving tuple encoding, so encoded keys
//! can be range-scanned in any byte-ordered store. Objects go through
//! [`ObjectCoder`]s, which compose into sequential ([`ChainCoder`]) and
//! fallback ([`MultiCoder`]) pipelines.

pub mod coder;
pub mod config;
pub mod encoding;
pub mod error;
pub mod key;
mod numeric;
pub mod object;
pub mod plugins;

pub use coder::{chain::ChainCoder, multi::MultiCoder, KeyCoder, ObjectCoder, Role, SharedCoder};
pub use config::{CoderConfig, PipelineConfig, PipelineKind};
pub use error::{Error, Result};
pub use key::{Element, Key};
pub use object::Object;
pub use plugins::Registry;
