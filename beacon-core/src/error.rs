//! Error taxonomy shared by every experiment crate.
//!
//! Two kinds of failure exist. A [`GenerationError`] is local to one
//! (constant, generator) combination and is recovered by the caller.
//! A [`ConfigError`] means the run itself is malformed and must abort before
//! any computation starts. Degenerate metric inputs are not errors at all.

use serde::{Deserialize, Serialize};

/// Failure to turn a generator/constant pair into a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum GenerationError {
    #[error("generator '{generator}' produced non-finite value {value} at index {index}")]
    NonFinite {
        generator: String,
        index: usize,
        value: f64,
    },
}

/// Invalid run parameters. Always fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("resolution must be a positive integer, got {0}")]
    InvalidResolution(usize),

    #[error("bootstrap sample count must be positive")]
    ZeroSamples,

    #[error("{0} catalog is empty")]
    EmptyCatalog(&'static str),

    #[error("unknown {kind} '{name}'")]
    UnknownEntry { kind: &'static str, name: String },

    #[error("invalid value '{value}' for --{flag}")]
    InvalidFlag { flag: &'static str, value: String },

    #[error("significance family size must be positive")]
    ZeroFamilySize,

    #[error("no resolutions configured")]
    NoResolutions,

    #[error("no candidates configured")]
    NoCandidates,

    #[error(
        "observed beacon '{beacon}' was scored with {observed} but the null distribution uses {expected}"
    )]
    ProvenanceMismatch {
        beacon: String,
        observed: String,
        expected: String,
    },
}
