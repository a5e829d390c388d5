//! Shared types for transmodal beacon experiments.
//!
//! A *beacon* is a deterministic byte signal built from a generator function
//! and a mathematical constant. This crate owns the signal itself, the
//! generator and constant catalogs, and the error taxonomy; metrics, search
//! and validation live in their own crates.

pub mod catalog;
pub mod cli;
pub mod error;
pub mod signal;

pub use catalog::{ConstantCatalog, GeneratorCatalog, GeneratorFn, GeneratorSpec, NamedConstant};
pub use error::{ConfigError, GenerationError};
pub use signal::{generate, generate_random, wrap_to_byte, Resolution, Signal, CHANNELS};
