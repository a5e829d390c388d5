//! Deterministic and pseudo-random byte signals.
//!
//! A signal at resolution R holds `3·R²` bytes, read as an R×R grid of
//! interleaved channel triplets when a 2-D view is needed.

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::catalog::GeneratorSpec;
use crate::error::{ConfigError, GenerationError};

/// Channels per grid cell.
pub const CHANNELS: usize = 3;

/// Side length of the square signal grid. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Resolution(usize);

impl Resolution {
    pub fn new(side: usize) -> Result<Self, ConfigError> {
        if side == 0 {
            return Err(ConfigError::InvalidResolution(side));
        }
        Ok(Resolution(side))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Number of grid cells, R².
    pub fn cells(self) -> usize {
        self.0 * self.0
    }

    /// Signal length, 3·R².
    pub fn signal_len(self) -> usize {
        CHANNELS * self.cells()
    }
}

impl TryFrom<usize> for Resolution {
    type Error = ConfigError;

    fn try_from(side: usize) -> Result<Self, Self::Error> {
        Resolution::new(side)
    }
}

impl From<Resolution> for usize {
    fn from(r: Resolution) -> usize {
        r.0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// An immutable byte sequence of length `3·R²`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    bytes: Vec<u8>,
    resolution: Resolution,
}

impl Signal {
    /// Wrap raw bytes. Returns `None` if the length is not `3·R²`.
    pub fn from_bytes(bytes: Vec<u8>, resolution: Resolution) -> Option<Self> {
        if bytes.len() != resolution.signal_len() {
            return None;
        }
        Some(Signal { bytes, resolution })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Channel triplet of the cell at (`row`, `col`) in the R×R×3 layout.
    pub fn pixel(&self, row: usize, col: usize) -> [u8; CHANNELS] {
        let offset = (row * self.resolution.get() + col) * CHANNELS;
        [
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
        ]
    }

    /// Row-major R×R grid with each cell the mean of its three channels.
    pub fn grayscale(&self) -> Vec<f64> {
        self.bytes
            .chunks_exact(CHANNELS)
            .map(|px| px.iter().map(|&b| b as f64).sum::<f64>() / CHANNELS as f64)
            .collect()
    }

    /// The signal read as the little-endian base-256 integer k = Σ d_i·256^i.
    pub fn coordinate(&self) -> BigUint {
        if self.bytes.iter().all(|&b| b == 0) {
            return BigUint::zero();
        }
        BigUint::from_bytes_le(&self.bytes)
    }

    /// Number of decimal digits in [`Signal::coordinate`].
    pub fn coordinate_digits(&self) -> usize {
        self.coordinate().to_str_radix(10).len()
    }
}

/// Reduce a generator output to a byte: floor, then wrap modulo 256.
///
/// Wrapping rather than clamping is part of the recorded-results contract.
pub fn wrap_to_byte(value: f64) -> u8 {
    value.floor().rem_euclid(256.0) as u8
}

/// Evaluate `generator` at every index of a `3·R²` signal.
pub fn generate(
    generator: &GeneratorSpec,
    constant: f64,
    resolution: Resolution,
) -> Result<Signal, GenerationError> {
    let n = resolution.signal_len();
    let mut bytes = Vec::with_capacity(n);

    for i in 0..n {
        let value = generator.eval(i, constant);
        if !value.is_finite() {
            return Err(GenerationError::NonFinite {
                generator: generator.name().to_string(),
                index: i,
                value,
            });
        }
        bytes.push(wrap_to_byte(value));
    }

    Ok(Signal { bytes, resolution })
}

/// Uniform random bytes from a `StdRng` seeded with `seed`.
///
/// The same (resolution, seed) always yields the same signal.
pub fn generate_random(resolution: Resolution, seed: u64) -> Signal {
    let mut rng = StdRng::seed_from_u64(seed);
    let byte = Uniform::new_inclusive(0u8, 255u8);
    let bytes = byte
        .sample_iter(&mut rng)
        .take(resolution.signal_len())
        .collect();
    Signal { bytes, resolution }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GeneratorCatalog;

    fn res(r: usize) -> Resolution {
        Resolution::new(r).unwrap()
    }

    #[test]
    fn test_resolution_rejects_zero() {
        assert_eq!(Resolution::new(0), Err(ConfigError::InvalidResolution(0)));
        assert_eq!(res(8).signal_len(), 192);
        assert_eq!(res(16).cells(), 256);
    }

    #[test]
    fn test_wrap_to_byte() {
        assert_eq!(wrap_to_byte(0.0), 0);
        assert_eq!(wrap_to_byte(255.9), 255);
        assert_eq!(wrap_to_byte(256.0), 0);
        assert_eq!(wrap_to_byte(257.5), 1);
        // Negative values wrap upward, matching floor-then-euclidean-mod.
        assert_eq!(wrap_to_byte(-0.5), 255);
        assert_eq!(wrap_to_byte(-256.0), 0);
        assert_eq!(wrap_to_byte(1.0e12 + 3.0), ((1.0e12 as u64 + 3) % 256) as u8);
    }

    #[test]
    fn test_generate_length_and_determinism() {
        let catalog = GeneratorCatalog::standard();
        let sin_i2 = catalog.get("sin_i2").unwrap();
        let a = generate(sin_i2, std::f64::consts::PI, res(8)).unwrap();
        let b = generate(sin_i2, std::f64::consts::PI, res(8)).unwrap();
        assert_eq!(a.len(), 192);
        assert_eq!(a, b);
        // sin(0) = 0, so the first byte is floor(128).
        assert_eq!(a.as_bytes()[0], 128);
    }

    #[test]
    fn test_generate_reports_non_finite() {
        let spec = GeneratorSpec::new("reciprocal", |i, c| c / i as f64);
        let err = generate(&spec, 1.0, res(2)).unwrap_err();
        assert_eq!(
            err,
            GenerationError::NonFinite {
                generator: "reciprocal".to_string(),
                index: 0,
                value: f64::INFINITY,
            }
        );
    }

    #[test]
    fn test_generate_random_is_reproducible() {
        let a = generate_random(res(8), 7);
        let b = generate_random(res(8), 7);
        let c = generate_random(res(8), 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 192);
    }

    #[test]
    fn test_grayscale_and_pixel() {
        let bytes: Vec<u8> = (0..12).collect();
        let signal = Signal::from_bytes(bytes, res(2)).unwrap();
        assert_eq!(signal.pixel(0, 1), [3, 4, 5]);
        assert_eq!(signal.pixel(1, 1), [9, 10, 11]);
        assert_eq!(signal.grayscale(), vec![1.0, 4.0, 7.0, 10.0]);
        assert!(Signal::from_bytes(vec![0; 11], res(2)).is_none());
    }

    #[test]
    fn test_coordinate() {
        let mut bytes = vec![0u8; 12];
        bytes[0] = 1;
        bytes[1] = 2;
        let signal = Signal::from_bytes(bytes, res(2)).unwrap();
        assert_eq!(signal.coordinate(), BigUint::from(1u32 + 2 * 256));
        assert_eq!(signal.coordinate_digits(), 3);

        let zero = Signal::from_bytes(vec![0; 12], res(2)).unwrap();
        assert!(zero.coordinate().is_zero());
        assert_eq!(zero.coordinate_digits(), 1);
    }
}
