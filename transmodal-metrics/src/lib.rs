//! Structure-versus-randomness proxies for byte signals.
//!
//! Three independent metrics are computed for every signal:
//! - Shannon entropy of the byte histogram (bits, 0..=8)
//! - gzip compression ratio at maximum level (compressed / original)
//! - spectral flatness of the grayscale R×R grid (0..=1)
//!
//! Low entropy, low ratio and low flatness all point to structure. The
//! [`scoring`] module folds them into a single 0-100 transmodality score.

pub mod descriptive;
pub mod scoring;
pub mod spectrum;

use std::io::Write;

use beacon_core::Signal;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

pub use descriptive::{autocorrelation, basic_statistics, BasicStatistics};
pub use scoring::{ScoreBreakdown, Scorer, ScorerKind, SearchScorer, ValidationScorer};
pub use spectrum::{magnitude_spectrum, spectral_flatness, top_peaks, MagnitudeSpectrum, SpectralPeak};

/// Shannon entropy (bits) of the byte-value histogram.
///
/// Empty bins are dropped; a single populated bin gives exactly 0.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut counts = [0u64; 256];
    for &b in data {
        counts[b as usize] += 1;
    }
    let total = data.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| c as f64 / total)
        .fold(0.0, |acc, p| acc - p * p.log2())
}

/// gzip at `Compression::best()` over an in-memory buffer.
fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() + 32), Compression::best());
    // Writes go to a Vec<u8>; the only I/O error source is the sink.
    encoder
        .write_all(data)
        .expect("writing to an in-memory gzip stream cannot fail");
    encoder
        .finish()
        .expect("finishing an in-memory gzip stream cannot fail")
}

/// Sizes behind a compression ratio (Kolmogorov-complexity proxy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionDetail {
    pub original_bytes: usize,
    pub compressed_bytes: usize,
    pub compression_ratio: f64,
    /// (1 − ratio)·100; negative when gzip expands the input.
    pub savings_percent: f64,
}

/// Compress `data` and report both sizes.
pub fn compression_detail(data: &[u8]) -> CompressionDetail {
    let compressed_bytes = gzip(data).len();
    let original_bytes = data.len().max(1);
    let compression_ratio = compressed_bytes as f64 / original_bytes as f64;
    CompressionDetail {
        original_bytes: data.len(),
        compressed_bytes,
        compression_ratio,
        savings_percent: (1.0 - compression_ratio) * 100.0,
    }
}

/// Compressed length over original length. Always > 0: the gzip framing
/// alone is 18 bytes.
pub fn compression_ratio(data: &[u8]) -> f64 {
    compression_detail(data).compression_ratio
}

/// The three structure proxies plus auxiliary descriptive stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub shannon_entropy: f64,
    pub compression_ratio: f64,
    pub spectral_flatness: f64,
    /// Population standard deviation of the byte values.
    pub pixel_std: f64,
    /// max − min over the byte values.
    pub pixel_range: u8,
    pub unique_values: usize,
}

/// Compute every metric for one signal.
pub fn compute_metrics(signal: &Signal) -> MetricSet {
    let bytes = signal.as_bytes();
    let stats = basic_statistics(bytes);
    MetricSet {
        shannon_entropy: shannon_entropy(bytes),
        compression_ratio: compression_ratio(bytes),
        spectral_flatness: spectral_flatness(signal),
        pixel_std: stats.std_dev,
        pixel_range: stats.max - stats.min,
        unique_values: stats.unique_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{generate, generate_random, GeneratorCatalog, Resolution};

    fn res(r: usize) -> Resolution {
        Resolution::new(r).unwrap()
    }

    #[test]
    fn test_entropy_extremes() {
        assert_eq!(shannon_entropy(&[7u8; 192]), 0.0);
        assert_eq!(shannon_entropy(&[]), 0.0);

        let uniform: Vec<u8> = (0..=255).collect();
        assert!((shannon_entropy(&uniform) - 8.0).abs() < 1e-12);

        let two = [0u8, 1, 0, 1];
        assert!((shannon_entropy(&two) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compression_ratio_positive() {
        assert!(compression_ratio(&[0u8; 192]) > 0.0);
        assert!(compression_ratio(&[]) > 0.0);

        let detail = compression_detail(&[0u8; 192]);
        assert_eq!(detail.original_bytes, 192);
        assert!(detail.compressed_bytes < 192);
        assert!(detail.savings_percent > 0.0);
    }

    #[test]
    fn test_random_signal_is_incompressible() {
        let signal = generate_random(res(8), 0);
        let ratio = compression_ratio(signal.as_bytes());
        assert!(ratio >= 1.0, "random 192 bytes should not compress, got {}", ratio);
    }

    #[test]
    fn test_all_zero_signal_metrics() {
        let signal = beacon_core::Signal::from_bytes(vec![0; 192], res(8)).unwrap();
        let m = compute_metrics(&signal);
        assert_eq!(m.shannon_entropy, 0.0);
        assert_eq!(m.spectral_flatness, 0.0);
        assert_eq!(m.pixel_std, 0.0);
        assert_eq!(m.pixel_range, 0);
        assert_eq!(m.unique_values, 1);
        assert!(m.compression_ratio > 0.0);
    }

    #[test]
    fn test_constant_nonzero_signal_metrics() {
        let signal = beacon_core::Signal::from_bytes(vec![7; 192], res(8)).unwrap();
        let m = compute_metrics(&signal);
        assert_eq!(m.shannon_entropy, 0.0);
        assert!(m.spectral_flatness.is_finite());
        assert!((0.0..=1.0).contains(&m.spectral_flatness), "flatness {}", m.spectral_flatness);
        assert_eq!(m.pixel_std, 0.0);
        assert_eq!(m.pixel_range, 0);
        assert_eq!(m.unique_values, 1);
        assert!(m.compression_ratio > 0.0 && m.compression_ratio < 1.0);

        for kind in [ScorerKind::Search, ScorerKind::Validation] {
            let total = kind.score(&m).total;
            assert!(total.is_finite() && (0.0..=100.0).contains(&total), "{} {}", kind, total);
        }
    }

    #[test]
    fn test_metric_ranges_across_catalog() {
        let catalog = GeneratorCatalog::standard();
        for spec in catalog.iter() {
            for r in [4, 8, 16] {
                let signal = generate(spec, std::f64::consts::E, res(r)).unwrap();
                let m = compute_metrics(&signal);
                assert!((0.0..=8.0).contains(&m.shannon_entropy), "{}", spec.name());
                assert!(m.compression_ratio > 0.0, "{}", spec.name());
                assert!(
                    (0.0..=1.0).contains(&m.spectral_flatness),
                    "{} flatness {}",
                    spec.name(),
                    m.spectral_flatness
                );
                assert!(m.unique_values >= 1 && m.unique_values <= 256);
            }
        }
    }

    #[test]
    fn test_sin_i2_tau_more_compressible_than_random() {
        let catalog = GeneratorCatalog::standard();
        let beacon = generate(
            catalog.get("sin_i2").unwrap(),
            std::f64::consts::TAU,
            res(8),
        )
        .unwrap();
        let random = generate_random(res(8), 42);
        let beacon_ratio = compression_ratio(beacon.as_bytes());
        let random_ratio = compression_ratio(random.as_bytes());
        assert!(beacon_ratio < 0.9, "beacon ratio {}", beacon_ratio);
        assert!(beacon_ratio < random_ratio);
    }
}
