//! Side-by-side profiles of a few beacons and a random control.
//!
//! Each signal gets the full descriptive treatment: byte statistics,
//! compression detail, the strongest off-DC spectral peaks, horizontal
//! autocorrelation and the size of its base-256 coordinate.

use std::f64::consts::{E, PI};

use beacon_core::{
    catalog, generate, generate_random, ConfigError, GeneratorSpec, NamedConstant, Resolution,
    Signal,
};
use serde::{Deserialize, Serialize};
use transmodal_metrics::{
    autocorrelation, basic_statistics, compression_detail, compute_metrics, magnitude_spectrum,
    top_peaks, BasicStatistics, CompressionDetail, MetricSet, SpectralPeak,
};

use crate::robustness::CandidatePair;
use crate::search::CombinationFailure;

/// Leading decimal digits of the coordinate kept in a profile.
const COORDINATE_PREFIX_DIGITS: usize = 100;

#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub resolution: Resolution,
    pub subjects: Vec<CandidatePair>,
    /// Seed of the random control, profiled first. `None` skips it.
    pub random_seed: Option<u64>,
    pub max_lag: usize,
    pub n_peaks: usize,
}

impl ComparisonConfig {
    /// φ, π and e under `sin(i²·c)` against a seed-42 random control.
    pub fn standard(resolution: Resolution) -> Self {
        let sin_i2 = GeneratorSpec::new("sin_i2", catalog::sin_i2);
        let phi = (1.0 + 5f64.sqrt()) / 2.0;
        ComparisonConfig {
            resolution,
            subjects: vec![
                CandidatePair::new("phi", NamedConstant::new("golden_phi", phi), sin_i2.clone()),
                CandidatePair::new("pi", NamedConstant::new("pi", PI), sin_i2.clone()),
                CandidatePair::new("e", NamedConstant::new("e", E), sin_i2),
            ],
            random_seed: Some(42),
            max_lag: 3,
            n_peaks: 5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subjects.is_empty() && self.random_seed.is_none() {
            return Err(ConfigError::NoCandidates);
        }
        Ok(())
    }
}

/// Everything measured for one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalProfile {
    pub label: String,
    pub coordinate_digits: usize,
    /// First digits of the coordinate, `...`-terminated when truncated.
    pub coordinate_prefix: String,
    pub statistics: BasicStatistics,
    pub compression: CompressionDetail,
    pub metrics: MetricSet,
    pub peaks: Vec<SpectralPeak>,
    /// Lags `0..=max_lag`.
    pub autocorrelation: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub resolution: Resolution,
    pub total_dimensions: usize,
    pub profiles: Vec<SignalProfile>,
    pub failures: Vec<CombinationFailure>,
}

impl ComparisonReport {
    pub fn profile(&self, label: &str) -> Option<&SignalProfile> {
        self.profiles.iter().find(|p| p.label == label)
    }
}

/// Profile one signal.
pub fn profile_signal(
    label: &str,
    signal: &Signal,
    max_lag: usize,
    n_peaks: usize,
) -> SignalProfile {
    let bytes = signal.as_bytes();
    let digits = signal.coordinate_digits();
    let mut coordinate_prefix = signal.coordinate().to_string();
    if coordinate_prefix.len() > COORDINATE_PREFIX_DIGITS {
        coordinate_prefix.truncate(COORDINATE_PREFIX_DIGITS);
        coordinate_prefix.push_str("...");
    }

    SignalProfile {
        label: label.to_string(),
        coordinate_digits: digits,
        coordinate_prefix,
        statistics: basic_statistics(bytes),
        compression: compression_detail(bytes),
        metrics: compute_metrics(signal),
        peaks: top_peaks(&magnitude_spectrum(signal), n_peaks),
        autocorrelation: autocorrelation(signal, max_lag),
    }
}

/// Profile the random control and every subject at one resolution.
pub fn compare_signals(config: &ComparisonConfig) -> Result<ComparisonReport, ConfigError> {
    config.validate()?;

    let mut profiles = Vec::with_capacity(config.subjects.len() + 1);
    let mut failures = Vec::new();

    if let Some(seed) = config.random_seed {
        let signal = generate_random(config.resolution, seed);
        profiles.push(profile_signal("random", &signal, config.max_lag, config.n_peaks));
    }

    for subject in &config.subjects {
        match generate(&subject.generator, subject.constant.value, config.resolution) {
            Ok(signal) => {
                let profile =
                    profile_signal(&subject.label, &signal, config.max_lag, config.n_peaks);
                log::info!(
                    "{}: H={:.3} bits, ratio={:.3}, {} coordinate digits",
                    profile.label,
                    profile.metrics.shannon_entropy,
                    profile.compression.compression_ratio,
                    profile.coordinate_digits
                );
                profiles.push(profile);
            }
            Err(error) => {
                log::warn!("{} skipped: {}", subject.label, error);
                failures.push(CombinationFailure {
                    name: subject.label.clone(),
                    generator_name: subject.generator.name().to_string(),
                    constant_name: subject.constant.name.clone(),
                    error,
                });
            }
        }
    }

    Ok(ComparisonReport {
        resolution: config.resolution,
        total_dimensions: config.resolution.signal_len(),
        profiles,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(side: usize) -> Resolution {
        Resolution::new(side).unwrap()
    }

    #[test]
    fn test_standard_comparison() {
        let report = compare_signals(&ComparisonConfig::standard(res(8))).unwrap();
        assert_eq!(report.total_dimensions, 192);
        let labels: Vec<&str> = report.profiles.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["random", "phi", "pi", "e"]);
        assert!(report.failures.is_empty());

        for p in &report.profiles {
            assert_eq!(p.statistics.total, 192);
            assert_eq!(p.compression.original_bytes, 192);
            assert_eq!(p.peaks.len(), 5);
            assert_eq!(p.autocorrelation.len(), 4);
            assert_eq!(p.autocorrelation[0], 1.0);
            // 256^192 has 463 decimal digits.
            assert!(p.coordinate_digits <= 463);
            assert!(p.coordinate_prefix.ends_with("..."));
        }

        let random = report.profile("random").unwrap();
        assert!(random.compression.compression_ratio >= 1.0);
        assert!(random.compression.savings_percent <= 0.0);
        let pi = report.profile("pi").unwrap();
        assert_eq!(pi.compression.compression_ratio, pi.metrics.compression_ratio);
        assert_eq!(pi.statistics.unique_values, pi.metrics.unique_values);
    }

    #[test]
    fn test_peaks_skip_dc_block() {
        let report = compare_signals(&ComparisonConfig::standard(res(8))).unwrap();
        for p in &report.profiles {
            for peak in &p.peaks {
                assert!(!((3..=5).contains(&peak.x) && (3..=5).contains(&peak.y)));
            }
        }
    }

    #[test]
    fn test_non_finite_subject_recorded() {
        fn blow_up(_i: usize, _c: f64) -> f64 {
            f64::NAN
        }
        let mut config = ComparisonConfig::standard(res(4));
        config.subjects.push(CandidatePair::new(
            "nan",
            NamedConstant::new("pi", PI),
            GeneratorSpec::new("nan", blow_up),
        ));
        let report = compare_signals(&config).unwrap();
        assert_eq!(report.profiles.len(), 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "nan");
    }

    #[test]
    fn test_empty_comparison_rejected() {
        let mut config = ComparisonConfig::standard(res(8));
        config.subjects.clear();
        config.random_seed = None;
        assert!(matches!(compare_signals(&config), Err(ConfigError::NoCandidates)));
    }

    #[test]
    fn test_short_coordinate_not_truncated() {
        let signal = Signal::from_bytes(vec![1, 0, 0], res(1)).unwrap();
        let p = profile_signal("one", &signal, 3, 5);
        assert_eq!(p.coordinate_digits, 1);
        assert_eq!(p.coordinate_prefix, "1");
        assert_eq!(p.autocorrelation, vec![1.0, 0.0, 0.0, 0.0]);
    }
}
