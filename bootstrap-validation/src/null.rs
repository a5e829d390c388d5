//! Empirical null distribution of scores over seeded uniform-random signals.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use beacon_core::{generate_random, ConfigError, Resolution};
use transmodal_metrics::{compute_metrics, MetricSet, ScorerKind};

use crate::summary::DistributionSummary;

/// How a null distribution is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of random signals, seeded `0..samples`.
    pub samples: usize,
    pub resolution: Resolution,
    pub scorer: ScorerKind,
    /// Score samples on the rayon pool. Output order is unchanged.
    pub parallel: bool,
}

impl BootstrapConfig {
    pub fn new(samples: usize, resolution: Resolution, scorer: ScorerKind) -> Self {
        BootstrapConfig {
            samples,
            resolution,
            scorer,
            parallel: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        Ok(())
    }
}

/// One scored random signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NullSample {
    pub seed: u64,
    pub metrics: MetricSet,
    pub score: f64,
}

fn null_sample(resolution: Resolution, scorer: ScorerKind, seed: u64) -> NullSample {
    let signal = generate_random(resolution, seed);
    let metrics = compute_metrics(&signal);
    NullSample {
        seed,
        metrics,
        score: scorer.score(&metrics).total,
    }
}

/// Scores of `samples` random signals, all at one resolution and under one
/// scorer. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullDistribution {
    resolution: Resolution,
    scorer: ScorerKind,
    samples: Vec<NullSample>,
}

/// Per-metric summaries of a null distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummaries {
    pub shannon_entropy: DistributionSummary,
    pub compression_ratio: DistributionSummary,
    pub spectral_flatness: DistributionSummary,
}

impl NullDistribution {
    /// Generate and score every sample. Deterministic in `config`.
    pub fn build(config: &BootstrapConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        log::info!(
            "building null distribution: {} samples at {}, {}",
            config.samples,
            config.resolution,
            config.scorer
        );

        let n = config.samples;
        // Sample i is seeded with i, so both paths build the same distribution.
        let samples: Vec<NullSample> = if config.parallel {
            (0..n)
                .into_par_iter()
                .map(|i| null_sample(config.resolution, config.scorer, i as u64))
                .collect()
        } else {
            let mut samples = Vec::with_capacity(n);
            for i in 0..n {
                samples.push(null_sample(config.resolution, config.scorer, i as u64));
                if (i + 1) % 100 == 0 {
                    log::info!("  {}/{} null samples", i + 1, n);
                }
            }
            samples
        };

        Ok(NullDistribution {
            resolution: config.resolution,
            scorer: config.scorer,
            samples,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn scorer(&self) -> ScorerKind {
        self.scorer
    }

    pub fn samples(&self) -> &[NullSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Scores in seed order.
    pub fn scores(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.score).collect()
    }

    pub fn summary(&self) -> DistributionSummary {
        DistributionSummary::from_values(&self.scores())
    }

    pub fn metric_summaries(&self) -> MetricSummaries {
        MetricSummaries {
            shannon_entropy: self.metric_summary(|m| m.shannon_entropy),
            compression_ratio: self.metric_summary(|m| m.compression_ratio),
            spectral_flatness: self.metric_summary(|m| m.spectral_flatness),
        }
    }

    fn metric_summary(&self, metric: impl Fn(&MetricSet) -> f64) -> DistributionSummary {
        let values: Vec<f64> = self.samples.iter().map(|s| metric(&s.metrics)).collect();
        DistributionSummary::from_values(&values)
    }

    /// Fraction of null scores at or above `observed`.
    pub fn p_value(&self, observed: f64) -> f64 {
        // Non-empty by construction.
        p_value(observed, &self.scores()).unwrap_or(0.0)
    }
}

/// Empirical one-sided p-value: `count(null >= observed) / len(null)`.
///
/// Ties count against the observation. Zero is possible; no `+1`
/// correction is applied.
pub fn p_value(observed: f64, null_scores: &[f64]) -> Result<f64, ConfigError> {
    if null_scores.is_empty() {
        return Err(ConfigError::ZeroSamples);
    }
    let at_or_above = null_scores.iter().filter(|&&s| s >= observed).count();
    Ok(at_or_above as f64 / null_scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(side: usize) -> Resolution {
        Resolution::new(side).unwrap()
    }

    #[test]
    fn test_p_value_boundaries() {
        let null = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(p_value(41.0, &null).unwrap(), 0.0);
        assert_eq!(p_value(40.0, &null).unwrap(), 0.25);
        assert_eq!(p_value(25.0, &null).unwrap(), 0.5);
        assert_eq!(p_value(10.0, &null).unwrap(), 1.0);
        assert_eq!(p_value(-5.0, &null).unwrap(), 1.0);
    }

    #[test]
    fn test_p_value_ties_count_against() {
        let null = [50.0; 10];
        assert_eq!(p_value(50.0, &null).unwrap(), 1.0);
    }

    #[test]
    fn test_p_value_empty_null() {
        assert_eq!(p_value(1.0, &[]), Err(ConfigError::ZeroSamples));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let config = BootstrapConfig::new(0, res(8), ScorerKind::Validation);
        assert_eq!(NullDistribution::build(&config), Err(ConfigError::ZeroSamples));
    }

    #[test]
    fn test_build_is_seeded_in_order() {
        let config = BootstrapConfig::new(12, res(8), ScorerKind::Validation);
        let null = NullDistribution::build(&config).unwrap();
        assert_eq!(null.len(), 12);
        let seeds: Vec<u64> = null.samples().iter().map(|s| s.seed).collect();
        assert_eq!(seeds, (0..12).collect::<Vec<u64>>());
        assert_eq!(null.resolution(), res(8));
        assert_eq!(null.scorer(), ScorerKind::Validation);
    }

    #[test]
    fn test_build_deterministic() {
        let config = BootstrapConfig::new(20, res(8), ScorerKind::Validation);
        let a = NullDistribution::build(&config).unwrap();
        let b = NullDistribution::build(&config).unwrap();
        assert_eq!(a.scores(), b.scores());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut config = BootstrapConfig::new(24, res(8), ScorerKind::Search);
        let seq = NullDistribution::build(&config).unwrap();
        config.parallel = true;
        let par = NullDistribution::build(&config).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_random_signals_score_low() {
        let config = BootstrapConfig::new(50, res(8), ScorerKind::Validation);
        let null = NullDistribution::build(&config).unwrap();
        let summary = null.summary();
        assert_eq!(summary.count, 50);
        // Uniform noise barely compresses and has a near-flat spectrum.
        assert!(summary.max < 60.0, "max null score {}", summary.max);
        let metrics = null.metric_summaries();
        assert!(metrics.compression_ratio.min >= 1.0);
        assert!(metrics.shannon_entropy.mean > 6.5);
    }

    #[test]
    fn test_p_value_of_extremes() {
        let config = BootstrapConfig::new(30, res(8), ScorerKind::Validation);
        let null = NullDistribution::build(&config).unwrap();
        assert_eq!(null.p_value(100.0 + 1e-9), 0.0);
        assert_eq!(null.p_value(f64::NEG_INFINITY), 1.0);
    }
}
