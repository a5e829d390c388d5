//! Multi-resolution robustness of a fixed candidate list.
//!
//! Each candidate, and each negative control, is regenerated and rescored at
//! every configured resolution. A candidate is robust when its score stays
//! above [`SCORE_THRESHOLD`] and its entropy below [`ENTROPY_THRESHOLD`] at
//! every resolution. Per resolution, the mean score of the positive family is
//! compared with the negative controls. Descriptive only: no test statistic.

use std::f64::consts::{E, PI, TAU};

use beacon_core::{
    catalog, generate_random, ConfigError, GeneratorSpec, NamedConstant, Resolution,
};
use serde::{Deserialize, Serialize};
use transmodal_metrics::{compute_metrics, MetricSet, Scorer, ScorerKind};

use crate::search::{evaluate_candidate, CombinationFailure};

/// A candidate must score strictly above this at every resolution.
pub const SCORE_THRESHOLD: f64 = 90.0;

/// A candidate's entropy must stay strictly below this (bits) at every resolution.
pub const ENTROPY_THRESHOLD: f64 = 3.0;

/// A (constant, generator) pair under test.
#[derive(Debug, Clone)]
pub struct CandidatePair {
    pub label: String,
    pub constant: NamedConstant,
    pub generator: GeneratorSpec,
}

impl CandidatePair {
    pub fn new(label: impl Into<String>, constant: NamedConstant, generator: GeneratorSpec) -> Self {
        CandidatePair {
            label: label.into(),
            constant,
            generator,
        }
    }
}

/// Which group a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Positive,
    NegativeControl,
    RandomControl,
}

#[derive(Debug, Clone)]
pub struct RobustnessConfig {
    pub resolutions: Vec<Resolution>,
    pub candidates: Vec<CandidatePair>,
    pub negative_controls: Vec<CandidatePair>,
    /// Seed for one random-baseline row per resolution; `None` skips it.
    pub random_control_seed: Option<u64>,
}

impl RobustnessConfig {
    /// π-family beacons against φ and e controls at 8, 16 and 32.
    pub fn standard() -> Self {
        let sin_i2 = GeneratorSpec::new("sin_i2", catalog::sin_i2);
        let sin_i = GeneratorSpec::new("sin_i", catalog::sin_i);
        let cos_i2 = GeneratorSpec::new("cos_i2", catalog::cos_i2);
        let phi = (1.0 + 5f64.sqrt()) / 2.0;

        RobustnessConfig {
            resolutions: [8, 16, 32]
                .into_iter()
                .filter_map(|r| Resolution::new(r).ok())
                .collect(),
            candidates: vec![
                CandidatePair::new("tau sin_i2", NamedConstant::new("tau", TAU), sin_i2.clone()),
                CandidatePair::new("pi sin_i", NamedConstant::new("pi", PI), sin_i),
                CandidatePair::new("pi sin_i2", NamedConstant::new("pi", PI), sin_i2.clone()),
                CandidatePair::new("pi_2 cos_i2", NamedConstant::new("pi_2", PI / 2.0), cos_i2),
                CandidatePair::new("pi_4 sin_i2", NamedConstant::new("pi_4", PI / 4.0), sin_i2.clone()),
            ],
            negative_controls: vec![
                CandidatePair::new("phi sin_i2", NamedConstant::new("golden_phi", phi), sin_i2.clone()),
                CandidatePair::new("e sin_i2", NamedConstant::new("e", E), sin_i2),
            ],
            random_control_seed: Some(0),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolutions.is_empty() {
            return Err(ConfigError::NoResolutions);
        }
        if self.candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }
        Ok(())
    }
}

/// One candidate measured at one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionMeasurement {
    pub label: String,
    pub family: Family,
    pub constant_name: String,
    pub generator_name: String,
    pub resolution: Resolution,
    pub signal_len: usize,
    pub metrics: MetricSet,
    pub score: f64,
}

/// Robustness verdict for one positive candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRobustness {
    pub label: String,
    /// (resolution, score, entropy) for every resolution that was measured.
    pub per_resolution: Vec<(Resolution, f64, f64)>,
    pub all_scores_above: bool,
    pub all_entropy_below: bool,
    /// Measured at every resolution and both thresholds held.
    pub robust: bool,
}

/// Positive versus negative-control means at one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSeparation {
    pub resolution: Resolution,
    pub positive_mean: Option<f64>,
    pub negative_mean: Option<f64>,
    /// positive_mean − negative_mean, when both exist.
    pub separation: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobustnessReport {
    pub scorer: ScorerKind,
    pub score_threshold: f64,
    pub entropy_threshold: f64,
    pub measurements: Vec<ResolutionMeasurement>,
    pub candidates: Vec<CandidateRobustness>,
    pub separations: Vec<ResolutionSeparation>,
    pub failures: Vec<CombinationFailure>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn measure_family(
    pairs: &[CandidatePair],
    family: Family,
    resolutions: &[Resolution],
    scorer: &dyn Scorer,
    measurements: &mut Vec<ResolutionMeasurement>,
    failures: &mut Vec<CombinationFailure>,
) {
    for pair in pairs {
        for &resolution in resolutions {
            match evaluate_candidate(&pair.generator, &pair.constant, resolution, scorer) {
                Ok(result) => {
                    log::info!(
                        "{:12} at {:>5}: score {:6.2}, H {:.2} bits, ratio {:.2}",
                        pair.label,
                        resolution,
                        result.score.total,
                        result.metrics.shannon_entropy,
                        result.metrics.compression_ratio
                    );
                    measurements.push(ResolutionMeasurement {
                        label: pair.label.clone(),
                        family,
                        constant_name: result.constant_name,
                        generator_name: result.generator_name,
                        resolution,
                        signal_len: resolution.signal_len(),
                        metrics: result.metrics,
                        score: result.score.total,
                    });
                }
                Err(error) => {
                    log::warn!("{} at {} skipped: {}", pair.label, resolution, error);
                    failures.push(CombinationFailure {
                        name: pair.label.clone(),
                        generator_name: pair.generator.name().to_string(),
                        constant_name: pair.constant.name.clone(),
                        error,
                    });
                }
            }
        }
    }
}

/// Rerun generate → metrics → score for every pair at every resolution.
pub fn check_robustness(
    config: &RobustnessConfig,
    scorer: &dyn Scorer,
) -> Result<RobustnessReport, ConfigError> {
    config.validate()?;

    let mut measurements = Vec::new();
    let mut failures = Vec::new();

    measure_family(
        &config.candidates,
        Family::Positive,
        &config.resolutions,
        scorer,
        &mut measurements,
        &mut failures,
    );
    measure_family(
        &config.negative_controls,
        Family::NegativeControl,
        &config.resolutions,
        scorer,
        &mut measurements,
        &mut failures,
    );

    if let Some(seed) = config.random_control_seed {
        for &resolution in &config.resolutions {
            let signal = generate_random(resolution, seed);
            let metrics = compute_metrics(&signal);
            measurements.push(ResolutionMeasurement {
                label: "random".to_string(),
                family: Family::RandomControl,
                constant_name: "random".to_string(),
                generator_name: format!("seed {}", seed),
                resolution,
                signal_len: signal.len(),
                metrics,
                score: scorer.score(&metrics).total,
            });
        }
    }

    let candidates = config
        .candidates
        .iter()
        .map(|pair| {
            let per_resolution: Vec<(Resolution, f64, f64)> = measurements
                .iter()
                .filter(|m| m.family == Family::Positive && m.label == pair.label)
                .map(|m| (m.resolution, m.score, m.metrics.shannon_entropy))
                .collect();
            let complete = per_resolution.len() == config.resolutions.len();
            let all_scores_above = per_resolution.iter().all(|&(_, s, _)| s > SCORE_THRESHOLD);
            let all_entropy_below = per_resolution
                .iter()
                .all(|&(_, _, h)| h < ENTROPY_THRESHOLD);
            CandidateRobustness {
                label: pair.label.clone(),
                per_resolution,
                all_scores_above,
                all_entropy_below,
                robust: complete && all_scores_above && all_entropy_below,
            }
        })
        .collect();

    let separations = config
        .resolutions
        .iter()
        .map(|&resolution| {
            let scores_of = |family: Family| -> Vec<f64> {
                measurements
                    .iter()
                    .filter(|m| m.resolution == resolution && m.family == family)
                    .map(|m| m.score)
                    .collect()
            };
            let positive_mean = mean(&scores_of(Family::Positive));
            let negative_mean = mean(&scores_of(Family::NegativeControl));
            ResolutionSeparation {
                resolution,
                positive_mean,
                negative_mean,
                separation: positive_mean.zip(negative_mean).map(|(p, n)| p - n),
            }
        })
        .collect();

    Ok(RobustnessReport {
        scorer: scorer.kind(),
        score_threshold: SCORE_THRESHOLD,
        entropy_threshold: ENTROPY_THRESHOLD,
        measurements,
        candidates,
        separations,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use transmodal_metrics::ValidationScorer;

    fn small_config() -> RobustnessConfig {
        let mut config = RobustnessConfig::standard();
        config.resolutions = vec![Resolution::new(4).unwrap(), Resolution::new(8).unwrap()];
        config
    }

    #[test]
    fn test_standard_config_shape() {
        let config = RobustnessConfig::standard();
        assert_eq!(config.resolutions.len(), 3);
        assert_eq!(config.candidates.len(), 5);
        assert_eq!(config.negative_controls.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = small_config();
        config.resolutions.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoResolutions));

        let mut config = small_config();
        config.candidates.clear();
        let err = check_robustness(&config, &ValidationScorer).unwrap_err();
        assert_eq!(err, ConfigError::NoCandidates);
    }

    #[test]
    fn test_report_covers_every_pair_and_resolution() {
        let config = small_config();
        let report = check_robustness(&config, &ValidationScorer).unwrap();
        // (5 positives + 2 negatives) x 2 resolutions + 2 random rows.
        assert_eq!(report.measurements.len(), 16);
        assert_eq!(report.candidates.len(), 5);
        assert_eq!(report.separations.len(), 2);
        assert!(report.failures.is_empty());
        for c in &report.candidates {
            assert_eq!(c.per_resolution.len(), 2);
            assert_eq!(c.robust, c.all_scores_above && c.all_entropy_below);
        }
        for s in &report.separations {
            let sep = s.separation.unwrap();
            assert!((sep - (s.positive_mean.unwrap() - s.negative_mean.unwrap())).abs() < 1e-12);
        }
        assert_eq!(report.scorer, ScorerKind::Validation);
    }

    #[test]
    fn test_missing_resolution_is_not_robust() {
        let mut config = small_config();
        config.negative_controls.clear();
        config.random_control_seed = None;
        config.candidates.push(CandidatePair::new(
            "broken",
            NamedConstant::new("one", 1.0),
            GeneratorSpec::new("zero_only", |_, _| 0.0),
        ));
        config.candidates.push(CandidatePair::new(
            "nan",
            NamedConstant::new("one", 1.0),
            GeneratorSpec::new("nan", |_, _| f64::NAN),
        ));
        let report = check_robustness(&config, &ValidationScorer).unwrap();
        let nan = report.candidates.iter().find(|c| c.label == "nan").unwrap();
        assert!(nan.per_resolution.is_empty());
        assert!(!nan.robust);
        assert_eq!(report.failures.len(), 2);
        for s in &report.separations {
            assert!(s.negative_mean.is_none());
            assert!(s.separation.is_none());
        }
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 3.0]), Some(2.0));
    }
}
