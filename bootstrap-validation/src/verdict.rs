//! Observed beacons, per-beacon verdicts and the Bonferroni-corrected report.

use std::fmt;

use serde::{Deserialize, Serialize};

use beacon_core::{generate, ConfigError, GenerationError, GeneratorSpec, Resolution};
use transmodal_metrics::{compute_metrics, ScorerKind};

use crate::null::NullDistribution;
use crate::summary::DistributionSummary;

/// Family-wise error rate before correction.
pub const FAMILY_ALPHA: f64 = 0.05;

/// A score to test, tagged with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedBeacon {
    pub name: String,
    pub score: f64,
    pub resolution: Resolution,
    pub scorer: ScorerKind,
}

impl ObservedBeacon {
    /// Generate the beacon's signal and score it.
    pub fn measure(
        name: impl Into<String>,
        generator: &GeneratorSpec,
        constant: f64,
        resolution: Resolution,
        scorer: ScorerKind,
    ) -> Result<Self, GenerationError> {
        let signal = generate(generator, constant, resolution)?;
        let metrics = compute_metrics(&signal);
        Ok(ObservedBeacon {
            name: name.into(),
            score: scorer.score(&metrics).total,
            resolution,
            scorer,
        })
    }

    fn check_provenance(&self, null: &NullDistribution) -> Result<(), ConfigError> {
        if self.resolution != null.resolution() || self.scorer != null.scorer() {
            return Err(ConfigError::ProvenanceMismatch {
                beacon: self.name.clone(),
                observed: format!("{} at {}", self.scorer, self.resolution),
                expected: format!("{} at {}", null.scorer(), null.resolution()),
            });
        }
        Ok(())
    }
}

/// Uncorrected significance of a single p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceLevel {
    NotSignificant,
    Significant,
    VerySignificant,
    ExtremelySignificant,
}

impl SignificanceLevel {
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.001 {
            SignificanceLevel::ExtremelySignificant
        } else if p < 0.01 {
            SignificanceLevel::VerySignificant
        } else if p < 0.05 {
            SignificanceLevel::Significant
        } else {
            SignificanceLevel::NotSignificant
        }
    }

    pub fn stars(self) -> &'static str {
        match self {
            SignificanceLevel::ExtremelySignificant => "***",
            SignificanceLevel::VerySignificant => "**",
            SignificanceLevel::Significant => "*",
            SignificanceLevel::NotSignificant => "",
        }
    }
}

impl fmt::Display for SignificanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignificanceLevel::ExtremelySignificant => "extremely significant",
            SignificanceLevel::VerySignificant => "very significant",
            SignificanceLevel::Significant => "significant",
            SignificanceLevel::NotSignificant => "not significant",
        };
        write!(f, "{}", s)
    }
}

/// Outcome for one observed beacon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub beacon_name: String,
    pub observed_score: f64,
    pub p_value: f64,
    pub bonferroni_threshold: f64,
    /// `p_value < bonferroni_threshold`.
    pub is_significant: bool,
    pub level: SignificanceLevel,
    /// Uncorrected reading of the p-value, e.g. "very significant".
    pub interpretation: String,
}

/// How many beacons survived correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    AllSignificant,
    SomeSignificant,
    NoneSignificant,
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conclusion::AllSignificant => write!(f, "all beacons are statistically significant"),
            Conclusion::SomeSignificant => {
                write!(f, "some beacons are statistically significant")
            }
            Conclusion::NoneSignificant => {
                write!(f, "no beacon is significant (hypothesis rejected)")
            }
        }
    }
}

/// Null summary plus verdicts for one family of beacons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub resolution: Resolution,
    pub scorer: ScorerKind,
    pub samples: usize,
    pub summary: DistributionSummary,
    pub verdicts: Vec<ValidationVerdict>,
    pub bonferroni_alpha: f64,
    pub n_significant: usize,
    pub min_p_value: f64,
    pub conclusion: Conclusion,
}

/// `0.05 / family_size`.
pub fn bonferroni_alpha(family_size: usize) -> Result<f64, ConfigError> {
    if family_size == 0 {
        return Err(ConfigError::ZeroFamilySize);
    }
    Ok(FAMILY_ALPHA / family_size as f64)
}

/// Test every beacon against `null` as one family of `beacons.len()` tests.
///
/// Fails if the family is empty or any beacon was scored at a different
/// resolution or with a different scorer than the null distribution.
pub fn validate_beacons(
    null: &NullDistribution,
    beacons: &[ObservedBeacon],
) -> Result<ValidationReport, ConfigError> {
    let alpha = bonferroni_alpha(beacons.len())?;
    for beacon in beacons {
        beacon.check_provenance(null)?;
    }

    let scores = null.scores();
    let mut verdicts = Vec::with_capacity(beacons.len());
    for beacon in beacons {
        let p = crate::null::p_value(beacon.score, &scores)?;
        let level = SignificanceLevel::from_p_value(p);
        let verdict = ValidationVerdict {
            beacon_name: beacon.name.clone(),
            observed_score: beacon.score,
            p_value: p,
            bonferroni_threshold: alpha,
            is_significant: p < alpha,
            level,
            interpretation: level.to_string(),
        };
        log::info!(
            "{}: score {:.2}, p = {:.6} {}",
            verdict.beacon_name,
            verdict.observed_score,
            verdict.p_value,
            verdict.level.stars()
        );
        verdicts.push(verdict);
    }

    let n_significant = verdicts.iter().filter(|v| v.is_significant).count();
    let min_p_value = verdicts
        .iter()
        .map(|v| v.p_value)
        .fold(f64::INFINITY, f64::min);
    let conclusion = if n_significant == verdicts.len() {
        Conclusion::AllSignificant
    } else if n_significant > 0 {
        Conclusion::SomeSignificant
    } else {
        Conclusion::NoneSignificant
    };

    Ok(ValidationReport {
        resolution: null.resolution(),
        scorer: null.scorer(),
        samples: null.len(),
        summary: DistributionSummary::from_values(&scores),
        verdicts,
        bonferroni_alpha: alpha,
        n_significant,
        min_p_value,
        conclusion,
    })
}
