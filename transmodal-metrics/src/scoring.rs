//! Transmodality scorers.
//!
//! Two scorers exist and they are deliberately not interchangeable:
//!
//! | Scorer | Weights (H / ratio / flatness) | Normalisation |
//! |--------|--------------------------------|---------------|
//! | [`SearchScorer`] | 0.3 / 0.5 / 0.2 | `1 − H/8`, `(1.5 − ratio)/1.0`, `1 − flatness` |
//! | [`ValidationScorer`] | 0.4 / 0.4 / 0.2 | `1 − H/8`, `1 − ratio`, `1 − flatness` |
//!
//! Recorded baselines depend on these exact constants. Every
//! [`ScoreBreakdown`] remembers which scorer produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::MetricSet;

/// Maximum byte entropy in bits.
const ENTROPY_MAX_BITS: f64 = 8.0;

/// Which scorer produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Search,
    Validation,
}

impl ScorerKind {
    /// Score with the scorer this kind names.
    pub fn score(self, metrics: &MetricSet) -> ScoreBreakdown {
        match self {
            ScorerKind::Search => SearchScorer.score(metrics),
            ScorerKind::Validation => ValidationScorer.score(metrics),
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorerKind::Search => write!(f, "search scorer (0.3/0.5/0.2)"),
            ScorerKind::Validation => write!(f, "validation scorer (0.4/0.4/0.2)"),
        }
    }
}

/// Composite 0-100 score and its three 0-100 components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub entropy_component: f64,
    pub compression_component: f64,
    pub spectral_component: f64,
    pub scorer: ScorerKind,
}

/// Maps a [`MetricSet`] to a [`ScoreBreakdown`]. Pure and total.
pub trait Scorer: Send + Sync {
    fn kind(&self) -> ScorerKind;
    fn score(&self, metrics: &MetricSet) -> ScoreBreakdown;
}

fn percent(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

/// Scorer used to rank candidates in the systematic search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchScorer;

impl SearchScorer {
    pub const ENTROPY_WEIGHT: f64 = 0.3;
    pub const COMPRESSION_WEIGHT: f64 = 0.5;
    pub const SPECTRAL_WEIGHT: f64 = 0.2;
    /// Ratio at which the compression component reaches 0.
    pub const COMPRESSION_CEILING: f64 = 1.5;
    pub const COMPRESSION_SPAN: f64 = 1.0;
}

impl Scorer for SearchScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Search
    }

    fn score(&self, metrics: &MetricSet) -> ScoreBreakdown {
        let entropy_component =
            percent(100.0 * (1.0 - metrics.shannon_entropy / ENTROPY_MAX_BITS));
        let compression_component = percent(
            100.0 * (Self::COMPRESSION_CEILING - metrics.compression_ratio)
                / Self::COMPRESSION_SPAN,
        );
        let spectral_component = percent(100.0 * (1.0 - metrics.spectral_flatness));

        let total = Self::ENTROPY_WEIGHT * entropy_component
            + Self::COMPRESSION_WEIGHT * compression_component
            + Self::SPECTRAL_WEIGHT * spectral_component;

        ScoreBreakdown {
            total: percent(total),
            entropy_component,
            compression_component,
            spectral_component,
            scorer: ScorerKind::Search,
        }
    }
}

/// Scorer used for null distributions and multi-resolution checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationScorer;

impl ValidationScorer {
    pub const ENTROPY_WEIGHT: f64 = 0.4;
    pub const COMPRESSION_WEIGHT: f64 = 0.4;
    pub const SPECTRAL_WEIGHT: f64 = 0.2;
}

impl Scorer for ValidationScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Validation
    }

    fn score(&self, metrics: &MetricSet) -> ScoreBreakdown {
        let entropy_norm = (1.0 - metrics.shannon_entropy / ENTROPY_MAX_BITS).max(0.0);
        let compression_norm = (1.0 - metrics.compression_ratio).max(0.0);
        let flatness_norm = (1.0 - metrics.spectral_flatness).max(0.0);

        let total = (Self::ENTROPY_WEIGHT * entropy_norm
            + Self::COMPRESSION_WEIGHT * compression_norm
            + Self::SPECTRAL_WEIGHT * flatness_norm)
            * 100.0;

        ScoreBreakdown {
            total: percent(total),
            entropy_component: percent(100.0 * entropy_norm),
            compression_component: percent(100.0 * compression_norm),
            spectral_component: percent(100.0 * flatness_norm),
            scorer: ScorerKind::Validation,
        }
    }
}
