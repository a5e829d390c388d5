//! Exhaustive constant × generator sweep.
//!
//! Every pair in the two catalogs is generated, measured and scored. A pair
//! whose generator misbehaves is recorded as a [`CombinationFailure`] and the
//! sweep moves on; only configuration errors abort the run.

use std::cmp::Ordering;

use beacon_core::{
    generate, ConfigError, ConstantCatalog, GenerationError, GeneratorCatalog, GeneratorSpec,
    NamedConstant, Resolution,
};
use serde::{Deserialize, Serialize};
use transmodal_metrics::{compute_metrics, MetricSet, ScoreBreakdown, Scorer, ScorerKind};

use crate::report::star_rating;

/// Scores above this are logged as they are found.
const NOTABLE_SCORE: f64 = 50.0;

/// Parameters of one sweep.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub resolution: Resolution,
    /// Number of ranked results kept. Zero is allowed and keeps none.
    pub top_n: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            resolution: Resolution::new(8).expect("8 is a positive resolution"),
            top_n: 20,
        }
    }
}

/// One scored (constant, generator) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// `<generator>_<constant>`.
    pub name: String,
    pub generator_name: String,
    pub constant_name: String,
    pub constant_value: f64,
    pub resolution: Resolution,
    pub metrics: MetricSet,
    pub score: ScoreBreakdown,
}

/// A pair that could not be generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationFailure {
    pub name: String,
    pub generator_name: String,
    pub constant_name: String,
    pub error: GenerationError,
}

/// Outcome of a sweep: the ranking plus everything that was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub resolution: Resolution,
    pub scorer: ScorerKind,
    /// Number of combinations attempted (successes + failures).
    pub total_tested: usize,
    /// Top results, ordered by `score.total` descending.
    pub results: Vec<SearchResult>,
    pub failures: Vec<CombinationFailure>,
}

fn combination_name(generator: &GeneratorSpec, constant: &NamedConstant) -> String {
    format!("{}_{}", generator.name(), constant.name)
}

/// Generate → measure → score a single pair.
pub fn evaluate_candidate(
    generator: &GeneratorSpec,
    constant: &NamedConstant,
    resolution: Resolution,
    scorer: &dyn Scorer,
) -> Result<SearchResult, GenerationError> {
    let signal = generate(generator, constant.value, resolution)?;
    let metrics = compute_metrics(&signal);
    let score = scorer.score(&metrics);

    Ok(SearchResult {
        name: combination_name(generator, constant),
        generator_name: generator.name().to_string(),
        constant_name: constant.name.clone(),
        constant_value: constant.value,
        resolution,
        metrics,
        score,
    })
}

/// Order results by total score, best first. Stable: ties keep sweep order.
pub fn rank_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .total
            .partial_cmp(&a.score.total)
            .unwrap_or(Ordering::Equal)
    });
}

/// Sweep every constant against every generator and keep the top `top_n`.
pub fn systematic_search(
    constants: &ConstantCatalog,
    generators: &GeneratorCatalog,
    config: &SearchConfig,
    scorer: &dyn Scorer,
) -> Result<SearchReport, ConfigError> {
    if constants.is_empty() {
        return Err(ConfigError::EmptyCatalog("constant"));
    }
    if generators.is_empty() {
        return Err(ConfigError::EmptyCatalog("generator"));
    }

    let total = constants.len() * generators.len();
    log::info!(
        "Sweeping {} constants x {} generators = {} combinations at {} ({})",
        constants.len(),
        generators.len(),
        total,
        config.resolution,
        scorer.kind()
    );

    let mut results = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut count = 0usize;

    for constant in constants.iter() {
        for generator in generators.iter() {
            count += 1;
            match evaluate_candidate(generator, constant, config.resolution, scorer) {
                Ok(result) => {
                    let s = result.score.total;
                    if s > NOTABLE_SCORE {
                        log::info!(
                            "[{:3}/{}] {:30} score {:5.1} {} (H={:.2} ratio={:.4} flat={:.4})",
                            count,
                            total,
                            result.name,
                            s,
                            star_rating(s),
                            result.metrics.shannon_entropy,
                            result.metrics.compression_ratio,
                            result.metrics.spectral_flatness
                        );
                    } else {
                        log::debug!("[{:3}/{}] {:30} score {:5.1}", count, total, result.name, s);
                    }
                    results.push(result);
                }
                Err(error) => {
                    let name = combination_name(generator, constant);
                    log::warn!("[{:3}/{}] {} skipped: {}", count, total, name, error);
                    failures.push(CombinationFailure {
                        name,
                        generator_name: generator.name().to_string(),
                        constant_name: constant.name.clone(),
                        error,
                    });
                }
            }
        }
    }

    rank_results(&mut results);
    results.truncate(config.top_n);

    Ok(SearchReport {
        resolution: config.resolution,
        scorer: scorer.kind(),
        total_tested: count,
        results,
        failures,
    })
}
