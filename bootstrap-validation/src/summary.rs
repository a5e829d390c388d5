//! Summary statistics of an empirical distribution.

use serde::{Deserialize, Serialize};

/// Location, spread and upper-tail percentiles of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p99: f64,
    pub p999: f64,
}

impl DistributionSummary {
    /// Summarise `values` (need not be sorted). All zero when empty.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return DistributionSummary {
                count: 0,
                mean: 0.0,
                median: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                p95: 0.0,
                p99: 0.0,
                p999: 0.0,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        DistributionSummary {
            count: n,
            mean,
            median: percentile_of(&sorted, 0.50),
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[n - 1],
            p95: percentile_of(&sorted, 0.95),
            p99: percentile_of(&sorted, 0.99),
            p999: percentile_of(&sorted, 0.999),
        }
    }
}

/// Percentile `p` (0..=1) of a sorted slice, linearly interpolated between
/// the two nearest ranks.
pub fn percentile_of(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let idx = p * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = idx - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}
