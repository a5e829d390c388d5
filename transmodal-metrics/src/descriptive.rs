//! Descriptive statistics and spatial autocorrelation of a signal.

use beacon_core::Signal;
use serde::{Deserialize, Serialize};

/// Summary of the raw byte values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasicStatistics {
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub median: f64,
    pub min: u8,
    pub max: u8,
    pub unique_values: usize,
    pub total: usize,
}

/// Basic statistics of a byte slice. All zero for an empty slice.
pub fn basic_statistics(data: &[u8]) -> BasicStatistics {
    if data.is_empty() {
        return BasicStatistics {
            mean: 0.0,
            std_dev: 0.0,
            median: 0.0,
            min: 0,
            max: 0,
            unique_values: 0,
            total: 0,
        };
    }

    let n = data.len() as f64;
    let mean = data.iter().map(|&b| b as f64).sum::<f64>() / n;
    let variance = data
        .iter()
        .map(|&b| (b as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    let mut sorted = data.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    };

    let mut seen = [false; 256];
    for &b in data {
        seen[b as usize] = true;
    }

    BasicStatistics {
        mean,
        std_dev: variance.sqrt(),
        median,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        unique_values: seen.iter().filter(|&&s| s).count(),
        total: data.len(),
    }
}

/// Pearson correlation; 0 when either side has no variance.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    if a.is_empty() {
        return 0.0;
    }
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        cov += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a).powi(2);
        var_b += (y - mean_b).powi(2);
    }
    if var_a < 1e-12 || var_b < 1e-12 {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

/// Horizontal autocorrelation of the grayscale grid for lags `0..=max_lag`.
///
/// Lag 0 is 1.0. A lag at or beyond the grid width yields 0.0.
pub fn autocorrelation(signal: &Signal, max_lag: usize) -> Vec<f64> {
    let side = signal.resolution().get();
    let gray = signal.grayscale();

    (0..=max_lag)
        .map(|lag| {
            if lag == 0 {
                return 1.0;
            }
            if lag >= side {
                return 0.0;
            }
            let mut left = Vec::with_capacity(side * (side - lag));
            let mut right = Vec::with_capacity(side * (side - lag));
            for row in gray.chunks_exact(side) {
                left.extend_from_slice(&row[..side - lag]);
                right.extend_from_slice(&row[lag..]);
            }
            pearson(&left, &right)
        })
        .collect()
}
