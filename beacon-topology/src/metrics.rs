//! Scalar summaries of persistence diagrams.

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceDiagram, PersistenceResult};

const ENTROPY_EPS: f64 = 1e-12;

/// Summary of one homology dimension's finite pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionMetrics {
    pub dimension: usize,
    pub total_persistence: f64,
    pub max_persistence: f64,
    pub n_features: usize,
    /// `−Σ p ln(p + 1e-12)` over normalised lifetimes. `None` when every
    /// lifetime is zero.
    pub entropy: Option<f64>,
}

impl DimensionMetrics {
    /// `None` when the diagram has no finite pairs.
    pub fn from_diagram(diagram: &PersistenceDiagram) -> Option<Self> {
        let lifetimes: Vec<f64> = diagram
            .pairs
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| p.lifetime())
            .collect();
        if lifetimes.is_empty() {
            return None;
        }

        let total: f64 = lifetimes.iter().sum();
        let max = lifetimes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let entropy = (total > 0.0).then(|| {
            -lifetimes
                .iter()
                .map(|l| {
                    let p = l / total;
                    p * (p + ENTROPY_EPS).ln()
                })
                .sum::<f64>()
        });

        Some(DimensionMetrics {
            dimension: diagram.dimension,
            total_persistence: total,
            max_persistence: max,
            n_features: lifetimes.len(),
            entropy,
        })
    }
}

/// Metrics for every dimension that has finite pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceMetrics {
    pub dimensions: Vec<DimensionMetrics>,
}

impl PersistenceMetrics {
    pub fn from_result(result: &PersistenceResult) -> Self {
        PersistenceMetrics {
            dimensions: result
                .diagrams
                .iter()
                .filter_map(DimensionMetrics::from_diagram)
                .collect(),
        }
    }

    pub fn dimension(&self, dim: usize) -> Option<&DimensionMetrics> {
        self.dimensions.iter().find(|m| m.dimension == dim)
    }
}
