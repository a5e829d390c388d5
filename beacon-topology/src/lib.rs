//! Persistent homology of beacon signals.
//!
//! A signal's RGB grid is turned into a point cloud ([`cloud`]), subsampled,
//! and handed to the first available [`PersistenceProvider`]. The resulting
//! diagrams are summarised per homology dimension ([`metrics`]).

pub mod cloud;
pub mod metrics;
pub mod persistence;

use serde::Serialize;

use beacon_core::Signal;

pub use cloud::{point_cloud, PointCloud, PointCloudMethod, MAX_POINTS};
pub use metrics::{DimensionMetrics, PersistenceMetrics};
pub use persistence::{
    merge_heights, PersistenceDiagram, PersistencePair, PersistenceProvider, PersistenceResult,
    ProviderChain, SingleLinkageProvider, TopologyError,
};

/// Cloud extraction and subsampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologyConfig {
    pub method: PointCloudMethod,
    pub max_points: usize,
    pub subsample_seed: u64,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        TopologyConfig {
            method: PointCloudMethod::RgbPixels,
            max_points: MAX_POINTS,
            subsample_seed: 0,
        }
    }
}

/// Outcome of one signal's analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyAnalysis {
    pub method: PointCloudMethod,
    /// Points before subsampling.
    pub cloud_points: usize,
    pub persistence: PersistenceResult,
    pub metrics: PersistenceMetrics,
}

/// Cloud, subsample, compute and summarise.
pub fn analyze(
    signal: &Signal,
    config: &TopologyConfig,
    chain: &ProviderChain,
) -> Result<TopologyAnalysis, TopologyError> {
    let cloud = point_cloud(signal, config.method);
    let sampled = cloud.subsample(config.max_points, config.subsample_seed);
    log::debug!(
        "{} cloud: {} points, {} after subsampling",
        config.method,
        cloud.len(),
        sampled.len()
    );

    let persistence = chain.compute(&sampled)?;
    let metrics = PersistenceMetrics::from_result(&persistence);
    Ok(TopologyAnalysis {
        method: config.method,
        cloud_points: cloud.len(),
        persistence,
        metrics,
    })
}
