//! Persistence diagrams and the providers that compute them.
//!
//! A [`ProviderChain`] holds providers in priority order and delegates to the
//! first one that reports itself available. [`SingleLinkageProvider`] needs
//! nothing beyond this crate and computes H0 from single-linkage merge
//! heights, so it makes a sound last entry in any chain.

use serde::{Deserialize, Serialize};

use crate::cloud::PointCloud;

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("no persistence provider is available (tried: {tried})")]
    NoProvider { tried: String },

    #[error("point cloud is empty")]
    EmptyCloud,

    #[error("provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },
}

/// A feature born at `birth` and dying at `death`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistencePair {
    pub birth: f64,
    pub death: f64,
}

impl PersistencePair {
    pub fn lifetime(&self) -> f64 {
        self.death - self.birth
    }

    pub fn is_finite(&self) -> bool {
        self.birth.is_finite() && self.death.is_finite()
    }
}

/// Pairs of one homology dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceDiagram {
    pub dimension: usize,
    /// Pairs with a finite death.
    pub pairs: Vec<PersistencePair>,
    /// Classes that never die (one per connected component of the full
    /// complex for H0).
    pub essential: usize,
}

/// Everything one provider produced for one cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceResult {
    pub provider: String,
    pub n_points: usize,
    pub max_dimension: usize,
    pub diagrams: Vec<PersistenceDiagram>,
}

/// A persistent-homology backend.
pub trait PersistenceProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether `compute` can run in this environment.
    fn is_available(&self) -> bool;

    fn compute(&self, cloud: &PointCloud) -> Result<PersistenceResult, TopologyError>;
}

/// Providers in priority order.
pub struct ProviderChain {
    providers: Vec<Box<dyn PersistenceProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        ProviderChain {
            providers: Vec::new(),
        }
    }

    /// Chain with only the built-in single-linkage provider.
    pub fn standard() -> Self {
        ProviderChain::new().with(SingleLinkageProvider)
    }

    /// Append a provider at the lowest priority.
    pub fn with(mut self, provider: impl PersistenceProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn PersistenceProvider>) {
        self.providers.push(provider);
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The first available provider.
    pub fn select(&self) -> Result<&dyn PersistenceProvider, TopologyError> {
        for p in &self.providers {
            if p.is_available() {
                return Ok(p.as_ref());
            }
            log::info!("persistence provider '{}' unavailable, falling back", p.name());
        }
        Err(TopologyError::NoProvider {
            tried: self.names().join(", "),
        })
    }

    pub fn compute(&self, cloud: &PointCloud) -> Result<PersistenceResult, TopologyError> {
        let provider = self.select()?;
        log::debug!("computing persistence with '{}'", provider.name());
        provider.compute(cloud)
    }
}

impl Default for ProviderChain {
    fn default() -> Self {
        ProviderChain::standard()
    }
}

/// H0 from single linkage: every point is born at 0 and a component dies at
/// the edge length that merges it into another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleLinkageProvider;

impl PersistenceProvider for SingleLinkageProvider {
    fn name(&self) -> &str {
        "single_linkage"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn compute(&self, cloud: &PointCloud) -> Result<PersistenceResult, TopologyError> {
        if cloud.is_empty() {
            return Err(TopologyError::EmptyCloud);
        }
        let deaths = merge_heights(cloud);
        let pairs = deaths
            .into_iter()
            .map(|death| PersistencePair { birth: 0.0, death })
            .collect();
        Ok(PersistenceResult {
            provider: self.name().to_string(),
            n_points: cloud.len(),
            max_dimension: 0,
            diagrams: vec![PersistenceDiagram {
                dimension: 0,
                pairs,
                essential: 1,
            }],
        })
    }
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        DisjointSet {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// False if `a` and `b` were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// The `n − 1` single-linkage merge heights, ascending. Kruskal over the
/// complete Euclidean graph.
pub fn merge_heights(cloud: &PointCloud) -> Vec<f64> {
    let n = cloud.len();
    if n < 2 {
        return Vec::new();
    }

    let mut edges: Vec<(f64, usize, usize)> = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push((cloud.distance(i, j), i, j));
        }
    }
    edges.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut sets = DisjointSet::new(n);
    let mut heights = Vec::with_capacity(n - 1);
    for (d, i, j) in edges {
        if sets.union(i, j) {
            heights.push(d);
            if heights.len() == n - 1 {
                break;
            }
        }
    }
    heights
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unavailable;

    impl PersistenceProvider for Unavailable {
        fn name(&self) -> &str {
            "unavailable"
        }

        fn is_available(&self) -> bool {
            false
        }

        fn compute(&self, _cloud: &PointCloud) -> Result<PersistenceResult, TopologyError> {
            panic!("unavailable provider must not be called");
        }
    }

    fn line(xs: &[f64]) -> PointCloud {
        PointCloud::from_coords(1, xs.to_vec()).unwrap()
    }

    #[test]
    fn test_merge_heights_on_a_line() {
        let heights = merge_heights(&line(&[0.0, 1.0, 3.0, 10.0]));
        assert_eq!(heights, vec![1.0, 2.0, 7.0]);
    }

    #[test]
    fn test_merge_heights_duplicates() {
        let heights = merge_heights(&line(&[5.0, 5.0, 5.0]));
        assert_eq!(heights, vec![0.0, 0.0]);
    }

    #[test]
    fn test_merge_heights_small() {
        assert!(merge_heights(&line(&[1.0])).is_empty());
        let square =
            PointCloud::from_coords(2, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(merge_heights(&square), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_single_linkage_diagram() {
        let result = SingleLinkageProvider.compute(&line(&[0.0, 2.0, 5.0])).unwrap();
        assert_eq!(result.provider, "single_linkage");
        assert_eq!(result.n_points, 3);
        assert_eq!(result.diagrams.len(), 1);
        let h0 = &result.diagrams[0];
        assert_eq!(h0.essential, 1);
        assert!(h0.pairs.iter().all(|p| p.birth == 0.0));
        let deaths: Vec<f64> = h0.pairs.iter().map(|p| p.death).collect();
        assert_eq!(deaths, vec![2.0, 3.0]);
    }

    #[test]
    fn test_empty_cloud_rejected() {
        let empty = PointCloud::from_coords(3, Vec::new()).unwrap();
        assert!(matches!(
            SingleLinkageProvider.compute(&empty),
            Err(TopologyError::EmptyCloud)
        ));
    }

    #[test]
    fn test_chain_falls_back() {
        let chain = ProviderChain::new().with(Unavailable).with(SingleLinkageProvider);
        assert_eq!(chain.names(), vec!["unavailable", "single_linkage"]);
        let result = chain.compute(&line(&[0.0, 1.0])).unwrap();
        assert_eq!(result.provider, "single_linkage");
    }

    #[test]
    fn test_chain_with_nothing_available() {
        let chain = ProviderChain::new().with(Unavailable);
        match chain.compute(&line(&[0.0, 1.0])) {
            Err(TopologyError::NoProvider { tried }) => assert_eq!(tried, "unavailable"),
            other => panic!("expected NoProvider, got {:?}", other),
        }
    }
}
