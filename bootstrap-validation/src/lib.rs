//! Bootstrap significance testing for transmodal beacons.
//!
//! A [`NullDistribution`] scores `N` seeded uniform-random signals at one
//! resolution. Observed beacon scores are compared against it with an
//! empirical one-sided p-value, and a family of beacons is judged together
//! under a Bonferroni correction.

pub mod null;
pub mod summary;
pub mod verdict;

pub use null::{p_value, BootstrapConfig, MetricSummaries, NullDistribution, NullSample};
pub use summary::{percentile_of, DistributionSummary};
pub use verdict::{
    bonferroni_alpha, validate_beacons, Conclusion, ObservedBeacon, SignificanceLevel,
    ValidationReport, ValidationVerdict, FAMILY_ALPHA,
};
