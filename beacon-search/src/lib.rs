//! Systematic search for transmodal beacons.
//!
//! Sweeps a constant catalog against a generator catalog, scores every
//! signal, and ranks the results. [`robustness`] reruns a fixed candidate
//! list at several resolutions against negative controls. [`compare`]
//! profiles a few beacons in depth next to a random control.

pub mod compare;
pub mod report;
pub mod robustness;
pub mod search;

pub use compare::{
    compare_signals, profile_signal, ComparisonConfig, ComparisonReport, SignalProfile,
};
pub use robustness::{
    check_robustness, CandidatePair, CandidateRobustness, Family, ResolutionMeasurement,
    ResolutionSeparation, RobustnessConfig, RobustnessReport, ENTROPY_THRESHOLD, SCORE_THRESHOLD,
};
pub use search::{
    evaluate_candidate, rank_results, systematic_search, CombinationFailure, SearchConfig,
    SearchReport, SearchResult,
};
