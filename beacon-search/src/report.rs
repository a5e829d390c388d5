//! Text tables and JSON output for search and robustness runs.

use std::path::Path;

use serde::Serialize;

use crate::compare::ComparisonReport;
use crate::robustness::RobustnessReport;
use crate::search::SearchReport;

/// `★★★` above 60, `★★` above 40, `★` otherwise.
pub fn star_rating(score: f64) -> &'static str {
    if score > 60.0 {
        "★★★"
    } else if score > 40.0 {
        "★★"
    } else {
        "★"
    }
}

/// Write `data` as pretty JSON, creating parent directories. Failures are
/// logged, never fatal.
pub fn save_json<T: Serialize>(path: &Path, data: &T) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::warn!("failed to create {}: {}", parent.display(), e);
            return;
        }
    }
    match serde_json::to_string_pretty(data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, &json) {
                log::warn!("failed to write {}: {}", path.display(), e);
            } else {
                log::info!("wrote {}", path.display());
            }
        }
        Err(e) => log::warn!("failed to serialize {}: {}", path.display(), e),
    }
}

/// Ranked table of a sweep, one block per candidate.
pub fn print_ranking(report: &SearchReport) {
    println!("=== Top transmodal beacons ({}, {}) ===", report.resolution, report.scorer);
    println!(
        "  {} combinations tested, {} skipped",
        report.total_tested,
        report.failures.len()
    );
    println!();

    for (rank, r) in report.results.iter().enumerate() {
        println!("RANK #{}: {}", rank + 1, r.name);
        println!("  Generator: {}", r.generator_name);
        println!("  Constant:  {} = {:.6}", r.constant_name, r.constant_value);
        println!("  Transmodality score: {:.2}/100 {}", r.score.total, star_rating(r.score.total));
        println!("    entropy component:     {:6.2}", r.score.entropy_component);
        println!("    compression component: {:6.2}", r.score.compression_component);
        println!("    spectral component:    {:6.2}", r.score.spectral_component);
        println!(
            "  Metrics: H={:.4} bits  ratio={:.4}  flatness={:.6}",
            r.metrics.shannon_entropy, r.metrics.compression_ratio, r.metrics.spectral_flatness
        );
        println!(
            "           std={:.2}  range={}  unique={}",
            r.metrics.pixel_std, r.metrics.pixel_range, r.metrics.unique_values
        );
        println!();
    }

    for f in &report.failures {
        println!("  skipped {}: {}", f.name, f.error);
    }
}

/// Per-candidate verdicts and per-resolution separation.
pub fn print_robustness(report: &RobustnessReport) {
    println!(
        "=== Robustness ({}, score > {}, H < {} bits) ===",
        report.scorer, report.score_threshold, report.entropy_threshold
    );
    for c in &report.candidates {
        let verdict = if c.robust { "ROBUST" } else { "weak" };
        println!("  {:14} {}", c.label, verdict);
        for (resolution, score, entropy) in &c.per_resolution {
            println!(
                "    {:>7}: score {:6.2}, H {:4.2} bits",
                resolution.to_string(),
                score,
                entropy
            );
        }
    }
    println!();
    println!("  {:>7} | {:>9} | {:>9} | {:>10}", "Res", "Positive", "Negative", "Separation");
    println!("  {}", "-".repeat(46));
    for s in &report.separations {
        let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |x| format!("{:.2}", x));
        println!(
            "  {:>7} | {:>9} | {:>9} | {:>10}",
            s.resolution.to_string(),
            fmt(s.positive_mean),
            fmt(s.negative_mean),
            fmt(s.separation)
        );
    }
}

/// Profiles side by side, then per-signal peaks and autocorrelation.
pub fn print_comparison(report: &ComparisonReport) {
    println!(
        "=== Signal comparison ({}, {} bytes) ===",
        report.resolution, report.total_dimensions
    );
    println!(
        "  {:10} | {:>7} | {:>7} | {:>6} | {:>7} | {:>8} | {:>6}",
        "Signal", "H bits", "ratio", "saved", "mean", "std", "digits"
    );
    println!("  {}", "-".repeat(70));
    for p in &report.profiles {
        println!(
            "  {:10} | {:>7.3} | {:>7.3} | {:>5.1}% | {:>7.2} | {:>8.2} | {:>6}",
            p.label,
            p.metrics.shannon_entropy,
            p.compression.compression_ratio,
            p.compression.savings_percent,
            p.statistics.mean,
            p.statistics.std_dev,
            p.coordinate_digits
        );
    }

    for p in &report.profiles {
        println!();
        println!("  {}: k = {}", p.label, p.coordinate_prefix);
        let peaks: Vec<String> = p
            .peaks
            .iter()
            .map(|pk| format!("({},{}) {:.1}", pk.x, pk.y, pk.magnitude))
            .collect();
        println!("    peaks: {}", peaks.join(", "));
        let lags: Vec<String> = p.autocorrelation.iter().map(|r| format!("{:.3}", r)).collect();
        println!("    autocorrelation: [{}]", lags.join(", "));
    }

    for f in &report.failures {
        println!("  skipped {}: {}", f.name, f.error);
    }
}
