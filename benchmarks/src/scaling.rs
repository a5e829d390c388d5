//! Scaling benchmarks for the scoring pipeline.
//!
//! Times metric computation, null-distribution construction and the full
//! search sweep at increasing grid sizes and fits an empirical exponent
//! against signal length.

use std::time::{Duration, Instant};

use serde::Serialize;

use beacon_core::{generate_random, ConstantCatalog, GeneratorCatalog, Resolution};
use beacon_search::{systematic_search, SearchConfig};
use bootstrap_validation::{BootstrapConfig, NullDistribution};
use transmodal_metrics::{compute_metrics, ScorerKind, SearchScorer};

/// Null samples per timed distribution.
const NULL_SAMPLES: usize = 100;

#[derive(Debug, Clone, Serialize)]
struct ScalingRow {
    resolution: usize,
    signal_len: usize,
    metrics_us: f64,
    null_ms: f64,
    null_parallel_ms: f64,
    search_ms: f64,
}

fn time<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Least-squares slope of log(y) on log(x).
fn log_log_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let pts: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| **x > 0.0 && **y > 0.0)
        .map(|(x, y)| (x.ln(), y.ln()))
        .collect();
    if pts.len() < 2 {
        return None;
    }
    let n = pts.len() as f64;
    let mx = pts.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pts.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = pts.iter().map(|p| (p.0 - mx).powi(2)).sum();
    let sxy: f64 = pts.iter().map(|p| (p.0 - mx) * (p.1 - my)).sum();
    if sxx == 0.0 {
        return None;
    }
    Some(sxy / sxx)
}

fn measure(side: usize) -> Result<ScalingRow, Box<dyn std::error::Error>> {
    let resolution = Resolution::new(side)?;

    let reps = 20;
    let signal = generate_random(resolution, 0);
    let (_, metrics_time) = time(|| {
        for _ in 0..reps {
            std::hint::black_box(compute_metrics(&signal));
        }
    });

    let config = BootstrapConfig::new(NULL_SAMPLES, resolution, ScorerKind::Validation);
    let (null, null_time) = time(|| NullDistribution::build(&config));
    null?;

    let mut parallel = config;
    parallel.parallel = true;
    let (null_par, null_par_time) = time(|| NullDistribution::build(&parallel));
    null_par?;

    let search = SearchConfig {
        resolution,
        top_n: 20,
    };
    let constants = ConstantCatalog::standard();
    let generators = GeneratorCatalog::standard();
    let (report, search_time) =
        time(|| systematic_search(&constants, &generators, &search, &SearchScorer));
    report?;

    Ok(ScalingRow {
        resolution: side,
        signal_len: resolution.signal_len(),
        metrics_us: metrics_time.as_secs_f64() * 1e6 / reps as f64,
        null_ms: null_time.as_secs_f64() * 1e3,
        null_parallel_ms: null_par_time.as_secs_f64() * 1e3,
        search_ms: search_time.as_secs_f64() * 1e3,
    })
}

fn main() {
    println!("================================================================");
    println!("  SCALING BENCHMARKS: generate -> metrics -> score");
    println!("================================================================\n");

    let sides = [8usize, 16, 32, 64];
    let mut rows = Vec::new();

    println!(
        "  {:>5} | {:>6} | {:>12} | {:>12} | {:>12} | {:>12}",
        "Res", "Bytes", "metrics (us)", "null (ms)", "null par", "search (ms)"
    );
    println!("  {}", "-".repeat(74));
    for side in sides {
        match measure(side) {
            Ok(row) => {
                println!(
                    "  {:>5} | {:>6} | {:>12.1} | {:>12.1} | {:>12.1} | {:>12.1}",
                    row.resolution,
                    row.signal_len,
                    row.metrics_us,
                    row.null_ms,
                    row.null_parallel_ms,
                    row.search_ms
                );
                rows.push(row);
            }
            Err(e) => eprintln!("  {}x{}: {}", side, side, e),
        }
    }

    let lens: Vec<f64> = rows.iter().map(|r| r.signal_len as f64).collect();
    let metrics: Vec<f64> = rows.iter().map(|r| r.metrics_us).collect();
    let nulls: Vec<f64> = rows.iter().map(|r| r.null_ms).collect();
    println!();
    if let Some(k) = log_log_slope(&lens, &metrics) {
        println!("  metrics time ~ len^{:.2}", k);
    }
    if let Some(k) = log_log_slope(&lens, &nulls) {
        println!("  null distribution time ~ len^{:.2}", k);
    }

    save_rows(std::path::Path::new("results/scaling_benchmarks.json"), &rows);
}

/// Failures are reported on stderr; the timings above are already printed.
fn save_rows(path: &std::path::Path, rows: &[ScalingRow]) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("  failed to create {}: {}", parent.display(), e);
            return;
        }
    }
    match serde_json::to_string_pretty(rows) {
        Ok(json) => match std::fs::write(path, json) {
            Ok(()) => println!("\n  Results saved to {}", path.display()),
            Err(e) => eprintln!("  failed to write {}: {}", path.display(), e),
        },
        Err(e) => eprintln!("  failed to serialize results: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_log_slope() {
        let xs = [1.0, 2.0, 4.0, 8.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x * x).collect();
        assert!((log_log_slope(&xs, &ys).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(log_log_slope(&[1.0], &[1.0]), None);
    }

    #[test]
    fn test_save_rows_blocked_parent() {
        let dir = std::env::temp_dir().join(format!("beacon-scaling-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        // A regular file where the parent directory should go.
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("scaling.json");

        save_rows(&path, &[]);
        assert!(!path.exists());

        let ok = dir.join("out").join("scaling.json");
        save_rows(&ok, &[]);
        assert_eq!(std::fs::read_to_string(&ok).unwrap(), "[]");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
