//! bootstrap-validation CLI.
//!
//! Builds a null distribution per resolution and tests the π-family beacons
//! against it.
//!
//! Options:
//!   --resolutions=8,16            Resolutions to validate at (default: 8,16)
//!   --samples=<N>                 Random signals per null distribution (default: 1000)
//!   --scorer=validation|search    Scoring strategy (default: validation)
//!   --parallel                    Score null samples on the rayon pool
//!   --output=<dir>                Output directory (default: results/statistical_validation)
//!
//! Bad flag values, an empty resolution list and zero samples exit 1 before
//! any null distribution is built.

use std::path::{Path, PathBuf};

use serde::Serialize;

use beacon_core::cli::{flag_value, has_switch, parse_choice, parse_flag, parse_resolutions};
use beacon_core::{ConfigError, GeneratorCatalog, Resolution};
use bootstrap_validation::{
    validate_beacons, BootstrapConfig, MetricSummaries, NullDistribution, ObservedBeacon,
    ValidationReport,
};
use transmodal_metrics::ScorerKind;

#[derive(Debug)]
struct CliConfig {
    resolutions: Vec<Resolution>,
    samples: usize,
    scorer: ScorerKind,
    parallel: bool,
    output_dir: PathBuf,
}

/// The π-family beacons: (label, generator, constant).
const PI_BEACONS: [(&str, &str, f64); 5] = [
    ("tau_sin_i2", "sin_i2", std::f64::consts::TAU),
    ("pi_sin_i", "sin_i", std::f64::consts::PI),
    ("pi_sin_i2", "sin_i2", std::f64::consts::PI),
    ("pi_2_cos_i2", "cos_i2", std::f64::consts::FRAC_PI_2),
    ("pi_4_sin_i2", "sin_i2", std::f64::consts::FRAC_PI_4),
];

#[derive(Serialize)]
struct ResolutionOutcome {
    report: ValidationReport,
    null_metrics: MetricSummaries,
}

fn parse_args(args: &[String]) -> Result<CliConfig, ConfigError> {
    let resolutions = parse_resolutions(args, "resolutions", &[8, 16])?;

    let samples = parse_flag(args, "samples", 1000)?;
    if samples == 0 {
        return Err(ConfigError::ZeroSamples);
    }

    let scorer = parse_choice(
        args,
        "scorer",
        &[
            ("validation", ScorerKind::Validation),
            ("search", ScorerKind::Search),
        ],
        ScorerKind::Validation,
    )?;

    let output_dir = flag_value(args, "output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results/statistical_validation"));

    Ok(CliConfig {
        resolutions,
        samples,
        scorer,
        parallel: has_switch(args, "parallel"),
        output_dir,
    })
}

fn measure_beacons(
    resolution: Resolution,
    scorer: ScorerKind,
) -> Result<Vec<ObservedBeacon>, Box<dyn std::error::Error>> {
    let generators = GeneratorCatalog::standard();
    let mut beacons = Vec::with_capacity(PI_BEACONS.len());
    for (label, generator, constant) in PI_BEACONS {
        let spec = generators
            .get(generator)
            .ok_or_else(|| format!("generator '{}' missing from catalog", generator))?;
        beacons.push(ObservedBeacon::measure(label, spec, constant, resolution, scorer)?);
    }
    Ok(beacons)
}

fn print_report(outcome: &ResolutionOutcome) {
    let report = &outcome.report;
    let s = &report.summary;
    println!("=== Null distribution ({}, {} samples) ===", report.resolution, report.samples);
    println!("  mean   {:8.4}   std   {:8.4}", s.mean, s.std_dev);
    println!("  median {:8.4}   min   {:8.4}   max {:8.4}", s.median, s.min, s.max);
    println!("  p95    {:8.4}   p99   {:8.4}   p99.9 {:8.4}", s.p95, s.p99, s.p999);
    let m = &outcome.null_metrics;
    println!(
        "  entropy {:.4} ± {:.4} bits, ratio {:.4} ± {:.4}, flatness {:.4} ± {:.4}",
        m.shannon_entropy.mean,
        m.shannon_entropy.std_dev,
        m.compression_ratio.mean,
        m.compression_ratio.std_dev,
        m.spectral_flatness.mean,
        m.spectral_flatness.std_dev
    );
    println!();

    println!("  {:14} | {:>7} | {:>9} | {:>4} | Bonferroni", "Beacon", "Score", "p-value", "");
    println!("  {}", "-".repeat(56));
    for v in &report.verdicts {
        println!(
            "  {:14} | {:7.2} | {:9.6} | {:>4} | {}",
            v.beacon_name,
            v.observed_score,
            v.p_value,
            v.level.stars(),
            if v.is_significant { "significant" } else { "-" }
        );
    }
    println!();
    println!("  Bonferroni threshold (α = 0.05): {:.6}", report.bonferroni_alpha);
    println!(
        "  {}/{} significant after correction, minimum p-value {:.6}",
        report.n_significant,
        report.verdicts.len(),
        report.min_p_value
    );
    println!("  -> {}", report.conclusion);
    println!();
}

fn save_json<T: Serialize>(path: &Path, data: &T) {
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

fn run(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut outcomes = Vec::with_capacity(config.resolutions.len());
    for &resolution in &config.resolutions {
        let mut bootstrap = BootstrapConfig::new(config.samples, resolution, config.scorer);
        bootstrap.parallel = config.parallel;

        let null = NullDistribution::build(&bootstrap)?;
        let beacons = measure_beacons(resolution, config.scorer)?;
        let outcome = ResolutionOutcome {
            report: validate_beacons(&null, &beacons)?,
            null_metrics: null.metric_summaries(),
        };
        print_report(&outcome);
        outcomes.push(outcome);
    }

    save_json(&config.output_dir.join("statistical_validation_results.json"), &outcomes);
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("========================================");
    println!("  bootstrap-validation: π-beacon significance");
    println!("========================================");
    println!();

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("========================================");
    println!("  Done.");
    println!("========================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("bootstrap-validation")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = parse_args(&args(&[])).unwrap();
        let sides: Vec<usize> = config.resolutions.iter().map(|r| r.get()).collect();
        assert_eq!(sides, vec![8, 16]);
        assert_eq!(config.samples, 1000);
        assert_eq!(config.scorer, ScorerKind::Validation);
        assert!(!config.parallel);
    }

    #[test]
    fn test_flags() {
        let config =
            parse_args(&args(&["--resolutions=32", "--samples=50", "--scorer=search", "--parallel"]))
                .unwrap();
        assert_eq!(config.resolutions[0].get(), 32);
        assert_eq!(config.samples, 50);
        assert_eq!(config.scorer, ScorerKind::Search);
        assert!(config.parallel);
    }

    #[test]
    fn test_word_resolution_rejected() {
        // Used to run nothing and write an empty result list.
        assert!(matches!(
            parse_args(&args(&["--resolutions=sixteen"])),
            Err(ConfigError::InvalidFlag { flag: "resolutions", .. })
        ));
        assert_eq!(
            parse_args(&args(&["--resolutions="])).unwrap_err(),
            ConfigError::NoResolutions
        );
    }

    #[test]
    fn test_bad_samples_and_scorer_rejected() {
        assert!(matches!(
            parse_args(&args(&["--samples=lots"])),
            Err(ConfigError::InvalidFlag { flag: "samples", .. })
        ));
        assert_eq!(
            parse_args(&args(&["--samples=0"])).unwrap_err(),
            ConfigError::ZeroSamples
        );
        assert!(matches!(
            parse_args(&args(&["--scorer=valdiation"])),
            Err(ConfigError::UnknownEntry { kind: "scorer", .. })
        ));
    }
}
