//! beacon-search CLI.
//!
//! Modes:
//!   --mode=search                 Sweep all constants x generators (default)
//!   --mode=robustness             Rerun the π-family beacons at several resolutions
//!   --mode=compare                Profile φ, π and e against a random control
//!
//! Options:
//!   --resolution=<N>              Grid side for search and compare (default: 8)
//!   --top-n=<N>                   Ranked results to keep (default: 20)
//!   --resolutions=8,16,32         Resolutions for robustness mode
//!   --scorer=search|validation    Scoring strategy (default: search for the
//!                                 sweep, validation for robustness)
//!   --output=<dir>                Output directory (default: results/beacon_search)
//!
//! An unknown mode or scorer, or a flag value that does not parse, exits 1
//! before anything runs.

use std::path::PathBuf;

use beacon_core::cli::{flag_value, parse_choice, parse_flag, parse_resolution, parse_resolutions};
use beacon_core::{ConfigError, ConstantCatalog, GeneratorCatalog, Resolution};
use beacon_search::report::{print_comparison, print_ranking, print_robustness, save_json};
use beacon_search::{
    check_robustness, compare_signals, systematic_search, ComparisonConfig, RobustnessConfig,
    SearchConfig,
};
use transmodal_metrics::{Scorer, ScorerKind, SearchScorer, ValidationScorer};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Search,
    Robustness,
    Compare,
}

#[derive(Debug)]
struct CliConfig {
    mode: Mode,
    resolution: Resolution,
    top_n: usize,
    resolutions: Vec<Resolution>,
    scorer: Option<ScorerKind>,
    output_dir: PathBuf,
}

fn parse_args(args: &[String]) -> Result<CliConfig, ConfigError> {
    let mode = parse_choice(
        args,
        "mode",
        &[
            ("search", Mode::Search),
            ("robustness", Mode::Robustness),
            ("compare", Mode::Compare),
        ],
        Mode::Search,
    )?;

    let scorer = parse_choice(
        args,
        "scorer",
        &[
            ("search", Some(ScorerKind::Search)),
            ("validation", Some(ScorerKind::Validation)),
        ],
        None,
    )?;

    let output_dir = flag_value(args, "output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results/beacon_search"));

    Ok(CliConfig {
        mode,
        resolution: parse_resolution(args, "resolution", 8)?,
        top_n: parse_flag(args, "top-n", 20)?,
        resolutions: parse_resolutions(args, "resolutions", &[8, 16, 32])?,
        scorer,
        output_dir,
    })
}

fn scorer_for(kind: ScorerKind) -> &'static dyn Scorer {
    match kind {
        ScorerKind::Search => &SearchScorer,
        ScorerKind::Validation => &ValidationScorer,
    }
}

fn run_search(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let search_config = SearchConfig {
        resolution: config.resolution,
        top_n: config.top_n,
    };
    let scorer = scorer_for(config.scorer.unwrap_or(ScorerKind::Search));

    let report = systematic_search(
        &ConstantCatalog::standard(),
        &GeneratorCatalog::standard(),
        &search_config,
        scorer,
    )?;

    print_ranking(&report);
    save_json(&config.output_dir.join("beacon_search_results.json"), &report);
    Ok(())
}

fn run_robustness(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut robustness = RobustnessConfig::standard();
    robustness.resolutions = config.resolutions.clone();
    let scorer = scorer_for(config.scorer.unwrap_or(ScorerKind::Validation));

    let report = check_robustness(&robustness, scorer)?;

    print_robustness(&report);
    save_json(&config.output_dir.join("multires_validation_results.json"), &report);
    Ok(())
}

fn run_compare(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = compare_signals(&ComparisonConfig::standard(config.resolution))?;

    print_comparison(&report);
    save_json(&config.output_dir.join("validation_results.json"), &report);
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
    println!("  beacon-search: Transmodal Beacon Search");
    println!("========================================");
    println!();

    let outcome = match config.mode {
        Mode::Search => run_search(&config),
        Mode::Robustness => run_robustness(&config),
        Mode::Compare => run_compare(&config),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!();
    println!("========================================");
    println!("  Done.");
    println!("========================================");
}
