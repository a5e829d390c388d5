//! beacon-topology CLI.
//!
//! Options:
//!   --resolution=<N>                        Grid side (default: 64)
//!   --method=rgb_pixels|spatial_rgb|grayscale_patches
//!                                           Point-cloud construction (default: rgb_pixels)
//!   --max-points=<N>                        Subsample cap (default: 500)
//!   --output=<dir>                          Output directory (default: results/homology)
//!
//! Unknown methods and unparsable or zero numbers exit 1 before any analysis.

use std::path::{Path, PathBuf};

use serde::Serialize;

use beacon_core::cli::{flag_value, parse_choice, parse_flag, parse_resolution};
use beacon_core::{generate, generate_random, ConfigError, GeneratorCatalog, Resolution, Signal};
use beacon_topology::{analyze, PointCloudMethod, ProviderChain, TopologyConfig, MAX_POINTS};

#[derive(Debug)]
struct CliConfig {
    resolution: Resolution,
    method: PointCloudMethod,
    max_points: usize,
    output_dir: PathBuf,
}

/// (name, generator, constant). `None` is the seeded random baseline.
const BEACONS: [(&str, Option<(&str, f64)>); 5] = [
    ("tau_champion", Some(("sin_i2", std::f64::consts::TAU))),
    ("pi_original", Some(("sin_i2", std::f64::consts::PI))),
    ("pi_linear", Some(("sin_i", std::f64::consts::PI))),
    ("pi_half", Some(("cos_i2", std::f64::consts::FRAC_PI_2))),
    ("random", None),
];

const RANDOM_BASELINE_SEED: u64 = 42;

#[derive(Serialize)]
struct BeaconTopology {
    beacon_name: String,
    persistence_method: String,
    n_points: usize,
    cloud_points: usize,
    metrics: beacon_topology::PersistenceMetrics,
}

fn parse_args(args: &[String]) -> Result<CliConfig, ConfigError> {
    let resolution = parse_resolution(args, "resolution", 64)?;

    let method = parse_choice(
        args,
        "method",
        &[
            ("rgb_pixels", PointCloudMethod::RgbPixels),
            ("spatial_rgb", PointCloudMethod::SpatialRgb),
            ("grayscale_patches", PointCloudMethod::GrayscalePatches),
        ],
        PointCloudMethod::RgbPixels,
    )?;

    let max_points = parse_flag(args, "max-points", MAX_POINTS)?;
    if max_points == 0 {
        return Err(ConfigError::InvalidFlag {
            flag: "max-points",
            value: "0".to_string(),
        });
    }

    let output_dir = flag_value(args, "output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results/homology"));

    Ok(CliConfig {
        resolution,
        method,
        max_points,
        output_dir,
    })
}

fn beacon_signal(
    source: Option<(&str, f64)>,
    resolution: Resolution,
    generators: &GeneratorCatalog,
) -> Result<Signal, Box<dyn std::error::Error>> {
    match source {
        None => Ok(generate_random(resolution, RANDOM_BASELINE_SEED)),
        Some((generator, constant)) => {
            let spec = generators
                .get(generator)
                .ok_or_else(|| format!("generator '{}' missing from catalog", generator))?;
            Ok(generate(spec, constant, resolution)?)
        }
    }
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
    let resolution = config.resolution;
    let generators = GeneratorCatalog::standard();
    let chain = ProviderChain::standard();
    let topology = TopologyConfig {
        method: config.method,
        max_points: config.max_points,
        ..TopologyConfig::default()
    };

    println!("Resolution: {}, point cloud: {}", resolution, config.method);
    println!();

    let mut results = Vec::new();
    for (i, (name, source)) in BEACONS.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, BEACONS.len(), name);
        let signal = beacon_signal(*source, resolution, &generators)?;
        let analysis = match analyze(&signal, &topology, &chain) {
            Ok(a) => a,
            Err(e) => {
                log::warn!("{}: {}", name, e);
                continue;
            }
        };

        println!(
            "  {} points ({} before subsampling), provider {}",
            analysis.persistence.n_points, analysis.cloud_points, analysis.persistence.provider
        );
        for m in &analysis.metrics.dimensions {
            println!(
                "  H{}: total {:.4}, max {:.4}, features {}, entropy {}",
                m.dimension,
                m.total_persistence,
                m.max_persistence,
                m.n_features,
                m.entropy.map_or_else(|| "n/a".to_string(), |e| format!("{:.4}", e))
            );
        }

        results.push(BeaconTopology {
            beacon_name: name.to_string(),
            persistence_method: analysis.persistence.provider.clone(),
            n_points: analysis.persistence.n_points,
            cloud_points: analysis.cloud_points,
            metrics: analysis.metrics,
        });
    }

    save_json(&config.output_dir.join("homology_results.json"), &results);
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
    println!("  beacon-topology: Persistent Homology");
    println!("========================================");
    println!();

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!();
    println!("========================================");
    println!("  Done.");
    println!("========================================");
}
