use std::{fs::File, path::Path, time::Instant};

use anyhow::Result;
use clap::Parser;
use log::{error, info, LevelFilter};
use options::Options;
use scene_raycast::{PickConfig, PickExecutor, Stats, StatsNode, StatsNodeTrait};

mod options;

/// Initializes the program logging
///
/// # Arguments
/// * `filter` - The log level filter, i.e., the minimum log level to be logged.
fn initialize_logging(filter: LevelFilter) {
    let mut builder = pretty_env_logger::formatted_timed_builder();

    builder.filter_level(filter).init();
}

/// Loads the pick configuration and runs all of its probe rays.
///
/// # Arguments
/// * `path` - The path to the pick configuration.
/// * `s` - The stats node to write the timings to.
fn run_config(path: &Path, s: StatsNode) -> Result<usize> {
    let config = {
        let _t = s.get_child("loading").register_timing();
        let file = File::open(path)?;
        PickConfig::read(file)?
    };

    let result = PickExecutor::new(config).run(s)?;

    for (ray_index, hits) in result.hits.iter().enumerate() {
        let names = result.hit_names(ray_index);
        match hits.first() {
            Some(closest) => info!(
                "Ray {}: {} hits, closest '{}' at distance {:.4}",
                ray_index + 1,
                hits.len(),
                names.first().copied().unwrap_or_default(),
                closest.distance
            ),
            None => info!("Ray {}: no hits", ray_index + 1),
        }
    }

    Ok(result.hits.iter().map(|hits| hits.len()).sum())
}

/// Runs the program.
///
/// # Arguments
/// * `options` - The program options.
fn run_program(options: Options) -> Result<()> {
    let s = Stats::root();

    let paths = match glob::glob(&options.config) {
        Ok(paths) => paths,
        Err(err) => {
            error!("Failed to read the config pattern: {:?}", err);
            return Err(err.into());
        }
    };

    let mut num_configs = 0;
    let mut num_failed = 0;
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                error!("Failed to read entry: {:?}", err);
                info!("Skipping entry...");
                continue;
            }
        };

        info!("Running pick configuration '{}'...", path.display());
        num_configs += 1;

        let t = Instant::now();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match run_config(&path, s.get_child(&name)) {
            Ok(num_hits) => info!(
                "Found {} hits in {} ms",
                num_hits,
                t.elapsed().as_secs_f64() * 1e3f64
            ),
            Err(err) => {
                error!("Failed to run '{}': {:?}", path.display(), err);
                num_failed += 1;
            }
        }
    }

    if num_configs == 0 {
        anyhow::bail!("No pick configuration matches '{}'", options.config);
    }

    if num_failed > 0 {
        anyhow::bail!("{} of {} pick configurations failed", num_failed, num_configs);
    }

    Ok(())
}

fn main() {
    let options = Options::parse();
    initialize_logging(options.log_level.into());
    options.dump_to_log();

    match run_program(options) {
        Ok(_) => {
            if let Ok(stats) = Stats::root().lock() {
                info!("Stat:");
                info!("{}", *stats);
            }
            info!("Program completed successfully");
        }
        Err(err) => {
            error!("Program failed: {:?}", err);
            std::process::exit(1);
        }
    }
}
