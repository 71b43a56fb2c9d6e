#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for scoring charging station layers.
//!
//! Reads a `GeoJSON` layer from disk (the same file the map server serves)
//! and prints canonical records as JSON, so the offline renderer and any
//! other consumer can be checked against the interactive map.

use std::path::{Path, PathBuf};

use chargepilot_ingest::{RankMode, load_feature_collection};
use chargepilot_palette::{ColorGradient, GradientError, PercentileBands, load_gradient};
use chargepilot_scoring::score_collection;
use chargepilot_scoring_models::{ScoringConfig, load_config};
use chargepilot_station_models::StationRecord;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "chargepilot", about = "Charging station pressure scorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an Open Charge Map station layer
    Stations {
        /// Path to the station `GeoJSON` file
        input: PathBuf,
        /// Scoring config TOML (defaults to the canonical parameters)
        #[arg(long, conflicts_with = "preset")]
        config: Option<PathBuf>,
        /// Bundled parameter set (e.g. "`video_legacy`")
        #[arg(long)]
        preset: Option<String>,
        /// Attach a percentile-banded marker color to each station
        #[arg(long)]
        colors: bool,
        /// Gradient TOML with `bad`/`mid`/`good` hex stops
        #[arg(long, requires = "colors")]
        gradient: Option<PathBuf>,
    },
    /// List optimizer recommendations
    Recommendations {
        /// Path to the recommendations `GeoJSON` file
        input: PathBuf,
        /// Include candidates without a rank, in file order
        #[arg(long)]
        all: bool,
    },
    /// List community cluster nodes
    Clusters {
        /// Path to the clusters `GeoJSON` file
        input: PathBuf,
        /// Print per-community rollups instead of nodes
        #[arg(long)]
        summary: bool,
    },
    /// Print the score percentile bands of a station layer
    Bands {
        /// Path to the station `GeoJSON` file
        input: PathBuf,
        /// Scoring config TOML (defaults to the canonical parameters)
        #[arg(long, conflicts_with = "preset")]
        config: Option<PathBuf>,
        /// Bundled parameter set (e.g. "`video_legacy`")
        #[arg(long)]
        preset: Option<String>,
        /// Gradient TOML with `bad`/`mid`/`good` hex stops
        #[arg(long)]
        gradient: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ColoredStation {
    #[serde(flatten)]
    record: StationRecord,
    color: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BandsReport {
    bands: PercentileBands,
    gradient: ColorGradient,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stations {
            input,
            config,
            preset,
            colors,
            gradient,
        } => {
            let config = resolve_config(config.as_deref(), preset.as_deref())?;
            let records = score_collection(&load_feature_collection(&input)?, &config);

            if colors {
                let gradient = resolve_gradient(gradient.as_deref())?;
                let bands = station_bands(&records, &config);
                let colored: Vec<ColoredStation> = records
                    .into_iter()
                    .map(|record| ColoredStation {
                        color: gradient.hex_for(record.score, &bands),
                        record,
                    })
                    .collect();
                print_json(&colored)?;
            } else {
                print_json(&records)?;
            }
        }
        Commands::Recommendations { input, all } => {
            let mode = if all { RankMode::All } else { RankMode::Ranked };
            let records = chargepilot_ingest::recommendations(&load_feature_collection(&input)?, mode);
            log::info!("{} recommendations ({mode:?})", records.len());
            print_json(&records)?;
        }
        Commands::Clusters { input, summary } => {
            let nodes = chargepilot_ingest::clusters(&load_feature_collection(&input)?);
            if summary {
                print_json(&chargepilot_ingest::summarize_communities(&nodes))?;
            } else {
                print_json(&nodes)?;
            }
        }
        Commands::Bands {
            input,
            config,
            preset,
            gradient,
        } => {
            let config = resolve_config(config.as_deref(), preset.as_deref())?;
            let records = score_collection(&load_feature_collection(&input)?, &config);
            print_json(&BandsReport {
                bands: station_bands(&records, &config),
                gradient: resolve_gradient(gradient.as_deref())?,
            })?;
        }
    }

    Ok(())
}

fn resolve_config(
    path: Option<&Path>,
    preset: Option<&str>,
) -> Result<ScoringConfig, Box<dyn std::error::Error>> {
    if let Some(name) = preset {
        let config = chargepilot_scoring_models::preset(name)?;
        log::info!("Using {name} preset (decay {} km)", config.decay_km);
        return Ok(config);
    }
    let Some(path) = path else {
        return Ok(ScoringConfig::default());
    };
    let config = load_config(path)?;
    log::info!(
        "Loaded scoring config from {} (decay {} km, {:?})",
        path.display(),
        config.decay_km,
        config.banding
    );
    Ok(config)
}

fn resolve_gradient(path: Option<&Path>) -> Result<ColorGradient, GradientError> {
    let Some(path) = path else {
        return Ok(ColorGradient::default());
    };
    let gradient = load_gradient(path)?;
    log::info!("Loaded gradient from {}: {gradient:?}", path.display());
    Ok(gradient)
}

fn station_bands(records: &[StationRecord], config: &ScoringConfig) -> PercentileBands {
    let scores: Vec<f64> = records.iter().map(|r| r.score).collect();
    PercentileBands::with_percentiles(&scores, config.bands)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
