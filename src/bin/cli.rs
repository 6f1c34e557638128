//! road-matcher CLI - distance and time per road type for a GPX track
//!
//! Usage:
//!   road-matcher <track.gpx> <map.geojson|map.osm> [--road-type-map <file.json>]
//!
//! Prints a JSON object keyed by road type (or road name when no road-type map
//! is given) with the total `distance` in meters and `time` in milliseconds.

use clap::Parser;
use log::{error, LevelFilter};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use road_matcher::loading::analyze_files;
use road_matcher::{AnalysisConfig, TimestampPolicy};

#[derive(Parser)]
#[command(name = "road-matcher", version)]
#[command(about = "Total distance and time per road type for a GPX track", long_about = None)]
struct Cli {
    /// GPX file with the recorded track
    track: PathBuf,

    /// Road map: .geojson (OSM-style feature ids) or .osm XML
    map: PathBuf,

    /// JSON object mapping road name substrings to road types
    #[arg(long, value_name = "FILE")]
    road_type_map: Option<PathBuf>,

    /// Fail on timestamps that go backwards instead of skipping the segment
    #[arg(long)]
    strict_timestamps: bool,

    /// Print the result on a single line
    #[arg(long)]
    compact: bool,

    /// Enable verbose log output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let config = AnalysisConfig {
        timestamp_policy: if cli.strict_timestamps {
            TimestampPolicy::Strict
        } else {
            TimestampPolicy::SkipSegment
        },
        ..AnalysisConfig::default()
    };

    let stats = match analyze_files(&cli.track, &cli.map, cli.road_type_map.as_deref(), &config) {
        Ok(stats) => stats,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = if cli.compact {
        serde_json::to_string(&stats)
    } else {
        serde_json::to_string_pretty(&stats)
    };
    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            ExitCode::FAILURE
        }
    }
}
