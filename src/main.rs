use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use theft_mapper::config::{
    DEFAULT_CIRCLE_SIZE, DEFAULT_DATA_FILE, DEFAULT_DAYS, DEFAULT_LOCATION, DEFAULT_SAVE_FILE,
    DEFAULT_ZOOM,
};
use theft_mapper::{
    pipeline, Config, Diagnostic, FilterConfig, Location, MapOptions, ParseOptions, ProcessingTime,
    RenderConfig,
};

/// Place theft reports onto a map
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// CSV file of the reports
    #[arg(short = 'i', value_name = "FILE", env = "THEFT_MAPPER_INPUT", default_value = DEFAULT_DATA_FILE)]
    datafile: PathBuf,
    /// The name of the created HTML file
    #[arg(short = 'o', value_name = "FILE", env = "THEFT_MAPPER_OUTPUT", default_value = DEFAULT_SAVE_FILE)]
    savefile: PathBuf,
    /// Zoom level of the map on file open
    #[arg(short = 'z', env = "THEFT_MAPPER_ZOOM", default_value_t = DEFAULT_ZOOM)]
    zoom: u8,
    /// Location to center the map on file open, e.g. `51.4545,-2.5879`
    #[arg(short = 'l', value_name = "LAT,LON", env = "THEFT_MAPPER_LOCATION", default_value = DEFAULT_LOCATION, allow_hyphen_values = true)]
    location: Location,
    /// Radius of the circles drawn for reports without an accurate location
    #[arg(short = 'c', env = "THEFT_MAPPER_CIRCLE_SIZE", default_value_t = DEFAULT_CIRCLE_SIZE, value_parser = parse_radius)]
    circlesize: f64,
    /// Only plot reports from the last N days (0 = all days)
    #[arg(short = 'd', env = "THEFT_MAPPER_DAYS", default_value_t = DEFAULT_DAYS)]
    days: u32,
    /// Only display reports with accurate locations
    #[arg(long = "accurate")]
    accurate_only: bool,
    /// Do not display 'stolen' reports
    #[arg(long)]
    no_stolen: bool,
    /// Do not display 'found' reports
    #[arg(long)]
    no_found: bool,
    /// Do not display 'sighting' reports
    #[arg(long = "no-sightings")]
    no_sighting: bool,
    /// Do not display 'burnt' reports
    #[arg(long)]
    no_burnt: bool,
    /// Fail on report types other than stolen, found, sighting and burnt
    #[arg(long)]
    strict_types: bool,
}

/// Circle radius in metres: a finite number, not negative
fn parse_radius(raw: &str) -> Result<f64, String> {
    let radius: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !radius.is_finite() || radius < 0.0 {
        return Err(format!("'{raw}' must be a finite, non-negative radius"));
    }
    Ok(radius)
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            input: cli.datafile,
            output: cli.savefile,
            parse: ParseOptions {
                strict_types: cli.strict_types,
            },
            filter: FilterConfig {
                accurate_only: cli.accurate_only,
                exclude_stolen: cli.no_stolen,
                exclude_found: cli.no_found,
                exclude_sighting: cli.no_sighting,
                exclude_burnt: cli.no_burnt,
                max_age_days: cli.days,
            },
            render: RenderConfig {
                circle_radius: cli.circlesize,
            },
            map: MapOptions {
                center: cli.location,
                zoom: cli.zoom,
            },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "theft_mapper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("theft-mapper: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Only excluded rows go to stdout; unknown types are reported through tracing
fn stdout_line(diagnostic: &Diagnostic) -> Option<String> {
    diagnostic.excludes_row().then(|| diagnostic.to_string())
}

fn run() -> Result<()> {
    let config = Config::from(Cli::parse());
    let now = ProcessingTime::capture();
    tracing::debug!(?config, now = %now.time(), "starting run");

    let summary = pipeline::run(&config, now, |d| {
        if let Some(line) = stdout_line(d) {
            println!("{line}");
        }
    })
    .with_context(|| format!("Failed to map reports from {}", config.input.display()))?;

    println!("{summary}");
    Ok(())
}
