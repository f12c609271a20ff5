//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::offset::OffsetKind;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    /// Log level, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the latest PM2.5 grid into the dashboard data file
    Extract(ExtractArgs),
    /// Summarise a dashboard data file
    Inspect {
        #[arg(short, long, default_value = "public/pm25_2022_data.json")]
        input: PathBuf,
    },
    /// Look up the PM2.5 value of the grid point nearest a location
    Lookup {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(short, long, default_value = "public/pm25_2022_data.json")]
        input: PathBuf,
    },
    /// Join city names from the cities table to world city coordinates
    Coords(CoordsArgs),
    /// Split the cities table into one JSON document per city
    Split {
        #[arg(short, long, default_value = "V1pt6_Cities_Data_PM2pt5.csv")]
        input: PathBuf,
        #[arg(short, long, default_value = "cities_json")]
        output_dir: PathBuf,
    },
    /// Manage bubble annotations in per-city documents
    Annotate {
        #[command(subcommand)]
        action: AnnotateAction,
    },
    /// Compute a bubble offset table from a bubble text table
    Offsets(OffsetsArgs),
}

#[derive(Args)]
pub struct ExtractArgs {
    /// NetCDF file holding the gridded PM2.5 data
    #[arg(short, long, default_value = "public/concat_weighted_output.nc")]
    pub input: PathBuf,
    #[arg(short, long, default_value = "public/pm25_2022_data.json")]
    pub output: PathBuf,
    /// Keep every n-th grid point along each axis
    #[arg(short, long, default_value_t = 4)]
    pub stride: usize,
    /// Measurement variable name, instead of the built-in candidates
    #[arg(long)]
    pub variable: Option<String>,
    #[arg(long, default_value = "PM2.5 concentration data for 2022")]
    pub description: String,
    #[arg(long, default_value = "µg/m³")]
    pub units: String,
    /// Also write the points to a parquet file
    #[arg(long)]
    pub parquet: bool,
    /// Parquet file path, defaults to a dated file in the home directory
    #[arg(long, requires = "parquet")]
    pub parquet_path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CoordsArgs {
    /// Cities table whose header lists "City, Country" columns
    #[arg(long, default_value = "V1pt6_Cities_Data_PM2pt5.csv")]
    pub cities: PathBuf,
    #[arg(long, default_value = "worldcities/worldcities.csv")]
    pub world: PathBuf,
    #[arg(short, long, default_value = "cities_with_coords.json")]
    pub output: PathBuf,
    /// Require an exact, case-sensitive (city, country) match
    #[arg(long)]
    pub exact: bool,
    /// Also write the matched cities to this parquet file
    #[arg(long)]
    pub parquet_path: Option<PathBuf>,
}

#[derive(Args)]
pub struct OffsetsArgs {
    #[arg(long, default_value = "V1pt6_Cities_Data_PM2pt5.csv")]
    pub cities: PathBuf,
    /// Bubble text table: a year column followed by one column per city
    #[arg(long, default_value = "bubbles_text.csv")]
    pub bubbles: PathBuf,
    #[arg(short, long, default_value = "bubbles_offset.csv")]
    pub output: PathBuf,
    #[arg(long, value_enum, default_value_t = OffsetKind::Fixed)]
    pub strategy: OffsetKind,
}

#[derive(Subcommand)]
pub enum AnnotateAction {
    /// List city documents, optionally filtered by a search term
    Cities {
        #[arg(short, long, default_value = "cities_json")]
        dir: PathBuf,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show the bubbles of a city document
    Bubbles { file: PathBuf },
    /// Add a bubble, replacing any existing one for the same year
    Add {
        file: PathBuf,
        #[arg(short, long)]
        year: i32,
        #[arg(short, long)]
        text: String,
        #[arg(long, value_enum, default_value_t = OffsetKind::Tiered)]
        strategy: OffsetKind,
    },
    /// Change the text of an existing bubble
    Update {
        file: PathBuf,
        #[arg(short, long)]
        year: i32,
        #[arg(short, long)]
        text: String,
        #[arg(long, value_enum, default_value_t = OffsetKind::Tiered)]
        strategy: OffsetKind,
    },
    /// Delete the bubble for a year
    Delete {
        file: PathBuf,
        #[arg(short, long)]
        year: i32,
    },
    /// Recompute the offsets of every bubble in a directory
    Recompute {
        #[arg(short, long, default_value = "cities_json")]
        dir: PathBuf,
        #[arg(long, value_enum, default_value_t = OffsetKind::Tiered)]
        strategy: OffsetKind,
    },
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
