use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_COUNTRY_TEMPERATURES_PATH, DEFAULT_EMISSIONS_PATH, DEFAULT_STATIONS_PATH,
    DEFAULT_WIDE_EMISSIONS_PATH,
};

#[derive(Parser)]
#[command(name = "climate-resampler")]
#[command(about = "Resample gridded climate data onto city stations and chart the results")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        env = "CLIMATE_CONFIG",
        help = "TOML configuration file"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resample gridded temperatures onto every distinct city station
    Resample {
        #[arg(short, long, default_value = DEFAULT_STATIONS_PATH)]
        stations: PathBuf,

        #[arg(
            short,
            long,
            help = "Grid file(s) [default: air.mon.mean.v501.nc, Complete_TAVG_Daily_LatLong1_2010.nc]"
        )]
        grid: Vec<PathBuf>,

        #[arg(short, long, help = "Output CSV per grid file, in the same order")]
        output: Vec<PathBuf>,

        #[arg(long, help = "Negate southern latitudes and western longitudes")]
        signed_coordinates: bool,

        #[arg(long, help = "Hide the progress bar")]
        quiet: bool,
    },

    /// List a grid file's dimensions, variables and time axis (needs the `netcdf` feature)
    Inspect {
        #[arg(short, long)]
        grid: PathBuf,
    },

    /// Melt the wide CO2 table (one column per year) into Country,Year,CO2 rows
    ReshapeCo2 {
        #[arg(short, long, default_value = DEFAULT_WIDE_EMISSIONS_PATH)]
        input: PathBuf,

        #[arg(short, long, default_value = DEFAULT_EMISSIONS_PATH)]
        output: PathBuf,
    },

    /// Count rows and list distinct countries of a temperature CSV
    Summary {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Chart a country's monthly land temperature
    PlotTemperature {
        #[arg(short, long, default_value = DEFAULT_COUNTRY_TEMPERATURES_PATH)]
        input: PathBuf,

        #[arg(long)]
        country: String,

        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,

        #[arg(long, value_parser = parse_date, requires = "compare_end")]
        compare_start: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date, requires = "compare_start")]
        compare_end: Option<NaiveDate>,

        #[arg(
            short,
            long,
            help = "Output PNG path [default: output/temperature-{country}-{YYMMDD}.png]"
        )]
        output: Option<PathBuf>,
    },

    /// Chart a country's yearly CO2 emissions
    PlotCo2 {
        #[arg(short, long, default_value = DEFAULT_EMISSIONS_PATH)]
        input: PathBuf,

        #[arg(long)]
        country: String,

        #[arg(long)]
        start: i32,

        #[arg(long)]
        end: i32,

        #[arg(
            short,
            long,
            help = "Output PNG path [default: output/co2-{country}-{YYMMDD}.png]"
        )]
        output: Option<PathBuf>,
    },

    /// Fetch one day of temperatures per city from the weather API and store them
    Fetch {
        #[arg(long = "city", required = true)]
        cities: Vec<String>,

        #[arg(long, value_parser = parse_date, help = "Day to fetch [default: yesterday]")]
        day: Option<NaiveDate>,
    },
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}
