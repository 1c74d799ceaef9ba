use anyhow::{bail, Context, Result};
use chrono::{Duration, Local};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::fetch::run_fetch_job;
use crate::plotting::LineChart;
use crate::processors::series_filter::{emission_series, temperature_series};
use crate::processors::{melt_emissions, GridResampler};
use crate::readers::{CountryTemperatureReader, EmissionReader, GridReader, StationReader};
use crate::utils::constants::DEFAULT_GRID_SOURCES;
use crate::utils::coordinates::HemisphereConvention;
use crate::utils::filename::generate_default_plot_filename;
use crate::utils::logging::init_logging;
use crate::writers::CsvWriter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    if cli.verbose {
        info!("Verbose logging enabled");
    }

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Resample {
            stations,
            grid,
            output,
            signed_coordinates,
            quiet,
        } => {
            let sources = pair_grid_sources(grid, output)?;
            let convention = if signed_coordinates {
                HemisphereConvention::Signed
            } else {
                HemisphereConvention::Unsigned
            };

            println!("Reading stations from {}", stations.display());
            let stations = StationReader::with_convention(convention)
                .read_stations(&stations)
                .with_context(|| format!("Failed to read stations from {}", stations.display()))?;
            println!("Found {} distinct stations", stations.len());

            let reader = GridReader::new(config.grid.clone());
            let resampler = GridResampler::new().with_progress(!quiet);
            let writer = CsvWriter::new();

            for (grid_path, output_path) in &sources {
                println!("Resampling {}", grid_path.display());
                let grid = reader
                    .read_grid(grid_path)
                    .with_context(|| format!("Failed to read grid {}", grid_path.display()))?;
                let rows = resampler
                    .resample(&grid, &stations)
                    .with_context(|| format!("Failed to resample {}", grid_path.display()))?;
                let written = writer.write_time_series(&rows, output_path)?;
                println!("Wrote {} rows to {}", written, output_path.display());
            }

            println!("Resampling complete!");
        }

        Commands::Inspect { grid } => {
            let description = GridReader::new(config.grid.clone())
                .inspect_grid(&grid)
                .with_context(|| format!("Failed to inspect {}", grid.display()))?;
            println!("{}", description.detailed_summary());
        }

        Commands::ReshapeCo2 { input, output } => {
            let table = EmissionReader::new()
                .read_wide(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let records = melt_emissions(&table);
            let written = CsvWriter::new().write_emissions(&records, &output)?;
            println!(
                "Reshaped {} countries x {} years into {} rows at {}",
                table.rows.len(),
                table.years.len(),
                written,
                output.display()
            );
        }

        Commands::Summary { input } => {
            let summary = DatasetAnalyzer::new()
                .analyze_csv(&input)
                .with_context(|| format!("Failed to analyze {}", input.display()))?;
            println!("{}", summary.detailed_summary());
        }

        Commands::PlotTemperature {
            input,
            country,
            start,
            end,
            compare_start,
            compare_end,
            output,
        } => {
            let rows = CountryTemperatureReader::new()
                .read_temperatures(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let series = temperature_series(
                &rows,
                &country,
                start,
                end,
                &format!("{} to {}", start, end),
            );
            if series.is_empty() {
                bail!("No temperature readings for {} between {} and {}", country, start, end);
            }

            let mut chart =
                LineChart::new(format!("Average temperature in {}", country)).add_series(series);

            if let (Some(cs), Some(ce)) = (compare_start, compare_end) {
                let comparison =
                    temperature_series(&rows, &country, cs, ce, &format!("{} to {}", cs, ce));
                if comparison.is_empty() {
                    warn!(country = %country, start = %cs, end = %ce, "Comparison window has no readings");
                } else {
                    chart = chart.add_series(comparison);
                }
            }

            let output =
                output.unwrap_or_else(|| generate_default_plot_filename("temperature", &country));
            chart.save_png(&output)?;
            println!("Saved chart to {}", output.display());
        }

        Commands::PlotCo2 {
            input,
            country,
            start,
            end,
            output,
        } => {
            let records = EmissionReader::new()
                .read_long(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let series = emission_series(
                &records,
                &country,
                start,
                end,
                &format!("CO2 {} to {}", start, end),
            );
            if series.is_empty() {
                bail!("No CO2 values for {} between {} and {}", country, start, end);
            }

            let output = output.unwrap_or_else(|| generate_default_plot_filename("co2", &country));
            LineChart::new(format!("CO2 emissions of {}", country))
                .add_series(series)
                .save_png(&output)?;
            println!("Saved chart to {}", output.display());
        }

        Commands::Fetch { cities, day } => {
            let day = day.unwrap_or_else(|| Local::now().date_naive() - Duration::days(1));
            info!(day = %day, cities = cities.len(), "Starting temperature fetch");

            let summary = run_fetch_job(&config.fetch, &cities, day);
            println!("{}", summary.summary());
        }
    }

    Ok(())
}

/// Pair each grid file with its output table; no arguments means the default sources
pub fn pair_grid_sources(grids: Vec<PathBuf>, outputs: Vec<PathBuf>) -> Result<Vec<(PathBuf, PathBuf)>> {
    if grids.is_empty() && outputs.is_empty() {
        return Ok(DEFAULT_GRID_SOURCES
            .iter()
            .map(|(grid, output)| (PathBuf::from(grid), PathBuf::from(output)))
            .collect());
    }

    if grids.len() != outputs.len() {
        bail!(
            "Each --grid needs one --output: got {} grid file(s) and {} output(s)",
            grids.len(),
            outputs.len()
        );
    }

    Ok(grids.into_iter().zip(outputs).collect())
}
