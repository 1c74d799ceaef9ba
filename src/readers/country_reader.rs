use crate::error::{ProcessingError, Result};
use crate::models::CountryTemperature;
use crate::readers::station_reader::column_index;
use crate::utils::constants::{
    AVERAGE_TEMPERATURE_COLUMN, COUNTRY_COLUMN, DATE_COLUMN, UNCERTAINTY_COLUMN,
};
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;

fn parse_reading(raw: Option<&str>) -> Result<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<f64>().map(Some).map_err(|_| {
            ProcessingError::InvalidFormat(format!("Invalid temperature: '{}'", value))
        }),
    }
}

/// Reads `GlobalLandTemperaturesByCountry.csv`
/// (`dt,AverageTemperature,AverageTemperatureUncertainty,Country`)
pub struct CountryTemperatureReader;

impl CountryTemperatureReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_temperatures(&self, path: &Path) -> Result<Vec<CountryTemperature>> {
        self.read_temperatures_from(csv::Reader::from_path(path)?)
    }

    pub fn read_temperatures_from<R: Read>(
        &self,
        mut reader: csv::Reader<R>,
    ) -> Result<Vec<CountryTemperature>> {
        let headers = reader.headers()?.clone();
        let date_col = column_index(&headers, DATE_COLUMN)?;
        let avg_col = column_index(&headers, AVERAGE_TEMPERATURE_COLUMN)?;
        let country_col = column_index(&headers, COUNTRY_COLUMN)?;
        // Not every derived table keeps the uncertainty column
        let uncertainty_col = column_index(&headers, UNCERTAINTY_COLUMN).ok();

        let mut temperatures = Vec::new();
        for record in reader.records() {
            let record = record?;
            let date = NaiveDate::parse_from_str(
                record.get(date_col).unwrap_or_default().trim(),
                "%Y-%m-%d",
            )?;
            temperatures.push(CountryTemperature {
                date,
                average_temperature: parse_reading(record.get(avg_col))?,
                uncertainty: parse_reading(uncertainty_col.and_then(|c| record.get(c)))?,
                country: record.get(country_col).unwrap_or_default().to_string(),
            });
        }

        Ok(temperatures)
    }
}

impl Default for CountryTemperatureReader {
    fn default() -> Self {
        Self::new()
    }
}
