use crate::error::Result;
use crate::models::{EmissionRecord, TimeSeriesRow};
use crate::utils::constants::{EMISSION_HEADER, TIME_SERIES_HEADER};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes result tables as CSV, creating parent directories and overwriting
/// any existing file
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, path: &Path) -> Result<csv::Writer<std::fs::File>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(csv::Writer::from_path(path)?)
    }

    /// Columns: date, temperature, latitude, longitude, city, country
    pub fn write_time_series(&self, rows: &[TimeSeriesRow], path: &Path) -> Result<usize> {
        info!(path = %path.display(), rows = rows.len(), "Writing time series CSV");
        let mut wtr = self.open(path)?;
        write_time_series_to(&mut wtr, rows)?;
        wtr.flush()?;
        Ok(rows.len())
    }

    /// Columns: Country, Year, CO2
    pub fn write_emissions(&self, records: &[EmissionRecord], path: &Path) -> Result<usize> {
        info!(path = %path.display(), rows = records.len(), "Writing CO2 CSV");
        let mut wtr = self.open(path)?;
        write_emissions_to(&mut wtr, records)?;
        wtr.flush()?;
        Ok(records.len())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_time_series_to<W: Write>(wtr: &mut csv::Writer<W>, rows: &[TimeSeriesRow]) -> Result<()> {
    wtr.write_record(TIME_SERIES_HEADER)?;
    for row in rows {
        let temperature = if row.has_temperature() {
            row.temperature.to_string()
        } else {
            String::new()
        };
        wtr.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            temperature,
            row.latitude.to_string(),
            row.longitude.to_string(),
            row.city.clone(),
            row.country.clone(),
        ])?;
    }
    Ok(())
}

pub fn write_emissions_to<W: Write>(wtr: &mut csv::Writer<W>, records: &[EmissionRecord]) -> Result<()> {
    wtr.write_record(EMISSION_HEADER)?;
    for record in records {
        wtr.write_record([
            record.country.clone(),
            record.year.to_string(),
            record.co2.map_or(String::new(), |v| v.to_string()),
        ])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn row(temperature: f32) -> TimeSeriesRow {
        TimeSeriesRow {
            date: NaiveDate::from_ymd_opt(1950, 1, 16).unwrap(),
            temperature,
            latitude: 57.05,
            longitude: 10.33,
            city: "Århus".to_string(),
            country: "Denmark".to_string(),
        }
    }

    #[test]
    fn test_time_series_layout() -> Result<()> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_time_series_to(&mut wtr, &[row(-1.25), row(f32::NAN)])?;
        let text = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,temperature,latitude,longitude,city,country");
        assert_eq!(lines[1], "1950-01-16,-1.25,57.05,10.33,Århus,Denmark");
        assert_eq!(lines[2], "1950-01-16,,57.05,10.33,Århus,Denmark");
        Ok(())
    }

    #[test]
    fn test_write_emissions_creates_parent_dirs() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("EmissionCO2.csv");
        let records = vec![
            EmissionRecord::new("Chile".to_string(), 1900, Some(1.5)),
            EmissionRecord::new("Chile".to_string(), 1901, None),
        ];

        let written = CsvWriter::new().write_emissions(&records, &path)?;
        assert_eq!(written, 2);

        let text = std::fs::read_to_string(&path)?;
        assert_eq!(text, "Country,Year,CO2\nChile,1900,1.5\nChile,1901,\n");
        Ok(())
    }
}
