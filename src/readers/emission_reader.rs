use crate::error::{ProcessingError, Result};
use crate::models::EmissionRecord;
use crate::readers::station_reader::column_index;
use crate::utils::constants::{COUNTRY_COLUMN, EMISSION_HEADER};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// CO2 table with one column per year, as published
#[derive(Debug, Clone, PartialEq)]
pub struct WideEmissionTable {
    pub years: Vec<i32>,
    pub rows: Vec<WideEmissionRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideEmissionRow {
    pub country: String,
    /// Aligned with `WideEmissionTable::years`
    pub values: Vec<Option<f64>>,
}

fn parse_optional_f64(raw: &str, context: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid {}: '{}'", context, raw)))
}

pub struct EmissionReader;

impl EmissionReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the wide table: a `Country` column followed by one column per year
    pub fn read_wide(&self, path: &Path) -> Result<WideEmissionTable> {
        let table = self.read_wide_from(csv::Reader::from_path(path)?)?;
        info!(
            path = %path.display(),
            countries = table.rows.len(),
            years = table.years.len(),
            "Loaded wide CO2 table"
        );
        Ok(table)
    }

    pub fn read_wide_from<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<WideEmissionTable> {
        let headers = reader.headers()?.clone();
        let country_col = column_index(&headers, COUNTRY_COLUMN)?;

        let mut year_cols = Vec::new();
        let mut years = Vec::new();
        for (i, header) in headers.iter().enumerate() {
            if i == country_col {
                continue;
            }
            let year = header.trim().parse::<i32>().map_err(|_| {
                ProcessingError::InvalidFormat(format!("Column '{}' is not a year", header))
            })?;
            year_cols.push(i);
            years.push(year);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let country = record.get(country_col).unwrap_or_default().to_string();
            let values = year_cols
                .iter()
                .zip(&years)
                .map(|(&col, year)| {
                    parse_optional_f64(
                        record.get(col).unwrap_or_default(),
                        &format!("CO2 value for {} in {}", country, year),
                    )
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(WideEmissionRow { country, values });
        }

        Ok(WideEmissionTable { years, rows })
    }

    /// Read a long `Country,Year,CO2` table as written by the reshape step
    pub fn read_long(&self, path: &Path) -> Result<Vec<EmissionRecord>> {
        self.read_long_from(csv::Reader::from_path(path)?)
    }

    pub fn read_long_from<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<EmissionRecord>> {
        let headers = reader.headers()?.clone();
        let country_col = column_index(&headers, EMISSION_HEADER[0])?;
        let year_col = column_index(&headers, EMISSION_HEADER[1])?;
        let co2_col = column_index(&headers, EMISSION_HEADER[2])?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            let raw_year = record.get(year_col).unwrap_or_default();
            let year = raw_year.trim().parse::<i32>().map_err(|_| {
                ProcessingError::InvalidFormat(format!("Invalid year: '{}'", raw_year))
            })?;
            records.push(EmissionRecord::new(
                record.get(country_col).unwrap_or_default().to_string(),
                year,
                parse_optional_f64(record.get(co2_col).unwrap_or_default(), "CO2 value")?,
            ));
        }

        Ok(records)
    }
}

impl Default for EmissionReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_wide() {
        let data = "Country,1751,1752\nAfghanistan,0,\nWorld,9350000,9350000\n";
        let table = EmissionReader::new()
            .read_wide_from(csv::Reader::from_reader(data.as_bytes()))
            .unwrap();

        assert_eq!(table.years, vec![1751, 1752]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].values, vec![Some(0.0), None]);
        assert_eq!(table.rows[1].country, "World");
    }

    #[test]
    fn test_non_year_header_rejected() {
        let data = "Country,1751,Notes\nAfghanistan,0,x\n";
        let err = EmissionReader::new()
            .read_wide_from(csv::Reader::from_reader(data.as_bytes()))
            .unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidFormat(_)));
    }

    #[test]
    fn test_read_long() {
        let data = "Country,Year,CO2\nAfghanistan,1751,0.0\nAfghanistan,1752,\n";
        let records = EmissionReader::new()
            .read_long_from(csv::Reader::from_reader(data.as_bytes()))
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].co2, Some(0.0));
        assert_eq!(records[1].year, 1752);
        assert_eq!(records[1].co2, None);
    }
}
