use crate::models::{CountryTemperature, EmissionRecord};
use chrono::{Datelike, NaiveDate};

/// A labelled sequence of (x, y) points ready for plotting
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Date as a fractional year so monthly and yearly series share an x axis
pub fn decimal_year(date: NaiveDate) -> f64 {
    let days_in_year = if date.leap_year() { 366.0 } else { 365.0 };
    date.year() as f64 + date.ordinal0() as f64 / days_in_year
}

/// Country temperature rows with `start <= date <= end`, in input order
pub fn filter_country_temperatures<'a>(
    rows: &'a [CountryTemperature],
    country: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a CountryTemperature> {
    rows.iter()
        .filter(|r| r.country == country && r.date >= start && r.date <= end)
        .collect()
}

/// CO2 rows with `start <= year <= end`, in input order
pub fn filter_emissions<'a>(
    rows: &'a [EmissionRecord],
    country: &str,
    start: i32,
    end: i32,
) -> Vec<&'a EmissionRecord> {
    rows.iter()
        .filter(|r| r.country == country && r.year >= start && r.year <= end)
        .collect()
}

/// Temperature series over a date window; months without a reading are skipped
pub fn temperature_series(
    rows: &[CountryTemperature],
    country: &str,
    start: NaiveDate,
    end: NaiveDate,
    label: &str,
) -> Series {
    let points = filter_country_temperatures(rows, country, start, end)
        .into_iter()
        .filter_map(|r| r.average_temperature.map(|t| (decimal_year(r.date), t)))
        .collect();
    Series::new(label, points)
}

pub fn emission_series(
    rows: &[EmissionRecord],
    country: &str,
    start: i32,
    end: i32,
    label: &str,
) -> Series {
    let points = filter_emissions(rows, country, start, end)
        .into_iter()
        .filter_map(|r| r.co2.map(|v| (r.year as f64, v)))
        .collect();
    Series::new(label, points)
}
