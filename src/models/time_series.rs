use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Station;

/// One grid temperature value attributed to a station at one timestep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub date: NaiveDate,
    /// `NaN` when the grid cell holds a fill value at this timestep
    pub temperature: f32,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

impl TimeSeriesRow {
    pub fn for_station(station: &Station, date: NaiveDate, temperature: f32) -> Self {
        Self {
            date,
            temperature,
            latitude: station.latitude,
            longitude: station.longitude,
            city: station.city.clone(),
            country: station.country.clone(),
        }
    }

    pub fn has_temperature(&self) -> bool {
        !self.temperature.is_nan()
    }
}
