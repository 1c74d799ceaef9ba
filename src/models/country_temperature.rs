use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Monthly land temperature of a whole country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTemperature {
    pub date: NaiveDate,
    pub average_temperature: Option<f64>,
    pub uncertainty: Option<f64>,
    pub country: String,
}
