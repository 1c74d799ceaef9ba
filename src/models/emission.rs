use serde::{Deserialize, Serialize};

/// Yearly CO2 emission for one country (long format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub country: String,
    pub year: i32,
    pub co2: Option<f64>,
}

impl EmissionRecord {
    pub fn new(country: String, year: i32, co2: Option<f64>) -> Self {
        Self { country, year, co2 }
    }
}
