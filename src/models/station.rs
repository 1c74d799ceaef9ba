use serde::{Deserialize, Serialize};
use validator::Validate;

/// A city weather station placed on the map by its (latitude, longitude) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Station {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(length(min = 1))]
    pub city: String,

    pub country: String,
}

impl Station {
    pub fn new(latitude: f64, longitude: f64, city: String, country: String) -> Self {
        Self {
            latitude,
            longitude,
            city,
            country,
        }
    }
}
