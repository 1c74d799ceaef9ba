use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily temperature triple for one city.
///
/// Each reading is `None` when the source did not provide it, which keeps
/// "no data" apart from a genuine 0 °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub day: NaiveDate,
    pub city: String,
    pub average: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl DailyTemperature {
    pub fn new(day: NaiveDate, city: impl Into<String>) -> Self {
        Self {
            day,
            city: city.into(),
            average: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn with_readings(
        mut self,
        average: Option<f64>,
        minimum: Option<f64>,
        maximum: Option<f64>,
    ) -> Self {
        self.average = average;
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.average.is_none() && self.minimum.is_none() && self.maximum.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.average.is_some() && self.minimum.is_some() && self.maximum.is_some()
    }

    /// Human readable triple, e.g. `"12.4, 8.1, missing"`
    pub fn readings_summary(&self) -> String {
        let fmt = |v: Option<f64>| v.map_or("missing".to_string(), |t| format!("{:.1}", t));
        format!(
            "{}, {}, {}",
            fmt(self.average),
            fmt(self.minimum),
            fmt(self.maximum)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_not_zero() {
        let day = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        let zero = DailyTemperature::new(day, "Oslo").with_readings(Some(0.0), Some(0.0), Some(0.0));
        let missing = DailyTemperature::new(day, "Oslo");

        assert!(zero.is_complete());
        assert!(!zero.is_empty());
        assert!(missing.is_empty());
        assert_ne!(zero, missing);
        assert_eq!(zero.readings_summary(), "0.0, 0.0, 0.0");
        assert_eq!(missing.readings_summary(), "missing, missing, missing");
    }
}
