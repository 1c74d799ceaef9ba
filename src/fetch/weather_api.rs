//! Client for the weatherapi.com history endpoint.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::{ProcessingError, Result};
use crate::models::DailyTemperature;

/// Anything that can produce one day's temperature triple for a city
pub trait DailyTemperatureSource {
    fn fetch_day(&self, city: &str, day: NaiveDate) -> Result<DailyTemperature>;
}

pub struct WeatherApiClient {
    client: Client,
    endpoint_base: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(config: &FetchConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint_base: config.endpoint_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn history_url(&self) -> String {
        format!("{}/history.json", self.endpoint_base)
    }
}

impl DailyTemperatureSource for WeatherApiClient {
    fn fetch_day(&self, city: &str, day: NaiveDate) -> Result<DailyTemperature> {
        let dt = day.format("%Y-%m-%d").to_string();
        debug!(city, day = %dt, "Requesting history");

        // The request URL carries the key, so it is stripped from any error
        let body = self
            .client
            .get(self.history_url())
            .header("Accept", "application/json")
            .query(&[("key", self.api_key.as_str()), ("q", city), ("dt", dt.as_str())])
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| e.without_url())?;

        parse_history_str(city, day, &body)
    }
}

/// Pull `avgtemp_c`, `mintemp_c` and `maxtemp_c` out of
/// `forecast.forecastday[0].day`. Anything absent or non-numeric is `None`.
pub fn parse_history(city: &str, day: NaiveDate, body: &Value) -> DailyTemperature {
    let summary = body.pointer("/forecast/forecastday/0/day");
    let reading = |key: &str| summary.and_then(|d| d.get(key)).and_then(Value::as_f64);

    DailyTemperature::new(day, city).with_readings(
        reading("avgtemp_c"),
        reading("mintemp_c"),
        reading("maxtemp_c"),
    )
}

/// Decode a raw response body; malformed JSON is an error, a wrong shape is not
pub fn parse_history_str(city: &str, day: NaiveDate, body: &str) -> Result<DailyTemperature> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(ProcessingError::InvalidFormat(
            "history response is not a JSON object".to_string(),
        ));
    }
    Ok(parse_history(city, day, &value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()
    }

    #[test]
    fn test_parse_full_response() {
        let body = json!({
            "location": {"name": "Skopje"},
            "forecast": {"forecastday": [{
                "date": "2021-03-14",
                "day": {"maxtemp_c": 14.2, "mintemp_c": 1.3, "avgtemp_c": 7.6}
            }]}
        });

        let reading = parse_history("Skopje", day(), &body);
        assert_eq!(reading.average, Some(7.6));
        assert_eq!(reading.minimum, Some(1.3));
        assert_eq!(reading.maximum, Some(14.2));
        assert_eq!(reading.city, "Skopje");
    }

    #[test]
    fn test_missing_fields_are_none_not_zero() {
        let body = json!({
            "forecast": {"forecastday": [{"day": {"avgtemp_c": 0.0, "mintemp_c": -2.5}}]}
        });
        let reading = parse_history("Oslo", day(), &body);
        assert_eq!(reading.average, Some(0.0));
        assert_eq!(reading.minimum, Some(-2.5));
        assert_eq!(reading.maximum, None);

        let empty = parse_history("Oslo", day(), &json!({"forecast": {"forecastday": []}}));
        assert!(empty.is_empty());

        let error_body = json!({"error": {"code": 1006, "message": "No matching location found."}});
        assert!(parse_history("Atlantis", day(), &error_body).is_empty());
    }

    #[test]
    fn test_parse_history_str() {
        assert!(parse_history_str("Oslo", day(), "not json").is_err());
        assert!(parse_history_str("Oslo", day(), "[1, 2]").is_err());
        let reading = parse_history_str("Oslo", day(), "{}").unwrap();
        assert!(reading.is_empty());
    }

    #[test]
    fn test_request_failure_hides_api_key() {
        let config = FetchConfig {
            endpoint_base: "http://127.0.0.1:1/v1".to_string(),
            timeout_secs: 5,
            ..FetchConfig::default()
        };
        let client = WeatherApiClient::new(&config, "SECRETKEY123".to_string()).unwrap();

        let err = client.fetch_day("Oslo", day()).unwrap_err();
        assert!(matches!(err, ProcessingError::Http(_)));
        assert!(!err.to_string().contains("SECRETKEY123"));
        assert!(!format!("{:?}", err).contains("SECRETKEY123"));
    }

    #[test]
    fn test_history_url_trims_slash() {
        let config = FetchConfig {
            endpoint_base: "http://localhost:8080/v1/".to_string(),
            ..FetchConfig::default()
        };
        let client = WeatherApiClient::new(&config, "key".to_string()).unwrap();
        assert_eq!(client.history_url(), "http://localhost:8080/v1/history.json");
    }
}
