//! Daily job: fetch yesterday's temperatures for a list of cities and store them.
//!
//! A failure for one city never aborts the rest of the batch.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::FetchConfig;
use crate::error::{ProcessingError, Result};
use crate::fetch::weather_api::{DailyTemperatureSource, WeatherApiClient};
use crate::storage::TemperatureStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub stored: usize,
    pub failed: Vec<String>,
}

impl FetchSummary {
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("Stored {} readings", self.stored)
        } else {
            format!(
                "Stored {} readings, {} failed ({})",
                self.stored,
                self.failed.len(),
                self.failed.join(", ")
            )
        }
    }
}

pub struct TemperatureJob<'a, S: DailyTemperatureSource> {
    source: S,
    store: &'a TemperatureStore,
}

impl<'a, S: DailyTemperatureSource> TemperatureJob<'a, S> {
    pub fn new(source: S, store: &'a TemperatureStore) -> Self {
        Self { source, store }
    }

    fn fetch_and_store(&self, city: &str, day: NaiveDate) -> Result<()> {
        let reading = self.source.fetch_day(city, day)?;
        info!(
            city,
            day = %day,
            readings = %reading.readings_summary(),
            "Temperature, Minimum, Maximum"
        );
        if !reading.is_complete() {
            warn!(city, day = %day, "Response is missing some readings; storing NULL for them");
        }
        self.store.insert_temperature(&reading)
    }

    pub fn run<C: AsRef<str>>(&self, cities: &[C], day: NaiveDate) -> FetchSummary {
        let mut summary = FetchSummary::default();

        for city in cities {
            let city = city.as_ref();
            match self.fetch_and_store(city, day) {
                Ok(()) => summary.stored += 1,
                Err(e) => {
                    warn!(city, day = %day, error = %e, "Skipping city");
                    summary.failed.push(city.to_string());
                }
            }
        }

        summary
    }
}

/// Configured key, else the one kept in the store
pub fn resolve_api_key(config: &FetchConfig, store: &TemperatureStore) -> Result<String> {
    match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => Ok(key.to_string()),
        None => store
            .api_key()?
            .ok_or_else(|| ProcessingError::MissingData("weather API key".to_string())),
    }
}

/// Run the job end to end from configuration. Setup failures are logged and
/// every city is reported as failed; nothing is returned as an error.
pub fn run_fetch_job<C: AsRef<str>>(config: &FetchConfig, cities: &[C], day: NaiveDate) -> FetchSummary {
    let setup = TemperatureStore::open(&config.storage_path).and_then(|store| {
        let key = resolve_api_key(config, &store)?;
        let client = WeatherApiClient::new(config, key)?;
        Ok((store, client))
    });

    match setup {
        Ok((store, client)) => TemperatureJob::new(client, &store).run(cities, day),
        Err(e) => {
            warn!(error = %e, "Temperature job could not start");
            FetchSummary {
                stored: 0,
                failed: cities.iter().map(|c| c.as_ref().to_string()).collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyTemperature;
    use crate::utils::constants::API_KEY_SETTING;

    struct FakeSource;

    impl DailyTemperatureSource for FakeSource {
        fn fetch_day(&self, city: &str, day: NaiveDate) -> Result<DailyTemperature> {
            match city {
                "Offline" => Err(ProcessingError::InvalidFormat("connection refused".to_string())),
                "Partial" => Ok(DailyTemperature::new(day, city).with_readings(Some(3.0), None, None)),
                _ => Ok(DailyTemperature::new(day, city).with_readings(Some(10.0), Some(5.0), Some(15.0))),
            }
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()
    }

    #[test]
    fn test_failures_do_not_abort_batch() {
        let store = TemperatureStore::in_memory().unwrap();
        let job = TemperatureJob::new(FakeSource, &store);

        let summary = job.run(&["Skopje", "Offline", "Partial"], day());
        assert_eq!(summary.stored, 2);
        assert_eq!(summary.failed, vec!["Offline".to_string()]);
        assert!(summary.summary().contains("1 failed"));

        let partial = store.temperatures_for_city("Partial").unwrap();
        assert_eq!(partial[0].average, Some(3.0));
        assert_eq!(partial[0].maximum, None);
        assert!(store.temperatures_for_city("Offline").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_api_key() {
        let store = TemperatureStore::in_memory().unwrap();
        let mut config = FetchConfig::default();

        assert!(matches!(
            resolve_api_key(&config, &store),
            Err(ProcessingError::MissingData(_))
        ));

        store.set_setting(API_KEY_SETTING, "from-store").unwrap();
        assert_eq!(resolve_api_key(&config, &store).unwrap(), "from-store");

        config.api_key = Some("from-config".to_string());
        assert_eq!(resolve_api_key(&config, &store).unwrap(), "from-config");
    }

    #[test]
    fn test_missing_key_reports_all_failed() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = FetchConfig {
            storage_path: dir.path().join("store.sqlite"),
            ..FetchConfig::default()
        };

        let summary = run_fetch_job(&config, &["Oslo", "Bergen"], day());
        assert_eq!(summary.stored, 0);
        assert_eq!(summary.failed.len(), 2);
    }

    #[test]
    fn test_unreachable_endpoint_is_suppressed() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = FetchConfig {
            api_key: Some("SECRETKEY123".to_string()),
            endpoint_base: "http://127.0.0.1:1/v1".to_string(),
            storage_path: dir.path().join("store.sqlite"),
            timeout_secs: 5,
        };

        let summary = run_fetch_job(&config, &["Oslo"], day());
        assert_eq!(summary.stored, 0);
        assert_eq!(summary.failed, vec!["Oslo".to_string()]);
    }
}
