pub mod temperature_job;
pub mod weather_api;

pub use temperature_job::{resolve_api_key, run_fetch_job, FetchSummary, TemperatureJob};
pub use weather_api::{parse_history, DailyTemperatureSource, WeatherApiClient};
