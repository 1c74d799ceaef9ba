pub mod country_temperature;
pub mod emission;
pub mod grid;
pub mod observation;
pub mod station;
pub mod time_series;

pub use country_temperature::CountryTemperature;
pub use emission::EmissionRecord;
pub use grid::Grid;
pub use observation::DailyTemperature;
pub use station::Station;
pub use time_series::TimeSeriesRow;
