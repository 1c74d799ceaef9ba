//! Persistence for fetched daily temperatures.

pub mod sqlite_store;

pub use sqlite_store::TemperatureStore;
