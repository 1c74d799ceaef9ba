pub mod emission_reshaper;
pub mod grid_resampler;
pub mod series_filter;
pub mod station_dedup;

pub use emission_reshaper::melt_emissions;
pub use grid_resampler::{nearest_cell, nearest_index, GridResampler};
pub use series_filter::Series;
pub use station_dedup::{deduplicate_stations, StationDeduplicator};
