pub mod country_reader;
pub mod emission_reader;
pub mod grid_reader;
pub mod station_reader;

pub use country_reader::CountryTemperatureReader;
pub use emission_reader::{EmissionReader, WideEmissionRow, WideEmissionTable};
pub use grid_reader::{GridDescription, GridReader};
pub use station_reader::StationReader;
