/// Column order of resampled grid output
pub const TIME_SERIES_HEADER: [&str; 6] = [
    "date",
    "temperature",
    "latitude",
    "longitude",
    "city",
    "country",
];

/// Column order of the long CO2 table
pub const EMISSION_HEADER: [&str; 3] = ["Country", "Year", "CO2"];

/// Columns of the Berkeley Earth city temperature CSV
pub const CITY_COLUMN: &str = "City";
pub const COUNTRY_COLUMN: &str = "Country";
pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";
pub const DATE_COLUMN: &str = "dt";
pub const AVERAGE_TEMPERATURE_COLUMN: &str = "AverageTemperature";
pub const UNCERTAINTY_COLUMN: &str = "AverageTemperatureUncertainty";

/// Default netCDF variable names (Berkeley Earth gridded products)
pub const DEFAULT_LONGITUDE_VAR: &str = "longitude";
pub const DEFAULT_LATITUDE_VAR: &str = "latitude";
pub const DEFAULT_TIME_VAR: &str = "date_number";
pub const DEFAULT_TEMPERATURE_VAR: &str = "temperature";

/// Default grid sources of the batch resample and their outputs
pub const DEFAULT_GRID_SOURCES: [(&str, &str); 2] = [
    ("air.mon.mean.v501.nc", "output/Temperatures.csv"),
    (
        "Complete_TAVG_Daily_LatLong1_2010.nc",
        "output/TemperatureAnomalies.csv",
    ),
];

/// Weather API defaults
pub const DEFAULT_ENDPOINT_BASE: &str = "http://api.weatherapi.com/v1";
pub const DEFAULT_STORAGE_PATH: &str = "global_warming.sqlite";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const API_KEY_SETTING: &str = "api_key";

/// Plot defaults
pub const DEFAULT_PLOT_WIDTH: u32 = 1024;
pub const DEFAULT_PLOT_HEIGHT: u32 = 576;
pub const PLOT_MARGIN: f32 = 48.0;
pub const PLOT_GRID_LINES: usize = 5;

/// Default input locations
pub const DEFAULT_STATIONS_PATH: &str = "GlobalLandTemperatures/GlobalLandTemperaturesByCity.csv";
pub const DEFAULT_COUNTRY_TEMPERATURES_PATH: &str =
    "GlobalLandTemperatures/GlobalLandTemperaturesByCountry.csv";
pub const DEFAULT_WIDE_EMISSIONS_PATH: &str = "CO2/emission data.csv";
pub const DEFAULT_EMISSIONS_PATH: &str = "output/EmissionCO2.csv";
