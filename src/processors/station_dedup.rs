use crate::error::{ProcessingError, Result};
use crate::models::Station;
use crate::utils::coordinates::{parse_hemisphere_coordinate, Axis, HemisphereConvention};
use std::collections::HashSet;
use tracing::debug;
use validator::Validate;

/// Collapses repeated city rows into one station per coordinate pair.
///
/// Rows are keyed on the parsed coordinates, so `"57.05N"`, `"57.05n"` and
/// `"57.050N"` name the same station. Under the unsigned convention `"57.05N"`
/// and `"57.05S"` also collapse, because both become latitude 57.05.
pub struct StationDeduplicator {
    convention: HemisphereConvention,
    seen: HashSet<(u64, u64)>,
    stations: Vec<Station>,
}

/// Bit pattern of a coordinate with `-0.0` folded into `0.0`
fn coordinate_key(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

impl StationDeduplicator {
    pub fn new(convention: HemisphereConvention) -> Self {
        Self {
            convention,
            seen: HashSet::new(),
            stations: Vec::new(),
        }
    }

    /// Add one raw row. Returns `true` when it introduced a new station.
    ///
    /// The first city/country seen for a coordinate pair is kept.
    pub fn push(&mut self, latitude: &str, longitude: &str, city: &str, country: &str) -> Result<bool> {
        let lat = parse_hemisphere_coordinate(latitude, Axis::Latitude, self.convention)?;
        let lon = parse_hemisphere_coordinate(longitude, Axis::Longitude, self.convention)?;

        let key = (coordinate_key(lat), coordinate_key(lon));
        if self.seen.contains(&key) {
            return Ok(false);
        }

        let station = Station::new(lat, lon, city.trim().to_string(), country.trim().to_string());
        station.validate()?;

        debug!(city, country, lat, lon, "New station");
        self.seen.insert(key);
        self.stations.push(station);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn into_stations(self) -> Vec<Station> {
        self.stations
    }
}

/// Distinct stations from parallel raw columns, in first-seen order
pub fn deduplicate_stations<S: AsRef<str>>(
    latitudes: &[S],
    longitudes: &[S],
    cities: &[S],
    countries: &[S],
    convention: HemisphereConvention,
) -> Result<Vec<Station>> {
    let n = latitudes.len();
    if longitudes.len() != n || cities.len() != n || countries.len() != n {
        return Err(ProcessingError::LengthMismatch(format!(
            "station columns differ in length: latitude={}, longitude={}, city={}, country={}",
            n,
            longitudes.len(),
            cities.len(),
            countries.len()
        )));
    }

    let mut dedup = StationDeduplicator::new(convention);
    for i in 0..n {
        dedup.push(
            latitudes[i].as_ref(),
            longitudes[i].as_ref(),
            cities[i].as_ref(),
            countries[i].as_ref(),
        )?;
    }

    Ok(dedup.into_stations())
}
