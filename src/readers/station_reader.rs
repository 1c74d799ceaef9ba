use crate::error::{ProcessingError, Result};
use crate::models::Station;
use crate::processors::StationDeduplicator;
use crate::utils::constants::{CITY_COLUMN, COUNTRY_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN};
use crate::utils::coordinates::HemisphereConvention;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Position of a named column in a CSV header
pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Missing column '{}'", name)))
}

/// Reads the city temperature CSV and keeps one station per coordinate pair.
///
/// Expected columns include `City`, `Country`, `Latitude` and `Longitude`,
/// with coordinates written as `"57.05N"` / `"10.33E"`.
pub struct StationReader {
    convention: HemisphereConvention,
}

impl StationReader {
    pub fn new() -> Self {
        Self {
            convention: HemisphereConvention::default(),
        }
    }

    pub fn with_convention(convention: HemisphereConvention) -> Self {
        Self { convention }
    }

    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        let reader = csv::Reader::from_path(path)?;
        let stations = self.read_stations_from(reader)?;
        info!(path = %path.display(), stations = stations.len(), "Loaded stations");
        Ok(stations)
    }

    pub fn read_stations_from<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<Station>> {
        let headers = reader.headers()?.clone();
        let lat_col = column_index(&headers, LATITUDE_COLUMN)?;
        let lon_col = column_index(&headers, LONGITUDE_COLUMN)?;
        let city_col = column_index(&headers, CITY_COLUMN)?;
        let country_col = column_index(&headers, COUNTRY_COLUMN)?;

        let mut dedup = StationDeduplicator::new(self.convention);
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let field = |col: usize| {
                record.get(col).ok_or_else(|| {
                    // +2: header line and 1-based numbering
                    ProcessingError::InvalidFormat(format!("Short record on line {}", line + 2))
                })
            };
            dedup.push(field(lat_col)?, field(lon_col)?, field(city_col)?, field(country_col)?)?;
        }

        Ok(dedup.into_stations())
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CITY_CSV: &str = "\
dt,AverageTemperature,AverageTemperatureUncertainty,City,Country,Latitude,Longitude
1743-11-01,6.068,1.7369999999999999,Århus,Denmark,57.05N,10.33E
1743-12-01,,,Århus,Denmark,57.05N,10.33E
1849-01-01,26.704,1.435,Abidjan,Côte D'Ivoire,5.63N,3.23W
1849-02-01,27.434,1.362,Abidjan,Côte D'Ivoire,5.63N,3.23W
1850-01-01,1.1,0.5,Aalborg,Denmark,57.05N,10.33E
";

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", CITY_CSV)?;

        let stations = StationReader::new().read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].city, "Århus");
        assert_eq!(stations[0].country, "Denmark");
        assert!((stations[0].latitude - 57.05).abs() < 1e-9);
        assert_eq!(stations[1].city, "Abidjan");
        assert!((stations[1].longitude - 3.23).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn test_signed_reader() -> Result<()> {
        let reader = csv::Reader::from_reader(CITY_CSV.as_bytes());
        let stations = StationReader::with_convention(HemisphereConvention::Signed)
            .read_stations_from(reader)?;
        assert!((stations[1].longitude + 3.23).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_missing_column() {
        let reader = csv::Reader::from_reader("City,Country,Latitude\nA,B,1N\n".as_bytes());
        let err = StationReader::new().read_stations_from(reader).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidFormat(_)));
    }
}
