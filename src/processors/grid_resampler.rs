use crate::error::{ProcessingError, Result};
use crate::models::{Grid, Station, TimeSeriesRow};
use crate::utils::dates::fractional_year_to_date;
use crate::utils::progress::ProgressReporter;
use chrono::NaiveDate;
use tracing::{debug, info};

/// Index of the axis value closest to `value`.
///
/// Ties resolve to the first index; `NaN` axis entries never win.
pub fn nearest_index(axis: &[f64], value: f64, axis_name: &str) -> Result<usize> {
    if !value.is_finite() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Cannot match non-finite {} {} to the grid",
            axis_name, value
        )));
    }

    let mut best: Option<(usize, f64)> = None;

    for (i, &v) in axis.iter().enumerate() {
        let distance = (v - value).abs();
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }

    best.map(|(i, _)| i)
        .ok_or_else(|| ProcessingError::EmptyAxis(axis_name.to_string()))
}

/// Grid cell `(lat_index, lon_index)` for a station.
///
/// Latitude and longitude are matched independently, which is the nearest
/// cell on a regular rectangular grid but not the geodesic nearest point.
pub fn nearest_cell(grid: &Grid, station: &Station) -> Result<(usize, usize)> {
    let lat_index = nearest_index(grid.latitudes(), station.latitude, "latitude")?;
    let lon_index = nearest_index(grid.longitudes(), station.longitude, "longitude")?;
    Ok((lat_index, lon_index))
}

/// Calendar dates for every timestep of the grid
pub fn grid_dates(grid: &Grid) -> Result<Vec<NaiveDate>> {
    grid.times()
        .iter()
        .map(|&t| fractional_year_to_date(t))
        .collect()
}

/// Pair each date with its temperature and stamp the station metadata on every row
pub fn replicate_station(
    station: &Station,
    dates: &[NaiveDate],
    temperatures: impl ExactSizeIterator<Item = f32>,
) -> Result<Vec<TimeSeriesRow>> {
    if temperatures.len() != dates.len() {
        return Err(ProcessingError::ShapeMismatch {
            what: format!("time series for {} ({})", station.city, station.country),
            expected: format!("{} timesteps", dates.len()),
            actual: format!("{} temperatures", temperatures.len()),
        });
    }

    Ok(dates
        .iter()
        .zip(temperatures)
        .map(|(&date, temperature)| TimeSeriesRow::for_station(station, date, temperature))
        .collect())
}

/// Builds the per-station, per-timestep temperature table from a grid
pub struct GridResampler {
    show_progress: bool,
}

impl GridResampler {
    pub fn new() -> Self {
        Self {
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Extract the full series of one station's nearest cell
    pub fn extract_station_series(
        &self,
        grid: &Grid,
        station: &Station,
        dates: &[NaiveDate],
    ) -> Result<Vec<TimeSeriesRow>> {
        let (lat_index, lon_index) = nearest_cell(grid, station)?;
        let series = grid.cell_series(lat_index, lon_index)?;

        debug!(
            city = %station.city,
            country = %station.country,
            lat_index,
            lon_index,
            "Resolved grid cell"
        );

        replicate_station(station, dates, series.iter().copied())
    }

    /// Resample the grid onto every station; rows = stations x timesteps
    pub fn resample(&self, grid: &Grid, stations: &[Station]) -> Result<Vec<TimeSeriesRow>> {
        let dates = grid_dates(grid)?;
        if dates.len() != grid.temperature().dim().0 {
            return Err(ProcessingError::ShapeMismatch {
                what: "time axis".to_string(),
                expected: format!("{} timesteps", grid.temperature().dim().0),
                actual: format!("{} dates", dates.len()),
            });
        }

        let expected_rows = stations.len() * dates.len();
        info!(
            stations = stations.len(),
            timesteps = dates.len(),
            rows = expected_rows,
            "Resampling grid onto stations"
        );

        let progress = ProgressReporter::new(
            stations.len() as u64,
            "Resampling stations...",
            !self.show_progress,
        );

        let mut rows = Vec::with_capacity(expected_rows);
        for station in stations {
            rows.extend(self.extract_station_series(grid, station, &dates)?);
            progress.increment(1);
        }

        progress.finish_with_message(&format!("Resampled {} rows", rows.len()));
        Ok(rows)
    }
}

impl Default for GridResampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two_grid() -> Grid {
        // temperature[t][lat][lon] = 100 * t + 10 * lat + lon
        let values = (0..2)
            .flat_map(|t| {
                (0..2).flat_map(move |lat| (0..2).map(move |lon| (100 * t + 10 * lat + lon) as f32))
            })
            .collect();
        Grid::from_flat(vec![5.0, 15.0], vec![40.0, 50.0], vec![1950.0, 1950.5], values).unwrap()
    }

    fn station(lat: f64, lon: f64, city: &str) -> Station {
        Station::new(lat, lon, city.to_string(), "Testland".to_string())
    }

    #[test]
    fn test_nearest_index_clamps_to_axis_ends() {
        let axis = [-10.0, -5.0, 0.0, 7.5, 20.0];
        assert_eq!(nearest_index(&axis, -10.0, "lat").unwrap(), 0);
        assert_eq!(nearest_index(&axis, -99.0, "lat").unwrap(), 0);
        assert_eq!(nearest_index(&axis, 20.0, "lat").unwrap(), 4);
        assert_eq!(nearest_index(&axis, 500.0, "lat").unwrap(), 4);
        assert_eq!(nearest_index(&axis, 6.0, "lat").unwrap(), 3);
    }

    #[test]
    fn test_nearest_index_ties_pick_first() {
        assert_eq!(nearest_index(&[0.0, 2.0], 1.0, "lon").unwrap(), 0);
        // Descending axes are handled the same way
        assert_eq!(nearest_index(&[2.0, 0.0], 1.0, "lon").unwrap(), 0);
    }

    #[test]
    fn test_nearest_index_skips_nan_and_rejects_empty() {
        assert_eq!(nearest_index(&[f64::NAN, 3.0], 0.0, "lat").unwrap(), 1);
        assert!(matches!(
            nearest_index(&[], 0.0, "lat"),
            Err(ProcessingError::EmptyAxis(_))
        ));
    }

    #[test]
    fn test_non_finite_station_coordinate_rejected() {
        let axis = [-10.0, 0.0, 10.0];
        assert!(matches!(
            nearest_index(&axis, f64::NAN, "latitude"),
            Err(ProcessingError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            nearest_index(&axis, f64::INFINITY, "longitude"),
            Err(ProcessingError::InvalidCoordinate(_))
        ));

        let grid = two_by_two_grid();
        let err = GridResampler::new()
            .resample(&grid, &[station(f64::NAN, 5.0, "Lost")])
            .unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidCoordinate(_)));
    }

    #[test]
    fn test_station_on_exact_cell() {
        let grid = two_by_two_grid();
        let resampler = GridResampler::new();
        let rows = resampler
            .resample(&grid, &[station(50.0, 15.0, "Exact")])
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].temperature, grid.temperature()[[0, 1, 1]]);
        assert_eq!(rows[1].temperature, grid.temperature()[[1, 1, 1]]);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(1950, 1, 1).unwrap());
        assert!(rows[0].date < rows[1].date);
        for row in &rows {
            assert_eq!(row.latitude, 50.0);
            assert_eq!(row.longitude, 15.0);
            assert_eq!(row.city, "Exact");
            assert_eq!(row.country, "Testland");
        }
    }

    #[test]
    fn test_row_count_is_stations_times_timesteps() {
        let grid = two_by_two_grid();
        let stations = vec![
            station(41.0, 6.0, "A"),
            station(49.0, 14.0, "B"),
            station(44.0, 11.0, "C"),
        ];
        let rows = GridResampler::new().resample(&grid, &stations).unwrap();
        assert_eq!(rows.len(), stations.len() * grid.timesteps());

        // Station blocks keep input order
        assert_eq!(rows[0].city, "A");
        assert_eq!(rows[2].city, "B");
        assert_eq!(rows[2].temperature, 11.0);
        assert_eq!(rows[4].city, "C");
    }

    #[test]
    fn test_replicate_rejects_length_mismatch() {
        let dates = vec![NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()];
        let err = replicate_station(&station(0.0, 0.0, "X"), &dates, vec![1.0f32, 2.0].into_iter())
            .unwrap_err();
        assert!(matches!(err, ProcessingError::ShapeMismatch { .. }));
    }
}
