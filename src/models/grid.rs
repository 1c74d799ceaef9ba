use ndarray::{Array3, ArrayView1, Axis};

use crate::error::{ProcessingError, Result};

/// A gridded temperature field with its coordinate axes.
///
/// `temperature` is indexed `[time][latitude][longitude]` and `times` holds
/// fractional years. Fill values are stored as `NaN`.
#[derive(Debug, Clone)]
pub struct Grid {
    longitudes: Vec<f64>,
    latitudes: Vec<f64>,
    times: Vec<f64>,
    temperature: Array3<f32>,
}

impl Grid {
    pub fn new(
        longitudes: Vec<f64>,
        latitudes: Vec<f64>,
        times: Vec<f64>,
        temperature: Array3<f32>,
    ) -> Result<Self> {
        for (name, axis) in [
            ("longitude", &longitudes),
            ("latitude", &latitudes),
            ("time", &times),
        ] {
            if axis.is_empty() {
                return Err(ProcessingError::EmptyAxis(name.to_string()));
            }
        }

        let expected = (times.len(), latitudes.len(), longitudes.len());
        if temperature.dim() != expected {
            return Err(ProcessingError::ShapeMismatch {
                what: "temperature [time, lat, lon]".to_string(),
                expected: format!("{:?}", expected),
                actual: format!("{:?}", temperature.dim()),
            });
        }

        Ok(Self {
            longitudes,
            latitudes,
            times,
            temperature,
        })
    }

    /// Build a grid from a flat row-major buffer as read from a file
    pub fn from_flat(
        longitudes: Vec<f64>,
        latitudes: Vec<f64>,
        times: Vec<f64>,
        values: Vec<f32>,
    ) -> Result<Self> {
        let shape = (times.len(), latitudes.len(), longitudes.len());
        let len = values.len();
        let temperature =
            Array3::from_shape_vec(shape, values).map_err(|_| ProcessingError::ShapeMismatch {
                what: "temperature buffer".to_string(),
                expected: format!("{} values for {:?}", shape.0 * shape.1 * shape.2, shape),
                actual: format!("{} values", len),
            })?;
        Self::new(longitudes, latitudes, times, temperature)
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn temperature(&self) -> &Array3<f32> {
        &self.temperature
    }

    pub fn timesteps(&self) -> usize {
        self.times.len()
    }

    /// Temperature series of one cell across the time dimension
    pub fn cell_series(&self, lat_index: usize, lon_index: usize) -> Result<ArrayView1<'_, f32>> {
        let (_, n_lat, n_lon) = self.temperature.dim();
        if lat_index >= n_lat || lon_index >= n_lon {
            return Err(ProcessingError::ShapeMismatch {
                what: "grid cell index".to_string(),
                expected: format!("< ({}, {})", n_lat, n_lon),
                actual: format!("({}, {})", lat_index, lon_index),
            });
        }

        Ok(self
            .temperature
            .index_axis(Axis(2), lon_index)
            .index_axis_move(Axis(1), lat_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_shape_must_match_axes() {
        let temperature = Array3::<f32>::zeros((3, 2, 2));
        let err = Grid::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![2000.0, 2000.5], temperature)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_empty_axis_rejected() {
        let temperature = Array3::<f32>::zeros((0, 2, 2));
        let err = Grid::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![], temperature).unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyAxis(ref axis) if axis == "time"));
    }

    #[test]
    fn test_cell_series_follows_time_order() {
        let values: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let grid = Grid::from_flat(
            vec![10.0, 20.0],
            vec![50.0, 60.0],
            vec![2000.0, 2000.5],
            values,
        )
        .unwrap();

        let series = grid.cell_series(1, 0).unwrap();
        assert_eq!(series.to_vec(), vec![2.0, 6.0]);
        assert!(grid.cell_series(2, 0).is_err());
    }

    #[test]
    fn test_flat_buffer_length_checked() {
        let err = Grid::from_flat(vec![0.0], vec![0.0], vec![2000.0, 2001.0], vec![1.0])
            .unwrap_err();
        assert!(matches!(err, ProcessingError::ShapeMismatch { .. }));
    }
}
