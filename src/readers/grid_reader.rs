use crate::config::GridVariables;
use crate::error::{ProcessingError, Result};
use crate::models::Grid;
use crate::utils::dates::{fractional_year_to_date, CfTimeUnits};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
#[cfg(feature = "netcdf")]
use tracing::{debug, info};

const LONGITUDE_NAMES: [&str; 2] = ["longitude", "lon"];
const LATITUDE_NAMES: [&str; 2] = ["latitude", "lat"];
const TIME_NAMES: [&str; 2] = ["date_number", "time"];
const TEMPERATURE_NAMES: [&str; 2] = ["temperature", "air"];

/// Loads a gridded temperature dataset from a netCDF4 file.
///
/// The temperature variable must be laid out `[time, latitude, longitude]`.
/// Values equal to `_FillValue` or `missing_value` are replaced with `NaN`.
/// A time axis with CF units (`"hours since ..."`) is converted to
/// fractional years; any other time axis is taken as fractional years already.
pub struct GridReader {
    variables: GridVariables,
}

/// One dimension of a netCDF file
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionInfo {
    pub name: String,
    pub len: usize,
}

/// One variable of a netCDF file
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub name: String,
    pub dimensions: Vec<String>,
    pub units: Option<String>,
}

/// What a grid file contains, for picking the `[grid]` variable names
#[derive(Debug, Clone, PartialEq)]
pub struct GridDescription {
    pub path: PathBuf,
    pub dimensions: Vec<DimensionInfo>,
    pub variables: Vec<VariableInfo>,
    pub time_variable: Option<String>,
    pub time_units: Option<String>,
    pub time_range: Option<(NaiveDate, NaiveDate)>,
}

impl GridDescription {
    pub fn detailed_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str(&format!("=== Grid: {} ===\n", self.path.display()));

        summary.push_str("Dimensions:\n");
        for dim in &self.dimensions {
            summary.push_str(&format!("  {} = {}\n", dim.name, dim.len));
        }

        summary.push_str("Variables:\n");
        for var in &self.variables {
            summary.push_str(&format!("  {}({})", var.name, var.dimensions.join(", ")));
            if let Some(units) = &var.units {
                summary.push_str(&format!(" [{}]", units));
            }
            summary.push('\n');
        }

        match &self.time_variable {
            Some(name) => {
                summary.push_str(&format!(
                    "Time: '{}' in {}\n",
                    name,
                    self.time_units.as_deref().unwrap_or("fractional years")
                ));
                if let Some((first, last)) = self.time_range {
                    summary.push_str(&format!("  {} to {}\n", first, last));
                }
            }
            None => summary.push_str("Time: no time variable found\n"),
        }

        summary
    }
}

impl GridReader {
    pub fn new(variables: GridVariables) -> Self {
        Self { variables }
    }

    #[cfg(feature = "netcdf")]
    pub fn read_grid(&self, path: &Path) -> Result<Grid> {
        let file = netcdf::open(path)?;

        let longitudes = read_values(&file, &self.variables.longitude, &LONGITUDE_NAMES)?;
        let latitudes = read_values(&file, &self.variables.latitude, &LATITUDE_NAMES)?;
        let (_, times) = self.read_time_axis(&file)?;

        let var = find_variable(&file, &self.variables.temperature, &TEMPERATURE_NAMES)
            .ok_or_else(|| ProcessingError::MissingData(format!(
                "variable '{}' in {}",
                self.variables.temperature,
                path.display()
            )))?;

        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let expected = vec![times.len(), latitudes.len(), longitudes.len()];
        if dims != expected {
            return Err(ProcessingError::ShapeMismatch {
                what: format!("variable '{}'", var.name()),
                expected: format!("{:?} [time, lat, lon]", expected),
                actual: format!("{:?}", dims),
            });
        }

        let fill_values: Vec<f32> = ["_FillValue", "missing_value"]
            .iter()
            .filter_map(|name| var.attribute_value(name).and_then(|r| r.ok()))
            .filter_map(|v| match v {
                netcdf::AttributeValue::Float(f) => Some(f),
                netcdf::AttributeValue::Double(d) => Some(d as f32),
                netcdf::AttributeValue::Short(s) => Some(s as f32),
                _ => None,
            })
            .collect();

        let mut values: Vec<f32> = var.get_values(..)?;
        mask_fill_values(&mut values, &fill_values);

        info!(
            path = %path.display(),
            variable = %var.name(),
            times = times.len(),
            latitudes = latitudes.len(),
            longitudes = longitudes.len(),
            "Loaded grid"
        );

        Grid::from_flat(longitudes, latitudes, times, values)
    }

    #[cfg(not(feature = "netcdf"))]
    pub fn read_grid(&self, path: &Path) -> Result<Grid> {
        Err(feature_missing(path))
    }

    /// List dimensions, variables and the decoded time axis of a grid file
    #[cfg(feature = "netcdf")]
    pub fn inspect_grid(&self, path: &Path) -> Result<GridDescription> {
        let file = netcdf::open(path)?;

        let dimensions = file
            .dimensions()
            .map(|d| DimensionInfo {
                name: d.name(),
                len: d.len(),
            })
            .collect();

        let variables = file
            .variables()
            .map(|v| VariableInfo {
                name: v.name(),
                dimensions: v.dimensions().iter().map(|d| d.name()).collect(),
                units: text_attribute(&v, "units"),
            })
            .collect();

        let mut description = GridDescription {
            path: path.to_path_buf(),
            dimensions,
            variables,
            time_variable: None,
            time_units: None,
            time_range: None,
        };

        if let Some(var) = find_variable(&file, &self.variables.time, &TIME_NAMES) {
            description.time_variable = Some(var.name());
            description.time_units = text_attribute(&var, "units");
            match self.read_time_axis(&file) {
                Ok((_, times)) => description.time_range = time_range(&times)?,
                Err(e) => debug!(error = %e, "Time axis could not be decoded"),
            }
        }

        Ok(description)
    }

    #[cfg(not(feature = "netcdf"))]
    pub fn inspect_grid(&self, path: &Path) -> Result<GridDescription> {
        Err(feature_missing(path))
    }

    /// Time variable name and its values as fractional years
    #[cfg(feature = "netcdf")]
    fn read_time_axis(&self, file: &netcdf::File) -> Result<(String, Vec<f64>)> {
        let var = find_variable(file, &self.variables.time, &TIME_NAMES).ok_or_else(|| {
            ProcessingError::MissingData(format!("coordinate variable '{}'", self.variables.time))
        })?;
        let raw: Vec<f64> = var.get_values(..)?;
        let units = text_attribute(&var, "units");
        Ok((var.name(), decode_time_axis(&raw, units.as_deref())?))
    }
}

impl Default for GridReader {
    fn default() -> Self {
        Self::new(GridVariables::default())
    }
}

#[cfg(not(feature = "netcdf"))]
fn feature_missing(path: &Path) -> ProcessingError {
    ProcessingError::Config(format!(
        "cannot read {}: built without the `netcdf` feature",
        path.display()
    ))
}

/// The configured variable, else the first known alternative present
#[cfg(feature = "netcdf")]
fn find_variable<'f>(
    file: &'f netcdf::File,
    configured: &str,
    fallbacks: &[&str],
) -> Option<netcdf::Variable<'f>> {
    std::iter::once(configured)
        .chain(fallbacks.iter().copied())
        .find_map(|name| file.variable(name))
}

#[cfg(feature = "netcdf")]
fn read_values(file: &netcdf::File, configured: &str, fallbacks: &[&str]) -> Result<Vec<f64>> {
    let var = find_variable(file, configured, fallbacks).ok_or_else(|| {
        ProcessingError::MissingData(format!("coordinate variable '{}'", configured))
    })?;
    Ok(var.get_values::<f64, _>(..)?)
}

#[cfg(feature = "netcdf")]
fn text_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name).and_then(|r| r.ok())? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Time axis as fractional years. CF units (`"<unit> since <date>"`) are
/// converted; anything else (e.g. `"year A.D."`) is passed through.
#[cfg_attr(not(feature = "netcdf"), allow(dead_code))]
pub(crate) fn decode_time_axis(raw: &[f64], units: Option<&str>) -> Result<Vec<f64>> {
    match units.filter(|u| u.to_ascii_lowercase().contains(" since ")) {
        Some(units) => {
            let cf = CfTimeUnits::parse(units)?;
            raw.iter().map(|&v| cf.to_fractional_year(v)).collect()
        }
        None => Ok(raw.to_vec()),
    }
}

/// First and last calendar date of a decoded time axis
#[cfg_attr(not(feature = "netcdf"), allow(dead_code))]
pub(crate) fn time_range(times: &[f64]) -> Result<Option<(NaiveDate, NaiveDate)>> {
    match (times.first(), times.last()) {
        (Some(&first), Some(&last)) => Ok(Some((
            fractional_year_to_date(first)?,
            fractional_year_to_date(last)?,
        ))),
        _ => Ok(None),
    }
}

/// Replace fill values (and anything non-finite) with `NaN`
pub(crate) fn mask_fill_values(values: &mut [f32], fill_values: &[f32]) {
    for value in values.iter_mut() {
        if !value.is_finite() || fill_values.iter().any(|f| f == value) {
            *value = f32::NAN;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_fill_values() {
        let mut values = vec![1.5, 9.96921e36, -99.0, f32::INFINITY, 0.0];
        mask_fill_values(&mut values, &[9.96921e36, -99.0]);

        assert_eq!(values[0], 1.5);
        assert!(values[1].is_nan());
        assert!(values[2].is_nan());
        assert!(values[3].is_nan());
        assert_eq!(values[4], 0.0);
    }

    #[test]
    fn test_decode_cf_time_axis() {
        // Monthly means stamped at the first of each month, 1900
        let raw = [876_576.0, 877_320.0];
        let times = decode_time_axis(&raw, Some("hours since 1800-1-1 00:00:0.0")).unwrap();
        let (first, last) = time_range(&times).unwrap().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(1900, 2, 1).unwrap());
    }

    #[test]
    fn test_fractional_year_axis_passes_through() {
        let raw = [1750.041667, 1750.125];
        assert_eq!(decode_time_axis(&raw, Some("year A.D.")).unwrap(), raw.to_vec());
        assert_eq!(decode_time_axis(&raw, None).unwrap(), raw.to_vec());
        assert!(time_range(&[]).unwrap().is_none());
    }

    #[test]
    fn test_description_summary() {
        let description = GridDescription {
            path: PathBuf::from("air.mon.mean.v501.nc"),
            dimensions: vec![DimensionInfo {
                name: "time".to_string(),
                len: 1416,
            }],
            variables: vec![VariableInfo {
                name: "air".to_string(),
                dimensions: vec!["time".to_string(), "lat".to_string(), "lon".to_string()],
                units: Some("degC".to_string()),
            }],
            time_variable: Some("time".to_string()),
            time_units: Some("hours since 1800-1-1 00:00:0.0".to_string()),
            time_range: None,
        };

        let summary = description.detailed_summary();
        assert!(summary.contains("time = 1416"));
        assert!(summary.contains("air(time, lat, lon) [degC]"));
        assert!(summary.contains("Time: 'time' in hours since 1800-1-1 00:00:0.0"));
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_reading_requires_feature() {
        let reader = GridReader::default();
        let path = Path::new("air.mon.mean.v501.nc");
        assert!(matches!(reader.read_grid(path), Err(ProcessingError::Config(_))));
        assert!(matches!(reader.inspect_grid(path), Err(ProcessingError::Config(_))));
    }
}
