use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which geographic axis a raw coordinate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn hemispheres(&self) -> (char, char) {
        match self {
            Axis::Latitude => ('N', 'S'),
            Axis::Longitude => ('E', 'W'),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// How the hemisphere letter of a coordinate such as `"45.2S"` is applied.
///
/// `Unsigned` strips the letter and keeps the magnitude, so southern latitudes
/// and western longitudes come out positive. This matches how the published
/// city dataset has historically been flattened. `Signed` negates S and W values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HemisphereConvention {
    #[default]
    Unsigned,
    Signed,
}

/// Parse a hemisphere-suffixed coordinate (e.g. `"57.05N"`, `"10.33E"`).
///
/// # Examples
/// ```
/// use climate_resampler::utils::coordinates::{parse_hemisphere_coordinate, Axis, HemisphereConvention};
///
/// let lat = parse_hemisphere_coordinate("45.2S", Axis::Latitude, HemisphereConvention::Signed).unwrap();
/// assert!((lat + 45.2).abs() < 1e-9);
/// ```
pub fn parse_hemisphere_coordinate(
    raw: &str,
    axis: Axis,
    convention: HemisphereConvention,
) -> Result<f64> {
    let trimmed = raw.trim();

    let suffix = trimmed.chars().last().ok_or_else(|| {
        ProcessingError::InvalidCoordinate(format!("Empty {} value", axis))
    })?;

    let (positive, negative) = axis.hemispheres();
    let hemisphere = suffix.to_ascii_uppercase();
    if hemisphere != positive && hemisphere != negative {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Invalid {} '{}': expected a trailing '{}' or '{}'",
            axis, raw, positive, negative
        )));
    }

    let number = &trimmed[..trimmed.len() - suffix.len_utf8()];
    let magnitude = number.trim().parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid {} value: '{}'", axis, raw))
    })?;

    if !magnitude.is_finite() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Non-finite {} value: '{}'",
            axis, raw
        )));
    }

    match convention {
        HemisphereConvention::Signed if hemisphere == negative => Ok(-magnitude),
        _ => Ok(magnitude),
    }
}
