use crate::error::{ProcessingError, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

fn start_of_year(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Convert a fractional year (e.g. `1950.5`) into a calendar date.
///
/// The integer part selects January 1st of the base year; the remainder is
/// scaled by the exact number of seconds in that year, so leap years shift
/// the result. Only the date part of the resulting timestamp is kept.
///
/// # Examples
/// ```
/// use climate_resampler::utils::dates::fractional_year_to_date;
///
/// let date = fractional_year_to_date(2001.0).unwrap();
/// assert_eq!(date.to_string(), "2001-01-01");
/// ```
pub fn fractional_year_to_date(value: f64) -> Result<NaiveDate> {
    if !value.is_finite() {
        return Err(ProcessingError::InvalidTime(format!(
            "Non-finite fractional year: {}",
            value
        )));
    }

    let whole = value.trunc();
    if whole < i32::MIN as f64 || whole >= i32::MAX as f64 {
        return Err(ProcessingError::InvalidTime(format!(
            "Year out of range: {}",
            value
        )));
    }
    let year = whole as i32;
    let remainder = value - whole;

    let (base, next) = match (start_of_year(year), start_of_year(year + 1)) {
        (Some(base), Some(next)) => (base, next),
        _ => {
            return Err(ProcessingError::InvalidTime(format!(
                "Year {} is outside the supported calendar range",
                year
            )))
        }
    };

    let seconds_in_year = (next - base).num_seconds() as f64;
    let offset_micros = (seconds_in_year * remainder * 1_000_000.0).round() as i64;

    base.checked_add_signed(Duration::microseconds(offset_micros))
        .map(|dt| dt.date())
        .ok_or_else(|| {
            ProcessingError::InvalidTime(format!("Offset overflows calendar for {}", value))
        })
}

/// Number of whole seconds between January 1st of `year` and January 1st of the next year
pub fn seconds_in_year(year: i32) -> Option<i64> {
    let base = start_of_year(year)?;
    let next = start_of_year(year + 1)?;
    Some((next - base).num_seconds())
}

/// CF time units of the form `"<unit> since <reference>"`,
/// e.g. `"hours since 1800-1-1 00:00:0.0"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfTimeUnits {
    pub seconds_per_unit: f64,
    pub epoch: NaiveDateTime,
}

impl CfTimeUnits {
    pub fn parse(units: &str) -> Result<Self> {
        let lower = units.trim().to_ascii_lowercase();
        let (unit, reference) = lower.split_once(" since ").ok_or_else(|| {
            ProcessingError::InvalidTime(format!(
                "Time units '{}' are not of the form '<unit> since <date>'",
                units
            ))
        })?;

        let seconds_per_unit = match unit.trim() {
            "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
            "minutes" | "minute" | "mins" | "min" => 60.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600.0,
            "days" | "day" | "d" => 86_400.0,
            other => {
                return Err(ProcessingError::InvalidTime(format!(
                    "Unsupported time unit '{}' in '{}'",
                    other, units
                )))
            }
        };

        let epoch = parse_reference_time(reference).ok_or_else(|| {
            ProcessingError::InvalidTime(format!("Invalid reference time in '{}'", units))
        })?;

        Ok(Self {
            seconds_per_unit,
            epoch,
        })
    }

    /// Offset from the epoch as a fractional year, the inverse of
    /// [`fractional_year_to_date`] up to the time of day
    pub fn to_fractional_year(&self, value: f64) -> Result<f64> {
        let micros = (value * self.seconds_per_unit * 1_000_000.0).round();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return Err(ProcessingError::InvalidTime(format!(
                "Time offset out of range: {}",
                value
            )));
        }

        let out_of_range =
            || ProcessingError::InvalidTime(format!("Time offset out of range: {}", value));
        let instant = self
            .epoch
            .checked_add_signed(Duration::microseconds(micros as i64))
            .ok_or_else(out_of_range)?;

        let year = instant.year();
        let start = start_of_year(year).ok_or_else(out_of_range)?;
        let length = seconds_in_year(year).ok_or_else(out_of_range)?;
        let elapsed = (instant - start).num_microseconds().ok_or_else(out_of_range)?;

        let mut fractional = year as f64 + elapsed as f64 / (length as f64 * 1_000_000.0);

        // Rounding can leave a midnight stamp a few microseconds short of its day
        let day = instant.date();
        for _ in 0..4 {
            if fractional_year_to_date(fractional)? >= day {
                break;
            }
            fractional += f64::EPSILON * fractional.abs().max(1.0);
        }
        Ok(fractional)
    }
}

/// `"1800-1-1 00:00:0.0"`, `"2000-01-01T00:00:00Z"` or a bare date; lower-cased input
fn parse_reference_time(reference: &str) -> Option<NaiveDateTime> {
    let cleaned = reference
        .trim()
        .trim_end_matches("utc")
        .trim_end_matches('z')
        .replace('t', " ");
    let mut parts = cleaned.split_whitespace();

    let date = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let time = match parts.next() {
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()?,
    };
    Some(date.and_time(time))
}
