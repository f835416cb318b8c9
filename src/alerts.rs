//! Threshold-based weather alerts for a single day.
//!
//! `evaluate` turns one `DailyForecast` plus any third-party advisories into
//! an ordered list of messages. Categories are checked in a fixed order
//! (rain, heat, cold, advisories) so the output is stable for a given input.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::data::DailyForecast;

/// Rain probability at or above which the high-rain alert fires
pub const HIGH_RAIN_PCT: u8 = 80;
/// Rain probability at or above which the moderate-rain alert fires
pub const MODERATE_RAIN_PCT: u8 = 50;
/// Maximum temperature at or above which the heat alert fires
pub const HEAT_MAX_C: f64 = 35.0;
/// Minimum temperature at or below which the cold alert fires
pub const COLD_MIN_C: f64 = 10.0;

pub const HIGH_RAIN_MESSAGE: &str = "⚠️ High chance of rain today. Bring an umbrella!";
pub const MODERATE_RAIN_MESSAGE: &str = "🌦️ Possible rain showers, stay prepared.";
pub const HEAT_MESSAGE: &str = "🔥 Heat alert: Stay hydrated and avoid long sun exposure.";
pub const COLD_MESSAGE: &str = "❄️ Cold weather alert: Dress warmly.";
pub const ALL_CLEAR_MESSAGE: &str = "✅ No severe weather alerts today.";

/// A forecast record the engine refuses to evaluate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required reading is absent
    #[error("forecast for {date} is missing {field}")]
    MissingField { date: NaiveDate, field: &'static str },

    /// A temperature is NaN or infinite
    #[error("forecast for {date} has non-finite {field}: {value}")]
    NonFinite {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },
}

/// Validated readings for one day
#[derive(Debug, Clone, Copy, PartialEq)]
struct Readings {
    temp_max_c: f64,
    temp_min_c: f64,
    /// Clamped to 0-100
    rain_probability_pct: u8,
}

fn finite_temperature(
    date: NaiveDate,
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField { date, field })?;
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { date, field, value });
    }
    Ok(value)
}

fn validate(forecast: &DailyForecast) -> Result<Readings, ValidationError> {
    let date = forecast.date;
    let temp_max_c = finite_temperature(date, "temp_max_c", forecast.temp_max_c)?;
    let temp_min_c = finite_temperature(date, "temp_min_c", forecast.temp_min_c)?;

    let raw_rain = forecast
        .rain_probability_pct
        .ok_or(ValidationError::MissingField {
            date,
            field: "rain_probability_pct",
        })?;
    let clamped = raw_rain.clamp(0, 100);
    if clamped != raw_rain {
        debug!(%date, raw = raw_rain, clamped, "rain probability clamped");
    }

    Ok(Readings {
        temp_max_c,
        temp_min_c,
        rain_probability_pct: clamped as u8,
    })
}

/// Evaluate the alert rules for one day.
///
/// Rain, heat and cold alerts come first, then every advisory verbatim in
/// input order. If nothing fired and there are no advisories the result is
/// exactly `[ALL_CLEAR_MESSAGE]`. Thresholds are inclusive.
///
/// # Errors
/// Returns `ValidationError` for a missing reading or a non-finite
/// temperature. Out-of-range rain probability is clamped, not rejected.
pub fn evaluate(
    forecast: &DailyForecast,
    advisories: &[String],
) -> Result<Vec<String>, ValidationError> {
    let readings = validate(forecast)?;
    let mut alerts = Vec::new();

    if readings.rain_probability_pct >= HIGH_RAIN_PCT {
        alerts.push(HIGH_RAIN_MESSAGE.to_string());
    } else if readings.rain_probability_pct >= MODERATE_RAIN_PCT {
        alerts.push(MODERATE_RAIN_MESSAGE.to_string());
    }

    if readings.temp_max_c >= HEAT_MAX_C {
        alerts.push(HEAT_MESSAGE.to_string());
    }

    if readings.temp_min_c <= COLD_MIN_C {
        alerts.push(COLD_MESSAGE.to_string());
    }

    alerts.extend(advisories.iter().cloned());

    if alerts.is_empty() {
        alerts.push(ALL_CLEAR_MESSAGE.to_string());
    }

    Ok(alerts)
}
