//! Core data models for wxalert
//!
//! This module contains the forecast and location types shared by the
//! provider clients, the alert engine and the report, plus the clients that
//! produce them.

pub mod advisory;
pub mod geocode;
pub mod weather;

pub use advisory::AdvisoryClient;
pub use geocode::GeocodeClient;
pub use weather::{WeatherClient, WeatherError};

use chrono::NaiveDate;

/// One day's summarized forecast
///
/// Numeric readings are optional because the provider reports `null` for
/// values it could not compute. The alert engine refuses records with
/// missing readings instead of guessing.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    /// Calendar date in the location's timezone
    pub date: NaiveDate,
    /// Daily maximum temperature in Celsius
    pub temp_max_c: Option<f64>,
    /// Daily minimum temperature in Celsius
    pub temp_min_c: Option<f64>,
    /// Maximum precipitation probability for the day, nominally 0-100
    pub rain_probability_pct: Option<i32>,
}

impl DailyForecast {
    /// Creates a forecast with every reading present
    pub fn new(date: NaiveDate, temp_max_c: f64, temp_min_c: f64, rain_probability_pct: i32) -> Self {
        Self {
            date,
            temp_max_c: Some(temp_max_c),
            temp_min_c: Some(temp_min_c),
            rain_probability_pct: Some(rain_probability_pct),
        }
    }
}

/// A named place resolved by the geocoder
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    /// Display label such as "Manila, Philippines"
    pub fn label(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_label_with_country() {
        let place = Place {
            name: "Manila".to_string(),
            country: Some("Philippines".to_string()),
            latitude: 14.6,
            longitude: 120.98,
        };
        assert_eq!(place.label(), "Manila, Philippines");
    }

    #[test]
    fn test_place_label_without_country() {
        let place = Place {
            name: "Atlantis".to_string(),
            country: None,
            latitude: 0.0,
            longitude: 0.0,
        };
        assert_eq!(place.label(), "Atlantis");
    }
}
