//! Open-Meteo daily forecast client
//!
//! This module fetches the 7-day daily forecast from the Open-Meteo API. The
//! raw JSON response is what gets cached; `parse_daily` turns it into
//! `DailyForecast` records when needed.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::DailyForecast;

/// Base URL for the Open-Meteo forecast API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Daily variables requested from the provider
const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// Today plus six following days
const FORECAST_DAYS: u8 = 7;

/// Request timeout shared by the provider clients
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the forecast, geocoding or advisory endpoints
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The provider answered with an error
    #[error("Provider returned an error: {0}")]
    Provider(String),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid date format in response
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),
}

/// Builds the HTTP client used by every provider client
pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// Client for fetching daily forecasts from Open-Meteo
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherClient {
    /// Create a new WeatherClient with default settings
    pub fn new() -> Self {
        Self::with_base_url(OPEN_METEO_BASE_URL.to_string())
    }

    /// Create a new WeatherClient pointed at a different endpoint (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: http_client(),
            base_url,
        }
    }

    /// Cache key for a coordinate pair, e.g. `weather_14.6_120.98`
    pub fn cache_key(lat: f64, lon: f64) -> String {
        format!("weather_{}_{}", lat, lon)
    }

    /// Fetch the raw daily forecast response for the given coordinates
    ///
    /// # Returns
    /// * `Ok(Value)` - The provider's JSON response, unmodified
    /// * `Err(WeatherError)` - If the request fails or the provider reports an error
    pub async fn fetch_daily(&self, lat: f64, lon: f64) -> Result<Value, WeatherError> {
        debug!(lat, lon, "fetching daily forecast");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("daily", DAILY_VARIABLES.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // Open-Meteo reports bad requests as {"error": true, "reason": "..."}
        if let Ok(ProviderError { error: true, reason }) = serde_json::from_str::<ProviderError>(&text) {
            return Err(WeatherError::Provider(reason));
        }
        if !status.is_success() {
            return Err(WeatherError::Provider(format!("HTTP {}", status)));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Parse a raw Open-Meteo response into one `DailyForecast` per day
///
/// The first record is "today" in the location's timezone. `null` readings
/// are kept as `None`.
pub fn parse_daily(response: &Value) -> Result<Vec<DailyForecast>, WeatherError> {
    let daily = OpenMeteoDailyResponse::deserialize(response)?.daily;
    let len = daily.time.len();

    if len == 0 {
        return Err(WeatherError::MissingField("daily.time".to_string()));
    }

    // Validate that all arrays have the same length
    if daily.temperature_2m_max.len() != len
        || daily.temperature_2m_min.len() != len
        || daily.precipitation_probability_max.len() != len
    {
        return Err(WeatherError::MissingField(
            "daily arrays have inconsistent lengths".to_string(),
        ));
    }

    let mut forecasts = Vec::with_capacity(len);

    for i in 0..len {
        forecasts.push(DailyForecast {
            date: parse_date(&daily.time[i])?,
            temp_max_c: daily.temperature_2m_max[i],
            temp_min_c: daily.temperature_2m_min[i],
            rain_probability_pct: daily.precipitation_probability_max[i].map(|p| p.round() as i32),
        });
    }

    Ok(forecasts)
}

/// Parse a date string in ISO 8601 format (e.g., "2024-07-15")
fn parse_date(date_str: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| WeatherError::InvalidDateFormat(date_str.to_string()))
}

/// Error body returned by Open-Meteo
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: bool,
    #[serde(default)]
    reason: String,
}

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoDailyResponse {
    daily: DailyWeather,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct DailyWeather {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_probability_max: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Sample valid Open-Meteo API response
    const VALID_RESPONSE: &str = r#"{
        "latitude": 14.625,
        "longitude": 121.0,
        "generationtime_ms": 0.05,
        "utc_offset_seconds": 28800,
        "timezone": "Asia/Manila",
        "timezone_abbreviation": "PST",
        "elevation": 12.0,
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "precipitation_probability_max": "%"
        },
        "daily": {
            "time": ["2024-07-15", "2024-07-16", "2024-07-17", "2024-07-18", "2024-07-19", "2024-07-20", "2024-07-21"],
            "temperature_2m_max": [33.1, 35.0, 31.2, 30.8, 32.4, null, 29.9],
            "temperature_2m_min": [26.0, 26.4, 25.1, 24.9, 25.5, 25.0, 24.1],
            "precipitation_probability_max": [85, 40, 55, 100, 0, 10, null]
        }
    }"#;

    fn valid_response() -> Value {
        serde_json::from_str(VALID_RESPONSE).expect("Failed to parse valid response")
    }

    #[test]
    fn test_parse_valid_response() {
        let days = parse_daily(&valid_response()).expect("Failed to parse forecast");

        assert_eq!(days.len(), 7);
        let today = &days[0];
        assert_eq!(today.date, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
        assert!((today.temp_max_c.unwrap() - 33.1).abs() < 0.01);
        assert!((today.temp_min_c.unwrap() - 26.0).abs() < 0.01);
        assert_eq!(today.rain_probability_pct, Some(85));
    }

    #[test]
    fn test_parse_keeps_nulls_as_none() {
        let days = parse_daily(&valid_response()).expect("Failed to parse forecast");

        assert!(days[5].temp_max_c.is_none());
        assert!(days[6].rain_probability_pct.is_none());
    }

    #[test]
    fn test_parse_inconsistent_lengths() {
        let response = json!({
            "daily": {
                "time": ["2024-07-15", "2024-07-16"],
                "temperature_2m_max": [30.0],
                "temperature_2m_min": [20.0, 21.0],
                "precipitation_probability_max": [10, 20]
            }
        });

        let result = parse_daily(&response);
        assert!(matches!(result, Err(WeatherError::MissingField(_))));
    }

    #[test]
    fn test_parse_empty_daily_arrays() {
        let response = json!({
            "daily": {
                "time": [],
                "temperature_2m_max": [],
                "temperature_2m_min": [],
                "precipitation_probability_max": []
            }
        });

        let result = parse_daily(&response);
        assert!(matches!(result, Err(WeatherError::MissingField(f)) if f == "daily.time"));
    }

    #[test]
    fn test_parse_missing_daily_block() {
        let result = parse_daily(&json!({"latitude": 1.0}));
        assert!(matches!(result, Err(WeatherError::ParseError(_))));
    }

    #[test]
    fn test_parse_invalid_date() {
        let response = json!({
            "daily": {
                "time": ["15/07/2024"],
                "temperature_2m_max": [30.0],
                "temperature_2m_min": [20.0],
                "precipitation_probability_max": [10]
            }
        });

        let result = parse_daily(&response);
        assert!(matches!(result, Err(WeatherError::InvalidDateFormat(d)) if d == "15/07/2024"));
    }

    #[test]
    fn test_fractional_rain_probability_is_rounded() {
        let response = json!({
            "daily": {
                "time": ["2024-07-15"],
                "temperature_2m_max": [30.0],
                "temperature_2m_min": [20.0],
                "precipitation_probability_max": [79.6]
            }
        });

        let days = parse_daily(&response).unwrap();
        assert_eq!(days[0].rain_probability_pct, Some(80));
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(WeatherClient::cache_key(14.6, 120.98), "weather_14.6_120.98");
        assert_eq!(WeatherClient::cache_key(-33.87, 151.21), "weather_-33.87_151.21");
    }
}
