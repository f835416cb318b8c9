//! Open-Meteo geocoding client
//!
//! Resolves a free-text place name to coordinates for manual search.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::weather::{http_client, WeatherError};
use super::Place;

/// Base URL for the Open-Meteo geocoding API
const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Client for looking up places by name
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

impl Default for GeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodeClient {
    pub fn new() -> Self {
        Self::with_base_url(GEOCODING_BASE_URL.to_string())
    }

    /// Create a new GeocodeClient pointed at a different endpoint (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: http_client(),
            base_url,
        }
    }

    /// Look up the best match for `name`
    ///
    /// # Returns
    /// * `Ok(Some(Place))` - The top result
    /// * `Ok(None)` - If the geocoder knows no such place
    /// * `Err(WeatherError)` - If the request or parsing fails
    pub async fn search(&self, name: &str) -> Result<Option<Place>, WeatherError> {
        debug!(name, "geocoding place");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("name", name), ("count", "1")])
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let parsed: GeocodingResponse = serde_json::from_str(&text)?;

        Ok(parsed.results.into_iter().next().map(|r| Place {
            name: r.name,
            country: r.country,
            latitude: r.latitude,
            longitude: r.longitude,
        }))
    }
}

/// Geocoding API response; `results` is omitted entirely when nothing matches
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}
