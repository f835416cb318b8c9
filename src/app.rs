//! Application flow for a single forecast run
//!
//! Resolves the location, loads the forecast through the expiring cache,
//! gathers advisories, evaluates today's alerts and renders the report.

use thiserror::Error;
use tracing::{info, warn};

use crate::alerts::{self, ValidationError};
use crate::cache::{Clock, ExpiringCache, FetchError, TextStore};
use crate::cli::{Location, RunConfig};
use crate::data::weather::parse_daily;
use crate::data::{AdvisoryClient, GeocodeClient, WeatherClient, WeatherError};
use crate::report::render_report;

/// Errors that end a run
#[derive(Debug, Error)]
pub enum AppError {
    /// The geocoder had no match for the city
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    /// Today's forecast is unusable for alerting
    #[error("Cannot evaluate alerts: {0}")]
    Validation(#[from] ValidationError),
}

/// Coordinates plus the name shown in the report title
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// Holds the provider clients used during a run
#[derive(Debug, Clone, Default)]
pub struct App {
    weather: WeatherClient,
    geocoder: GeocodeClient,
    advisories: AdvisoryClient,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an App with custom clients (for testing)
    pub fn with_clients(
        weather: WeatherClient,
        geocoder: GeocodeClient,
        advisories: AdvisoryClient,
    ) -> Self {
        Self {
            weather,
            geocoder,
            advisories,
        }
    }

    /// Turns a city name or coordinate pair into coordinates and a title
    pub async fn resolve_location(&self, location: &Location) -> Result<ResolvedLocation, AppError> {
        match location {
            Location::Coordinates {
                latitude,
                longitude,
            } => Ok(ResolvedLocation {
                latitude: *latitude,
                longitude: *longitude,
                label: format!("{}, {}", latitude, longitude),
            }),
            Location::City(name) => {
                let place = self
                    .geocoder
                    .search(name)
                    .await?
                    .ok_or_else(|| AppError::LocationNotFound(name.clone()))?;
                info!(city = %name, resolved = %place.label(), "location resolved");
                Ok(ResolvedLocation {
                    latitude: place.latitude,
                    longitude: place.longitude,
                    label: place.label(),
                })
            }
        }
    }

    /// Command-line advisories followed by feed advisories
    ///
    /// A feed that cannot be fetched is logged and skipped.
    pub async fn collect_advisories(&self, config: &RunConfig) -> Vec<String> {
        let mut advisories = config.advisories.clone();

        if let Some(url) = &config.advisory_feed {
            match self
                .advisories
                .fetch(url, config.advisory_filter.as_deref())
                .await
            {
                Ok(feed) => advisories.extend(feed),
                Err(e) => warn!(%url, error = %e, "advisory feed unavailable, skipping"),
            }
        }

        advisories
    }

    /// Runs the whole flow and returns the rendered report
    pub async fn run<S: TextStore, C: Clock>(
        &self,
        config: &RunConfig,
        cache: &ExpiringCache<S, C>,
    ) -> Result<String, AppError> {
        let target = self.resolve_location(&config.location).await?;
        let key = WeatherClient::cache_key(target.latitude, target.longitude);
        let weather = &self.weather;
        let (lat, lon) = (target.latitude, target.longitude);

        // Only responses that parse get cached
        let raw = match cache
            .get_or_fetch(&key, config.cache.expiry_ms, move || async move {
                let raw = weather.fetch_daily(lat, lon).await?;
                parse_daily(&raw)?;
                Ok::<_, WeatherError>(raw)
            })
            .await
        {
            Ok(raw) => raw,
            Err(FetchError::Fetch(e)) => return Err(e.into()),
            Err(FetchError::Uncached { payload, source }) => {
                warn!(error = %source, "continuing without caching the forecast");
                payload
            }
        };

        let days = parse_daily(&raw)?;
        let today = days
            .first()
            .ok_or_else(|| WeatherError::MissingField("daily.time".to_string()))?;

        let advisories = self.collect_advisories(config).await;
        let alerts = alerts::evaluate(today, &advisories)?;
        info!(date = %today.date, count = alerts.len(), "alerts evaluated");

        Ok(render_report(&target.label, &days, &alerts))
    }
}
