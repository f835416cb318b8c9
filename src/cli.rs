//! Command-line interface parsing for wxalert
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `RunConfig` for the application.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::cache::DEFAULT_EXPIRY_MS;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Neither a city nor coordinates were given
    #[error("No location given. Use --city <NAME> or --lat <LAT> --lon <LON>")]
    MissingLocation,

    /// Both a city and coordinates were given
    #[error("Use either --city or --lat/--lon, not both")]
    ConflictingLocation,

    /// Only one of --lat/--lon was given
    #[error("--lat and --lon must be given together")]
    IncompleteCoordinates,

    /// The city name is blank
    #[error("Please enter a city name")]
    EmptyCity,

    #[error("Invalid latitude: {0}. Must be between -90 and 90")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0}. Must be between -180 and 180")]
    InvalidLongitude(f64),

    /// --advisory-filter without --advisory-feed
    #[error("--advisory-filter requires --advisory-feed")]
    FilterWithoutFeed,
}

/// wxalert - 7-day forecast with weather alerts
#[derive(Parser, Debug)]
#[command(name = "wxalert")]
#[command(about = "7-day weather forecast with threshold-based alerts")]
#[command(version)]
pub struct Cli {
    /// Place name to look up, e.g. "Manila"
    #[arg(long, value_name = "NAME")]
    pub city: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, value_name = "LAT", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, value_name = "LON", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Extra advisory to append to the alerts (repeatable)
    #[arg(long = "advisory", value_name = "TEXT")]
    pub advisories: Vec<String>,

    /// URL of a line-oriented hazard advisory feed
    #[arg(long, value_name = "URL")]
    pub advisory_feed: Option<String>,

    /// Only keep feed lines containing this keyword (case-insensitive)
    #[arg(long, value_name = "KEYWORD")]
    pub advisory_filter: Option<String>,

    /// How long a cached forecast stays valid
    #[arg(long, value_name = "MINUTES", default_value_t = DEFAULT_EXPIRY_MS / 60_000)]
    pub cache_ttl: u64,

    /// Always fetch a fresh forecast and keep nothing on disk
    #[arg(long)]
    pub no_cache: bool,

    /// Directory for cached responses (defaults to the XDG cache dir)
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Where to fetch the forecast for
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Resolve through the geocoder
    City(String),
    /// Use the coordinates directly
    Coordinates { latitude: f64, longitude: f64 },
}

/// Cache behaviour for a run
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Whether to read and write the on-disk cache
    pub enabled: bool,
    /// Expiry window in milliseconds
    pub expiry_ms: u64,
    /// Custom cache directory
    pub dir: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            expiry_ms: DEFAULT_EXPIRY_MS,
            dir: None,
        }
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub location: Location,
    /// Advisories given on the command line, in order
    pub advisories: Vec<String>,
    pub advisory_feed: Option<String>,
    pub advisory_filter: Option<String>,
    pub cache: CacheSettings,
    pub log_level: String,
}

impl RunConfig {
    /// Creates a RunConfig for a location with every other setting at its default
    pub fn for_location(location: Location) -> Self {
        Self {
            location,
            advisories: Vec::new(),
            advisory_feed: None,
            advisory_filter: None,
            cache: CacheSettings::default(),
            log_level: "warn".to_string(),
        }
    }

    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with validated settings
    /// * `Err(CliError)` if the location is missing, ambiguous or out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let location = match (&cli.city, cli.lat, cli.lon) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(CliError::ConflictingLocation)
            }
            (Some(city), None, None) => {
                let city = city.trim();
                if city.is_empty() {
                    return Err(CliError::EmptyCity);
                }
                Location::City(city.to_string())
            }
            (None, Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) {
                    return Err(CliError::InvalidLatitude(latitude));
                }
                if !(-180.0..=180.0).contains(&longitude) {
                    return Err(CliError::InvalidLongitude(longitude));
                }
                Location::Coordinates {
                    latitude,
                    longitude,
                }
            }
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(CliError::IncompleteCoordinates)
            }
            (None, None, None) => return Err(CliError::MissingLocation),
        };

        if cli.advisory_filter.is_some() && cli.advisory_feed.is_none() {
            return Err(CliError::FilterWithoutFeed);
        }

        Ok(RunConfig {
            location,
            advisories: cli.advisories.clone(),
            advisory_feed: cli.advisory_feed.clone(),
            advisory_filter: cli.advisory_filter.clone(),
            cache: CacheSettings {
                enabled: !cli.no_cache,
                expiry_ms: cli.cache_ttl.saturating_mul(60_000),
                dir: cli.cache_dir.clone(),
            },
            log_level: cli.log_level.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> Result<RunConfig, CliError> {
        let mut argv = vec!["wxalert"];
        argv.extend_from_slice(args);
        RunConfig::from_cli(&Cli::parse_from(argv))
    }

    #[test]
    fn test_city_location() {
        let config = config_from(&["--city", "  Manila "]).unwrap();
        assert_eq!(config.location, Location::City("Manila".to_string()));
    }

    #[test]
    fn test_coordinate_location_accepts_negatives() {
        let config = config_from(&["--lat", "-33.87", "--lon", "151.21"]).unwrap();
        assert_eq!(
            config.location,
            Location::Coordinates {
                latitude: -33.87,
                longitude: 151.21
            }
        );
    }

    #[test]
    fn test_missing_location() {
        assert_eq!(config_from(&[]), Err(CliError::MissingLocation));
    }

    #[test]
    fn test_blank_city() {
        assert_eq!(config_from(&["--city", "   "]), Err(CliError::EmptyCity));
    }

    #[test]
    fn test_city_and_coordinates_conflict() {
        assert_eq!(
            config_from(&["--city", "Manila", "--lat", "1"]),
            Err(CliError::ConflictingLocation)
        );
    }

    #[test]
    fn test_incomplete_coordinates() {
        assert_eq!(
            config_from(&["--lat", "14.6"]),
            Err(CliError::IncompleteCoordinates)
        );
        assert_eq!(
            config_from(&["--lon", "120.9"]),
            Err(CliError::IncompleteCoordinates)
        );
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert_eq!(
            config_from(&["--lat", "91", "--lon", "0"]),
            Err(CliError::InvalidLatitude(91.0))
        );
        assert_eq!(
            config_from(&["--lat", "0", "--lon", "-181"]),
            Err(CliError::InvalidLongitude(-181.0))
        );
    }

    #[test]
    fn test_filter_requires_feed() {
        assert_eq!(
            config_from(&["--city", "Manila", "--advisory-filter", "philippines"]),
            Err(CliError::FilterWithoutFeed)
        );
    }

    #[test]
    fn test_cache_defaults() {
        let config = config_from(&["--city", "Manila"]).unwrap();
        assert_eq!(config.cache, CacheSettings::default());
        assert_eq!(config.cache.expiry_ms, 3_600_000);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_cache_flags() {
        let config = config_from(&[
            "--city",
            "Manila",
            "--cache-ttl",
            "5",
            "--no-cache",
            "--cache-dir",
            "/tmp/wx",
        ])
        .unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.expiry_ms, 300_000);
        assert_eq!(config.cache.dir, Some(PathBuf::from("/tmp/wx")));
    }

    #[test]
    fn test_advisories_keep_order() {
        let config = config_from(&[
            "--city",
            "Manila",
            "--advisory",
            "B",
            "--advisory",
            "A",
        ])
        .unwrap();
        assert_eq!(config.advisories, vec!["B", "A"]);
    }
}
