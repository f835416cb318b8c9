//! Third-party hazard advisory feed
//!
//! Advisories are free-text lines pulled from a caller-configured feed and
//! optionally narrowed to those mentioning a keyword. The alert engine never
//! interprets them; it appends them as-is.

use reqwest::Client;
use tracing::debug;

use super::weather::{http_client, WeatherError};

/// Client for a line-oriented advisory feed
#[derive(Debug, Clone)]
pub struct AdvisoryClient {
    client: Client,
}

impl Default for AdvisoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisoryClient {
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }

    /// Fetch advisories from `url`, keeping only lines that mention `filter`
    pub async fn fetch(&self, url: &str, filter: Option<&str>) -> Result<Vec<String>, WeatherError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let advisories = filter_advisories(&body, filter);
        debug!(url, count = advisories.len(), "advisories fetched");
        Ok(advisories)
    }
}

/// Split a feed body into trimmed, non-empty lines
///
/// With a filter, only lines containing it (case-insensitive) are kept.
/// Input order is preserved.
pub fn filter_advisories(body: &str, filter: Option<&str>) -> Vec<String> {
    let needle = filter.map(str::to_lowercase);

    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| match &needle {
            Some(needle) => line.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .map(str::to_string)
        .collect()
}
