use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::LookupError, model::PlaceResolution, provider::truncate_body};

use super::Geocoder;

/// OpenWeatherMap direct geocoding.
#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    api_key: String,
    url: String,
    http: Client,
}

impl OpenWeatherGeocoder {
    pub fn new(api_key: String, url: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for geocoding")?;

        Ok(Self { api_key, url, http })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    state: Option<String>,
    country: Option<String>,
}

#[async_trait]
impl Geocoder for OpenWeatherGeocoder {
    async fn resolve(&self, query: &str) -> Result<PlaceResolution> {
        let res = self
            .http
            .get(&self.url)
            .query(&[("q", query), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Geocoding request for '{query}' failed"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Geocoding request for '{}' failed with status {}: {}",
                query,
                status,
                truncate_body(&body),
            ));
        }

        let matches: Vec<OwGeoMatch> = serde_json::from_str(&body)
            .with_context(|| format!("Unexpected geocoding response format for '{query}'"))?;

        let first = matches
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::PlaceNotFound(query.to_string()))?;

        let (Some(latitude), Some(longitude)) = (first.lat, first.lon) else {
            return Err(LookupError::MissingCoordinates(query.to_string()).into());
        };

        let name = first.name.as_deref().unwrap_or(query);
        let display_name = PlaceResolution::join_name_parts([
            Some(name),
            first.state.as_deref(),
            first.country.as_deref(),
        ]);

        tracing::info!(%display_name, latitude, longitude, "Resolved place");

        Ok(PlaceResolution { latitude, longitude, display_name })
    }
}
