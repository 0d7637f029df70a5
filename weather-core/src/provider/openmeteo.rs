use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::{
    model::{ForecastPayload, PlaceResolution},
    provider::truncate_body,
};

use super::ForecastProvider;

pub const CURRENT_VARIABLES: &[&str] = &[
    "temperature_2m",
    "apparent_temperature",
    "relative_humidity_2m",
    "is_day",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "pressure_msl",
    "surface_pressure",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
];

pub const DAILY_VARIABLES: &[&str] = &[
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "sunrise",
    "sunset",
    "daylight_duration",
    "sunshine_duration",
    "uv_index_max",
    "precipitation_sum",
    "rain_sum",
    "showers_sum",
    "snowfall_sum",
    "precipitation_hours",
    "precipitation_probability_max",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
    "wind_direction_10m_dominant",
    "dew_point_2m_mean",
    "visibility_mean",
];

pub const HOURLY_VARIABLES: &[&str] = &[
    "temperature_2m",
    "apparent_temperature",
    "relative_humidity_2m",
    "dew_point_2m",
    "wet_bulb_temperature_2m",
    "precipitation_probability",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "snow_depth",
    "freezing_level_height",
    "weather_code",
    "pressure_msl",
    "surface_pressure",
    "cloud_cover",
    "visibility",
    "evapotranspiration",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "uv_index",
    "is_day",
    "sunshine_duration",
];

/// Open-Meteo forecast API, metric units, timezone picked by the service.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for forecasts")?;

        Ok(Self { url, http })
    }

    fn query(place: &PlaceResolution) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", place.latitude.to_string()),
            ("longitude", place.longitude.to_string()),
            ("current", CURRENT_VARIABLES.join(",")),
            ("daily", DAILY_VARIABLES.join(",")),
            ("hourly", HOURLY_VARIABLES.join(",")),
            ("models", "best_match".to_string()),
            ("temperature_unit", "celsius".to_string()),
            ("wind_speed_unit", "kmh".to_string()),
            ("precipitation_unit", "mm".to_string()),
            ("timezone", "auto".to_string()),
        ]
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch(&self, place: &PlaceResolution) -> Result<ForecastPayload> {
        let res = self
            .http
            .get(&self.url)
            .query(&Self::query(place))
            .send()
            .await
            .context("Weather data request failed")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read weather data response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Weather data request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let payload: ForecastPayload = serde_json::from_str(&body)
            .context("Error decoding JSON response from weather API")?;

        tracing::debug!(
            hourly = payload.hourly.times().len(),
            daily = payload.daily.times().len(),
            "Fetched forecast"
        );

        Ok(payload)
    }
}
