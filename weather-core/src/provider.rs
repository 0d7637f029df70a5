use crate::{
    Config, ForecastPayload, PlaceResolution,
    error::LookupError,
    provider::{openmeteo::OpenMeteoProvider, openweather::OpenWeatherGeocoder},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;
pub mod openweather;

/// Resolves a free-form place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, query: &str) -> anyhow::Result<PlaceResolution>;
}

/// Fetches the current/daily/hourly forecast for a resolved place.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, place: &PlaceResolution) -> anyhow::Result<ForecastPayload>;
}

/// Construct the geocoder, taking the API key from the environment or the config.
pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
    geocoder_with_key(config, config.resolved_api_key())
}

pub fn geocoder_with_key(
    config: &Config,
    api_key: Option<String>,
) -> anyhow::Result<Box<dyn Geocoder>> {
    let api_key = api_key.ok_or(LookupError::MissingApiKey)?;
    let geocoder =
        OpenWeatherGeocoder::new(api_key, config.geocoding_url.clone(), config.timeout())?;
    Ok(Box::new(geocoder))
}

pub fn forecast_provider_from_config(
    config: &Config,
) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let provider = OpenMeteoProvider::new(config.forecast_url.clone(), config.timeout())?;
    Ok(Box::new(provider))
}

/// Shorten a response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoder_requires_api_key() {
        let cfg = Config::default();
        let err = geocoder_with_key(&cfg, None).unwrap_err();

        assert_eq!(err.downcast_ref::<LookupError>(), Some(&LookupError::MissingApiKey));
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn geocoder_builds_with_key() {
        let cfg = Config::default();
        assert!(geocoder_with_key(&cfg, Some("KEY".into())).is_ok());
    }

    #[test]
    fn forecast_provider_builds_from_defaults() {
        assert!(forecast_provider_from_config(&Config::default()).is_ok());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        assert_eq!(truncate_body("short"), "short");

        let long = "é".repeat(250);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
