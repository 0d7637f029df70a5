//! Sequential lookup pipeline: validate input, geocode, fetch the forecast.

use anyhow::Result;

use crate::{
    error::LookupError,
    model::{ForecastPayload, PlaceResolution},
    provider::{ForecastProvider, Geocoder},
};

/// Trimmed city name, or [`LookupError::EmptyCity`].
pub fn validate_city(input: &str) -> Result<&str, LookupError> {
    let city = input.trim();
    if city.is_empty() {
        return Err(LookupError::EmptyCity);
    }
    Ok(city)
}

/// Progress line printed once coordinates are known.
pub fn fetching_banner(place: &PlaceResolution) -> String {
    format!(
        "Fetching weather data for {} (Lat: {:.2}, Lon: {:.2})...",
        place.display_name, place.latitude, place.longitude
    )
}

#[derive(Debug)]
pub struct WeatherService {
    geocoder: Box<dyn Geocoder>,
    forecasts: Box<dyn ForecastProvider>,
}

impl WeatherService {
    pub fn new(geocoder: Box<dyn Geocoder>, forecasts: Box<dyn ForecastProvider>) -> Self {
        Self { geocoder, forecasts }
    }

    pub async fn resolve(&self, city: &str) -> Result<PlaceResolution> {
        let city = validate_city(city)?;
        self.geocoder.resolve(city).await.inspect_err(|err| {
            tracing::error!(city, error = %format!("{err:#}"), "Failed to obtain coordinates");
        })
    }

    pub async fn forecast(&self, place: &PlaceResolution) -> Result<ForecastPayload> {
        self.forecasts.fetch(place).await.inspect_err(|err| {
            tracing::error!(place = %place.display_name, error = %format!("{err:#}"), "Failed to retrieve weather data");
        })
    }

    /// Resolve `city` and fetch its forecast. No forecast request is made unless the place
    /// resolves.
    pub async fn lookup(&self, city: &str) -> Result<(PlaceResolution, ForecastPayload)> {
        let place = self.resolve(city).await?;
        let payload = self.forecast(&place).await?;
        Ok((place, payload))
    }
}
