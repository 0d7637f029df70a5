//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The geocoding and forecast providers
//! - Normalization of raw forecast values into display text
//! - Rendering of the current/daily/hourly report
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;
pub mod report;
pub mod service;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{FormatError, LookupError};
pub use model::{ForecastBlock, ForecastPayload, PlaceResolution};
pub use provider::{ForecastProvider, Geocoder};
pub use report::ReportRenderer;
pub use service::WeatherService;
