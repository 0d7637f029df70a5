use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use weather_core::{
    Config, ReportRenderer, WeatherService,
    provider::{forecast_provider_from_config, geocoder_from_config},
    service::{fetching_banner, validate_city},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current, daily and hourly weather for a city"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key used to look up cities.
    Configure {
        /// Key to store; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show the weather report for a city (the default).
    Show {
        /// City name; prompted for when omitted.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Show { city: None }) {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { city } => show(city).await,
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => inquire::Password::new("OpenWeatherMap API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    let mut config = Config::load()?;
    config.set_api_key(api_key);
    let path = config.save()?;
    tracing::debug!(path = %path.display(), "Stored API key");

    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Ask for the city: an interactive prompt on a terminal, a plain line otherwise.
fn prompt_city() -> anyhow::Result<String> {
    if io::stdin().is_terminal() {
        return inquire::Text::new("Enter city name:")
            .prompt()
            .context("Failed to read city name");
    }

    print!("Enter city name: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read city name from standard input")?;
    Ok(line)
}

async fn show(city: Option<String>) -> anyhow::Result<()> {
    let input = match city {
        Some(city) => city,
        None => prompt_city()?,
    };
    let city = validate_city(&input)?;

    let config = Config::load()?;
    tracing::debug!(
        city,
        geocoding_url = %config.geocoding_url,
        forecast_url = %config.forecast_url,
        "Looking up weather"
    );
    let service = WeatherService::new(
        geocoder_from_config(&config)?,
        forecast_provider_from_config(&config)?,
    );

    let place = service
        .resolve(city)
        .await
        .context("Failed to obtain coordinates. Cannot fetch weather data.")?;
    println!("\n{}", fetching_banner(&place));

    let payload = service
        .forecast(&place)
        .await
        .context("Failed to retrieve detailed weather data.")?;

    tracing::debug!(
        utc_offset_seconds = ?payload.utc_offset_seconds,
        "Forecast received"
    );

    let renderer = ReportRenderer::new(Utc::now());
    print!("{}", renderer.render(&payload, &place.display_name));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_show() {
        let cli = Cli::try_parse_from(["weather"]).expect("should parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn show_takes_optional_city() {
        let cli = Cli::try_parse_from(["weather", "show", "New York"]).expect("should parse");
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city.as_deref(), Some("New York")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_accepts_key_flag() {
        let cli =
            Cli::try_parse_from(["weather", "configure", "--api-key", "abc"]).expect("should parse");
        match cli.command {
            Some(Command::Configure { api_key }) => assert_eq!(api_key.as_deref(), Some("abc")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
